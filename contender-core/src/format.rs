//! Compact display of values and thrown errors for diagnostics.
//!
//! Scalars render as literal text (`NULL`, `TRUE`, `111`, `"TEST"`), lists
//! and maps as a tag plus their JSON body, and thrown errors as a
//! `throw{...}` record limited to the fields a caller asks for. Long bodies
//! are clipped to a configurable width.

use crate::outcome::{Kind, Thrown};
use crate::value::Value;

/// Default clip width, in characters.
pub const DEFAULT_LIMIT: usize = 30;

/// Identifies one field of a [`Thrown`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowField {
    /// The error class name.
    Class,
    /// The numeric code.
    Code,
    /// The message text.
    Message,
    /// The source file.
    File,
    /// The source line.
    Line,
}

impl ThrowField {
    /// All fields, in display order.
    pub const ALL: [ThrowField; 5] = [
        ThrowField::Class,
        ThrowField::Code,
        ThrowField::Message,
        ThrowField::File,
        ThrowField::Line,
    ];

    /// Key used in `throw{...}` records.
    pub fn name(self) -> &'static str {
        match self {
            ThrowField::Class => "class",
            ThrowField::Code => "code",
            ThrowField::Message => "message",
            ThrowField::File => "file",
            ThrowField::Line => "line",
        }
    }
}

/// Renders values for expectation diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    limit: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter { limit: DEFAULT_LIMIT }
    }
}

impl Formatter {
    /// A formatter clipping bodies to `limit` characters.
    pub fn new(limit: usize) -> Self {
        Formatter { limit }
    }

    /// Literal display of a value.
    pub fn display(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(number) => number.to_string(),
            Value::Float(number) => {
                if *number == 0.0 {
                    "0.0".to_string()
                } else {
                    number.to_string()
                }
            }
            Value::Str(text) => format!("\"{}\"", self.clip(text)),
            Value::List(_) | Value::Map(_) => {
                let body = self.clip(&json_body(value));
                format!("{}{{{}}}", Kind::of(value).tag(), body)
            }
        }
    }

    /// `throw{...}` record restricted to `fields`.
    ///
    /// Class and file keep their tail when clipped, since the discriminating
    /// part of a namespaced class or a path is at the end.
    pub fn display_thrown(&self, thrown: &Thrown, fields: &[ThrowField]) -> String {
        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let text = match field {
                ThrowField::Class => self.clip_tail(&thrown.class),
                ThrowField::Code => thrown.code.to_string(),
                ThrowField::Message => self.clip(&thrown.message),
                ThrowField::File => self.clip_tail(&thrown.file),
                ThrowField::Line => thrown.line.to_string(),
            };
            parts.push(format!("{}:\"{}\"", field.name(), text));
        }
        format!("throw{{{}}}", parts.join(","))
    }

    fn clip(&self, text: &str) -> String {
        if text.chars().count() < self.limit {
            return text.to_string();
        }
        let keep = self.limit.saturating_sub(3);
        let head: String = text.chars().take(keep).collect();
        format!("{head}...")
    }

    fn clip_tail(&self, text: &str) -> String {
        let count = text.chars().count();
        if count < self.limit {
            return text.to_string();
        }
        let keep = self.limit.saturating_sub(3);
        let tail: String = text.chars().skip(count - keep).collect();
        format!("...{tail}")
    }
}

fn json_body(value: &Value) -> String {
    let text = serde_json::to_string(value).unwrap_or_default();
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_as_literals() {
        let formatter = Formatter::default();
        assert_eq!(formatter.display(&Value::Null), "NULL");
        assert_eq!(formatter.display(&Value::Bool(true)), "TRUE");
        assert_eq!(formatter.display(&Value::Bool(false)), "FALSE");
        assert_eq!(formatter.display(&Value::Int(111)), "111");
        assert_eq!(formatter.display(&Value::Int(0)), "0");
        assert_eq!(formatter.display(&Value::Float(2.5)), "2.5");
        assert_eq!(formatter.display(&Value::Float(0.0)), "0.0");
        assert_eq!(formatter.display(&Value::from("TEST")), "\"TEST\"");
    }

    #[test]
    fn collections_render_tag_and_json_body() {
        let formatter = Formatter::default();
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(formatter.display(&list), "list{1,2}");

        let map = Value::from(
            [("a".to_string(), Value::Int(1))]
                .into_iter()
                .collect::<std::collections::BTreeMap<_, _>>(),
        );
        assert_eq!(formatter.display(&map), "map{\"a\":1}");
    }

    #[test]
    fn long_strings_clip_head_first() {
        let formatter = Formatter::new(10);
        assert_eq!(
            formatter.display(&Value::from("abcdefghijklmno")),
            "\"abcdefg...\""
        );
        assert_eq!(formatter.display(&Value::from("short")), "\"short\"");
    }

    #[test]
    fn class_and_file_keep_their_tail() {
        let formatter = Formatter::new(10);
        let thrown = Thrown {
            class: "App\\Domain\\WidgetError".to_string(),
            message: "broke".to_string(),
            code: 7,
            file: "/very/long/path/to/file.rs".to_string(),
            line: 42,
        };
        assert_eq!(
            formatter.display_thrown(&thrown, &[ThrowField::Class]),
            "throw{class:\"...etError\"}"
        );
        assert_eq!(
            formatter.display_thrown(&thrown, &[ThrowField::File]),
            "throw{file:\"...file.rs\"}"
        );
    }

    #[test]
    fn thrown_records_list_requested_fields_in_order() {
        let formatter = Formatter::default();
        let thrown = Thrown {
            class: "Error".to_string(),
            message: "boom".to_string(),
            code: 111,
            file: "lib.rs".to_string(),
            line: 9,
        };
        assert_eq!(
            formatter.display_thrown(&thrown, &ThrowField::ALL),
            "throw{class:\"Error\",code:\"111\",message:\"boom\",file:\"lib.rs\",line:\"9\"}"
        );
        assert_eq!(
            formatter.display_thrown(&thrown, &[ThrowField::Code]),
            "throw{code:\"111\"}"
        );
    }
}
