//! Outcome of a stage call: what it returned, emitted, or threw.
//!
//! The record is explicit rather than inferred: [`Kind`] classifies it, and
//! [`Outcome::to_value`] re-exposes the record as a plain [`Value`] map for
//! the reserved `partial` argument of the next stage.

use std::any::Any;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Classification of an [`Outcome`].
///
/// `Pending`, `Skipped`, `Output` and `Throw` are the intrinsic kinds; the
/// remaining variants are the dynamic type tags of an ordinary return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// No stage has produced anything yet.
    Pending,
    /// The pipeline was empty, nothing ran.
    Skipped,
    /// The stage returned nothing but emitted text.
    Output,
    /// The stage raised an error.
    Throw,
    /// Returned `Value::Null` without emitting text.
    Null,
    /// Returned a boolean.
    Boolean,
    /// Returned an integer.
    Integer,
    /// Returned a float.
    Float,
    /// Returned a string.
    String,
    /// Returned a list.
    List,
    /// Returned a map.
    Map,
}

impl Kind {
    /// Dynamic type tag of a return value.
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Int(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
        }
    }

    /// The lowercase tag used in `type` expectations and diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            Kind::Pending => "pending",
            Kind::Skipped => "skipped",
            Kind::Output => "output",
            Kind::Throw => "throw",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Map => "map",
        }
    }
}

/// Error data captured from a stage.
///
/// Stage bodies return one of these to signal failure; panics are converted
/// into the `panic` class. Construction records the caller's file and line,
/// which is what the `file`/`line` throw expectations compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thrown {
    /// Error class name.
    pub class: String,
    /// Human-readable message.
    pub message: String,
    /// Numeric error code.
    pub code: i64,
    /// Source file of the construction site.
    pub file: String,
    /// Source line of the construction site.
    pub line: u32,
}

impl Thrown {
    /// Creates an error with the caller's location and code 0.
    #[track_caller]
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Thrown {
            class: class.into(),
            message: message.into(),
            code: 0,
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    /// Sets the numeric code.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Converts a caught panic payload. The location of the panic is not
    /// recoverable from the payload, so `file` stays empty.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "Unknown panic".to_string()
        };
        Thrown {
            class: "panic".to_string(),
            message,
            code: 0,
            file: String::new(),
            line: 0,
        }
    }
}

/// What one stage call (or a whole pipeline run) produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Outcome classification.
    pub kind: Kind,
    /// The returned value, `Null` on throw.
    pub return_value: Value,
    /// Text emitted through the capture, `None` when nothing was emitted or
    /// the stage threw.
    pub captured: Option<String>,
    /// The captured error, if any.
    pub thrown: Option<Thrown>,
}

impl Outcome {
    /// The placeholder handed to the first stage as its `partial`.
    pub fn pending() -> Self {
        Outcome {
            kind: Kind::Pending,
            return_value: Value::Null,
            captured: None,
            thrown: None,
        }
    }

    /// The outcome of an empty pipeline.
    pub fn skipped() -> Self {
        Outcome {
            kind: Kind::Skipped,
            return_value: Value::Null,
            captured: None,
            thrown: None,
        }
    }

    /// Builds the outcome of one finished call.
    ///
    /// A null return with captured text becomes `Output`; a thrown error
    /// discards whatever was captured before it.
    pub fn from_call(result: Result<Value, Thrown>, captured: Option<String>) -> Self {
        match result {
            Ok(value) => {
                let kind = if value.is_null() && captured.is_some() {
                    Kind::Output
                } else {
                    Kind::of(&value)
                };
                Outcome {
                    kind,
                    return_value: value,
                    captured,
                    thrown: None,
                }
            }
            Err(thrown) => Outcome {
                kind: Kind::Throw,
                return_value: Value::Null,
                captured: None,
                thrown: Some(thrown),
            },
        }
    }

    /// Re-exposes the record as the `partial` map the next stage receives:
    /// keys `type`, `return`, `output` and `throw`.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert(
            "type".to_string(),
            Value::Str(self.kind.tag().to_string()),
        );
        map.insert("return".to_string(), self.return_value.clone());
        map.insert(
            "output".to_string(),
            match &self.captured {
                Some(text) => Value::Str(text.clone()),
                None => Value::Null,
            },
        );
        map.insert(
            "throw".to_string(),
            match &self.thrown {
                Some(thrown) => {
                    let mut inner = BTreeMap::new();
                    inner.insert("class".to_string(), Value::Str(thrown.class.clone()));
                    inner.insert("message".to_string(), Value::Str(thrown.message.clone()));
                    inner.insert("code".to_string(), Value::Int(thrown.code));
                    inner.insert("file".to_string(), Value::Str(thrown.file.clone()));
                    inner.insert("line".to_string(), Value::Int(i64::from(thrown.line)));
                    Value::Map(inner)
                }
                None => Value::Null,
            },
        );
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_return_with_text_becomes_output() {
        let outcome = Outcome::from_call(Ok(Value::Null), Some("111".to_string()));
        assert_eq!(outcome.kind, Kind::Output);
        assert_eq!(outcome.captured.as_deref(), Some("111"));
    }

    #[test]
    fn plain_return_keeps_its_dynamic_tag() {
        let outcome = Outcome::from_call(Ok(Value::from("TEST")), None);
        assert_eq!(outcome.kind, Kind::String);
        assert_eq!(outcome.kind.tag(), "string");

        let outcome = Outcome::from_call(Ok(Value::Int(111)), Some("noise".to_string()));
        assert_eq!(outcome.kind, Kind::Integer);
    }

    #[test]
    fn throw_discards_captured_text() {
        let outcome = Outcome::from_call(
            Err(Thrown::new("Error", "boom")),
            Some("half-written".to_string()),
        );
        assert_eq!(outcome.kind, Kind::Throw);
        assert!(outcome.captured.is_none());
        assert_eq!(outcome.thrown.as_ref().map(|t| t.class.as_str()), Some("Error"));
    }

    #[test]
    fn thrown_new_records_the_construction_site() {
        let thrown = Thrown::new("Error", "boom").with_code(500);
        assert_eq!(thrown.code, 500);
        assert!(thrown.file.ends_with("outcome.rs"));
        assert!(thrown.line > 0);
    }

    #[test]
    fn panic_payloads_downcast_to_their_message() {
        let thrown = Thrown::from_panic(Box::new("went sideways"));
        assert_eq!(thrown.class, "panic");
        assert_eq!(thrown.message, "went sideways");

        let thrown = Thrown::from_panic(Box::new(17u32));
        assert_eq!(thrown.message, "Unknown panic");
    }

    #[test]
    fn partial_map_carries_all_four_keys() {
        let outcome = Outcome::from_call(Ok(Value::from("TEST")), None);
        let Value::Map(map) = outcome.to_value() else {
            panic!("expected a map");
        };
        assert_eq!(map["type"], Value::from("string"));
        assert_eq!(map["return"], Value::from("TEST"));
        assert_eq!(map["output"], Value::Null);
        assert_eq!(map["throw"], Value::Null);
    }
}
