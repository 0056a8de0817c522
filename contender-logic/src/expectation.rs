//! Declarative expectations and the outcome matcher.
//!
//! An [`Expectation`] describes a correct outcome one dimension at a time.
//! Absent keys are unchecked, so a test can pin down just the return value,
//! just the emitted output, or any combination. The `throw` and `return`
//! keys distinguish an explicit null from an absent key: `throw: null`
//! asserts nothing was thrown, `return: null` asserts a null return.
//!
//! [`check`] compares an outcome against an expectation and produces a
//! [`Status`] plus one diagnostic line per failing dimension, in the fixed
//! order throw, output, return, type.

use serde::{Deserialize, Deserializer, Serialize};

use contender_core::{Formatter, Kind, Outcome, ThrowField, Thrown, Value};

use crate::status::Status;

/// Fallback diagnostic for skipped iterations.
pub const SKIPPED_MESSAGE: &str = "Skipped, empty callbacks...";

/// Declarative description of a correct outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expectation {
    /// Expected outcome kind tag, e.g. `"string"` or `"throw"`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Expected return value. `Some(Value::Null)` asserts a null return.
    #[serde(
        rename = "return",
        deserialize_with = "some_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub return_value: Option<Value>,
    /// Expected captured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Expected throw: [`ThrowExpectation::Absent`] asserts none happened.
    #[serde(deserialize_with = "some_throw", skip_serializing_if = "Option::is_none")]
    pub throw: Option<ThrowExpectation>,
    /// Message reported when the test is skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_message: Option<String>,
}

impl Expectation {
    /// An expectation checking nothing.
    pub fn new() -> Self {
        Expectation::default()
    }

    /// Checks the outcome kind tag.
    pub fn kind(mut self, tag: impl Into<String>) -> Self {
        self.kind = Some(tag.into());
        self
    }

    /// Checks the return value.
    pub fn returns(mut self, value: impl Into<Value>) -> Self {
        self.return_value = Some(value.into());
        self
    }

    /// Checks the captured output.
    pub fn prints(mut self, text: impl Into<String>) -> Self {
        self.output = Some(text.into());
        self
    }

    /// Asserts no error is thrown.
    pub fn no_throw(mut self) -> Self {
        self.throw = Some(ThrowExpectation::Absent);
        self
    }

    /// Checks the listed fields of the thrown error.
    pub fn throws(mut self, fields: ThrownFields) -> Self {
        self.throw = Some(ThrowExpectation::Fields(fields));
        self
    }

    /// Overrides the skipped diagnostic.
    pub fn when_skipped(mut self, message: impl Into<String>) -> Self {
        self.skipped_message = Some(message.into());
        self
    }
}

/// The two shapes of a `throw` expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThrowExpectation {
    /// Deserialized from an explicit null: nothing may be thrown.
    Absent,
    /// A partial field set that must match the thrown error.
    Fields(ThrownFields),
}

/// The fields of a thrown error an expectation can pin down.
///
/// Only listed fields are compared; diagnostics show just the fields that
/// differed, on both sides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrownFields {
    /// Expected error class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Expected message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Expected numeric code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Expected source file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Expected source line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ThrownFields {
    /// An empty field set.
    pub fn new() -> Self {
        ThrownFields::default()
    }

    /// Pins the error class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Pins the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Pins the numeric code.
    pub fn code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Pins the source file.
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Pins the source line.
    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Listed fields, in display order.
    pub fn checked(&self) -> Vec<ThrowField> {
        ThrowField::ALL
            .into_iter()
            .filter(|field| match field {
                ThrowField::Class => self.class.is_some(),
                ThrowField::Code => self.code.is_some(),
                ThrowField::Message => self.message.is_some(),
                ThrowField::File => self.file.is_some(),
                ThrowField::Line => self.line.is_some(),
            })
            .collect()
    }

    /// Listed fields that differ from `thrown`. All of them differ when
    /// nothing was thrown at all.
    pub fn mismatches(&self, thrown: Option<&Thrown>) -> Vec<ThrowField> {
        let checked = self.checked();
        let Some(thrown) = thrown else {
            return checked;
        };
        checked
            .into_iter()
            .filter(|field| match field {
                ThrowField::Class => self.class.as_deref() != Some(thrown.class.as_str()),
                ThrowField::Code => self.code != Some(thrown.code),
                ThrowField::Message => self.message.as_deref() != Some(thrown.message.as_str()),
                ThrowField::File => self.file.as_deref() != Some(thrown.file.as_str()),
                ThrowField::Line => self.line != Some(thrown.line),
            })
            .collect()
    }

    /// Materializes the listed fields for display. Unlisted fields hold
    /// placeholders and must not be shown.
    fn as_thrown(&self) -> Thrown {
        Thrown {
            class: self.class.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            file: self.file.clone().unwrap_or_default(),
            line: self.line.unwrap_or_default(),
        }
    }
}

fn some_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn some_throw<'de, D>(deserializer: D) -> Result<Option<ThrowExpectation>, D::Error>
where
    D: Deserializer<'de>,
{
    ThrowExpectation::deserialize(deserializer).map(Some)
}

/// Compares an outcome against an expectation.
///
/// A skipped outcome short-circuits to `Skipped` with the expectation's
/// skipped message, or [`SKIPPED_MESSAGE`] when none is set. Otherwise every
/// present key is evaluated and each failing dimension appends one line of
/// the form `Expect <dimension> <expected>, actual <actual>`.
pub fn check(
    outcome: &Outcome,
    expectation: Option<&Expectation>,
    formatter: &Formatter,
) -> (Status, Vec<String>) {
    if outcome.kind == Kind::Skipped {
        let message = expectation
            .and_then(|expectation| expectation.skipped_message.clone())
            .unwrap_or_else(|| SKIPPED_MESSAGE.to_string());
        return (Status::Skipped, vec![message]);
    }
    let Some(expectation) = expectation else {
        return (Status::Success, Vec::new());
    };

    let mut errors = Vec::new();

    if let Some(expected) = &expectation.throw {
        match expected {
            ThrowExpectation::Absent => {
                if let Some(thrown) = &outcome.thrown {
                    errors.push(format!(
                        "Expect throw NULL, actual {}",
                        formatter.display_thrown(thrown, &ThrowField::ALL)
                    ));
                }
            }
            ThrowExpectation::Fields(fields) => {
                let mismatched = fields.mismatches(outcome.thrown.as_ref());
                if !mismatched.is_empty() {
                    let actual = match &outcome.thrown {
                        Some(thrown) => formatter.display_thrown(thrown, &mismatched),
                        None => "NULL".to_string(),
                    };
                    errors.push(format!(
                        "Expect throw {}, actual {}",
                        formatter.display_thrown(&fields.as_thrown(), &mismatched),
                        actual
                    ));
                }
            }
        }
    }

    // An unchecked throw stands in for the actual side of the output and
    // return dimensions, since it preempted both.
    let preempting_throw = match &expectation.throw {
        None => outcome.thrown.as_ref(),
        Some(_) => None,
    };

    if let Some(expected) = &expectation.output {
        if outcome.captured.as_deref() != Some(expected.as_str()) {
            let actual = match (preempting_throw, &outcome.captured) {
                (Some(thrown), _) => formatter.display_thrown(thrown, &ThrowField::ALL),
                (None, Some(text)) => formatter.display(&Value::Str(text.clone())),
                (None, None) => "NULL".to_string(),
            };
            errors.push(format!(
                "Expect output {}, actual {}",
                formatter.display(&Value::Str(expected.clone())),
                actual
            ));
        }
    }

    if let Some(expected) = &expectation.return_value {
        if &outcome.return_value != expected {
            let actual = match preempting_throw {
                Some(thrown) => formatter.display_thrown(thrown, &ThrowField::ALL),
                None => formatter.display(&outcome.return_value),
            };
            errors.push(format!(
                "Expect return {}, actual {}",
                formatter.display(expected),
                actual
            ));
        }
    }

    if let Some(expected) = &expectation.kind {
        let actual = outcome.kind.tag();
        if expected != actual {
            errors.push(format!(
                "Expect type {}, actual {}",
                formatter.display(&Value::Str(expected.clone())),
                formatter.display(&Value::Str(actual.to_string()))
            ));
        }
    }

    if errors.is_empty() {
        (Status::Success, errors)
    } else {
        (Status::Failed, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn returned(value: Value) -> Outcome {
        Outcome::from_call(Ok(value), None)
    }

    fn printed(text: &str) -> Outcome {
        Outcome::from_call(Ok(Value::Null), Some(text.to_string()))
    }

    fn threw() -> Outcome {
        let thrown = Thrown {
            class: "Exception".to_string(),
            message: "TEST".to_string(),
            code: 1,
            file: "demo.rs".to_string(),
            line: 10,
        };
        Outcome::from_call(Err(thrown), None)
    }

    fn fmt() -> Formatter {
        Formatter::default()
    }

    #[test]
    fn matching_return_is_success() {
        let expectation = Expectation::new().returns("TEST");
        let (status, errors) = check(&returned(Value::from("TEST")), Some(&expectation), &fmt());
        assert_eq!(status, Status::Success);
        assert!(errors.is_empty());
    }

    #[test]
    fn mismatched_return_reports_both_sides() {
        let expectation = Expectation::new().returns("TEST");
        let (status, errors) = check(&returned(Value::Int(111)), Some(&expectation), &fmt());
        assert_eq!(status, Status::Failed);
        assert_eq!(errors, vec!["Expect return \"TEST\", actual 111".to_string()]);
    }

    #[test]
    fn absent_keys_never_fail() {
        let expectation = Expectation::new().prints("TEST");
        let (status, _) = check(&printed("TEST"), Some(&expectation), &fmt());
        assert_eq!(status, Status::Success);

        let (status, errors) = check(&returned(Value::Int(5)), None, &fmt());
        assert_eq!(status, Status::Success);
        assert!(errors.is_empty());
    }

    #[test]
    fn skipped_outcomes_short_circuit() {
        let outcome = Outcome::skipped();
        let (status, errors) = check(&outcome, None, &fmt());
        assert_eq!(status, Status::Skipped);
        assert_eq!(errors, vec![SKIPPED_MESSAGE.to_string()]);

        let expectation = Expectation::new().returns("TEST").when_skipped("nothing to race");
        let (status, errors) = check(&outcome, Some(&expectation), &fmt());
        assert_eq!(status, Status::Skipped);
        assert_eq!(errors, vec!["nothing to race".to_string()]);
    }

    #[test]
    fn forbidden_throw_shows_the_full_record() {
        let expectation = Expectation::new().no_throw();
        let (status, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(status, Status::Failed);
        assert_eq!(
            errors,
            vec![
                "Expect throw NULL, actual throw{class:\"Exception\",code:\"1\",message:\"TEST\",file:\"demo.rs\",line:\"10\"}"
                    .to_string()
            ]
        );
    }

    #[test]
    fn throw_fields_compare_only_listed_keys() {
        let expectation = Expectation::new().throws(ThrownFields::new().class("xxx"));
        let (status, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(status, Status::Failed);
        assert_eq!(
            errors,
            vec!["Expect throw throw{class:\"xxx\"}, actual throw{class:\"Exception\"}".to_string()]
        );

        let expectation = Expectation::new().throws(ThrownFields::new().code(111));
        let (_, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(
            errors,
            vec!["Expect throw throw{code:\"111\"}, actual throw{code:\"1\"}".to_string()]
        );

        // Matching fields stay out of the diagnostic: only the differing
        // code is shown, even though class was listed and matched.
        let expectation =
            Expectation::new().throws(ThrownFields::new().class("Exception").code(111));
        let (status, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(status, Status::Failed);
        assert_eq!(
            errors,
            vec!["Expect throw throw{code:\"111\"}, actual throw{code:\"1\"}".to_string()]
        );

        let expectation =
            Expectation::new().throws(ThrownFields::new().class("Exception").code(1));
        let (status, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(status, Status::Success);
        assert!(errors.is_empty());
    }

    #[test]
    fn expected_throw_against_none_shows_null() {
        let expectation = Expectation::new().throws(ThrownFields::new().class("Exception"));
        let (status, errors) = check(&returned(Value::Int(1)), Some(&expectation), &fmt());
        assert_eq!(status, Status::Failed);
        assert_eq!(
            errors,
            vec!["Expect throw throw{class:\"Exception\"}, actual NULL".to_string()]
        );
    }

    #[test]
    fn unchecked_throw_preempts_output_and_return() {
        let expectation = Expectation::new().prints("TEST");
        let (_, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(
            errors,
            vec![
                "Expect output \"TEST\", actual throw{class:\"Exception\",code:\"1\",message:\"TEST\",file:\"demo.rs\",line:\"10\"}"
                    .to_string()
            ]
        );

        let expectation = Expectation::new().returns("TEST").no_throw();
        let (_, errors) = check(&threw(), Some(&expectation), &fmt());
        // With throw itself checked, return falls back to the plain value.
        assert_eq!(errors[1], "Expect return \"TEST\", actual NULL");
    }

    #[test]
    fn output_mismatch_quotes_both_sides() {
        let expectation = Expectation::new().prints("TEST");
        let (_, errors) = check(&printed("111"), Some(&expectation), &fmt());
        assert_eq!(errors, vec!["Expect output \"TEST\", actual \"111\"".to_string()]);
    }

    #[test]
    fn type_mismatch_reports_both_tags() {
        let expectation = Expectation::new().kind("string");
        let (_, errors) = check(&returned(Value::Int(111)), Some(&expectation), &fmt());
        assert_eq!(errors, vec!["Expect type \"string\", actual \"integer\"".to_string()]);
    }

    #[test]
    fn failing_dimensions_accumulate_in_order() {
        let expectation = Expectation::new()
            .no_throw()
            .prints("TEST")
            .returns("TEST")
            .kind("string");
        let (status, errors) = check(&threw(), Some(&expectation), &fmt());
        assert_eq!(status, Status::Failed);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("Expect throw "));
        assert!(errors[1].starts_with("Expect output "));
        assert!(errors[2].starts_with("Expect return "));
        assert!(errors[3].starts_with("Expect type "));
    }

    #[test]
    fn wire_tables_distinguish_null_from_absent() {
        let expectation: Expectation =
            serde_json::from_str(r#"{"return":"TEST","throw":null}"#).unwrap();
        assert_eq!(expectation.return_value, Some(Value::from("TEST")));
        assert!(matches!(expectation.throw, Some(ThrowExpectation::Absent)));
        assert!(expectation.output.is_none());

        let expectation: Expectation = serde_json::from_str(r#"{"return":null}"#).unwrap();
        assert_eq!(expectation.return_value, Some(Value::Null));

        let expectation: Expectation =
            serde_json::from_str(r#"{"throw":{"class":"E","code":7},"skippedMessage":"m"}"#)
                .unwrap();
        let Some(ThrowExpectation::Fields(fields)) = expectation.throw else {
            panic!("expected listed fields");
        };
        assert_eq!(fields.class.as_deref(), Some("E"));
        assert_eq!(fields.code, Some(7));
        assert!(fields.line.is_none());
        assert_eq!(expectation.skipped_message.as_deref(), Some("m"));
    }
}
