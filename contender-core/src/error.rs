//! Fatal errors raised while resolving callbacks or binding arguments.
//!
//! These are the only errors that abort a run. Errors raised *by* a stage
//! body are captured into its [`Outcome`](crate::outcome::Outcome) instead
//! and never surface here.

use thiserror::Error;

/// Failure to resolve a callback descriptor or bind its arguments.
///
/// The message always names the missing symbol, so callers can print it
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// A bare name reference matched neither a registered function nor a
    /// registered type.
    #[error("function \"{0}\" does not exist")]
    UnknownFunction(String),

    /// A `Type::method` reference or object instance named an unregistered
    /// type.
    #[error("type \"{0}\" does not exist")]
    UnknownType(String),

    /// The named type exists but has no such method.
    #[error("method \"{type_name}::{method}\" does not exist")]
    UnknownMethod {
        /// The registered type that was searched.
        type_name: String,
        /// The method name that was not found.
        method: String,
    },

    /// A declared parameter had neither a named argument nor a default.
    #[error("required argument \"{param}\" for invoke \"{target}\"")]
    MissingArgument {
        /// The parameter that could not be filled.
        param: String,
        /// The function or method being invoked.
        target: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_symbol() {
        assert_eq!(
            InvokeError::UnknownFunction("xxx".to_string()).to_string(),
            "function \"xxx\" does not exist"
        );
        assert_eq!(
            InvokeError::UnknownMethod {
                type_name: "Sorter".to_string(),
                method: "missing".to_string(),
            }
            .to_string(),
            "method \"Sorter::missing\" does not exist"
        );
        assert_eq!(
            InvokeError::MissingArgument {
                param: "sep".to_string(),
                target: "Sorter::run".to_string(),
            }
            .to_string(),
            "required argument \"sep\" for invoke \"Sorter::run\""
        );
    }
}
