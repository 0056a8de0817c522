//! Binding of named arguments to declared parameters.
//!
//! Callables declare positional parameters by name; callers supply values in
//! a name-addressed table. Binding walks the declaration order, taking the
//! caller's entry when one exists (an explicit `Null` counts as supplied),
//! falling back to the declared default, and failing on a parameter with
//! neither.

use fxhash::FxHashMap;

use crate::error::InvokeError;
use crate::value::Value;

/// Arguments addressed by parameter name.
pub type NamedArgs = FxHashMap<String, Value>;

/// A declared parameter of a callable.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    default: Option<Value>,
}

impl Param {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>) -> Self {
        Param { name: name.into(), default: None }
    }

    /// A parameter with a fallback value.
    pub fn with_default(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Param { name: name.into(), default: Some(value.into()) }
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Param::required(name)
    }
}

/// Resolves `params` against `args`, producing positional values.
///
/// `target` names the callable for the error message.
pub fn bind(params: &[Param], args: &NamedArgs, target: &str) -> Result<Vec<Value>, InvokeError> {
    let mut bound = Vec::with_capacity(params.len());
    for param in params {
        if let Some(value) = args.get(param.name.as_str()) {
            bound.push(value.clone());
        } else if let Some(default) = &param.default {
            bound.push(default.clone());
        } else {
            return Err(InvokeError::MissingArgument {
                param: param.name.clone(),
                target: target.to_string(),
            });
        }
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(entries: &[(&str, Value)]) -> NamedArgs {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn binds_in_declaration_order() {
        let params = [Param::required("b"), Param::required("a")];
        let supplied = args(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        let bound = bind(&params, &supplied, "demo").unwrap();
        assert_eq!(bound, vec![Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn defaults_fill_missing_entries() {
        let params = [Param::required("x"), Param::with_default("y", 9)];
        let supplied = args(&[("x", Value::Int(1))]);
        let bound = bind(&params, &supplied, "demo").unwrap();
        assert_eq!(bound, vec![Value::Int(1), Value::Int(9)]);
    }

    #[test]
    fn explicit_null_counts_as_supplied() {
        let params = [Param::with_default("x", 9)];
        let supplied = args(&[("x", Value::Null)]);
        let bound = bind(&params, &supplied, "demo").unwrap();
        assert_eq!(bound, vec![Value::Null]);
    }

    #[test]
    fn missing_required_names_param_and_target() {
        let params = [Param::required("amount")];
        let error = bind(&params, &NamedArgs::default(), "billing").unwrap_err();
        assert_eq!(
            error.to_string(),
            "required argument \"amount\" for invoke \"billing\""
        );
    }
}
