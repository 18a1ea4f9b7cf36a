//! Argument validation against an ability's declared parameter contract.
//!
//! The contract is open-world: keys the ability does not declare are ignored
//! rather than rejected, since callers (and models) routinely over-supply.
//! Checking walks the declaration order and stops at the first violation.

use serde_json::Value;

use super::error::ValidationError;
use super::types::{Ability, ArgMap, ParamType};

/// Validate supplied arguments against the ability's parameter contract.
///
/// # Errors
///
/// Returns the first violation in declaration order: a missing required
/// parameter or a supplied value that does not match its declared type.
pub fn validate(ability: &Ability, args: &ArgMap) -> Result<(), ValidationError> {
    for parameter in &ability.parameters {
        match args.get(&parameter.name) {
            None => {
                if parameter.required {
                    return Err(ValidationError::MissingParameter(parameter.name.clone()));
                }
            }
            Some(value) => {
                if !type_matches(parameter.kind, value) {
                    return Err(ValidationError::InvalidParameterType {
                        name: parameter.name.clone(),
                        expected: parameter.kind,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Check one supplied value against a declared parameter type.
fn type_matches(kind: ParamType, value: &Value) -> bool {
    match kind {
        // Numeric parameters accept anything numeric-coercible, including
        // numeric strings, which models emit routinely.
        ParamType::Integer | ParamType::Number => match value {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        },
        ParamType::String => value.is_string(),
        ParamType::Boolean => match value {
            Value::Bool(_) => true,
            Value::Number(n) => n.as_i64().is_some_and(|v| v == 0 || v == 1),
            Value::String(s) => matches!(s.as_str(), "true" | "false" | "0" | "1"),
            _ => false,
        },
        ParamType::Array => value.is_array(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::abilities::types::{FnHandler, Parameter};

    use super::*;

    fn ability_with(parameters: Vec<Parameter>) -> Ability {
        Ability::new(
            "demo/check",
            "Check",
            "test ability",
            "store",
            Arc::new(FnHandler::new(|_args| Ok(json!(null)))),
        )
        .with_parameters(parameters)
    }

    fn args(pairs: &[(&str, Value)]) -> ArgMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_required_parameter() {
        let ability = ability_with(vec![Parameter::required(
            "msg",
            ParamType::String,
            "Message",
        )]);
        let err = validate(&ability, &ArgMap::new()).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameter("msg".to_string()));
    }

    #[test]
    fn test_optional_parameter_may_be_absent() {
        let ability = ability_with(vec![Parameter::optional(
            "limit",
            ParamType::Integer,
            "Limit",
        )]);
        assert!(validate(&ability, &ArgMap::new()).is_ok());
    }

    #[test]
    fn test_first_failure_in_declaration_order() {
        let ability = ability_with(vec![
            Parameter::required("first", ParamType::String, ""),
            Parameter::required("second", ParamType::String, ""),
        ]);
        let err = validate(&ability, &args(&[("second", json!("here"))])).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameter("first".to_string()));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let ability = ability_with(vec![Parameter::required("msg", ParamType::String, "")]);
        let supplied = args(&[("msg", json!("hi")), ("extra", json!(42))]);
        assert!(validate(&ability, &supplied).is_ok());
    }

    #[test]
    fn test_integer_accepts_numeric_coercible() {
        let ability = ability_with(vec![Parameter::required("n", ParamType::Integer, "")]);
        for value in [json!(3), json!(3.5), json!("42"), json!(" 7 ")] {
            assert!(validate(&ability, &args(&[("n", value)])).is_ok());
        }
        let err = validate(&ability, &args(&[("n", json!("seven"))])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidParameterType {
                name: "n".to_string(),
                expected: ParamType::Integer,
            }
        );
    }

    #[test]
    fn test_string_requires_textual_value() {
        let ability = ability_with(vec![Parameter::required("msg", ParamType::String, "")]);
        assert!(validate(&ability, &args(&[("msg", json!("hi"))])).is_ok());
        assert!(validate(&ability, &args(&[("msg", json!(5))])).is_err());
    }

    #[test]
    fn test_boolean_literal_set() {
        let ability = ability_with(vec![Parameter::required("flag", ParamType::Boolean, "")]);
        for value in [
            json!(true),
            json!(false),
            json!("true"),
            json!("false"),
            json!("0"),
            json!("1"),
            json!(0),
            json!(1),
        ] {
            assert!(validate(&ability, &args(&[("flag", value)])).is_ok());
        }
        for value in [json!("yes"), json!(2), json!(null)] {
            assert!(validate(&ability, &args(&[("flag", value)])).is_err());
        }
    }

    #[test]
    fn test_array_requires_sequence() {
        let ability = ability_with(vec![Parameter::required("ids", ParamType::Array, "")]);
        assert!(validate(&ability, &args(&[("ids", json!([1, 2]))])).is_ok());
        assert!(validate(&ability, &args(&[("ids", json!("1,2"))])).is_err());
    }
}
