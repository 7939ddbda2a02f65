//! Request validation from catalog-derived rules.

use crate::config::ValidationRule;
use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full field set. All required fields must be present and non-null.
    pub fn validate(
        body: &HashMap<String, Value>,
        rules: &HashMap<String, ValidationRule>,
    ) -> Result<(), AppError> {
        // Sorted so the first reported error does not depend on map order.
        let mut cols: Vec<&String> = rules.keys().collect();
        cols.sort();
        for col in cols {
            let rule = &rules[col];
            let val = body.get(col);
            if rule.required == Some(true) && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} is required", col)));
            }
            if let Some(v) = val {
                validate_field(col, v, rule)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for PATCH). Required is not enforced for
    /// missing fields, but a present required field may not be null.
    pub fn validate_partial(
        body: &HashMap<String, Value>,
        rules: &HashMap<String, ValidationRule>,
    ) -> Result<(), AppError> {
        let mut cols: Vec<&String> = body.keys().collect();
        cols.sort();
        for col in cols {
            let Some(rule) = rules.get(col) else { continue };
            let v = &body[col];
            if rule.required == Some(true) && v.is_null() {
                return Err(AppError::Validation(format!("{} must not be null", col)));
            }
            validate_field(col, v, rule)?;
        }
        Ok(())
    }
}

fn validate_field(col: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    let Some(s) = v.as_str() else {
        return Ok(());
    };
    if rule.not_blank && s.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", col)));
    }
    if let Some(max) = rule.max_length {
        if s.chars().count() > max as usize {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                col, max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> HashMap<String, ValidationRule> {
        HashMap::from([
            (
                "name".to_string(),
                ValidationRule {
                    required: Some(true),
                    not_blank: true,
                    max_length: Some(255),
                },
            ),
            (
                "description".to_string(),
                ValidationRule {
                    required: Some(true),
                    not_blank: false,
                    max_length: None,
                },
            ),
        ])
    }

    fn body(v: Value) -> HashMap<String, Value> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn accepts_complete_body() {
        RequestValidator::validate(&body(json!({"name": "API", "description": ""})), &rules()).unwrap();
    }

    #[test]
    fn missing_or_null_required_field() {
        let err = RequestValidator::validate(&body(json!({"name": "API"})), &rules()).unwrap_err();
        assert_eq!(err.to_string(), "validation: description is required");
        let err = RequestValidator::validate(&body(json!({"name": null, "description": "x"})), &rules()).unwrap_err();
        assert_eq!(err.to_string(), "validation: name is required");
    }

    #[test]
    fn whitespace_only_is_empty() {
        for name in ["", "   ", "\t\n"] {
            let err = RequestValidator::validate(&body(json!({"name": name, "description": "x"})), &rules()).unwrap_err();
            assert!(matches!(err, AppError::Validation(m) if m == "name must not be empty"));
        }
    }

    #[test]
    fn length_counts_characters() {
        let ok = "é".repeat(255);
        RequestValidator::validate(&body(json!({"name": ok, "description": "x"})), &rules()).unwrap();
        let too_long = "a".repeat(256);
        let err = RequestValidator::validate(&body(json!({"name": too_long, "description": "x"})), &rules()).unwrap_err();
        assert_eq!(err.to_string(), "validation: name must be at most 255 characters");
    }

    #[test]
    fn partial_checks_only_present_fields() {
        RequestValidator::validate_partial(&body(json!({"description": "new"})), &rules()).unwrap();
        RequestValidator::validate_partial(&HashMap::new(), &rules()).unwrap();
        let err = RequestValidator::validate_partial(&body(json!({"name": " "})), &rules()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = RequestValidator::validate_partial(&body(json!({"name": null})), &rules()).unwrap_err();
        assert_eq!(err.to_string(), "validation: name must not be null");
    }
}
