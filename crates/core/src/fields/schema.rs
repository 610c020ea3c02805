//! Field schema parsing and validation.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::error::{FieldError, FieldViolation};

/// Type and constraints of a report field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Whole number.
    Integer {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<i64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<i64>,
    },
    /// Exact decimal number.
    Decimal {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<Decimal>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<Decimal>,
    },
    /// Free text.
    Text {
        /// Maximum number of characters.
        #[serde(default)]
        max_length: Option<usize>,
    },
    /// One of a fixed list of values.
    Select {
        /// Allowed values.
        choices: Vec<String>,
    },
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Yes or no.
    Boolean,
}

/// One field of an activity type's report form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Key in `report_fields`.
    pub name: String,
    /// Label shown to users.
    #[serde(default)]
    pub label: String,
    /// Whether a value must be given.
    #[serde(default)]
    pub required: bool,
    /// Type and constraints.
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// A checked field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Integer value.
    Integer(i64),
    /// Decimal value.
    Decimal(Decimal),
    /// Text or selected choice.
    Text(String),
    /// Date value.
    Date(NaiveDate),
    /// Boolean value.
    Boolean(bool),
}

impl FieldValue {
    /// JSON form stored in `report_fields`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Integer(v) => Value::from(*v),
            Self::Decimal(v) => Value::String(v.normalize().to_string()),
            Self::Text(v) => Value::String(v.clone()),
            Self::Date(v) => Value::String(v.format("%Y-%m-%d").to_string()),
            Self::Boolean(v) => Value::Bool(*v),
        }
    }
}

/// Parsed list of field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldDef>,
}

impl FieldSchema {
    /// Parses the `fields` column of an activity type.
    ///
    /// `null` means the activity type has no extra fields.
    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let fields: Vec<FieldDef> = serde_json::from_value(value.clone())
            .map_err(|e| FieldError::InvalidSchema(e.to_string()))?;
        Self::new(fields)
    }

    /// Builds a schema, checking that it is consistent.
    pub fn new(fields: Vec<FieldDef>) -> Result<Self, FieldError> {
        let mut names = HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(FieldError::InvalidSchema("field without a name".into()));
            }
            if !names.insert(field.name.as_str()) {
                return Err(FieldError::InvalidSchema(format!(
                    "field '{}' is defined twice",
                    field.name
                )));
            }
            let consistent = match &field.kind {
                FieldKind::Integer {
                    min: Some(min),
                    max: Some(max),
                } => min <= max,
                FieldKind::Decimal {
                    min: Some(min),
                    max: Some(max),
                } => min <= max,
                FieldKind::Select { choices } => !choices.is_empty(),
                _ => true,
            };
            if !consistent {
                return Err(FieldError::InvalidSchema(format!(
                    "field '{}' has unsatisfiable constraints",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Field definitions in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Checks submitted values against the schema.
    ///
    /// Every problem is collected, so the caller can report all fields at once.
    pub fn validate(&self, values: &Value) -> Result<BTreeMap<String, FieldValue>, FieldError> {
        let empty = Map::new();
        let object = match values {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => {
                return Err(FieldError::Invalid(vec![FieldViolation::new(
                    "report_fields",
                    "must be an object",
                )]));
            }
        };

        let mut violations = Vec::new();
        for key in object.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                violations.push(FieldViolation::new(key, "is not a field of this activity type"));
            }
        }

        let mut checked = BTreeMap::new();
        for field in &self.fields {
            match object.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        violations.push(FieldViolation::new(&field.name, "is required"));
                    }
                }
                Some(Value::String(s)) if s.trim().is_empty() && !field.required => {}
                Some(raw) => match check_value(&field.kind, raw) {
                    Ok(value) => {
                        checked.insert(field.name.clone(), value);
                    }
                    Err(message) => violations.push(FieldViolation::new(&field.name, message)),
                },
            }
        }

        if violations.is_empty() {
            Ok(checked)
        } else {
            Err(FieldError::Invalid(violations))
        }
    }

    /// Validates and returns the normalized JSON object to store.
    pub fn normalize(&self, values: &Value) -> Result<Value, FieldError> {
        let checked = self.validate(values)?;
        Ok(Value::Object(
            checked
                .into_iter()
                .map(|(name, value)| (name, value.to_json()))
                .collect(),
        ))
    }
}

fn check_value(kind: &FieldKind, raw: &Value) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Integer { min, max } => {
            let value = match raw {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| "must be a whole number".to_string())?;
            check_bounds(value, *min, *max)?;
            Ok(FieldValue::Integer(value))
        }
        FieldKind::Decimal { min, max } => {
            let text = match raw {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.trim().to_string(),
                _ => return Err("must be a number".into()),
            };
            let value = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| "must be a number".to_string())?;
            check_bounds(value, *min, *max)?;
            Ok(FieldValue::Decimal(value))
        }
        FieldKind::Text { max_length } => {
            let Value::String(s) = raw else {
                return Err("must be text".into());
            };
            if let Some(max) = max_length
                && s.chars().count() > *max
            {
                return Err(format!("must be at most {max} characters"));
            }
            Ok(FieldValue::Text(s.clone()))
        }
        FieldKind::Select { choices } => {
            let Value::String(s) = raw else {
                return Err("must be one of the listed choices".into());
            };
            if choices.iter().any(|c| c == s) {
                Ok(FieldValue::Text(s.clone()))
            } else {
                Err(format!("must be one of: {}", choices.join(", ")))
            }
        }
        FieldKind::Date => {
            let Value::String(s) = raw else {
                return Err("must be a date (YYYY-MM-DD)".into());
            };
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| "must be a date (YYYY-MM-DD)".to_string())
        }
        FieldKind::Boolean => match raw {
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(FieldValue::Boolean(true)),
                "false" | "no" | "0" => Ok(FieldValue::Boolean(false)),
                _ => Err("must be true or false".into()),
            },
            _ => Err("must be true or false".into()),
        },
    }
}

fn check_bounds<T>(value: T, min: Option<T>, max: Option<T>) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(min) = min
        && value < min
    {
        return Err(format!("must be at least {min}"));
    }
    if let Some(max) = max
        && value > max
    {
        return Err(format!("must be at most {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn cash_schema() -> FieldSchema {
        FieldSchema::from_json(&json!([
            {"name": "households", "label": "Households", "kind": "integer", "min": 0, "required": true},
            {"name": "transfer_value", "label": "Transfer value", "kind": "decimal", "min": "0"},
            {"name": "modality", "label": "Modality", "kind": "select", "choices": ["cash", "voucher"]},
            {"name": "distributed_on", "label": "Distribution date", "kind": "date"},
            {"name": "notes", "label": "Notes", "kind": "text", "max_length": 10},
            {"name": "verified", "label": "Verified", "kind": "boolean"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_parse_schema() {
        let schema = cash_schema();
        assert_eq!(schema.fields().len(), 6);
        assert_eq!(
            schema.fields()[0].kind,
            FieldKind::Integer {
                min: Some(0),
                max: None
            }
        );
        assert!(FieldSchema::from_json(&Value::Null).unwrap().fields().is_empty());
    }

    #[test]
    fn test_schema_rejects_duplicates_and_bad_bounds() {
        assert!(matches!(
            FieldSchema::from_json(&json!([
                {"name": "a", "kind": "date"},
                {"name": "a", "kind": "boolean"}
            ])),
            Err(FieldError::InvalidSchema(_))
        ));
        assert!(matches!(
            FieldSchema::from_json(&json!([{"name": "a", "kind": "integer", "min": 5, "max": 1}])),
            Err(FieldError::InvalidSchema(_))
        ));
        assert!(matches!(
            FieldSchema::from_json(&json!([{"name": "a", "kind": "colour"}])),
            Err(FieldError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_valid_values() {
        let values = cash_schema()
            .validate(&json!({
                "households": 12,
                "transfer_value": "45.50",
                "modality": "cash",
                "distributed_on": "2024-03-02",
                "verified": "yes"
            }))
            .unwrap();

        assert_eq!(values["households"], FieldValue::Integer(12));
        assert_eq!(values["transfer_value"], FieldValue::Decimal(dec!(45.50)));
        assert_eq!(values["verified"], FieldValue::Boolean(true));
        assert!(!values.contains_key("notes"));
    }

    #[test]
    fn test_out_of_range_and_unknown_fields() {
        let err = cash_schema()
            .validate(&json!({
                "households": -3,
                "modality": "in-kind",
                "notes": "far too long for the field",
                "colour": "red"
            }))
            .unwrap_err();

        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"households"));
        assert!(fields.contains(&"modality"));
        assert!(fields.contains(&"notes"));
        assert!(fields.contains(&"colour"));
    }

    #[test]
    fn test_required_field_missing() {
        let err = cash_schema().validate(&json!({})).unwrap_err();
        assert_eq!(
            err.violations(),
            &[FieldViolation::new("households", "is required")]
        );
    }

    #[test]
    fn test_normalize() {
        let stored = cash_schema()
            .normalize(&json!({"households": "7", "transfer_value": 10.0}))
            .unwrap();
        assert_eq!(stored, json!({"households": 7, "transfer_value": "10"}));
    }
}
