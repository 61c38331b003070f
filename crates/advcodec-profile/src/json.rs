//! Conversions between decoded values and JSON objects.

use std::collections::BTreeMap;

use advcodec_wire::DecodedValues;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{ProfileError, Result};

/// Parse a JSON object of numeric members into values.
pub fn values_from_json(json: &str) -> Result<DecodedValues> {
    let value: Value = serde_json::from_str(json)?;
    values_from_value(&value)
}

/// Collect the numeric members of a JSON object.
///
/// Members that are not numbers are skipped.
pub fn values_from_value(value: &Value) -> Result<DecodedValues> {
    let object = value.as_object().ok_or(ProfileError::NotAnObject)?;

    let mut values = DecodedValues::new();
    for (name, member) in object {
        match member.as_f64() {
            Some(number) => {
                values.insert(name.clone(), number);
            }
            None => debug!(member = %name, "skipping non-numeric member"),
        }
    }
    Ok(values)
}

/// Parse `{"sensor": {"value": number, ...}, ...}` into per-sensor values.
pub fn sensors_from_json(json: &str) -> Result<BTreeMap<String, DecodedValues>> {
    let value: Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(ProfileError::NotAnObject)?;

    object
        .iter()
        .map(|(sensor, member)| Ok((sensor.clone(), values_from_value(member)?)))
        .collect()
}

/// Render values as a JSON object. Non-finite values become `null`.
pub fn values_to_json(values: &DecodedValues) -> Value {
    let object: Map<String, Value> = values
        .iter()
        .map(|(name, value)| {
            let member = Number::from_f64(*value).map_or(Value::Null, Value::Number);
            (name.clone(), member)
        })
        .collect();
    Value::Object(object)
}
