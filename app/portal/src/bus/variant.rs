//! Conversion between `a{sv}` maps and [`Options`].

use std::collections::HashMap;

use zbus::zvariant::{OwnedValue, Value};

use crate::portal::Options;

/// An `a{sv}` map as received from or sent to the bus.
pub type WireOptions = HashMap<String, OwnedValue>;

/// Converts incoming portal options.
#[must_use]
pub fn options_from_wire(options: &WireOptions) -> Options {
    options.iter().map(|(key, value)| (key.clone(), variant_to_json(value))).collect()
}

/// Converts reply results. Entries without a variant representation are dropped.
#[must_use]
pub fn results_to_wire(results: &Options) -> WireOptions {
    results
        .iter()
        .filter_map(|(key, value)| {
            let variant = json_to_variant(value)?;
            match OwnedValue::try_from(variant) {
                Ok(owned) => Some((key.clone(), owned)),
                Err(err) => {
                    tracing::debug!("dropping result {key}: {err}");
                    None
                }
            }
        })
        .collect()
}

/// Maps a variant to JSON. Containers are rendered in GVariant text form.
#[must_use]
pub fn variant_to_json(value: &Value<'_>) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::U8(n) => Json::from(*n),
        Value::I16(n) => Json::from(*n),
        Value::U16(n) => Json::from(*n),
        Value::I32(n) => Json::from(*n),
        Value::U32(n) => Json::from(*n),
        Value::I64(n) => Json::from(*n),
        Value::U64(n) => Json::from(*n),
        Value::F64(n) => Json::from(*n),
        Value::Str(s) => Json::String(s.as_str().to_string()),
        Value::ObjectPath(path) => Json::String(path.as_str().to_string()),
        Value::Value(inner) => variant_to_json(inner),
        other => Json::String(other.to_string()),
    }
}

/// Maps JSON to a variant. `null`, arrays and objects have no mapping.
#[must_use]
pub fn json_to_variant(value: &serde_json::Value) -> Option<Value<'static>> {
    use serde_json::Value as Json;

    match value {
        Json::Bool(b) => Some(Value::from(*b)),
        Json::String(s) => Some(Value::from(s.clone())),
        Json::Number(n) => n
            .as_u64()
            .map(Value::from)
            .or_else(|| n.as_i64().map(Value::from))
            .or_else(|| n.as_f64().map(Value::from)),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}
