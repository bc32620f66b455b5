use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::CoreError;

/// Format of the human-readable `time_stamp` attribute.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Attribute holding the epoch milliseconds; also the name of the GSI.
pub const TIMESTAMP_MILLIS_ATTR: &str = "millisec_epoch_time_stamp";

/// A DynamoDB item as returned by the SDK.
pub type Item = HashMap<String, AttributeValue>;

// ---------------------------------------------------------------------------
// HitKey
// ---------------------------------------------------------------------------

/// Composite key of a hit: two writes with the same key collapse into one
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitKey {
    pub timestamp_millis: i64,
    pub path: String,
}

// ---------------------------------------------------------------------------
// HitRecord
// ---------------------------------------------------------------------------

/// One recorded request, as stored in the hits table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Request path, sort key of the table.
    pub path: String,

    /// Unix epoch milliseconds of the hit, partition key of the table.
    #[serde(rename = "millisec_epoch_time_stamp")]
    pub timestamp_millis: i64,

    /// UTC wall clock time formatted with [`TIMESTAMP_FORMAT`].
    #[serde(rename = "time_stamp", default)]
    pub timestamp: String,

    #[serde(default)]
    pub http_method: String,

    /// Raw request body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Query string parameters encoded as a JSON object.
    #[serde(
        rename = "queryStringParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub query_parameters: Option<String>,

    /// Attributes written by other producers sharing the table.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl HitRecord {
    /// Build a record for a hit observed at `at`.
    pub fn new(
        path: impl Into<String>,
        http_method: impl Into<String>,
        at: DateTime<Utc>,
        body: Option<String>,
        query_parameters: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp_millis: at.timestamp_millis(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            http_method: http_method.into(),
            body,
            query_parameters,
            extra: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> HitKey {
        HitKey {
            timestamp_millis: self.timestamp_millis,
            path: self.path.clone(),
        }
    }

    /// Serialize into a DynamoDB item.
    pub fn to_item(&self) -> Result<Item, CoreError> {
        Ok(serde_dynamo::to_item(self)?)
    }

    /// Decode a DynamoDB item. Numbers become integers when whole and
    /// floats otherwise, see [`number_from_dynamo`].
    pub fn from_item(item: &Item) -> Result<Self, CoreError> {
        let object: Map<String, Value> = item
            .iter()
            .map(|(name, value)| (name.clone(), attribute_to_json(value)))
            .collect();
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

// ---------------------------------------------------------------------------
// Attribute conversion
// ---------------------------------------------------------------------------

/// Convert the textual form of a DynamoDB number into a JSON number.
///
/// Whole values (including `"42.0"` or `"1e3"`) come back as integers;
/// anything with a fractional part comes back as a float. Returns `None` for
/// text that is not a finite number.
///
/// JSON integers here are limited to the `i64`/`u64` range. DynamoDB allows
/// 38 significant digits, so whole values outside that range come back as
/// the nearest float.
pub fn number_from_dynamo(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Some(u.into());
    }

    let f: f64 = raw.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Some((f as i64).into());
    }
    Number::from_f64(f)
}

/// Convert an attribute value into JSON. Binary attributes have no JSON
/// form and become `null`.
pub fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_from_dynamo(n).map_or(Value::Null, Value::Number),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                .collect(),
        ),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(
            set.iter()
                .map(|n| number_from_dynamo(n).map_or(Value::Null, Value::Number))
                .collect(),
        ),
        _ => Value::Null,
    }
}
