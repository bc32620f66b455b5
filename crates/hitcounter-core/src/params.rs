use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Flat request parameters: the query string of a GET or the top-level
/// fields of a POST body.
pub type Params = BTreeMap<String, String>;

/// Errors that can occur when reading parameters from a request body.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// Look up `name` in `params`, ignoring the case of the stored keys.
///
/// `name` is expected in lowercase. An exact match wins over a case-folded
/// one; an absent mapping yields `None`.
pub fn lookup<'a>(params: Option<&'a Params>, name: &str) -> Option<&'a str> {
    let params = params?;
    if let Some(value) = params.get(name) {
        return Some(value);
    }
    params
        .iter()
        .find(|(key, _)| key.to_lowercase() == name)
        .map(|(_, value)| value.as_str())
}

/// Like [`lookup`] but treats an empty value as absent.
pub fn lookup_non_empty<'a>(params: Option<&'a Params>, name: &str) -> Option<&'a str> {
    lookup(params, name).filter(|value| !value.is_empty())
}

/// Read parameters from a JSON request body.
///
/// A blank body has no parameters. String fields are taken as-is, `null`
/// fields are dropped and every other value keeps its compact JSON text.
pub fn params_from_json_body(body: &str) -> Result<Option<Params>, ParamsError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let Value::Object(fields) = serde_json::from_str::<Value>(body)? else {
        return Err(ParamsError::NotAnObject);
    };

    let params: Params = fields
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect();

    Ok(non_empty(params))
}

/// Collapse an empty mapping into "no parameters".
pub fn non_empty(params: Params) -> Option<Params> {
    if params.is_empty() { None } else { Some(params) }
}

/// Encode parameters as the JSON string stored in `queryStringParameters`.
pub fn encode_params(params: &Params) -> String {
    // A map of strings always serializes.
    serde_json::to_string(params).unwrap_or_default()
}
