use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::request::Parts;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use lambda_http::RequestExt;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use hitcounter_core::HitRecord;
use hitcounter_core::greeting::greeting;
use hitcounter_core::history::{history_key, latest, parse_limit};
use hitcounter_core::params::{
    Params, encode_params, lookup_non_empty, non_empty, params_from_json_body,
};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HitResponse {
    #[serde(rename = "Message")]
    pub message: String,
    pub time_stamp: String,
}

/// Build the router. Every path is served by [`handle_request`].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any method, any path.
///
/// GET reads parameters from the query string, POST from a JSON object
/// body. A non-empty `last` parameter returns the most recent hits;
/// anything else records the request as a new hit and greets the caller.
pub async fn handle_request(
    State(state): State<AppState>,
    parts: Parts,
    body: Bytes,
) -> Result<Response, ApiError> {
    let method = parts.method.clone();
    let uri = &parts.uri;
    let path = request_path(&parts);
    let body = body_text(body)?;

    if state.verbose {
        info!(
            %method,
            path,
            query = uri.query().unwrap_or_default(),
            body = body.as_deref().unwrap_or_default(),
            "request"
        );
    }

    match method {
        Method::GET => {
            let params = query_params(uri)?;
            if let Some(raw) = lookup_non_empty(params.as_ref(), "last") {
                return history(&state, raw).await;
            }
            let query = params.as_ref().map(encode_params);
            record(&state, &method, path, body, query, params.as_ref()).await
        }
        Method::POST => {
            let params = match body.as_deref() {
                Some(text) => params_from_json_body(text)?,
                None => None,
            };
            if let Some(raw) = lookup_non_empty(params.as_ref(), "last") {
                return history(&state, raw).await;
            }
            // POST parameters travel in the body, which is stored as-is.
            record(&state, &method, path, body, None, params.as_ref()).await
        }
        other => Err(ApiError::MethodNotSupported(other)),
    }
}

/// Return the `last` most recent hits under `last_<N>_requests`.
async fn history(state: &AppState, raw_limit: &str) -> Result<Response, ApiError> {
    let limit = parse_limit(raw_limit).map_err(|e| {
        ApiError::BadRequest(format!("last must be an integer, got {raw_limit:?}: {e}"))
    })?;

    let records = state.store.scan_hits().await?;
    debug!(limit, scanned = records.len(), "history query");

    let body = HashMap::from([(history_key(limit), latest(records, limit))]);
    Ok(Json(body).into_response())
}

/// Store the request as a new hit and greet the caller.
async fn record(
    state: &AppState,
    method: &Method,
    path: &str,
    body: Option<String>,
    query: Option<String>,
    params: Option<&Params>,
) -> Result<Response, ApiError> {
    let hit = HitRecord::new(path, method.as_str(), Utc::now(), body, query);
    state.store.record_hit(&hit).await?;

    Ok(Json(HitResponse {
        message: greeting(params, path),
        time_stamp: hit.timestamp,
    })
    .into_response())
}

/// The path the client asked for. On Lambda the URI carries the API
/// Gateway stage in front of it, so the path from the event is used.
fn request_path(parts: &Parts) -> &str {
    match parts.raw_http_path() {
        "" => parts.uri.path(),
        raw => raw,
    }
}

/// Query string parameters; an empty query string counts as none.
fn query_params(uri: &Uri) -> Result<Option<Params>, ApiError> {
    let Query(params) = Query::<Params>::try_from_uri(uri)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(non_empty(params))
}

/// The request body as text; an empty body counts as none.
fn body_text(body: Bytes) -> Result<Option<String>, ApiError> {
    if body.is_empty() {
        return Ok(None);
    }
    String::from_utf8(body.to_vec())
        .map(Some)
        .map_err(|_| ApiError::BadRequest("request body must be UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_no_params() {
        let uri: Uri = "/foo".parse().unwrap();
        assert_eq!(query_params(&uri).unwrap(), None);
        let uri: Uri = "/foo?".parse().unwrap();
        assert_eq!(query_params(&uri).unwrap(), None);
    }

    #[test]
    fn query_is_decoded() {
        let uri: Uri = "/foo?name=Ann%20Lee&LAST=2".parse().unwrap();
        let params = query_params(&uri).unwrap().unwrap();
        assert_eq!(params["name"], "Ann Lee");
        assert_eq!(params["LAST"], "2");
    }

    #[test]
    fn path_prefers_the_event_path() {
        let (parts, _) = axum::http::Request::builder()
            .uri("https://example.com/prod/foo")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(request_path(&parts), "/prod/foo");

        let parts = parts.with_raw_http_path("/foo");
        assert_eq!(request_path(&parts), "/foo");
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        assert!(body_text(Bytes::from_static(&[0xff, 0xfe])).is_err());
        assert_eq!(body_text(Bytes::new()).unwrap(), None);
        assert_eq!(
            body_text(Bytes::from_static(b"hi")).unwrap().as_deref(),
            Some("hi")
        );
    }
}
