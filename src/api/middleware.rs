use crate::common::error::{self, AppError, ServiceResult};
use crate::common::sanitize::{sanitize, sanitize_query};
use crate::common::state::AppState;
use crate::usecases::sessions;
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Uri};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

const MAX_BODY_BYTES: usize = 100 * 1024;

/// Same rule as axum's `Json` extractor: `application/json` or any
/// `application/*+json`, case-insensitive, parameters ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };
    let subtype = subtype.to_ascii_lowercase();
    kind.eq_ignore_ascii_case("application") && (subtype == "json" || subtype.ends_with("+json"))
}

fn sanitize_uri(uri: &Uri) -> ServiceResult<Uri> {
    let Some(query) = uri.query() else {
        return Ok(uri.clone());
    };
    let path_and_query = match sanitize_query(query) {
        Some(query) => format!("{}?{query}", uri.path()),
        None => uri.path().to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse()?);
    Ok(Uri::from_parts(parts)?)
}

fn sanitize_body(body: Bytes) -> ServiceResult<Bytes> {
    match serde_json::from_slice::<Value>(&body) {
        Ok(value) => Ok(Bytes::from(serde_json::to_vec(&sanitize(value))?)),
        // left for the handler's extractor to reject
        Err(_) => Ok(body),
    }
}

/// Strips document-store operator keys from the query string and JSON body
/// before any handler sees them.
pub async fn sanitize_request(request: Request, next: Next) -> ServiceResult<Response> {
    let (mut parts, body) = request.into_parts();
    parts.uri = sanitize_uri(&parts.uri)?;

    if !is_json(&parts.headers) {
        return Ok(next.run(Request::from_parts(parts, body)).await);
    }

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::DecodingRequestFailed)?;
    let body = sanitize_body(body)?;
    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    Ok(next.run(Request::from_parts(parts, Body::from(body))).await)
}

/// Puts the detail of unexpected errors back into the body when the app
/// is configured to disclose them.
pub async fn render_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if state.expose_error_details {
        error::expose_details(response)
    } else {
        response
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

/// Lets the request through only with a live session, unless operator
/// auth is disabled.
pub async fn require_operator(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ServiceResult<Response> {
    if state.require_operator_auth {
        let session_id = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
        sessions::fetch_one(&state, session_id).await?;
    }
    Ok(next.run(request).await)
}
