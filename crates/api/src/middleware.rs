use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use stockroom_core::SessionId;

use crate::app::errors;
use crate::context::SessionContext;

pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// Resolve the caller's session from `x-session-id`, minting a new one when the
/// header is absent. The id is echoed back on every response.
pub async fn session_middleware(mut req: Request, next: Next) -> Result<Response, Response> {
    let session_id = match extract_session(req.headers()) {
        Ok(Some(id)) => id,
        Ok(None) => {
            let id = SessionId::new();
            tracing::debug!("starting new session {id}");
            id
        }
        Err(msg) => return Err(errors::bad_request("invalid_session", msg)),
    };

    req.extensions_mut().insert(SessionContext::new(session_id));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&session_id.to_string()) {
        res.headers_mut().insert(SESSION_HEADER, value);
    }
    Ok(res)
}

fn extract_session(headers: &HeaderMap) -> Result<Option<SessionId>, String> {
    let Some(header) = headers.get(&SESSION_HEADER) else {
        return Ok(None);
    };

    let raw = header
        .to_str()
        .map_err(|_| "x-session-id must be ASCII".to_string())?
        .trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<SessionId>().map(Some).map_err(|e| e.to_string())
}
