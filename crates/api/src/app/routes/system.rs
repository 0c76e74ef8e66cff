use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use stockroom_infra::RefreshOutcome;

use crate::app::dto;
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.with_session(session.session_id(), |s| s.metrics()).await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(res) => res,
    }
}

pub async fn reset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let result = services
        .with_session(session.session_id(), |s| {
            let saved = s.reset_to_defaults();
            dto::with_save_outcome(&saved, serde_json::json!({ "reset": true }))
        })
        .await;
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(res) => res,
    }
}

pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let body = match services.with_session(session.session_id(), |s| s.refresh()).await {
        Ok(RefreshOutcome::Reloaded) => serde_json::json!({ "reloaded": true, "reason": null }),
        Ok(RefreshOutcome::KeptCurrent(reason)) => {
            serde_json::json!({ "reloaded": false, "reason": reason.to_string() })
        }
        Err(res) => return res,
    };
    (StatusCode::OK, Json(body)).into_response()
}
