use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_request))
        .route("/pending", get(list_pending))
        .route("/approve", post(approve_all))
        .route("/clear", post(clear_pending))
        .route("/approved", get(list_approved))
        .route("/approved/export", get(export_approved))
}

pub async fn create_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::CreateRequestBody>,
) -> axum::response::Response {
    let (item_code, amount) = match body.into_parts() {
        Ok(parts) => parts,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let result = services
        .with_session(session.session_id(), move |s| {
            s.create_request(item_code, amount).map(|saved| {
                dto::with_save_outcome(&saved, serde_json::json!({ "request": saved.value }))
            })
        })
        .await;

    match result {
        Ok(Ok(body)) => (StatusCode::CREATED, Json(body)).into_response(),
        Ok(Err(e)) => errors::domain_error_to_response(e),
        Err(res) => res,
    }
}

pub async fn list_pending(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let pending = match services
        .with_session(session.session_id(), |s| s.pending().to_vec())
        .await
    {
        Ok(requests) => requests,
        Err(res) => return res,
    };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": pending.len(),
            "requests": pending,
        })),
    )
        .into_response()
}

pub async fn list_approved(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let approved = match services
        .with_session(session.session_id(), |s| s.approved().to_vec())
        .await
    {
        Ok(requests) => requests,
        Err(res) => return res,
    };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": approved.len(),
            "requests": approved,
        })),
    )
        .into_response()
}

pub async fn approve_all(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let result = services
        .with_session(session.session_id(), |s| {
            let saved = s.approve_all();
            dto::with_save_outcome(&saved, serde_json::json!({ "approved": saved.value }))
        })
        .await;
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(res) => res,
    }
}

pub async fn clear_pending(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let result = services
        .with_session(session.session_id(), |s| {
            let saved = s.clear_pending();
            dto::with_save_outcome(&saved, serde_json::json!({ "cleared": saved.value }))
        })
        .await;
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(res) => res,
    }
}

pub async fn export_approved(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.with_session(session.session_id(), |s| s.export_approved()).await {
        Ok(Ok(export)) => dto::csv_download(export),
        Ok(Err(e)) => errors::export_error_to_response(e),
        Err(res) => res,
    }
}
