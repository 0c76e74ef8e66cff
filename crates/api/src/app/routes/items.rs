use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let items: Vec<serde_json::Value> = match services
        .with_session(session.session_id(), |s| {
            s.items().iter().map(dto::item_to_json).collect::<Vec<_>>()
        })
        .await
    {
        Ok(items) => items,
        Err(res) => return res,
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": items.len(),
            "items": items,
        })),
    )
        .into_response()
}

pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::UpdateQuantityBody>,
) -> axum::response::Response {
    let quantity = match body.quantity() {
        Ok(q) => q,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let result = services
        .with_session(session.session_id(), move |s| {
            let saved = s.update_quantity(body.name.clone(), quantity);
            dto::with_save_outcome(
                &saved,
                serde_json::json!({
                    "name": body.name,
                    "quantity": quantity,
                    "updated": saved.value,
                }),
            )
        })
        .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(res) => res,
    }
}

pub async fn export_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.with_session(session.session_id(), |s| s.export_stock()).await {
        Ok(Ok(export)) => dto::csv_download(export),
        Ok(Err(e)) => errors::export_error_to_response(e),
        Err(res) => res,
    }
}
