//! Collection statistics endpoint

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde_json::json;

use brewlog_common::stats;

use crate::api::error::ApiError;
use crate::api::session::AuthSession;
use crate::{db, AppState};

/// GET /api/stats
///
/// Summary of the caller's live collection.
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse, ApiError> {
    let records = db::coffees::list_live(&state.db, auth.user_id).await?;
    let stats = stats::aggregate(&records);

    Ok(Json(json!({ "success": true, "data": stats })))
}
