//! Public cross-user feed endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use brewlog_common::collection::{self, CoffeeFilters, SortSpec};

use crate::api::error::ApiError;
use crate::api::session::AuthSession;
use crate::{db, AppState};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/feed
///
/// Newest-first page of everyone's public records, the caller's included.
/// `hasMore` reports whether the page came back full; a page that exactly
/// exhausts the data still reports true, so clients may see one extra
/// empty fetch. That contract is deliberate.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);

    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    if offset < 0 {
        return Err(ApiError::BadRequest("offset cannot be negative".to_string()));
    }

    let records = db::coffees::feed_page(&state.db, limit, offset).await?;
    let has_more = records.len() as i64 == limit;

    Ok(Json(json!({
        "success": true,
        "data": records,
        "pagination": {
            "limit": limit,
            "offset": offset,
            "hasMore": has_more,
        },
    })))
}

/// GET /api/feed/:id
///
/// Unlike the collection endpoint, the feed hides private records of other
/// users behind 404 rather than 403.
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = db::coffees::get_with_details(&state.db, id)
        .await?
        .filter(|r| !r.coffee.is_private || r.coffee.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Coffee not found".to_string()))?;

    Ok(Json(json!({ "success": true, "data": record })))
}

/// GET /api/feed/users/:user_id/coffees
///
/// A user's records, newest first. Private records are included only when
/// the caller is looking at their own profile.
pub async fn user_coffees(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(target_user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let records = db::coffees::list_with_details(&state.db, target_user_id).await?;
    let mut results = collection::query(
        records,
        target_user_id,
        &CoffeeFilters::default(),
        SortSpec::default(),
    );

    if target_user_id != auth.user_id {
        results.retain(|r| !r.coffee.is_private);
    }

    Ok(Json(json!({ "success": true, "data": results })))
}
