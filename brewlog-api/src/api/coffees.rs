//! Coffee collection endpoints (owner-scoped CRUD)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use brewlog_common::collection::{self, CoffeeFilters, SortField, SortOrder, SortSpec};
use brewlog_common::models::{Coffee, PROCESSING_METHODS, ROAST_LEVELS};

use crate::api::error::ApiError;
use crate::api::session::AuthSession;
use crate::{db, AppState};

/// Query parameters for GET /api/coffees
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub roast_level: Option<String>,
    pub min_rating: Option<i64>,
    pub max_rating: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListQuery {
    /// Split into filter predicates and sort spec; unknown sort names are
    /// rejected here, at the boundary, not inside the engine.
    fn into_parts(self) -> Result<(CoffeeFilters, SortSpec), ApiError> {
        let sort = SortSpec {
            field: self
                .sort_by
                .as_deref()
                .map(str::parse::<SortField>)
                .transpose()?
                .unwrap_or_default(),
            order: self
                .sort_order
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
        };
        let filters = CoffeeFilters {
            search: self.search,
            roast_level: self.roast_level,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        };
        Ok((filters, sort))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoffeeRequest {
    pub name: String,
    pub roaster: String,
    pub origin: Option<String>,
    pub roast_level: Option<String>,
    pub processing_method: Option<String>,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i64>,
    pub is_private: Option<bool>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoffeeRequest {
    pub name: Option<String>,
    pub roaster: Option<String>,
    pub origin: Option<String>,
    pub roast_level: Option<String>,
    pub processing_method: Option<String>,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i64>,
    pub is_private: Option<bool>,
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn validate_fields(
    name: Option<&str>,
    roaster: Option<&str>,
    rating: Option<i64>,
    price: Option<f64>,
    roast_level: Option<&str>,
    processing_method: Option<&str>,
    color: Option<&str>,
) -> Vec<String> {
    let mut details = Vec::new();

    if let Some(name) = name {
        if name.is_empty() || name.len() > 200 {
            details.push("name must be between 1 and 200 characters".to_string());
        }
    }
    if let Some(roaster) = roaster {
        if roaster.is_empty() || roaster.len() > 200 {
            details.push("roaster must be between 1 and 200 characters".to_string());
        }
    }
    if let Some(rating) = rating {
        if !(0..=10).contains(&rating) {
            details.push("rating must be between 0 and 10".to_string());
        }
    }
    if let Some(price) = price {
        if price <= 0.0 {
            details.push("price must be positive".to_string());
        }
    }
    if let Some(level) = roast_level {
        if !ROAST_LEVELS.contains(&level) {
            details.push(format!("roast level must be one of {ROAST_LEVELS:?}"));
        }
    }
    if let Some(method) = processing_method {
        if !PROCESSING_METHODS.contains(&method) {
            details.push(format!("processing method must be one of {PROCESSING_METHODS:?}"));
        }
    }
    if let Some(color) = color {
        if !is_hex_color(color) {
            details.push("color must be a #RRGGBB hex string".to_string());
        }
    }

    details
}

impl CreateCoffeeRequest {
    fn validate(&self) -> Vec<String> {
        validate_fields(
            Some(&self.name),
            Some(&self.roaster),
            self.rating,
            self.price,
            self.roast_level.as_deref(),
            self.processing_method.as_deref(),
            self.color.as_deref(),
        )
    }
}

impl UpdateCoffeeRequest {
    fn validate(&self) -> Vec<String> {
        validate_fields(
            self.name.as_deref(),
            self.roaster.as_deref(),
            self.rating,
            self.price,
            self.roast_level.as_deref(),
            self.processing_method.as_deref(),
            self.color.as_deref(),
        )
    }

    fn apply(self, coffee: &mut Coffee) {
        if let Some(name) = self.name {
            coffee.name = name;
        }
        if let Some(roaster) = self.roaster {
            coffee.roaster = roaster;
        }
        if self.origin.is_some() {
            coffee.origin = self.origin;
        }
        if self.roast_level.is_some() {
            coffee.roast_level = self.roast_level;
        }
        if self.processing_method.is_some() {
            coffee.processing_method = self.processing_method;
        }
        if self.price.is_some() {
            coffee.price = self.price;
        }
        if self.color.is_some() {
            coffee.color = self.color;
        }
        if self.image.is_some() {
            coffee.image = self.image;
        }
        if self.description.is_some() {
            coffee.description = self.description;
        }
        if let Some(rating) = self.rating {
            coffee.rating = rating;
        }
        if let Some(is_private) = self.is_private {
            coffee.is_private = is_private;
        }
    }
}

/// GET /api/coffees
///
/// The caller's live records, filtered and sorted.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (filters, sort) = query.into_parts()?;
    let records = db::coffees::list_with_details(&state.db, auth.user_id).await?;
    let results = collection::query(records, auth.user_id, &filters, sort);

    Ok(Json(json!({ "success": true, "data": results })))
}

/// GET /api/coffees/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = db::coffees::get_with_details(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Coffee not found".to_string()))?;

    if record.coffee.is_private && record.coffee.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    Ok(Json(json!({ "success": true, "data": record })))
}

/// POST /api/coffees
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(request): Json<CreateCoffeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = request.validate();
    if !details.is_empty() {
        return Err(ApiError::Validation(details));
    }

    let now = Utc::now();
    let coffee = Coffee {
        id: Uuid::new_v4(),
        user_id: auth.user_id,
        name: request.name,
        roaster: request.roaster,
        origin: request.origin,
        roast_level: request.roast_level,
        processing_method: request.processing_method,
        price: request.price,
        color: request.color,
        image: request.image,
        description: request.description,
        rating: request.rating.unwrap_or(0),
        is_private: request.is_private.unwrap_or(false),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    db::coffees::insert(&state.db, &coffee).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": coffee })),
    ))
}

/// PUT /api/coffees/:id (owner only)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCoffeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = db::coffees::get_with_details(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Coffee not found".to_string()))?;
    if record.coffee.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    let details = request.validate();
    if !details.is_empty() {
        return Err(ApiError::Validation(details));
    }

    let mut coffee = record.coffee;
    request.apply(&mut coffee);
    coffee.updated_at = Utc::now();

    if !db::coffees::update(&state.db, &coffee).await? {
        return Err(ApiError::NotFound("Coffee not found".to_string()));
    }

    Ok(Json(json!({ "success": true, "data": coffee })))
}

/// DELETE /api/coffees/:id (owner only, soft delete)
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = db::coffees::get_with_details(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Coffee not found".to_string()))?;
    if record.coffee.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    if !db::coffees::soft_delete(&state.db, id, auth.user_id, Utc::now()).await? {
        return Err(ApiError::NotFound("Coffee not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
