//! Flavor profile endpoints
//!
//! One questionnaire per coffee. The derived label is recomputed on every
//! create and update from the questionnaire state after the change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use brewlog_common::flavor;
use brewlog_common::models::{Coffee, FlavorAnswers, FlavorProfile};

use crate::api::error::ApiError;
use crate::api::session::AuthSession;
use crate::{db, AppState};

/// Request body for profile create/update: the questionnaire answers
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(flatten)]
    pub answers: FlavorAnswers,
}

impl ProfileRequest {
    fn validate(&self) -> Vec<String> {
        let ratings = [
            ("strengthIntensity", self.answers.strength_intensity),
            ("aromaIntensity", self.answers.aroma_intensity),
            ("sweetnessLevel", self.answers.sweetness_level),
            ("acidityLevel", self.answers.acidity_level),
            ("bitternessLevel", self.answers.bitterness_level),
            ("bodyWeight", self.answers.body_weight),
            ("aftertasteLength", self.answers.aftertaste_length),
            ("aftertastePleasant", self.answers.aftertaste_pleasant),
        ];

        ratings
            .iter()
            .filter(|(_, value)| value.is_some_and(|v| !(1..=5).contains(&v)))
            .map(|(field, _)| format!("{field} must be between 1 and 5"))
            .collect()
    }
}

/// Resolve the coffee and check the caller may read it
async fn readable_coffee(
    state: &AppState,
    auth: &AuthSession,
    coffee_id: Uuid,
) -> Result<Coffee, ApiError> {
    let record = db::coffees::get_with_details(&state.db, coffee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Coffee not found".to_string()))?;

    if record.coffee.is_private && record.coffee.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    Ok(record.coffee)
}

/// Resolve the coffee and check the caller owns it
async fn owned_coffee(
    state: &AppState,
    auth: &AuthSession,
    coffee_id: Uuid,
) -> Result<Coffee, ApiError> {
    let record = db::coffees::get_with_details(&state.db, coffee_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Not authorized".to_string()))?;

    if record.coffee.user_id != auth.user_id {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    Ok(record.coffee)
}

/// GET /api/coffees/:id/profile
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(coffee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let coffee = readable_coffee(&state, &auth, coffee_id).await?;

    let profile = db::profiles::get_by_coffee(&state.db, coffee.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flavor profile not found".to_string()))?;

    Ok(Json(json!({ "success": true, "data": profile })))
}

/// POST /api/coffees/:id/profile (owner only, rejected when one exists)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(coffee_id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coffee = owned_coffee(&state, &auth, coffee_id).await?;

    if db::profiles::get_by_coffee(&state.db, coffee.id).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Flavor profile already exists; use PUT to update".to_string(),
        ));
    }

    let details = request.validate();
    if !details.is_empty() {
        return Err(ApiError::Validation(details));
    }

    let label = flavor::classify(&request.answers);
    let now = Utc::now();
    let profile = FlavorProfile {
        id: Uuid::new_v4(),
        coffee_id: coffee.id,
        answers: request.answers,
        calculated_flavor_profile: Some(label.to_string()),
        created_at: now,
        updated_at: now,
    };
    db::profiles::insert(&state.db, &profile).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": profile })),
    ))
}

/// PUT /api/coffees/:id/profile (owner only)
///
/// The supplied answers overlay the stored ones; the label is recomputed
/// from the merged questionnaire.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(coffee_id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coffee = owned_coffee(&state, &auth, coffee_id).await?;

    let details = request.validate();
    if !details.is_empty() {
        return Err(ApiError::Validation(details));
    }

    let existing = db::profiles::get_by_coffee(&state.db, coffee.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flavor profile not found".to_string()))?;

    let merged = existing.answers.merged_with(&request.answers);
    let label = flavor::classify(&merged);

    if !db::profiles::update(&state.db, coffee.id, &merged, label).await? {
        return Err(ApiError::NotFound("Flavor profile not found".to_string()));
    }

    let profile = db::profiles::get_by_coffee(&state.db, coffee.id)
        .await?
        .ok_or_else(|| ApiError::Internal("profile vanished during update".to_string()))?;

    Ok(Json(json!({ "success": true, "data": profile })))
}
