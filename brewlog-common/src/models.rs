//! Domain models for the brewlog logbook
//!
//! API-facing types serialize with camelCase keys to match the JSON contract
//! of the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Allowed roast darkness categories
pub const ROAST_LEVELS: &[&str] = &["Light", "Medium", "Dark"];

/// Allowed processing methods
pub const PROCESSING_METHODS: &[&str] = &["Washed", "Natural", "Honey"];

/// A registered user. `password_hash` is never serialized.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User view safe to return to clients (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Public identity fields embedded in coffee listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

/// A single coffee entry in a user's logbook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coffee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub roaster: String,
    pub origin: Option<String>,
    pub roast_level: Option<String>,
    pub processing_method: Option<String>,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Overall satisfaction, 0-10
    pub rating: i64,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Coffee {
    /// Live records are the only ones visible to normal reads
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// The eight questionnaire answers (all 1-5) plus selected flavor notes.
///
/// Every field is optional: a questionnaire may be filled in partially, and
/// the classifier treats absent answers as non-matching rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorAnswers {
    pub strength_intensity: Option<i64>,
    pub aroma_intensity: Option<i64>,
    pub sweetness_level: Option<i64>,
    pub acidity_level: Option<i64>,
    pub bitterness_level: Option<i64>,
    pub body_weight: Option<i64>,
    pub aftertaste_length: Option<i64>,
    pub aftertaste_pleasant: Option<i64>,
    pub flavor_notes: Option<Vec<String>>,
}

impl FlavorAnswers {
    /// Overlay `update` on top of `self`: fields supplied in the update win,
    /// absent fields keep their stored value. Used when recomputing the
    /// calculated label from the post-update questionnaire state.
    pub fn merged_with(&self, update: &FlavorAnswers) -> FlavorAnswers {
        FlavorAnswers {
            strength_intensity: update.strength_intensity.or(self.strength_intensity),
            aroma_intensity: update.aroma_intensity.or(self.aroma_intensity),
            sweetness_level: update.sweetness_level.or(self.sweetness_level),
            acidity_level: update.acidity_level.or(self.acidity_level),
            bitterness_level: update.bitterness_level.or(self.bitterness_level),
            body_weight: update.body_weight.or(self.body_weight),
            aftertaste_length: update.aftertaste_length.or(self.aftertaste_length),
            aftertaste_pleasant: update.aftertaste_pleasant.or(self.aftertaste_pleasant),
            flavor_notes: update
                .flavor_notes
                .clone()
                .or_else(|| self.flavor_notes.clone()),
        }
    }
}

/// Structured tasting questionnaire attached to exactly one coffee
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorProfile {
    pub id: Uuid,
    pub coffee_id: Uuid,
    #[serde(flatten)]
    pub answers: FlavorAnswers,
    /// Derived label, recomputed on every create/update
    pub calculated_flavor_profile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Coffee enriched with its owner's public identity and its flavor profile,
/// when one exists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeWithDetails {
    #[serde(flatten)]
    pub coffee: Coffee,
    pub user: PublicUser,
    pub flavor_profile: Option<FlavorProfile>,
}

/// Summary statistics over a user's live collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_coffees: i64,
    /// Mean of `rating` over all live records, 1 decimal place
    pub average_rating: f64,
    /// Mean of `price` over priced records only, 2 decimal places
    pub average_price: f64,
    /// Count of records per non-absent roast level
    pub roast_level_distribution: std::collections::BTreeMap<String, i64>,
}
