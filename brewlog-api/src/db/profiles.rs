//! Flavor profile queries
//!
//! One profile per coffee, enforced by the UNIQUE constraint on `coffee_id`.
//! Flavor notes are stored as a JSON array in a TEXT column.

use brewlog_common::models::{FlavorAnswers, FlavorProfile};
use brewlog_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{fmt_ts, parse_ts, parse_uuid};

fn profile_from_row(row: &SqliteRow) -> Result<FlavorProfile> {
    let notes_json: Option<String> = row.get(10);
    let flavor_notes = notes_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| Error::Internal(format!("invalid flavor notes in database: {e}")))?;

    Ok(FlavorProfile {
        id: parse_uuid(&row.get::<String, _>(0))?,
        coffee_id: parse_uuid(&row.get::<String, _>(1))?,
        answers: FlavorAnswers {
            strength_intensity: row.get(2),
            aroma_intensity: row.get(3),
            sweetness_level: row.get(4),
            acidity_level: row.get(5),
            bitterness_level: row.get(6),
            body_weight: row.get(7),
            aftertaste_length: row.get(8),
            aftertaste_pleasant: row.get(9),
            flavor_notes,
        },
        calculated_flavor_profile: row.get(11),
        created_at: parse_ts(&row.get::<String, _>(12))?,
        updated_at: parse_ts(&row.get::<String, _>(13))?,
    })
}

fn notes_to_json(answers: &FlavorAnswers) -> Result<Option<String>> {
    answers
        .flavor_notes
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| Error::Internal(format!("failed to encode flavor notes: {e}")))
}

/// Fetch the profile attached to a coffee, if any
pub async fn get_by_coffee(pool: &SqlitePool, coffee_id: Uuid) -> Result<Option<FlavorProfile>> {
    let row = sqlx::query(
        r#"
        SELECT id, coffee_id, strength_intensity, aroma_intensity, sweetness_level,
               acidity_level, bitterness_level, body_weight, aftertaste_length,
               aftertaste_pleasant, flavor_notes, calculated_flavor_profile,
               created_at, updated_at
        FROM flavor_profiles
        WHERE coffee_id = ?
        "#,
    )
    .bind(coffee_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(profile_from_row).transpose()
}

/// Insert a new profile row
pub async fn insert(pool: &SqlitePool, profile: &FlavorProfile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO flavor_profiles (id, coffee_id, strength_intensity, aroma_intensity,
            sweetness_level, acidity_level, bitterness_level, body_weight,
            aftertaste_length, aftertaste_pleasant, flavor_notes,
            calculated_flavor_profile, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(profile.id.to_string())
    .bind(profile.coffee_id.to_string())
    .bind(profile.answers.strength_intensity)
    .bind(profile.answers.aroma_intensity)
    .bind(profile.answers.sweetness_level)
    .bind(profile.answers.acidity_level)
    .bind(profile.answers.bitterness_level)
    .bind(profile.answers.body_weight)
    .bind(profile.answers.aftertaste_length)
    .bind(profile.answers.aftertaste_pleasant)
    .bind(notes_to_json(&profile.answers)?)
    .bind(&profile.calculated_flavor_profile)
    .bind(fmt_ts(profile.created_at))
    .bind(fmt_ts(profile.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite the questionnaire state and recomputed label of an existing
/// profile; returns false when the coffee has no profile.
pub async fn update(
    pool: &SqlitePool,
    coffee_id: Uuid,
    answers: &FlavorAnswers,
    calculated_label: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE flavor_profiles
        SET strength_intensity = ?, aroma_intensity = ?, sweetness_level = ?,
            acidity_level = ?, bitterness_level = ?, body_weight = ?,
            aftertaste_length = ?, aftertaste_pleasant = ?, flavor_notes = ?,
            calculated_flavor_profile = ?, updated_at = ?
        WHERE coffee_id = ?
        "#,
    )
    .bind(answers.strength_intensity)
    .bind(answers.aroma_intensity)
    .bind(answers.sweetness_level)
    .bind(answers.acidity_level)
    .bind(answers.bitterness_level)
    .bind(answers.body_weight)
    .bind(answers.aftertaste_length)
    .bind(answers.aftertaste_pleasant)
    .bind(notes_to_json(answers)?)
    .bind(calculated_label)
    .bind(fmt_ts(chrono::Utc::now()))
    .bind(coffee_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
