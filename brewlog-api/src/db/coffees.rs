//! Coffee record queries
//!
//! Listing queries return records joined with their owner's public identity
//! and the flavor profile when one exists (left join, never failing when the
//! profile is absent).

use brewlog_common::models::{Coffee, CoffeeWithDetails, FlavorAnswers, FlavorProfile, PublicUser};
use brewlog_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{fmt_ts, parse_ts, parse_ts_opt, parse_uuid};

const COFFEE_COLUMNS: &str = "c.id, c.user_id, c.name, c.roaster, c.origin, c.roast_level, \
     c.processing_method, c.price, c.color, c.image, c.description, c.rating, c.is_private, \
     c.created_at, c.updated_at, c.deleted_at";

const DETAIL_COLUMNS: &str = "u.username, u.display_name, \
     f.id, f.strength_intensity, f.aroma_intensity, f.sweetness_level, f.acidity_level, \
     f.bitterness_level, f.body_weight, f.aftertaste_length, f.aftertaste_pleasant, \
     f.flavor_notes, f.calculated_flavor_profile, f.created_at, f.updated_at";

fn coffee_from_row(row: &SqliteRow) -> Result<Coffee> {
    Ok(Coffee {
        id: parse_uuid(&row.get::<String, _>(0))?,
        user_id: parse_uuid(&row.get::<String, _>(1))?,
        name: row.get(2),
        roaster: row.get(3),
        origin: row.get(4),
        roast_level: row.get(5),
        processing_method: row.get(6),
        price: row.get(7),
        color: row.get(8),
        image: row.get(9),
        description: row.get(10),
        rating: row.get(11),
        is_private: row.get::<i64, _>(12) != 0,
        created_at: parse_ts(&row.get::<String, _>(13))?,
        updated_at: parse_ts(&row.get::<String, _>(14))?,
        deleted_at: parse_ts_opt(row.get::<Option<String>, _>(15))?,
    })
}

fn details_from_row(row: &SqliteRow) -> Result<CoffeeWithDetails> {
    let coffee = coffee_from_row(row)?;

    let user = PublicUser {
        id: coffee.user_id,
        username: row.get(16),
        display_name: row.get(17),
    };

    // Profile columns are NULL when the left join found nothing
    let flavor_profile = match row.get::<Option<String>, _>(18) {
        Some(profile_id) => {
            let notes_json: Option<String> = row.get(27);
            let flavor_notes = notes_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| Error::Internal(format!("invalid flavor notes in database: {e}")))?;

            Some(FlavorProfile {
                id: parse_uuid(&profile_id)?,
                coffee_id: coffee.id,
                answers: FlavorAnswers {
                    strength_intensity: row.get(19),
                    aroma_intensity: row.get(20),
                    sweetness_level: row.get(21),
                    acidity_level: row.get(22),
                    bitterness_level: row.get(23),
                    body_weight: row.get(24),
                    aftertaste_length: row.get(25),
                    aftertaste_pleasant: row.get(26),
                    flavor_notes,
                },
                calculated_flavor_profile: row.get(28),
                created_at: parse_ts(&row.get::<String, _>(29))?,
                updated_at: parse_ts(&row.get::<String, _>(30))?,
            })
        }
        None => None,
    };

    Ok(CoffeeWithDetails { coffee, user, flavor_profile })
}

/// All live records of one owner, with details. Filtering and sorting
/// happen in `brewlog_common::collection::query` over this set.
pub async fn list_with_details(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<CoffeeWithDetails>> {
    let rows = sqlx::query(&format!(
        "SELECT {COFFEE_COLUMNS}, {DETAIL_COLUMNS}
         FROM coffees c
         JOIN users u ON u.id = c.user_id
         LEFT JOIN flavor_profiles f ON f.coffee_id = c.id
         WHERE c.user_id = ? AND c.deleted_at IS NULL"
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(details_from_row).collect()
}

/// Single live record with details, regardless of owner or privacy.
/// Visibility decisions belong to the caller.
pub async fn get_with_details(pool: &SqlitePool, id: Uuid) -> Result<Option<CoffeeWithDetails>> {
    let row = sqlx::query(&format!(
        "SELECT {COFFEE_COLUMNS}, {DETAIL_COLUMNS}
         FROM coffees c
         JOIN users u ON u.id = c.user_id
         LEFT JOIN flavor_profiles f ON f.coffee_id = c.id
         WHERE c.id = ? AND c.deleted_at IS NULL"
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(details_from_row).transpose()
}

/// One page of the public feed: live non-private records of live users,
/// newest first, id ascending on equal timestamps.
pub async fn feed_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<CoffeeWithDetails>> {
    let rows = sqlx::query(&format!(
        "SELECT {COFFEE_COLUMNS}, {DETAIL_COLUMNS}
         FROM coffees c
         JOIN users u ON u.id = c.user_id
         LEFT JOIN flavor_profiles f ON f.coffee_id = c.id
         WHERE c.deleted_at IS NULL AND c.is_private = 0 AND u.deleted_at IS NULL
         ORDER BY c.created_at DESC, c.id ASC
         LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(details_from_row).collect()
}

/// All live records of one owner, bare (for stats aggregation)
pub async fn list_live(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Coffee>> {
    let rows = sqlx::query(&format!(
        "SELECT {COFFEE_COLUMNS}
         FROM coffees c
         WHERE c.user_id = ? AND c.deleted_at IS NULL"
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(coffee_from_row).collect()
}

/// Insert a new coffee row
pub async fn insert(pool: &SqlitePool, coffee: &Coffee) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO coffees (id, user_id, name, roaster, origin, roast_level,
            processing_method, price, color, image, description, rating,
            is_private, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(coffee.id.to_string())
    .bind(coffee.user_id.to_string())
    .bind(&coffee.name)
    .bind(&coffee.roaster)
    .bind(&coffee.origin)
    .bind(&coffee.roast_level)
    .bind(&coffee.processing_method)
    .bind(coffee.price)
    .bind(&coffee.color)
    .bind(&coffee.image)
    .bind(&coffee.description)
    .bind(coffee.rating)
    .bind(coffee.is_private as i64)
    .bind(fmt_ts(coffee.created_at))
    .bind(fmt_ts(coffee.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist an updated record. Scoped to the owner's live rows; returns
/// false when nothing matched.
pub async fn update(pool: &SqlitePool, coffee: &Coffee) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE coffees
        SET name = ?, roaster = ?, origin = ?, roast_level = ?,
            processing_method = ?, price = ?, color = ?, image = ?,
            description = ?, rating = ?, is_private = ?, updated_at = ?
        WHERE id = ? AND user_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(&coffee.name)
    .bind(&coffee.roaster)
    .bind(&coffee.origin)
    .bind(&coffee.roast_level)
    .bind(&coffee.processing_method)
    .bind(coffee.price)
    .bind(&coffee.color)
    .bind(&coffee.image)
    .bind(&coffee.description)
    .bind(coffee.rating)
    .bind(coffee.is_private as i64)
    .bind(fmt_ts(coffee.updated_at))
    .bind(coffee.id.to_string())
    .bind(coffee.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Soft delete: stamp `deleted_at` instead of removing the row.
/// Scoped to the owner; returns false when nothing matched.
pub async fn soft_delete(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
    when: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE coffees SET deleted_at = ? WHERE id = ? AND user_id = ? AND deleted_at IS NULL",
    )
    .bind(fmt_ts(when))
    .bind(id.to_string())
    .bind(user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
