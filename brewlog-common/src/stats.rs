//! Collection statistics aggregation

use std::collections::BTreeMap;

use crate::models::{Coffee, UserStats};

/// Aggregate a user's live records into summary statistics.
///
/// Callers must supply the already-scoped record set (owner's live records).
/// Average rating spans every record; average price spans only records that
/// carry a price. Records without a roast level are left out of the
/// distribution rather than binned as "unknown".
pub fn aggregate(records: &[Coffee]) -> UserStats {
    let total_coffees = records.len() as i64;

    let average_rating = if records.is_empty() {
        0.0
    } else {
        let sum: i64 = records.iter().map(|c| c.rating).sum();
        round_to(sum as f64 / records.len() as f64, 1)
    };

    let prices: Vec<f64> = records.iter().filter_map(|c| c.price).collect();
    let average_price = if prices.is_empty() {
        0.0
    } else {
        round_to(prices.iter().sum::<f64>() / prices.len() as f64, 2)
    };

    let mut roast_level_distribution: BTreeMap<String, i64> = BTreeMap::new();
    for coffee in records {
        if let Some(level) = &coffee.roast_level {
            *roast_level_distribution.entry(level.clone()).or_insert(0) += 1;
        }
    }

    UserStats {
        total_coffees,
        average_rating,
        average_price,
        roast_level_distribution,
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn coffee(rating: i64, price: Option<f64>, roast_level: Option<&str>) -> Coffee {
        let now = Utc::now();
        Coffee {
            id: Uuid::new_v4(),
            user_id: Uuid::from_u128(1),
            name: "Test".to_string(),
            roaster: "Test Roasters".to_string(),
            origin: None,
            roast_level: roast_level.map(|s| s.to_string()),
            processing_method: None,
            price,
            color: None,
            image: None,
            description: None,
            rating,
            is_private: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn empty_collection_yields_zeroed_stats() {
        let stats = aggregate(&[]);
        assert_eq!(
            stats,
            UserStats {
                total_coffees: 0,
                average_rating: 0.0,
                average_price: 0.0,
                roast_level_distribution: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn average_rating_spans_all_records() {
        let stats = aggregate(&[coffee(8, None, None), coffee(6, None, None)]);
        assert_eq!(stats.total_coffees, 2);
        assert_eq!(stats.average_rating, 7.0);
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        let stats = aggregate(&[
            coffee(7, None, None),
            coffee(8, None, None),
            coffee(8, None, None),
        ]);
        // 23 / 3 = 7.666...
        assert_eq!(stats.average_rating, 7.7);
    }

    #[test]
    fn average_price_spans_priced_records_only() {
        let stats = aggregate(&[coffee(5, Some(10.0), None), coffee(5, None, None)]);
        assert_eq!(stats.average_price, 10.0);
    }

    #[test]
    fn average_price_rounds_to_two_decimals() {
        let stats = aggregate(&[
            coffee(5, Some(9.99), None),
            coffee(5, Some(12.5), None),
            coffee(5, Some(11.0), None),
        ]);
        // 33.49 / 3 = 11.163...
        assert_eq!(stats.average_price, 11.16);
    }

    #[test]
    fn no_priced_records_means_zero_average_price() {
        let stats = aggregate(&[coffee(5, None, None), coffee(7, None, None)]);
        assert_eq!(stats.average_price, 0.0);
    }

    #[test]
    fn roast_distribution_skips_absent_levels() {
        let stats = aggregate(&[
            coffee(5, None, Some("Light")),
            coffee(5, None, Some("Light")),
            coffee(5, None, Some("Dark")),
            coffee(5, None, None),
        ]);
        assert_eq!(stats.roast_level_distribution.len(), 2);
        assert_eq!(stats.roast_level_distribution["Light"], 2);
        assert_eq!(stats.roast_level_distribution["Dark"], 1);
    }
}
