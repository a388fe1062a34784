//! Collection filter & sort engine
//!
//! Pure routines over a materialized set of coffee records. The persistence
//! layer supplies the records (joined with owner identity and flavor
//! profile); this module applies ownership/liveness visibility, the optional
//! filter predicates, and the sort specification.

use std::cmp::Ordering;
use std::str::FromStr;

use uuid::Uuid;

use crate::models::CoffeeWithDetails;
use crate::{Error, Result};

/// Optional filter predicates, combined conjunctively
#[derive(Debug, Clone, Default)]
pub struct CoffeeFilters {
    /// Case-sensitive substring match against name, roaster or description
    pub search: Option<String>,
    /// Exact roast level match
    pub roast_level: Option<String>,
    pub min_rating: Option<i64>,
    pub max_rating: Option<i64>,
}

/// Sortable fields of a coffee record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Rating,
    Name,
    Price,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "rating" => Ok(SortField::Rating),
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            other => Err(Error::InvalidInput(format!("unknown sort field: {other}"))),
        }
    }
}

/// Sort direction; default is newest-first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidInput(format!("unknown sort order: {other}"))),
        }
    }
}

/// Sort specification: field plus direction
#[derive(Debug, Clone, Copy, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

/// Filter and sort an owner's records.
///
/// Ownership and liveness are always applied, regardless of the supplied
/// filters: records of other owners and soft-deleted records never appear
/// in the result. Supplied filters narrow the set further (logical AND).
///
/// Equal sort keys fall back to id ascending, so the output order is
/// deterministic for any input order.
pub fn query(
    records: Vec<CoffeeWithDetails>,
    owner_id: Uuid,
    filters: &CoffeeFilters,
    sort: SortSpec,
) -> Vec<CoffeeWithDetails> {
    let mut results: Vec<CoffeeWithDetails> = records
        .into_iter()
        .filter(|r| r.coffee.user_id == owner_id && r.coffee.is_live())
        .filter(|r| matches_filters(r, filters))
        .collect();

    results.sort_by(|a, b| {
        let key = compare_key(a, b, sort.field);
        let directed = match sort.order {
            SortOrder::Asc => key,
            SortOrder::Desc => key.reverse(),
        };
        directed.then_with(|| a.coffee.id.cmp(&b.coffee.id))
    });

    results
}

fn matches_filters(record: &CoffeeWithDetails, filters: &CoffeeFilters) -> bool {
    let coffee = &record.coffee;

    if let Some(search) = &filters.search {
        let in_name = coffee.name.contains(search.as_str());
        let in_roaster = coffee.roaster.contains(search.as_str());
        let in_description = coffee
            .description
            .as_deref()
            .is_some_and(|d| d.contains(search.as_str()));
        if !(in_name || in_roaster || in_description) {
            return false;
        }
    }

    if let Some(roast_level) = &filters.roast_level {
        if coffee.roast_level.as_deref() != Some(roast_level.as_str()) {
            return false;
        }
    }

    if let Some(min) = filters.min_rating {
        if coffee.rating < min {
            return false;
        }
    }

    if let Some(max) = filters.max_rating {
        if coffee.rating > max {
            return false;
        }
    }

    true
}

/// Ascending comparison on the sort key. Records without a price compare
/// greater than any priced record, matching SQL NULL ordering.
fn compare_key(a: &CoffeeWithDetails, b: &CoffeeWithDetails, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.coffee.created_at.cmp(&b.coffee.created_at),
        SortField::Rating => a.coffee.rating.cmp(&b.coffee.rating),
        SortField::Name => a.coffee.name.cmp(&b.coffee.name),
        SortField::Price => match (a.coffee.price, b.coffee.price) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coffee, PublicUser};
    use chrono::{Duration, TimeZone, Utc};

    fn owner() -> Uuid {
        Uuid::from_u128(1)
    }

    fn record(seq: u128, name: &str, rating: i64) -> CoffeeWithDetails {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::hours(seq as i64);
        CoffeeWithDetails {
            coffee: Coffee {
                id: Uuid::from_u128(seq),
                user_id: owner(),
                name: name.to_string(),
                roaster: "Hillside Roasters".to_string(),
                origin: None,
                roast_level: None,
                processing_method: None,
                price: None,
                color: None,
                image: None,
                description: None,
                rating,
                is_private: false,
                created_at: created,
                updated_at: created,
                deleted_at: None,
            },
            user: PublicUser {
                id: owner(),
                username: "kaveh".to_string(),
                display_name: "Kaveh".to_string(),
            },
            flavor_profile: None,
        }
    }

    fn ids(results: &[CoffeeWithDetails]) -> Vec<u128> {
        results.iter().map(|r| r.coffee.id.as_u128()).collect()
    }

    #[test]
    fn default_sort_is_created_at_descending() {
        let records = vec![record(1, "A", 5), record(3, "C", 5), record(2, "B", 5)];
        let results = query(records, owner(), &CoffeeFilters::default(), SortSpec::default());
        assert_eq!(ids(&results), vec![3, 2, 1]);
    }

    #[test]
    fn other_owners_records_never_appear() {
        let mut foreign = record(2, "Theirs", 5);
        foreign.coffee.user_id = Uuid::from_u128(99);
        let records = vec![record(1, "Mine", 5), foreign];

        // No filter combination can leak the foreign record
        let filters = CoffeeFilters {
            search: Some("Theirs".to_string()),
            ..CoffeeFilters::default()
        };
        let results = query(records, owner(), &filters, SortSpec::default());
        assert!(results.is_empty());
    }

    #[test]
    fn soft_deleted_records_are_excluded() {
        let mut deleted = record(2, "Gone", 5);
        deleted.coffee.deleted_at = Some(Utc::now());
        let records = vec![record(1, "Here", 5), deleted];

        let results = query(records, owner(), &CoffeeFilters::default(), SortSpec::default());
        assert_eq!(ids(&results), vec![1]);
    }

    #[test]
    fn search_matches_name_roaster_or_description() {
        let mut by_description = record(2, "House Blend", 5);
        by_description.coffee.description = Some("surprisingly juicy cup".to_string());
        let records = vec![record(1, "Kenya AA", 5), by_description, record(3, "Decaf", 5)];

        let filters = CoffeeFilters {
            search: Some("juicy".to_string()),
            ..CoffeeFilters::default()
        };
        let results = query(records, owner(), &filters, SortSpec::default());
        assert_eq!(ids(&results), vec![2]);
    }

    #[test]
    fn search_is_substring_not_token_match() {
        let records = vec![record(1, "Yirgacheffe", 5)];
        let filters = CoffeeFilters {
            search: Some("gache".to_string()),
            ..CoffeeFilters::default()
        };
        let results = query(records, owner(), &filters, SortSpec::default());
        assert_eq!(ids(&results), vec![1]);
    }

    #[test]
    fn filters_compose_conjunctively() {
        let mut a = record(1, "Kenya", 8);
        a.coffee.roast_level = Some("Light".to_string());
        let mut b = record(2, "Kenya", 3);
        b.coffee.roast_level = Some("Light".to_string());
        let mut c = record(3, "Kenya", 8);
        c.coffee.roast_level = Some("Dark".to_string());

        let filters = CoffeeFilters {
            search: Some("Kenya".to_string()),
            roast_level: Some("Light".to_string()),
            min_rating: Some(5),
            max_rating: None,
        };
        let results = query(vec![a, b, c], owner(), &filters, SortSpec::default());
        assert_eq!(ids(&results), vec![1]);
    }

    #[test]
    fn rating_range_bounds_are_inclusive() {
        let records = vec![record(1, "A", 4), record(2, "B", 7), record(3, "C", 9)];
        let filters = CoffeeFilters {
            min_rating: Some(7),
            max_rating: Some(9),
            ..CoffeeFilters::default()
        };
        let results = query(records, owner(), &filters, SortSpec::default());
        assert_eq!(ids(&results), vec![3, 2]);
    }

    #[test]
    fn sort_by_rating_ascending() {
        let records = vec![record(1, "A", 7), record(2, "B", 2), record(3, "C", 9)];
        let sort = SortSpec { field: SortField::Rating, order: SortOrder::Asc };
        let results = query(records, owner(), &CoffeeFilters::default(), sort);
        assert_eq!(ids(&results), vec![2, 1, 3]);
    }

    #[test]
    fn equal_sort_keys_tie_break_by_id_ascending() {
        let records = vec![record(3, "Same", 5), record(1, "Same", 5), record(2, "Same", 5)];
        let sort = SortSpec { field: SortField::Rating, order: SortOrder::Desc };
        let results = query(records, owner(), &CoffeeFilters::default(), sort);
        assert_eq!(ids(&results), vec![1, 2, 3]);
    }

    #[test]
    fn unpriced_records_sort_after_priced_ascending() {
        let mut a = record(1, "A", 5);
        a.coffee.price = Some(18.5);
        let b = record(2, "B", 5); // no price
        let mut c = record(3, "C", 5);
        c.coffee.price = Some(9.0);

        let asc = SortSpec { field: SortField::Price, order: SortOrder::Asc };
        let results = query(vec![a.clone(), b.clone(), c.clone()], owner(), &CoffeeFilters::default(), asc);
        assert_eq!(ids(&results), vec![3, 1, 2]);

        let desc = SortSpec { field: SortField::Price, order: SortOrder::Desc };
        let results = query(vec![a, b, c], owner(), &CoffeeFilters::default(), desc);
        assert_eq!(ids(&results), vec![2, 1, 3]);
    }

    #[test]
    fn sort_field_parses_allow_list_only() {
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!("rating".parse::<SortField>().unwrap(), SortField::Rating);
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!("price".parse::<SortField>().unwrap(), SortField::Price);
        assert!("updatedAt".parse::<SortField>().is_err());
        assert!("".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_order_parses_asc_and_desc_only() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("descending".parse::<SortOrder>().is_err());
    }
}
