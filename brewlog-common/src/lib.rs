//! # Brewlog Common Library
//!
//! Shared code for the brewlog coffee-tasting logbook:
//! - Domain models (users, coffees, flavor profiles)
//! - Flavor profile classification
//! - Collection filtering, sorting and aggregation
//! - Common error types

pub mod collection;
pub mod error;
pub mod flavor;
pub mod models;
pub mod stats;

pub use error::{Error, Result};
