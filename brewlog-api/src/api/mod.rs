//! HTTP API handlers for brewlog-api

pub mod auth;
pub mod coffees;
pub mod error;
pub mod feed;
pub mod health;
pub mod profiles;
pub mod session;
pub mod stats;

pub use error::ApiError;
pub use session::AuthSession;
