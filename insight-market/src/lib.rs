//! Marketplace adapter for the insight pipeline.
//!
//! Two backends implement the pipeline's collector traits:
//! - `MarketplaceApi`, the live REST client (token-authenticated, paginated)
//! - `FixtureStore`, which replays JSON dumps from a directory
//!
//! Raw payload shapes live in `wire` and convert into the pipeline's entity
//! types there, so both backends read the same formats.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod wire;

pub use api::MarketplaceApi;
pub use client::MarketClient;
pub use config::{load_access_token, user_id_from_token, MarketConfig};
pub use error::{MarketError, MarketResult};
pub use fixtures::FixtureStore;
