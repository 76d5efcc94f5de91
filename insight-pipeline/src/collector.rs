//! Seams to the marketplace.
//!
//! The pipeline components only talk to these traits. The HTTP adapter and
//! the offline fixture store in `insight-market` implement them, and tests
//! use in-memory fakes.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entity::{AdvertisedItem, Campaign, ItemDetail};
use crate::performance::PerformanceRecord;
use crate::types::DateRange;

/// Pulls the three report populations for one seller.
#[async_trait]
pub trait EntityCollector: Send + Sync {
    /// Campaigns with metrics aggregated over `range`.
    async fn campaigns(&self, range: &DateRange) -> Result<Vec<Campaign>, String>;

    /// Advertised items with metrics aggregated over `range`.
    async fn advertised_items(&self, range: &DateRange) -> Result<Vec<AdvertisedItem>, String>;

    /// Ids of every active listing of the seller, advertised or not.
    async fn active_item_ids(&self) -> Result<Vec<String>, String>;
}

/// Bulk catalog and health lookup.
#[async_trait]
pub trait DetailResolver: Send + Sync {
    /// Ids the marketplace could not resolve are simply missing from the map.
    async fn item_details(&self, ids: &[String]) -> Result<HashMap<String, ItemDetail>, String>;
}

/// Per-listing performance lookup.
#[async_trait]
pub trait PerformanceResolver: Send + Sync {
    /// `None` when the lookup failed for any reason.
    async fn performance(&self, item_id: &str) -> Option<PerformanceRecord>;
}
