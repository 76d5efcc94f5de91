//! Offline backend reading marketplace dumps from a directory.
//!
//! Files use the same JSON shapes the API returns:
//!
//! | file                    | shape                                   |
//! |-------------------------|-----------------------------------------|
//! | `campaigns.json`        | array of campaign objects with metrics  |
//! | `advertised_items.json` | array of ad objects with metrics        |
//! | `active_items.json`     | array of item ids                       |
//! | `items.json`            | array of multiget entries               |
//! | `performance.json`      | object of item id → performance payload |
//!
//! A missing file reads as empty.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use insight_pipeline::collector::{DetailResolver, EntityCollector, PerformanceResolver};
use insight_pipeline::entity::{AdvertisedItem, Campaign, ItemDetail};
use insight_pipeline::performance::{PerformanceRecord, PerformanceResponse};
use insight_pipeline::types::DateRange;

use crate::error::{MarketError, MarketResult};
use crate::wire::{self, MultigetEntry, RawAd, RawCampaign};

pub const CAMPAIGNS_FILE: &str = "campaigns.json";
pub const ADVERTISED_ITEMS_FILE: &str = "advertised_items.json";
pub const ACTIVE_ITEMS_FILE: &str = "active_items.json";
pub const ITEMS_FILE: &str = "items.json";
pub const PERFORMANCE_FILE: &str = "performance.json";

#[derive(Clone, Debug, Default)]
pub struct FixtureStore {
    campaigns: Vec<Campaign>,
    advertised_items: Vec<AdvertisedItem>,
    active_ids: Vec<String>,
    details: HashMap<String, ItemDetail>,
    performance: HashMap<String, PerformanceRecord>,
}

fn read_or_default<T: DeserializeOwned + Default>(dir: &Path, file: &str) -> MarketResult<T> {
    let path = dir.join(file);
    if !path.exists() {
        log::debug!("fixture {} missing, using empty", path.display());
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(&path).map_err(|e| MarketError::io(&path, e))?;
    serde_json::from_str(&raw).map_err(Into::into)
}

impl FixtureStore {
    pub fn load(dir: &Path) -> MarketResult<Self> {
        if !dir.is_dir() {
            return Err(MarketError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "fixture directory not found"),
            ));
        }

        let campaigns: Vec<RawCampaign> = read_or_default(dir, CAMPAIGNS_FILE)?;
        let ads: Vec<RawAd> = read_or_default(dir, ADVERTISED_ITEMS_FILE)?;
        let active_ids: Vec<String> = read_or_default(dir, ACTIVE_ITEMS_FILE)?;
        let entries: Vec<MultigetEntry> = read_or_default(dir, ITEMS_FILE)?;
        let performance: HashMap<String, PerformanceResponse> =
            read_or_default(dir, PERFORMANCE_FILE)?;

        let store = Self {
            campaigns: campaigns.into_iter().map(Campaign::from).collect(),
            advertised_items: ads.into_iter().map(AdvertisedItem::from).collect(),
            active_ids,
            details: wire::resolved_items(entries)
                .into_iter()
                .map(|d| (d.item_id.clone(), d))
                .collect(),
            performance: performance
                .into_iter()
                .map(|(id, response)| (id, response.into_record()))
                .collect(),
        };

        log::info!(
            "fixtures dir={} campaigns={} advertised_items={} active_items={} details={} performance={}",
            dir.display(),
            store.campaigns.len(),
            store.advertised_items.len(),
            store.active_ids.len(),
            store.details.len(),
            store.performance.len()
        );
        Ok(store)
    }
}

#[async_trait]
impl EntityCollector for FixtureStore {
    async fn campaigns(&self, _range: &DateRange) -> Result<Vec<Campaign>, String> {
        Ok(self.campaigns.clone())
    }

    async fn advertised_items(&self, _range: &DateRange) -> Result<Vec<AdvertisedItem>, String> {
        Ok(self.advertised_items.clone())
    }

    async fn active_item_ids(&self) -> Result<Vec<String>, String> {
        Ok(self.active_ids.clone())
    }
}

#[async_trait]
impl DetailResolver for FixtureStore {
    async fn item_details(&self, ids: &[String]) -> Result<HashMap<String, ItemDetail>, String> {
        Ok(ids
            .iter()
            .filter_map(|id| self.details.get(id).map(|d| (id.clone(), d.clone())))
            .collect())
    }
}

#[async_trait]
impl PerformanceResolver for FixtureStore {
    async fn performance(&self, item_id: &str) -> Option<PerformanceRecord> {
        self.performance.get(item_id).cloned()
    }
}
