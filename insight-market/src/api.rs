use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use insight_pipeline::collector::{DetailResolver, EntityCollector, PerformanceResolver};
use insight_pipeline::entity::{AdvertisedItem, Campaign, ItemDetail};
use insight_pipeline::performance::PerformanceRecord;
use insight_pipeline::types::DateRange;
use insight_pipeline::{PipelineDeps, ReportQuery};

use crate::client::MarketClient;
use crate::config::MarketConfig;
use crate::error::MarketResult;

/// Live marketplace backend for the report pipeline.
///
/// The advertiser is resolved once when connecting, so an account without
/// Product Ads fails here rather than halfway through a report.
pub struct MarketplaceApi {
    client: MarketClient,
    advertiser_id: String,
}

impl MarketplaceApi {
    pub async fn connect(config: MarketConfig) -> MarketResult<Self> {
        let client = MarketClient::new(config)?;
        let advertiser_id = client.advertiser_id().await?;
        Ok(Self {
            client,
            advertiser_id,
        })
    }

    pub fn advertiser_id(&self) -> &str {
        &self.advertiser_id
    }

    pub fn seller_id(&self) -> &str {
        &self.client.config().user_id
    }

    pub fn config(&self) -> &MarketConfig {
        self.client.config()
    }

    /// Pipeline collaborators backed by this account, with the configured
    /// performance lookup concurrency.
    pub fn pipeline_deps(self: Arc<Self>) -> PipelineDeps {
        let concurrency = self.config().performance_concurrency;
        PipelineDeps::new(self.clone(), self.clone(), self).with_concurrency(concurrency)
    }

    /// A report run for this seller over the configured metrics window.
    pub fn report_query(&self, request_id: impl Into<String>) -> ReportQuery {
        ReportQuery::new(request_id, self.seller_id(), self.config().date_window_days)
    }
}

#[async_trait]
impl EntityCollector for MarketplaceApi {
    async fn campaigns(&self, range: &DateRange) -> Result<Vec<Campaign>, String> {
        self.client
            .campaigns(&self.advertiser_id, range)
            .await
            .map_err(|e| e.to_string())
    }

    async fn advertised_items(&self, range: &DateRange) -> Result<Vec<AdvertisedItem>, String> {
        self.client
            .advertised_items(&self.advertiser_id, range)
            .await
            .map_err(|e| e.to_string())
    }

    async fn active_item_ids(&self) -> Result<Vec<String>, String> {
        self.client.active_item_ids().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl DetailResolver for MarketplaceApi {
    async fn item_details(&self, ids: &[String]) -> Result<HashMap<String, ItemDetail>, String> {
        let details = self
            .client
            .item_details(ids)
            .await
            .map_err(|e| e.to_string())?;
        Ok(details
            .into_iter()
            .map(|d| (d.item_id.clone(), d))
            .collect())
    }
}

#[async_trait]
impl PerformanceResolver for MarketplaceApi {
    async fn performance(&self, item_id: &str) -> Option<PerformanceRecord> {
        self.client.performance(item_id).await
    }
}
