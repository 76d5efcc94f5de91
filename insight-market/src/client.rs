//! HTTP client for the marketplace REST API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use insight_pipeline::entity::{AdvertisedItem, Campaign, ItemDetail};
use insight_pipeline::performance::{PerformanceRecord, PerformanceResponse};
use insight_pipeline::types::DateRange;
use insight_pipeline::util;

use crate::config::MarketConfig;
use crate::error::{MarketError, MarketResult};
use crate::wire::{
    self, AdvertisersResponse, MultigetEntry, Page, RawAd, RawCampaign, ScrollPage, METRIC_FIELDS,
};

const API_VERSION_HEADER: &str = "Api-Version";
const PRODUCT_ADS: &str = "PADS";

type Query = Vec<(&'static str, String)>;

/// Authenticated client bound to one seller's token.
#[derive(Debug, Clone)]
pub struct MarketClient {
    client: Client,
    config: MarketConfig,
}

impl MarketClient {
    pub fn new(config: MarketConfig) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.config.access_token)
    }

    /// Make a GET request, optionally pinned to an API version.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        api_version: Option<&str>,
    ) -> MarketResult<T> {
        let url = self.config.url(path);
        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, self.auth_header());

        if let Some(version) = api_version {
            request = request.header(API_VERSION_HEADER, version);
        }

        let response = request.send().await?;
        Self::handle_response(&url, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> MarketResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return match status {
                StatusCode::UNAUTHORIZED => Err(MarketError::Unauthorized {
                    url: url.to_string(),
                }),
                _ => Err(MarketError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body: text,
                }),
            };
        }

        serde_json::from_str(&text).map_err(Into::into)
    }

    /// Walk an offset-paginated listing to the end.
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
        api_version: &str,
    ) -> MarketResult<Vec<T>> {
        let limit = self.config.page_limit.max(1);
        let mut offset = 0;
        let mut all = Vec::new();

        loop {
            let mut page_query = query.clone();
            page_query.push(("limit", limit.to_string()));
            page_query.push(("offset", offset.to_string()));

            let page: Page<T> = self.get(path, &page_query, Some(api_version)).await?;
            let page_len = page.results.len();
            all.extend(page.results);

            match wire::next_offset(offset, limit, page_len, page.paging.total) {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(all)
    }

    fn metrics_query(range: &DateRange) -> Query {
        vec![
            ("date_from", range.date_from.clone()),
            ("date_to", range.date_to.clone()),
            ("metrics", METRIC_FIELDS.to_string()),
        ]
    }

    // ========== Product Ads ==========

    /// First Product Ads advertiser registered for the token's account.
    pub async fn advertiser_id(&self) -> MarketResult<String> {
        let query = vec![("product_id", PRODUCT_ADS.to_string())];
        let response: AdvertisersResponse = self
            .get("advertising/advertisers", &query, Some("1"))
            .await?;
        let id = response.first_id().ok_or(MarketError::NoAdvertiser)?;
        log::info!("advertiser_id={} product_id={}", id, PRODUCT_ADS);
        Ok(id)
    }

    pub async fn campaigns(
        &self,
        advertiser_id: &str,
        range: &DateRange,
    ) -> MarketResult<Vec<Campaign>> {
        let path = format!("advertising/advertisers/{advertiser_id}/product_ads/campaigns");
        let mut query = Self::metrics_query(range);
        query.push(("metrics_summary", "false".to_string()));

        let raw: Vec<RawCampaign> = self.collect_pages(&path, query, "2").await?;
        log::info!("advertiser_id={} campaigns={}", advertiser_id, raw.len());
        Ok(raw.into_iter().map(Campaign::from).collect())
    }

    pub async fn advertised_items(
        &self,
        advertiser_id: &str,
        range: &DateRange,
    ) -> MarketResult<Vec<AdvertisedItem>> {
        let path = format!("advertising/advertisers/{advertiser_id}/product_ads/items");
        let raw: Vec<RawAd> = self
            .collect_pages(&path, Self::metrics_query(range), "2")
            .await?;
        log::info!("advertiser_id={} advertised_items={}", advertiser_id, raw.len());
        Ok(raw.into_iter().map(AdvertisedItem::from).collect())
    }

    // ========== Catalog ==========

    /// Every active listing id of the seller, via scroll scan.
    pub async fn active_item_ids(&self) -> MarketResult<Vec<String>> {
        let path = format!("users/{}/items/search", self.config.user_id);
        let mut scroll_id: Option<String> = None;
        let mut ids = Vec::new();

        loop {
            let mut query: Query = vec![
                ("status", "active".to_string()),
                ("search_type", "scan".to_string()),
                ("limit", self.config.page_limit.max(1).to_string()),
            ];
            if let Some(scroll) = &scroll_id {
                query.push(("scroll_id", scroll.clone()));
            }

            let page: ScrollPage = self.get(&path, &query, None).await?;
            let next = wire::next_scroll(scroll_id.as_deref(), &page).map(str::to_string);
            log::debug!("user_id={} scroll page={}", self.config.user_id, page.results.len());
            ids.extend(page.results);

            match next {
                Some(next) => scroll_id = Some(next),
                None => break,
            }
        }

        log::info!("user_id={} active_items={}", self.config.user_id, ids.len());
        Ok(ids)
    }

    /// Multiget item details in chunks. Unresolved ids are dropped, and a
    /// failed chunk is skipped without losing the chunks already resolved.
    /// A rejected token still fails the whole call.
    pub async fn item_details(&self, ids: &[String]) -> MarketResult<Vec<ItemDetail>> {
        let unique = util::unique_in_order(ids.iter().map(String::as_str));
        let mut details = Vec::with_capacity(unique.len());

        for chunk in unique.chunks(self.config.multiget_chunk.max(1)) {
            let query = vec![("ids", chunk.join(","))];
            let entries: Vec<MultigetEntry> = match self.get("items", &query, None).await {
                Ok(entries) => entries,
                Err(e @ MarketError::Unauthorized { .. }) => return Err(e),
                Err(e) => {
                    log::warn!("multiget chunk of {} ids failed: {}", chunk.len(), e);
                    continue;
                }
            };
            let resolved = wire::resolved_items(entries);
            if resolved.len() < chunk.len() {
                log::warn!(
                    "multiget resolved {} of {} ids",
                    resolved.len(),
                    chunk.len()
                );
            }
            details.extend(resolved);
        }

        log::info!("item_details requested={} resolved={}", unique.len(), details.len());
        Ok(details)
    }

    /// Listing quality assessment; `None` on any failure.
    pub async fn performance(&self, item_id: &str) -> Option<PerformanceRecord> {
        let path = format!("item/{item_id}/performance");
        match self.get::<PerformanceResponse>(&path, &[], None).await {
            Ok(response) => Some(response.into_record()),
            Err(e) => {
                log::warn!("item_id={} performance lookup failed: {}", item_id, e);
                None
            }
        }
    }
}
