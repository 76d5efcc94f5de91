//! Marketplace payloads and their conversion into pipeline entities.
//!
//! Everything optional on the wire is optional here. Metric blocks default
//! to zero field by field, and a `null` metric is kept as absent.

use serde::Deserialize;
use serde_json::Value;

use insight_pipeline::entity::{AdvertisedItem, Campaign, HealthFlag, ItemDetail, MetricBlock};

/// Attribute id carrying the brand in the catalog attribute list.
pub const BRAND_ATTRIBUTE: &str = "BRAND";
/// Multiget entry status for a resolved item.
pub const MULTIGET_OK: u16 = 200;

/// Metric names requested from the ads endpoints.
pub const METRIC_FIELDS: &str = "clicks,prints,ctr,cost,cpc,acos,\
units_quantity,direct_units_quantity,indirect_units_quantity,\
direct_items_quantity,indirect_items_quantity,\
organic_units_quantity,organic_items_quantity,advertising_items_quantity,\
cvr,roas,sov,direct_amount,indirect_amount,total_amount";

/// Ids arrive as numbers or strings depending on the endpoint.
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pagination envelopes
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub total: usize,
}

/// Offset-paginated list.
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub paging: Paging,
}

/// Scroll-paginated id list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScrollPage {
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub scroll_id: Option<String>,
}

/// Next offset, or `None` once the last page has been read.
pub fn next_offset(offset: usize, limit: usize, page_len: usize, total: usize) -> Option<usize> {
    let next = offset + limit;
    (page_len > 0 && next < total).then_some(next)
}

/// Next scroll id, or `None` when the scroll is exhausted or stuck.
pub fn next_scroll<'a>(previous: Option<&str>, page: &'a ScrollPage) -> Option<&'a str> {
    if page.results.is_empty() {
        return None;
    }
    match page.scroll_id.as_deref() {
        Some(id) if !id.is_empty() && Some(id) != previous => Some(id),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Advertisers, campaigns, ads
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AdvertisersResponse {
    #[serde(default)]
    pub advertisers: Vec<Advertiser>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Advertiser {
    pub advertiser_id: Value,
}

impl AdvertisersResponse {
    pub fn first_id(&self) -> Option<String> {
        self.advertisers
            .first()
            .map(|a| id_string(&a.advertiser_id))
            .filter(|id| !id.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCampaign {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub currency_id: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub acos_target: Option<f64>,
    #[serde(default)]
    pub metrics: MetricBlock,
}

impl From<RawCampaign> for Campaign {
    fn from(raw: RawCampaign) -> Self {
        Campaign {
            campaign_id: id_string(&raw.id),
            name: raw.name.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            budget: raw.budget,
            currency_id: raw.currency_id,
            strategy: raw.strategy,
            channel: raw.channel,
            acos_target: raw.acos_target,
            metrics: raw.metrics,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawAd {
    pub item_id: String,
    #[serde(default)]
    pub campaign_id: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub listing_type_id: Option<String>,
    #[serde(default)]
    pub buy_box_winner: Option<bool>,
    #[serde(default)]
    pub metrics: MetricBlock,
}

impl From<RawAd> for AdvertisedItem {
    fn from(raw: RawAd) -> Self {
        let campaign_id = Some(id_string(&raw.campaign_id)).filter(|id| !id.is_empty());
        AdvertisedItem {
            item_id: raw.item_id,
            campaign_id,
            title: raw.title.unwrap_or_default(),
            status: raw.status,
            channel: raw.channel,
            date_created: raw.date_created,
            listing_type_id: raw.listing_type_id,
            buy_box_winner: raw.buy_box_winner,
            metrics: raw.metrics,
            health: HealthFlag::Absent,
            performance: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog multiget
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct MultigetEntry {
    pub code: u16,
    #[serde(default)]
    pub body: Option<RawItem>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Shipping {
    #[serde(default)]
    pub free_shipping: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub sold_quantity: Option<u64>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default)]
    pub listing_type_id: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub shipping: Option<Shipping>,
    #[serde(default)]
    pub pictures: Vec<Value>,
    /// Usually one of the three health words; anything else is kept as is.
    #[serde(default)]
    pub health: Option<Value>,
}

impl RawItem {
    pub fn brand(&self) -> Option<String> {
        self.attributes
            .iter()
            .find(|a| a.id.as_deref() == Some(BRAND_ATTRIBUTE))
            .and_then(|a| a.value_name.clone())
            .filter(|b| !b.is_empty())
    }

    pub fn health_flag(&self) -> HealthFlag {
        match &self.health {
            None | Some(Value::Null) => HealthFlag::Absent,
            Some(Value::String(s)) => HealthFlag::parse(Some(s)),
            Some(other) => HealthFlag::Other(other.to_string()),
        }
    }
}

impl From<RawItem> for ItemDetail {
    fn from(raw: RawItem) -> Self {
        ItemDetail {
            brand: raw.brand(),
            health: raw.health_flag(),
            free_shipping: raw.shipping.as_ref().map(|s| s.free_shipping).unwrap_or(false),
            picture_count: raw.pictures.len(),
            item_id: raw.id,
            title: raw.title,
            price: raw.price,
            sold_quantity: raw.sold_quantity,
            category_id: raw.category_id,
            domain_id: raw.domain_id,
            listing_type_id: raw.listing_type_id,
            date_created: raw.date_created,
        }
    }
}

/// Keep only resolved multiget entries.
pub fn resolved_items(entries: Vec<MultigetEntry>) -> Vec<ItemDetail> {
    entries
        .into_iter()
        .filter(|e| e.code == MULTIGET_OK)
        .filter_map(|e| e.body)
        .map(ItemDetail::from)
        .collect()
}
