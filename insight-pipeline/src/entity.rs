//! Entity model for the three report populations.
//!
//! Campaigns and advertised items carry a `MetricBlock` with the marketplace's
//! advertising metrics. Potential items (active listings not yet under
//! advertising) carry catalog attributes instead. Every numeric metric defaults
//! to zero when the source omits it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::performance::PerformanceRecord;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Advertising metrics shared by campaigns and advertised items.
///
/// A metric missing from the payload is 0. A metric sent as `null` is kept
/// as NaN so threshold medians can skip it; rules read it through
/// [`MetricBlock::filled`], where it counts as 0 again.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricBlock {
    #[serde(deserialize_with = "nullable_metric")]
    pub clicks: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub prints: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub ctr: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub cost: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub cpc: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub acos: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub cvr: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub roas: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub sov: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub units_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub direct_units_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub indirect_units_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub organic_units_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub direct_items_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub indirect_items_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub organic_items_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub advertising_items_quantity: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub direct_amount: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub indirect_amount: f64,
    #[serde(deserialize_with = "nullable_metric")]
    pub total_amount: f64,
}

fn nullable_metric<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl MetricBlock {
    /// Copy with every absent (NaN) metric replaced by 0.
    pub fn filled(&self) -> MetricBlock {
        let z = |v: f64| if v.is_nan() { 0.0 } else { v };
        MetricBlock {
            clicks: z(self.clicks),
            prints: z(self.prints),
            ctr: z(self.ctr),
            cost: z(self.cost),
            cpc: z(self.cpc),
            acos: z(self.acos),
            cvr: z(self.cvr),
            roas: z(self.roas),
            sov: z(self.sov),
            units_quantity: z(self.units_quantity),
            direct_units_quantity: z(self.direct_units_quantity),
            indirect_units_quantity: z(self.indirect_units_quantity),
            organic_units_quantity: z(self.organic_units_quantity),
            direct_items_quantity: z(self.direct_items_quantity),
            indirect_items_quantity: z(self.indirect_items_quantity),
            organic_items_quantity: z(self.organic_items_quantity),
            advertising_items_quantity: z(self.advertising_items_quantity),
            direct_amount: z(self.direct_amount),
            indirect_amount: z(self.indirect_amount),
            total_amount: z(self.total_amount),
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Marketplace exposure-risk flag attached to a listing.
///
/// Independent of the performance record: both may disagree or both may be
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HealthFlag {
    Healthy,
    Warning,
    Unhealthy,
    /// A value the marketplace sent that has no mapping here.
    Other(String),
    #[default]
    Absent,
}

impl HealthFlag {
    /// Parse the raw marketplace value. Matching is exact, as sent by the API.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => HealthFlag::Absent,
            Some("healthy") => HealthFlag::Healthy,
            Some("warning") => HealthFlag::Warning,
            Some("unhealthy") => HealthFlag::Unhealthy,
            Some(other) => HealthFlag::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HealthFlag::Healthy => "healthy",
            HealthFlag::Warning => "warning",
            HealthFlag::Unhealthy => "unhealthy",
            HealthFlag::Other(raw) => raw,
            HealthFlag::Absent => "",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, HealthFlag::Absent)
    }
}

impl fmt::Display for HealthFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HealthFlag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HealthFlag::Absent => serializer.serialize_none(),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for HealthFlag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(HealthFlag::parse(raw.as_deref()))
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A Product Ads campaign with aggregated metrics for the report window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub name: String,
    pub status: String,
    pub budget: Option<f64>,
    pub currency_id: Option<String>,
    pub strategy: Option<String>,
    pub channel: Option<String>,
    pub acos_target: Option<f64>,
    pub metrics: MetricBlock,
}

/// A listing that is already under paid advertising.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvertisedItem {
    pub item_id: String,
    pub campaign_id: Option<String>,
    pub title: String,
    pub status: Option<String>,
    pub channel: Option<String>,
    pub date_created: Option<String>,
    pub listing_type_id: Option<String>,
    pub buy_box_winner: Option<bool>,
    pub metrics: MetricBlock,
    #[serde(default)]
    pub health: HealthFlag,
    #[serde(default)]
    pub performance: Option<PerformanceRecord>,
}

/// An active listing that is not advertised yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PotentialItem {
    pub item_id: String,
    pub title: String,
    pub sold_quantity: u64,
    pub price: f64,
    pub brand: Option<String>,
    pub free_shipping: bool,
    pub picture_count: usize,
    pub category_id: Option<String>,
    pub domain_id: Option<String>,
    pub listing_type_id: Option<String>,
    pub date_created: Option<String>,
    #[serde(default)]
    pub health: HealthFlag,
    #[serde(default)]
    pub performance: Option<PerformanceRecord>,
}

impl PotentialItem {
    /// A bare potential item known only by id, before catalog hydration.
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            ..Self::default()
        }
    }

    /// Copy the catalog attributes and health flag from a resolved detail.
    pub fn apply_detail(&mut self, detail: &ItemDetail) {
        self.title = detail.title.clone().unwrap_or_default();
        self.sold_quantity = detail.sold_quantity.unwrap_or(0);
        self.price = detail.price.unwrap_or(0.0);
        self.brand = detail.brand.clone().filter(|b| !b.is_empty());
        self.free_shipping = detail.free_shipping;
        self.picture_count = detail.picture_count;
        self.category_id = detail.category_id.clone();
        self.domain_id = detail.domain_id.clone();
        self.listing_type_id = detail.listing_type_id.clone();
        self.date_created = detail.date_created.clone();
        self.health = detail.health.clone();
    }
}

/// Catalog attributes and health for one listing, as returned by the
/// detail resolver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub item_id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub sold_quantity: Option<u64>,
    pub brand: Option<String>,
    pub free_shipping: bool,
    pub picture_count: usize,
    pub category_id: Option<String>,
    pub domain_id: Option<String>,
    pub listing_type_id: Option<String>,
    pub date_created: Option<String>,
    pub health: HealthFlag,
}

/// Which population an entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntityKind {
    Campaign,
    AdvertisedItem,
    PotentialItem,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Campaign => write!(f, "Campaign"),
            EntityKind::AdvertisedItem => write!(f, "Advertised Item"),
            EntityKind::PotentialItem => write!(f, "Potential Item"),
        }
    }
}

/// Tagged entity flowing through the report pipeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Entity {
    Campaign(Campaign),
    AdvertisedItem(AdvertisedItem),
    PotentialItem(PotentialItem),
}

impl Default for Entity {
    fn default() -> Self {
        Entity::Campaign(Campaign::default())
    }
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Campaign(_) => EntityKind::Campaign,
            Entity::AdvertisedItem(_) => EntityKind::AdvertisedItem,
            Entity::PotentialItem(_) => EntityKind::PotentialItem,
        }
    }

    /// Campaign id or item id.
    pub fn id(&self) -> &str {
        match self {
            Entity::Campaign(c) => &c.campaign_id,
            Entity::AdvertisedItem(i) => &i.item_id,
            Entity::PotentialItem(i) => &i.item_id,
        }
    }

    /// Only listings have an item id; campaigns return `None`.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Entity::Campaign(_) => None,
            Entity::AdvertisedItem(i) => Some(&i.item_id),
            Entity::PotentialItem(i) => Some(&i.item_id),
        }
    }

    pub fn metrics(&self) -> Option<&MetricBlock> {
        match self {
            Entity::Campaign(c) => Some(&c.metrics),
            Entity::AdvertisedItem(i) => Some(&i.metrics),
            Entity::PotentialItem(_) => None,
        }
    }

    pub fn health(&self) -> &HealthFlag {
        static ABSENT: HealthFlag = HealthFlag::Absent;
        match self {
            Entity::Campaign(_) => &ABSENT,
            Entity::AdvertisedItem(i) => &i.health,
            Entity::PotentialItem(i) => &i.health,
        }
    }

    pub fn performance(&self) -> Option<&PerformanceRecord> {
        match self {
            Entity::Campaign(_) => None,
            Entity::AdvertisedItem(i) => i.performance.as_ref(),
            Entity::PotentialItem(i) => i.performance.as_ref(),
        }
    }

    /// Attach a performance record to a listing. No-op for campaigns.
    pub fn set_performance(&mut self, record: PerformanceRecord) {
        match self {
            Entity::Campaign(_) => {}
            Entity::AdvertisedItem(i) => i.performance = Some(record),
            Entity::PotentialItem(i) => i.performance = Some(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_parse_is_exact() {
        assert_eq!(HealthFlag::parse(Some("healthy")), HealthFlag::Healthy);
        assert_eq!(HealthFlag::parse(Some("warning")), HealthFlag::Warning);
        assert_eq!(HealthFlag::parse(Some("unhealthy")), HealthFlag::Unhealthy);
        assert_eq!(
            HealthFlag::parse(Some("Healthy")),
            HealthFlag::Other("Healthy".into())
        );
        assert_eq!(HealthFlag::parse(None), HealthFlag::Absent);
    }

    #[test]
    fn health_deserializes_from_null_and_strings() {
        let flags: Vec<HealthFlag> =
            serde_json::from_str(r#"[null, "warning", "paused"]"#).unwrap();
        assert_eq!(
            flags,
            vec![
                HealthFlag::Absent,
                HealthFlag::Warning,
                HealthFlag::Other("paused".into())
            ]
        );
    }

    #[test]
    fn metric_block_defaults_missing_fields_to_zero() {
        let block: MetricBlock = serde_json::from_str(r#"{"clicks": 12, "acos": 7.5}"#).unwrap();
        assert_eq!(block.clicks, 12.0);
        assert_eq!(block.acos, 7.5);
        assert_eq!(block.roas, 0.0);
        assert_eq!(block.total_amount, 0.0);
    }

    #[test]
    fn null_metric_is_absent_until_filled() {
        let block: MetricBlock =
            serde_json::from_str(r#"{"acos": null, "roas": 2.5}"#).unwrap();
        assert!(block.acos.is_nan());
        assert_eq!(block.clicks, 0.0);

        let filled = block.filled();
        assert_eq!(filled.acos, 0.0);
        assert_eq!(filled.roas, 2.5);
    }

    #[test]
    fn apply_detail_copies_catalog_fields() {
        let mut item = PotentialItem::new("MLB1");
        item.apply_detail(&ItemDetail {
            item_id: "MLB1".into(),
            title: Some("Drill".into()),
            price: Some(199.9),
            sold_quantity: Some(42),
            brand: Some(String::new()),
            free_shipping: true,
            picture_count: 3,
            health: HealthFlag::Warning,
            ..ItemDetail::default()
        });
        assert_eq!(item.title, "Drill");
        assert_eq!(item.sold_quantity, 42);
        assert!(item.brand.is_none(), "empty brand counts as absent");
        assert!(item.free_shipping);
        assert_eq!(item.health, HealthFlag::Warning);
    }

    #[test]
    fn campaigns_have_no_health_or_performance() {
        let mut entity = Entity::Campaign(Campaign::default());
        entity.set_performance(PerformanceRecord::default());
        assert!(entity.performance().is_none());
        assert!(entity.health().is_absent());
        assert!(entity.item_id().is_none());
    }
}
