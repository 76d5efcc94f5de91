//! Report assembly and emission.
//!
//! The scored candidates are split back into the three named tables. Every
//! table keeps all entity fields and adds `priority` plus `recommendations`,
//! the fired messages joined with `"; "` in firing order.

use std::fmt::Display;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::entity::{AdvertisedItem, Campaign, Entity, MetricBlock, PotentialItem};
use crate::error::{ReportError, ReportResult};
use crate::performance::PerformanceRecord;
use crate::thresholds::Thresholds;
use crate::types::{DateRange, EntityCandidate, ReportQuery};

/// Separator between recommendation messages in a table cell.
pub const RECOMMENDATION_SEPARATOR: &str = "; ";

pub const CAMPAIGNS_TABLE: &str = "campaigns";
pub const ADVERTISED_ITEMS_TABLE: &str = "advertised_items";
pub const POTENTIAL_ITEMS_TABLE: &str = "potential_items";

// ---------------------------------------------------------------------------
// Report model
// ---------------------------------------------------------------------------

/// One table row: the entity plus its scoring output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredEntity<T> {
    #[serde(flatten)]
    pub entity: T,
    pub priority: u32,
    pub recommendations: String,
}

impl<T> ScoredEntity<T> {
    fn new(entity: T, candidate: &EntityCandidate) -> Self {
        Self {
            entity,
            priority: candidate.priority,
            recommendations: candidate.recommendations.join(RECOMMENDATION_SEPARATOR),
        }
    }
}

/// The three scored tables of one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InsightReport {
    pub request_id: String,
    pub seller_id: String,
    pub date_range: DateRange,
    pub thresholds: Thresholds,
    pub campaigns: Vec<ScoredEntity<Campaign>>,
    pub advertised_items: Vec<ScoredEntity<AdvertisedItem>>,
    pub potential_items: Vec<ScoredEntity<PotentialItem>>,
}

impl InsightReport {
    /// Split candidates into tables. Table order follows candidate order,
    /// so pass the selector's output to get priority-sorted tables.
    pub fn from_candidates(query: &ReportQuery, candidates: &[EntityCandidate]) -> Self {
        let mut report = InsightReport {
            request_id: query.request_id.clone(),
            seller_id: query.seller_id.clone(),
            date_range: query.date_range.clone(),
            thresholds: Thresholds::from_candidates(candidates),
            ..InsightReport::default()
        };

        for candidate in candidates {
            match &candidate.entity {
                Entity::Campaign(c) => report
                    .campaigns
                    .push(ScoredEntity::new(c.clone(), candidate)),
                Entity::AdvertisedItem(i) => report
                    .advertised_items
                    .push(ScoredEntity::new(i.clone(), candidate)),
                Entity::PotentialItem(i) => report
                    .potential_items
                    .push(ScoredEntity::new(i.clone(), candidate)),
            }
        }
        report
    }

    pub fn total_rows(&self) -> usize {
        self.campaigns.len() + self.advertised_items.len() + self.potential_items.len()
    }
}

// ---------------------------------------------------------------------------
// Flat table rows
// ---------------------------------------------------------------------------

/// CSV projection of an entity.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn values(&self) -> Vec<String>;
}

const METRIC_HEADERS: [&str; 20] = [
    "clicks",
    "prints",
    "ctr",
    "cost",
    "cpc",
    "acos",
    "cvr",
    "roas",
    "sov",
    "units_quantity",
    "direct_units_quantity",
    "indirect_units_quantity",
    "organic_units_quantity",
    "direct_items_quantity",
    "indirect_items_quantity",
    "organic_items_quantity",
    "advertising_items_quantity",
    "direct_amount",
    "indirect_amount",
    "total_amount",
];

fn metric_values(m: &MetricBlock) -> Vec<String> {
    [
        m.clicks,
        m.prints,
        m.ctr,
        m.cost,
        m.cpc,
        m.acos,
        m.cvr,
        m.roas,
        m.sov,
        m.units_quantity,
        m.direct_units_quantity,
        m.indirect_units_quantity,
        m.organic_units_quantity,
        m.direct_items_quantity,
        m.indirect_items_quantity,
        m.organic_items_quantity,
        m.advertising_items_quantity,
        m.direct_amount,
        m.indirect_amount,
        m.total_amount,
    ]
    .iter()
    .map(|v| if v.is_nan() { String::new() } else { v.to_string() })
    .collect()
}

fn opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Performance columns shared by both listing tables.
const PERFORMANCE_HEADERS: [&str; 5] = [
    "health",
    "performance_score",
    "performance_level",
    "performance_level_wording",
    "pending_count",
];

fn performance_values(health: &str, record: &Option<PerformanceRecord>) -> Vec<String> {
    let mut values = vec![health.to_string()];
    match record {
        Some(p) => {
            values.push(opt(&p.score));
            values.push(p.level.clone());
            values.push(p.level_wording.clone());
            values.push(p.pending_count.to_string());
        }
        None => values.extend(std::iter::repeat(String::new()).take(4)),
    }
    values
}

impl TableRow for Campaign {
    fn headers() -> Vec<&'static str> {
        let mut headers = vec![
            "campaign_id",
            "name",
            "status",
            "budget",
            "currency_id",
            "strategy",
            "channel",
            "acos_target",
        ];
        headers.extend(METRIC_HEADERS);
        headers
    }

    fn values(&self) -> Vec<String> {
        let mut values = vec![
            self.campaign_id.clone(),
            self.name.clone(),
            self.status.clone(),
            opt(&self.budget),
            opt(&self.currency_id),
            opt(&self.strategy),
            opt(&self.channel),
            opt(&self.acos_target),
        ];
        values.extend(metric_values(&self.metrics));
        values
    }
}

impl TableRow for AdvertisedItem {
    fn headers() -> Vec<&'static str> {
        let mut headers = vec![
            "item_id",
            "campaign_id",
            "title",
            "status",
            "channel",
            "date_created",
            "listing_type_id",
            "buy_box_winner",
        ];
        headers.extend(METRIC_HEADERS);
        headers.extend(PERFORMANCE_HEADERS);
        headers
    }

    fn values(&self) -> Vec<String> {
        let mut values = vec![
            self.item_id.clone(),
            opt(&self.campaign_id),
            self.title.clone(),
            opt(&self.status),
            opt(&self.channel),
            opt(&self.date_created),
            opt(&self.listing_type_id),
            opt(&self.buy_box_winner),
        ];
        values.extend(metric_values(&self.metrics));
        values.extend(performance_values(self.health.as_str(), &self.performance));
        values
    }
}

impl TableRow for PotentialItem {
    fn headers() -> Vec<&'static str> {
        let mut headers = vec![
            "item_id",
            "title",
            "sold_quantity",
            "price",
            "brand",
            "free_shipping",
            "picture_count",
            "category_id",
            "domain_id",
            "listing_type_id",
            "date_created",
        ];
        headers.extend(PERFORMANCE_HEADERS);
        headers
    }

    fn values(&self) -> Vec<String> {
        let mut values = vec![
            self.item_id.clone(),
            self.title.clone(),
            self.sold_quantity.to_string(),
            self.price.to_string(),
            opt(&self.brand),
            self.free_shipping.to_string(),
            self.picture_count.to_string(),
            opt(&self.category_id),
            opt(&self.domain_id),
            opt(&self.listing_type_id),
            opt(&self.date_created),
        ];
        values.extend(performance_values(self.health.as_str(), &self.performance));
        values
    }
}

/// Write one scored table as CSV with a header row.
pub fn write_table<W, T>(writer: W, rows: &[ScoredEntity<T>]) -> ReportResult<()>
where
    W: std::io::Write,
    T: TableRow,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut headers = T::headers();
    headers.extend(["priority", "recommendations"]);
    csv_writer.write_record(&headers)?;

    for row in rows {
        let mut values = row.entity.values();
        values.push(row.priority.to_string());
        values.push(row.recommendations.clone());
        csv_writer.write_record(&values)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Destination for a finished report.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist the report and return the files written by this call.
    async fn emit(&self, report: &InsightReport) -> ReportResult<Vec<PathBuf>>;
}

/// Writes `<prefix>_campaigns.csv`, `<prefix>_advertised_items.csv`,
/// `<prefix>_potential_items.csv` and `<prefix>_thresholds.json`.
#[derive(Clone, Debug)]
pub struct CsvReportWriter {
    pub out_dir: PathBuf,
    pub prefix: String,
}

impl CsvReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.out_dir.join(format!("{}_{}.csv", self.prefix, table))
    }

    pub fn thresholds_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}_thresholds.json", self.prefix))
    }

    fn write_csv<T: TableRow>(&self, table: &str, rows: &[ScoredEntity<T>]) -> ReportResult<PathBuf> {
        let path = self.table_path(table);
        let file = File::create(&path).map_err(|e| ReportError::io(&path, e))?;
        write_table(file, rows)?;
        Ok(path)
    }

    /// Write all files synchronously and return their paths.
    pub fn write(&self, report: &InsightReport) -> ReportResult<Vec<PathBuf>> {
        ensure_dir(&self.out_dir)?;

        let mut written = vec![
            self.write_csv(CAMPAIGNS_TABLE, &report.campaigns)?,
            self.write_csv(ADVERTISED_ITEMS_TABLE, &report.advertised_items)?,
            self.write_csv(POTENTIAL_ITEMS_TABLE, &report.potential_items)?,
        ];

        let path = self.thresholds_path();
        let json = serde_json::to_string_pretty(&report.thresholds)?;
        fs::write(&path, json).map_err(|e| ReportError::io(&path, e))?;
        written.push(path);

        Ok(written)
    }
}

fn ensure_dir(dir: &Path) -> ReportResult<()> {
    fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))
}

/// File writes run on the blocking pool.
#[async_trait]
impl ReportSink for CsvReportWriter {
    async fn emit(&self, report: &InsightReport) -> ReportResult<Vec<PathBuf>> {
        let writer = self.clone();
        let owned = report.clone();
        let written = tokio::task::spawn_blocking(move || writer.write(&owned)).await??;
        log::info!(
            "request_id={} wrote {} report files to {}",
            report.request_id,
            written.len(),
            self.out_dir.display()
        );
        Ok(written)
    }
}
