//! Product Ads insight pipeline.
//!
//! Scores a seller's advertising campaigns, advertised listings and
//! not-yet-advertised listings, and turns the result into prioritized
//! recommendation tables.
//!
//! The core is pure and synchronous:
//! - `performance` reconciles the health flag with performance records
//! - `thresholds` derives decision cutoffs from the observed metrics
//! - `insight_engine` runs the per-kind rule lists
//!
//! Everything around it is a candidate pipeline (query hydrators, sources,
//! filters, hydrators, scorers, selector, side effects) talking to the
//! marketplace through the traits in `collector`.

pub mod candidate_pipeline;
pub mod collector;
pub mod components;
pub mod entity;
pub mod error;
pub mod filter;
pub mod hydrator;
pub mod insight_engine;
pub mod performance;
pub mod pipelines;
pub mod query_hydrator;
pub mod ranking;
pub mod report;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod thresholds;
pub mod types;
pub mod util;

pub use candidate_pipeline::{CandidatePipeline, PipelineResult};
pub use entity::{AdvertisedItem, Campaign, Entity, EntityKind, HealthFlag, ItemDetail, MetricBlock, PotentialItem};
pub use error::{ReportError, ReportResult};
pub use performance::{PerformanceRecord, PerformanceResponse};
pub use pipelines::product_ads_report::{PipelineDeps, ProductAdsReportPipeline};
pub use report::{CsvReportWriter, InsightReport, ReportSink};
pub use thresholds::Thresholds;
pub use types::{DateRange, EntityCandidate, ReportQuery};
