//! Dynamic decision thresholds for the insight rules.
//!
//! Thresholds are derived once per report run from the pooled metrics of all
//! campaigns and advertised items: the median of each metric, scaled by a
//! fixed multiplier. Changing a multiplier here shifts every rule in
//! `insight_engine.rs` that compares against it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::entity::{Entity, MetricBlock};
use crate::types::EntityCandidate;

/// ACOS median multiplier (tolerate 20% above the typical cost of sale).
pub const ACOS_MULTIPLIER: f64 = 1.2;
/// ROAS median multiplier.
pub const ROAS_MULTIPLIER: f64 = 0.8;
/// CTR median multiplier.
pub const CTR_MULTIPLIER: f64 = 0.8;
/// CVR median multiplier.
pub const CVR_MULTIPLIER: f64 = 0.8;
/// CPC median multiplier.
pub const CPC_MULTIPLIER: f64 = 1.2;

/// Unit-sales cutoff for best-seller treatment. Not derived from data.
pub const BEST_SELLER_THRESHOLD: f64 = 80.0;

pub const DEFAULT_ACOS_BENCHMARK: f64 = 10.0;
pub const DEFAULT_ROI_THRESHOLD: f64 = 2.0;
pub const DEFAULT_CTR_THRESHOLD: f64 = 1.0;
pub const DEFAULT_CVR_THRESHOLD: f64 = 1.0;
pub const DEFAULT_CPC_THRESHOLD: f64 = 2.0;

/// The six cutoffs used by the insight rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Thresholds {
    pub acos_benchmark: f64,
    pub roi_threshold: f64,
    pub ctr_threshold: f64,
    pub cvr_threshold: f64,
    pub cpc_threshold: f64,
    pub best_seller_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            acos_benchmark: DEFAULT_ACOS_BENCHMARK,
            roi_threshold: DEFAULT_ROI_THRESHOLD,
            ctr_threshold: DEFAULT_CTR_THRESHOLD,
            cvr_threshold: DEFAULT_CVR_THRESHOLD,
            cpc_threshold: DEFAULT_CPC_THRESHOLD,
            best_seller_threshold: BEST_SELLER_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Compute thresholds from a pool of metric blocks.
    ///
    /// An empty pool yields the default table.
    pub fn from_metrics<'a, I>(pool: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricBlock>,
    {
        let pool: Vec<&MetricBlock> = pool.into_iter().collect();
        if pool.is_empty() {
            return Self::default();
        }

        let column = |select: fn(&MetricBlock) -> f64| median(pool.iter().copied().map(select));

        Self {
            acos_benchmark: scale(column(|m| m.acos), ACOS_MULTIPLIER),
            roi_threshold: scale(column(|m| m.roas), ROAS_MULTIPLIER),
            ctr_threshold: scale(column(|m| m.ctr), CTR_MULTIPLIER),
            cvr_threshold: scale(column(|m| m.cvr), CVR_MULTIPLIER),
            cpc_threshold: scale(column(|m| m.cpc), CPC_MULTIPLIER),
            best_seller_threshold: BEST_SELLER_THRESHOLD,
        }
    }

    /// Pool campaign and advertised-item metrics into one sample set.
    pub fn from_pool<'a, C, A>(campaign_metrics: C, advertised_metrics: A) -> Self
    where
        C: IntoIterator<Item = &'a MetricBlock>,
        A: IntoIterator<Item = &'a MetricBlock>,
    {
        Self::from_metrics(campaign_metrics.into_iter().chain(advertised_metrics))
    }

    /// Pool the metrics of every campaign and advertised item in the run.
    pub fn from_candidates(candidates: &[EntityCandidate]) -> Self {
        Self::from_metrics(candidates.iter().filter_map(|c| match &c.entity {
            Entity::Campaign(_) | Entity::AdvertisedItem(_) => c.entity.metrics(),
            Entity::PotentialItem(_) => None,
        }))
    }
}

/// Median of the present (non-NaN) samples; 0 when none are present.
///
/// Even counts average the two middle values.
pub fn median<I>(samples: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut values: Vec<f64> = samples.into_iter().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Scale a median; non-positive medians fall back to the multiplier itself.
fn scale(median: f64, multiplier: f64) -> f64 {
    if median > 0.0 {
        median * multiplier
    } else {
        multiplier
    }
}
