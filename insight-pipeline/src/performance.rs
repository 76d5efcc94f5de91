//! Listing performance records and the health-based synthesizer.
//!
//! The marketplace exposes a quality/compliance assessment per listing. When
//! that lookup fails, the explicit health flag is mapped onto a synthetic
//! record so scoring never has to branch on a missing record.

use serde::{Deserialize, Serialize};

use crate::entity::HealthFlag;

/// Status value marking a bucket, variable or rule as unresolved.
pub const PENDING_STATUS: &str = "PENDING";

/// Resolved performance assessment for one listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// 0–100 quality score; `None` when neither performance nor health exists.
    pub score: Option<f64>,
    /// HEALTHY / WARNING / UNHEALTHY, a parenthesized unmapped value, or empty.
    pub level: String,
    /// Locale-dependent quality tier wording.
    pub level_wording: String,
    /// Number of PENDING nodes across buckets, variables and rules.
    pub pending_count: u32,
}

// ---------------------------------------------------------------------------
// Raw performance response
// ---------------------------------------------------------------------------

fn zero_score() -> Option<f64> {
    Some(0.0)
}

/// Performance payload as sent by the marketplace.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PerformanceResponse {
    /// A missing score counts as 0; an explicit `null` stays absent.
    #[serde(default = "zero_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub level_wording: Option<String>,
    #[serde(default)]
    pub buckets: Vec<PerformanceBucket>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PerformanceBucket {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub variables: Vec<PerformanceVariable>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PerformanceVariable {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rules: Vec<PerformanceRule>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PerformanceRule {
    #[serde(default)]
    pub status: Option<String>,
}

fn pending(status: &Option<String>) -> u32 {
    u32::from(status.as_deref() == Some(PENDING_STATUS))
}

impl PerformanceRule {
    pub fn pending_count(&self) -> u32 {
        pending(&self.status)
    }
}

impl PerformanceVariable {
    pub fn pending_count(&self) -> u32 {
        pending(&self.status)
            + self
                .rules
                .iter()
                .map(PerformanceRule::pending_count)
                .sum::<u32>()
    }
}

impl PerformanceBucket {
    pub fn pending_count(&self) -> u32 {
        pending(&self.status)
            + self
                .variables
                .iter()
                .map(PerformanceVariable::pending_count)
                .sum::<u32>()
    }
}

impl PerformanceResponse {
    /// Total PENDING nodes over the bucket → variable → rule tree.
    pub fn pending_count(&self) -> u32 {
        self.buckets
            .iter()
            .map(PerformanceBucket::pending_count)
            .sum()
    }

    pub fn into_record(self) -> PerformanceRecord {
        let pending_count = self.pending_count();
        PerformanceRecord {
            score: self.score,
            level: self.level.unwrap_or_default(),
            level_wording: self.level_wording.unwrap_or_default(),
            pending_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Build a stand-in performance record from the explicit health flag.
pub fn synthesize(health: &HealthFlag) -> PerformanceRecord {
    let (score, level, level_wording, pending_count) = match health {
        HealthFlag::Healthy => (Some(80.0), "HEALTHY".to_string(), "good exposure standing", 0),
        HealthFlag::Warning => (Some(40.0), "WARNING".to_string(), "may lose exposure", 1),
        HealthFlag::Unhealthy => (Some(20.0), "UNHEALTHY".to_string(), "losing exposure", 2),
        HealthFlag::Other(raw) => (Some(0.0), format!("({raw})"), "unmapped health value", 0),
        HealthFlag::Absent => (
            None,
            String::new(),
            "no performance and no health data",
            0,
        ),
    };

    PerformanceRecord {
        score,
        level,
        level_wording: level_wording.to_string(),
        pending_count,
    }
}

/// Keep a fetched record, or fall back to the health-based synthesis.
pub fn resolve_performance(
    fetched: Option<PerformanceRecord>,
    health: &HealthFlag,
) -> PerformanceRecord {
    fetched.unwrap_or_else(|| synthesize(health))
}
