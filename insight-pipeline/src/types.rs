use serde::Serialize;

use crate::candidate_pipeline::HasRequestId;
use crate::entity::{Entity, EntityKind};

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Report date window, formatted `YYYY-MM-DD`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub date_from: String,
    pub date_to: String,
}

impl DateRange {
    pub fn new(date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        Self {
            date_from: date_from.into(),
            date_to: date_to.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.date_from.is_empty() && !self.date_to.is_empty()
    }
}

/// One report run for one seller.
#[derive(Clone, Debug)]
pub struct ReportQuery {
    pub request_id: String,
    pub seller_id: String,
    /// Metrics window. Left empty to be resolved from `window_days`.
    pub date_range: DateRange,
    pub window_days: u32,
}

impl ReportQuery {
    pub fn new(request_id: impl Into<String>, seller_id: impl Into<String>, window_days: u32) -> Self {
        Self {
            request_id: request_id.into(),
            seller_id: seller_id.into(),
            date_range: DateRange::default(),
            window_days,
        }
    }
}

impl HasRequestId for ReportQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// An entity with its scoring output.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EntityCandidate {
    /// Position in fetch order across all populations; the tie-break key
    /// after sorting by priority.
    pub ordinal: usize,
    pub entity: Entity,

    // Scoring fields (populated by scorers)
    pub priority: u32,
    pub recommendations: Vec<String>,
}

impl EntityCandidate {
    pub fn new(ordinal: usize, entity: Entity) -> Self {
        Self {
            ordinal,
            entity,
            priority: 0,
            recommendations: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}
