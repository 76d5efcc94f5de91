use crate::selector::Selector;
use crate::types::{EntityCandidate, ReportQuery};

/// Orders candidates by priority, highest first; equal priorities keep
/// fetch order. Nothing is truncated.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrioritySelector;

impl Selector<ReportQuery, EntityCandidate> for PrioritySelector {
    fn priority(&self, candidate: &EntityCandidate) -> u32 {
        candidate.priority
    }

    fn tie_break(&self, candidate: &EntityCandidate) -> usize {
        candidate.ordinal
    }
}
