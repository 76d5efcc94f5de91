use std::cmp::Reverse;

use crate::util;

/// Selectors order the scored candidates and optionally cap the result.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Primary sort key, descending.
    fn priority(&self, candidate: &C) -> u32;

    /// Secondary sort key, ascending. Ties on both keys keep input order.
    fn tie_break(&self, candidate: &C) -> usize;

    /// Stable sort by priority descending, then tie-break ascending.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by_key(|c| (Reverse(self.priority(c)), self.tie_break(c)));
        sorted
    }

    /// Maximum number of candidates to keep. `None` keeps everything.
    fn size(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
