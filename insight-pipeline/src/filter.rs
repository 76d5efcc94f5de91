use async_trait::async_trait;

use crate::util;

/// Partition of a candidate set.
#[derive(Clone, Debug, Default)]
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Filters drop candidates that must not reach hydration or scoring.
///
/// They run before the hydrators, so no lookup is ever spent on a removed
/// candidate.
#[async_trait]
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Whether this filter applies to the query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Split `candidates` into kept and removed, preserving relative order
    /// within each side.
    async fn filter(&self, query: &Q, candidates: Vec<C>) -> Result<FilterResult<C>, String>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
