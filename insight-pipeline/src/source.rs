use async_trait::async_trait;

use crate::util;

/// Sources pull the raw candidate populations for a query.
#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Whether this population is collected for the query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Collect this source's candidates. An error drops only this source's
    /// population; the other sources still contribute.
    async fn get_candidates(&self, query: &Q) -> Result<Vec<C>, String>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
