use async_trait::async_trait;

use crate::util;

/// Query hydrators resolve query fields before any candidate is fetched.
/// They run concurrently; each one owns a disjoint set of query fields.
#[async_trait]
pub trait QueryHydrator<Q>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
{
    /// Whether this hydrator resolves anything for the query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Return a copy of the query with this hydrator's fields resolved.
    async fn hydrate(&self, query: &Q) -> Result<Q, String>;

    /// Copy only the fields this hydrator owns.
    fn update(&self, query: &mut Q, hydrated: Q);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
