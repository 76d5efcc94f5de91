use async_trait::async_trait;

use crate::util;

/// Hydrators enrich candidates with data from external lookups.
///
/// They run one after another, so a hydrator may rely on fields filled in
/// by the hydrators declared before it.
#[async_trait]
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Return one hydrated candidate per input candidate, in input order.
    async fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the fields this hydrator owns from `hydrated` into `candidate`.
    fn update(&self, candidate: &mut C, hydrated: C);

    fn update_all(&self, candidates: &mut [C], hydrated: Vec<C>) {
        for (candidate, hydrated) in candidates.iter_mut().zip(hydrated) {
            self.update(candidate, hydrated);
        }
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
