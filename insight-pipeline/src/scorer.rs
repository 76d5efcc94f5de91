use async_trait::async_trait;

use crate::util;

/// Scorers attach priority and recommendations to candidates.
///
/// A scorer sees the whole candidate set at once, so it may derive
/// run-wide statistics before scoring individual candidates.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Return one scored candidate per input candidate, in input order.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the scoring fields from `scored` into `candidate`.
    fn update(&self, candidate: &mut C, scored: C);

    fn update_all(&self, candidates: &mut [C], scored: Vec<C>) {
        for (candidate, scored) in candidates.iter_mut().zip(scored) {
            self.update(candidate, scored);
        }
    }

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
