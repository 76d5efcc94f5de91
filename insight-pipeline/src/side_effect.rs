use async_trait::async_trait;
use std::sync::Arc;

use crate::util;

/// What a side effect gets to see once selection is final.
#[derive(Clone, Debug)]
pub struct SideEffectInput<Q, C> {
    pub query: Arc<Q>,
    pub selected_candidates: Vec<C>,
}

/// Post-selection action such as emitting the report. Side effects never
/// change the pipeline result.
#[async_trait]
pub trait SideEffect<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Whether this action runs for the query.
    fn enable(&self, _query: Arc<Q>) -> bool {
        true
    }

    /// Act on the selected candidates. A failure is logged and the next
    /// side effect still runs.
    async fn run(&self, input: Arc<SideEffectInput<Q, C>>) -> Result<(), String>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
