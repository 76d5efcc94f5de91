use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries expose a request id so every stage can tag its log lines.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a pipeline run produced.
#[derive(Clone, Debug)]
pub struct PipelineResult<Q, C> {
    pub query: Arc<Q>,
    /// Candidates as returned by the sources, before filtering.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by the filters.
    pub filtered_candidates: Vec<C>,
    /// Scored candidates in final order.
    pub selected_candidates: Vec<C>,
}

/// A candidate pipeline wires concrete components into the fixed stage order:
///
/// 1. query hydrators (concurrently)
/// 2. sources (concurrently, results concatenated in declaration order)
/// 3. filters (sequentially)
/// 4. hydrators (sequentially; later hydrators see earlier results)
/// 5. scorers (sequentially)
/// 6. selector
/// 7. side effects (sequentially, after selection)
///
/// A failing stage is logged and skipped: the candidates it would have
/// touched pass through unchanged.
#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;

    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let query = self.hydrate_query(query).await;

        let retrieved_candidates = self.fetch_candidates(&query).await;
        let (kept, filtered_candidates) = self.filter(&query, retrieved_candidates.clone()).await;
        let hydrated = self.hydrate(&query, kept).await;
        let scored = self.score(&query, hydrated).await;
        let selected_candidates = self.select(&query, scored);

        log::info!(
            "request_id={} pipeline done retrieved={} filtered={} selected={}",
            query.request_id(),
            retrieved_candidates.len(),
            filtered_candidates.len(),
            selected_candidates.len()
        );

        let query = Arc::new(query);
        let input = Arc::new(SideEffectInput {
            query: Arc::clone(&query),
            selected_candidates: selected_candidates.clone(),
        });
        self.run_side_effects(input).await;

        PipelineResult {
            query,
            retrieved_candidates,
            filtered_candidates,
            selected_candidates,
        }
    }

    async fn hydrate_query(&self, mut query: Q) -> Q {
        let hydrators: Vec<_> = self
            .query_hydrators()
            .iter()
            .filter(|h| h.enable(&query))
            .collect();
        let results = join_all(hydrators.iter().map(|h| h.hydrate(&query))).await;

        for (hydrator, result) in hydrators.iter().zip(results) {
            match result {
                Ok(hydrated) => hydrator.update(&mut query, hydrated),
                Err(err) => log::warn!(
                    "request_id={} query_hydrator={} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        query
    }

    async fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let sources: Vec<_> = self.sources().iter().filter(|s| s.enable(query)).collect();
        let results = join_all(sources.iter().map(|s| s.get_candidates(query))).await;

        let mut candidates = Vec::new();
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(found) => {
                    log::debug!(
                        "request_id={} source={} fetched={}",
                        query.request_id(),
                        source.name(),
                        found.len()
                    );
                    candidates.extend(found);
                }
                Err(err) => log::warn!(
                    "request_id={} source={} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        candidates
    }

    async fn filter(&self, query: &Q, candidates: Vec<C>) -> (Vec<C>, Vec<C>) {
        let mut kept = candidates;
        let mut removed = Vec::new();

        for filter in self.filters().iter().filter(|f| f.enable(query)) {
            let backup = kept.clone();
            match filter.filter(query, kept).await {
                Ok(result) => {
                    kept = result.kept;
                    removed.extend(result.removed);
                }
                Err(err) => {
                    log::warn!(
                        "request_id={} filter={} failed: {}",
                        query.request_id(),
                        filter.name(),
                        err
                    );
                    kept = backup;
                }
            }
        }
        (kept, removed)
    }

    async fn hydrate(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut candidates = candidates;
        for hydrator in self.hydrators().iter().filter(|h| h.enable(query)) {
            match hydrator.hydrate(query, &candidates).await {
                Ok(hydrated) if hydrated.len() == candidates.len() => {
                    hydrator.update_all(&mut candidates, hydrated);
                }
                Ok(hydrated) => log::warn!(
                    "request_id={} hydrator={} length mismatch expected={} got={}",
                    query.request_id(),
                    hydrator.name(),
                    candidates.len(),
                    hydrated.len()
                ),
                Err(err) => log::warn!(
                    "request_id={} hydrator={} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        candidates
    }

    async fn score(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut candidates = candidates;
        for scorer in self.scorers().iter().filter(|s| s.enable(query)) {
            match scorer.score(query, &candidates).await {
                Ok(scored) if scored.len() == candidates.len() => {
                    scorer.update_all(&mut candidates, scored);
                }
                Ok(scored) => log::warn!(
                    "request_id={} scorer={} length mismatch expected={} got={}",
                    query.request_id(),
                    scorer.name(),
                    candidates.len(),
                    scored.len()
                ),
                Err(err) => log::warn!(
                    "request_id={} scorer={} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    err
                ),
            }
        }
        candidates
    }

    fn select(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let selector = self.selector();
        if selector.enable(query) {
            selector.select(query, candidates)
        } else {
            candidates
        }
    }

    async fn run_side_effects(&self, input: Arc<SideEffectInput<Q, C>>) {
        let side_effects = self.side_effects();
        for side_effect in side_effects.iter() {
            if !side_effect.enable(Arc::clone(&input.query)) {
                continue;
            }
            if let Err(err) = side_effect.run(Arc::clone(&input)).await {
                log::warn!(
                    "request_id={} side_effect={} failed: {}",
                    input.query.request_id(),
                    side_effect.name(),
                    err
                );
            }
        }
    }
}
