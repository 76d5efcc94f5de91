use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::collector::PerformanceResolver;
use crate::hydrator::Hydrator;
use crate::performance::resolve_performance;
use crate::types::{EntityCandidate, ReportQuery};
use crate::util;

/// Default ceiling on in-flight performance lookups.
pub const DEFAULT_PERFORMANCE_CONCURRENCY: usize = 8;

/// Attaches a performance record to every listing.
///
/// Lookups run with at most `concurrency` requests in flight and complete in
/// any order; results are keyed by item id. A failed lookup falls back to a
/// record synthesized from the listing's health flag, so this hydrator must
/// run after the catalog hydrator.
pub struct PerformanceHydrator {
    resolver: Arc<dyn PerformanceResolver>,
    concurrency: usize,
}

impl PerformanceHydrator {
    pub fn new(resolver: Arc<dyn PerformanceResolver>) -> Self {
        Self::with_concurrency(resolver, DEFAULT_PERFORMANCE_CONCURRENCY)
    }

    pub fn with_concurrency(resolver: Arc<dyn PerformanceResolver>, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }
}

#[async_trait]
impl Hydrator<ReportQuery, EntityCandidate> for PerformanceHydrator {
    async fn hydrate(
        &self,
        query: &ReportQuery,
        candidates: &[EntityCandidate],
    ) -> Result<Vec<EntityCandidate>, String> {
        let ids = util::unique_in_order(candidates.iter().filter_map(|c| c.entity.item_id()));
        let requested = ids.len();

        let fetched: HashMap<String, _> = stream::iter(ids)
            .map(|id| async move {
                let record = self.resolver.performance(&id).await;
                (id, record)
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|(id, record)| async move { record.map(|r| (id, r)) })
            .collect()
            .await;

        log::info!(
            "request_id={} performance fetched={} synthesized={}",
            query.request_id,
            fetched.len(),
            requested - fetched.len()
        );

        let hydrated = candidates
            .iter()
            .map(|c| {
                let mut entity = c.entity.clone();
                if let Some(id) = entity.item_id() {
                    let record = resolve_performance(fetched.get(id).cloned(), entity.health());
                    entity.set_performance(record);
                }
                EntityCandidate {
                    entity,
                    ..EntityCandidate::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut EntityCandidate, hydrated: EntityCandidate) {
        candidate.entity = hydrated.entity;
    }
}
