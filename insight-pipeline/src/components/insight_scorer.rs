use async_trait::async_trait;

use crate::insight_engine;
use crate::scorer::Scorer;
use crate::thresholds::Thresholds;
use crate::types::{EntityCandidate, ReportQuery};

/// Runs the rule engine over every candidate.
///
/// Thresholds are computed once from the pooled campaign and advertised
/// item metrics of the whole candidate set, then shared read-only by all
/// evaluations.
#[derive(Clone, Copy, Debug, Default)]
pub struct InsightScorer;

#[async_trait]
impl Scorer<ReportQuery, EntityCandidate> for InsightScorer {
    async fn score(
        &self,
        query: &ReportQuery,
        candidates: &[EntityCandidate],
    ) -> Result<Vec<EntityCandidate>, String> {
        let thresholds = Thresholds::from_candidates(candidates);
        log::info!(
            "request_id={} thresholds acos={:.2} roi={:.2} ctr={:.2} cvr={:.2} cpc={:.2} best_seller={:.0}",
            query.request_id,
            thresholds.acos_benchmark,
            thresholds.roi_threshold,
            thresholds.ctr_threshold,
            thresholds.cvr_threshold,
            thresholds.cpc_threshold,
            thresholds.best_seller_threshold
        );

        let scored = candidates
            .iter()
            .map(|c| {
                let insight = insight_engine::evaluate(&c.entity, &thresholds);
                EntityCandidate {
                    priority: insight.priority,
                    recommendations: insight.recommendations,
                    ..EntityCandidate::default()
                }
            })
            .collect();
        Ok(scored)
    }

    /// Priority only accumulates.
    fn update(&self, candidate: &mut EntityCandidate, scored: EntityCandidate) {
        candidate.priority += scored.priority;
        candidate.recommendations.extend(scored.recommendations);
    }
}
