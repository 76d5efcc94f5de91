use async_trait::async_trait;
use std::sync::Arc;

use crate::candidate_pipeline::CandidatePipeline;
use crate::collector::{DetailResolver, EntityCollector, PerformanceResolver};
use crate::components::advertised_overlap_filter::AdvertisedOverlapFilter;
use crate::components::catalog_health_hydrator::CatalogHealthHydrator;
use crate::components::date_window_query_hydrator::DateWindowQueryHydrator;
use crate::components::insight_scorer::InsightScorer;
use crate::components::marketplace_source::MarketplaceSource;
use crate::components::performance_hydrator::{PerformanceHydrator, DEFAULT_PERFORMANCE_CONCURRENCY};
use crate::components::priority_selector::PrioritySelector;
use crate::components::report_side_effect::ReportSideEffect;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::report::ReportSink;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{EntityCandidate, ReportQuery};

/// The Product Ads insight report pipeline.
///
/// Pipeline flow:
/// 1. DateWindowQueryHydrator resolves the metrics window
/// 2. MarketplaceSource pulls campaigns, advertised items and active listings
/// 3. AdvertisedOverlapFilter drops listings that are already advertised
/// 4. CatalogHealthHydrator attaches catalog fields and health
/// 5. PerformanceHydrator attaches (or synthesizes) performance records
/// 6. InsightScorer derives thresholds and runs the rule engine
/// 7. PrioritySelector sorts by priority
/// 8. ReportSideEffect emits the three tables, when a sink is configured
pub struct ProductAdsReportPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<ReportQuery>>>,
    sources: Vec<Box<dyn Source<ReportQuery, EntityCandidate>>>,
    filters: Vec<Box<dyn Filter<ReportQuery, EntityCandidate>>>,
    hydrators: Vec<Box<dyn Hydrator<ReportQuery, EntityCandidate>>>,
    scorers: Vec<Box<dyn Scorer<ReportQuery, EntityCandidate>>>,
    selector: PrioritySelector,
    side_effects: Arc<Vec<Box<dyn SideEffect<ReportQuery, EntityCandidate>>>>,
}

/// Collaborators and knobs for building a [`ProductAdsReportPipeline`].
pub struct PipelineDeps {
    pub collector: Arc<dyn EntityCollector>,
    pub details: Arc<dyn DetailResolver>,
    pub performance: Arc<dyn PerformanceResolver>,
    pub sink: Option<Arc<dyn ReportSink>>,
    pub performance_concurrency: usize,
    pub date_window: DateWindowQueryHydrator,
}

impl PipelineDeps {
    pub fn new(
        collector: Arc<dyn EntityCollector>,
        details: Arc<dyn DetailResolver>,
        performance: Arc<dyn PerformanceResolver>,
    ) -> Self {
        Self {
            collector,
            details,
            performance,
            sink: None,
            performance_concurrency: DEFAULT_PERFORMANCE_CONCURRENCY,
            date_window: DateWindowQueryHydrator::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.performance_concurrency = concurrency;
        self
    }

    pub fn with_date_window(mut self, date_window: DateWindowQueryHydrator) -> Self {
        self.date_window = date_window;
        self
    }
}

impl ProductAdsReportPipeline {
    pub fn new(deps: PipelineDeps) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<ReportQuery>>> =
            vec![Box::new(deps.date_window)];

        let sources: Vec<Box<dyn Source<ReportQuery, EntityCandidate>>> =
            vec![Box::new(MarketplaceSource::new(deps.collector))];

        let filters: Vec<Box<dyn Filter<ReportQuery, EntityCandidate>>> =
            vec![Box::new(AdvertisedOverlapFilter)];

        // Order matters: performance synthesis reads the health flag.
        let hydrators: Vec<Box<dyn Hydrator<ReportQuery, EntityCandidate>>> = vec![
            Box::new(CatalogHealthHydrator::new(deps.details)),
            Box::new(PerformanceHydrator::with_concurrency(
                deps.performance,
                deps.performance_concurrency,
            )),
        ];

        let scorers: Vec<Box<dyn Scorer<ReportQuery, EntityCandidate>>> =
            vec![Box::new(InsightScorer)];

        let mut side_effects: Vec<Box<dyn SideEffect<ReportQuery, EntityCandidate>>> = Vec::new();
        if let Some(sink) = deps.sink {
            side_effects.push(Box::new(ReportSideEffect::new(sink)));
        }

        Self {
            query_hydrators,
            sources,
            filters,
            hydrators,
            scorers,
            selector: PrioritySelector,
            side_effects: Arc::new(side_effects),
        }
    }
}

#[async_trait]
impl CandidatePipeline<ReportQuery, EntityCandidate> for ProductAdsReportPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<ReportQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<ReportQuery, EntityCandidate>>] {
        &self.sources
    }

    fn filters(&self) -> &[Box<dyn Filter<ReportQuery, EntityCandidate>>] {
        &self.filters
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<ReportQuery, EntityCandidate>>] {
        &self.hydrators
    }

    fn scorers(&self) -> &[Box<dyn Scorer<ReportQuery, EntityCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<ReportQuery, EntityCandidate> {
        &self.selector
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<ReportQuery, EntityCandidate>>>> {
        Arc::clone(&self.side_effects)
    }
}
