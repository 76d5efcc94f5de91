//! Full report run over the sample dumps in `fixtures/sample`.

use std::path::PathBuf;
use std::sync::Arc;

use insight_market::FixtureStore;
use insight_pipeline::candidate_pipeline::CandidatePipeline;
use insight_pipeline::entity::Entity;
use insight_pipeline::{
    CsvReportWriter, InsightReport, PipelineDeps, ProductAdsReportPipeline, ReportQuery,
};

fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures/sample")
}

fn find<'a>(report: &'a InsightReport, id: &str) -> (u32, &'a str) {
    report
        .potential_items
        .iter()
        .find(|row| row.entity.item_id == id)
        .map(|row| (row.priority, row.recommendations.as_str()))
        .unwrap_or_else(|| panic!("{id} missing from potential items"))
}

#[tokio::test]
async fn sample_dumps_produce_three_sorted_tables() {
    let store = Arc::new(FixtureStore::load(&sample_dir()).unwrap());
    let out = tempfile::tempdir().unwrap();
    let writer = CsvReportWriter::new(out.path(), "sample");

    let pipeline = ProductAdsReportPipeline::new(
        PipelineDeps::new(store.clone(), store.clone(), store)
            .with_concurrency(2)
            .with_sink(Arc::new(writer.clone())),
    );
    let result = pipeline
        .execute(ReportQuery::new("fixture-run", "offline", 30))
        .await;

    assert!(result.query.date_range.is_resolved());
    assert_eq!(result.retrieved_candidates.len(), 10);
    assert_eq!(result.filtered_candidates.len(), 2);
    assert_eq!(result.selected_candidates.len(), 8);

    let priorities: Vec<u32> = result.selected_candidates.iter().map(|c| c.priority).collect();
    assert!(priorities.windows(2).all(|w| w[0] >= w[1]));

    let report = InsightReport::from_candidates(&result.query, &result.selected_candidates);
    assert_eq!(report.campaigns.len(), 3);
    assert_eq!(report.advertised_items.len(), 2);
    assert_eq!(report.potential_items.len(), 3);

    let paused = report
        .campaigns
        .iter()
        .find(|row| row.entity.name == "Teste")
        .unwrap();
    assert!(paused.recommendations.contains("Rename campaign"));

    let (_, missing) = find(&report, "MLB2003");
    assert!(missing.contains("Price missing or zero. Fix before Ads."));
    assert!(missing.contains("No brand."));

    let (_, tape) = find(&report, "MLB2002");
    assert!(tape.starts_with("Item losing exposure (unhealthy). Fix required!"));

    for path in [
        writer.table_path("campaigns"),
        writer.table_path("advertised_items"),
        writer.table_path("potential_items"),
        writer.thresholds_path(),
    ] {
        assert!(path.exists(), "{} not written", path.display());
    }
}

#[tokio::test]
async fn fetched_and_synthesized_performance_both_attach() {
    let store = Arc::new(FixtureStore::load(&sample_dir()).unwrap());
    let pipeline =
        ProductAdsReportPipeline::new(PipelineDeps::new(store.clone(), store.clone(), store));
    let result = pipeline
        .execute(ReportQuery::new("fixture-perf", "offline", 30))
        .await;

    let performance_of = |id: &str| {
        result
            .selected_candidates
            .iter()
            .find(|c| c.entity.item_id() == Some(id))
            .and_then(|c| c.entity.performance().cloned())
            .unwrap_or_else(|| panic!("{id} has no performance record"))
    };

    let saw = performance_of("MLB2001");
    assert_eq!(saw.score, Some(62.0));
    assert_eq!(saw.pending_count, 3);

    let wrench_set = performance_of("MLB1002");
    assert_eq!(wrench_set.score, Some(40.0));
    assert_eq!(wrench_set.level, "WARNING");

    let unknown = performance_of("MLB2003");
    assert_eq!(unknown.score, None);

    assert!(result
        .selected_candidates
        .iter()
        .all(|c| !matches!(c.entity, Entity::Campaign(_)) || c.entity.performance().is_none()));
}
