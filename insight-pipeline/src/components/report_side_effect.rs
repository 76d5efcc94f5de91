use async_trait::async_trait;
use std::sync::Arc;

use crate::report::{InsightReport, ReportSink};
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{EntityCandidate, ReportQuery};

/// Builds the three report tables from the selected candidates and hands
/// them to a sink.
pub struct ReportSideEffect {
    sink: Arc<dyn ReportSink>,
}

impl ReportSideEffect {
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl SideEffect<ReportQuery, EntityCandidate> for ReportSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<ReportQuery, EntityCandidate>>,
    ) -> Result<(), String> {
        let report = InsightReport::from_candidates(&input.query, &input.selected_candidates);
        log::info!(
            "request_id={} emitting report campaigns={} advertised={} potential={}",
            report.request_id,
            report.campaigns.len(),
            report.advertised_items.len(),
            report.potential_items.len()
        );
        let written = self.sink.emit(&report).await.map_err(|e| e.to_string())?;
        log::debug!("request_id={} sink wrote {} files", report.request_id, written.len());
        Ok(())
    }
}
