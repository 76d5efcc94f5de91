use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};

use crate::query_hydrator::QueryHydrator;
use crate::types::{DateRange, ReportQuery};

/// Date format expected by the marketplace metrics endpoints.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves an empty date range to the trailing `window_days` ending today.
///
/// A query that already carries both dates is left alone.
#[derive(Clone, Debug, Default)]
pub struct DateWindowQueryHydrator {
    /// Pinned "today" for reproducible runs; local date when `None`.
    pub today: Option<NaiveDate>,
}

impl DateWindowQueryHydrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    pub fn window(today: NaiveDate, window_days: u32) -> DateRange {
        let from = today - Duration::days(i64::from(window_days));
        DateRange::new(
            from.format(DATE_FORMAT).to_string(),
            today.format(DATE_FORMAT).to_string(),
        )
    }
}

#[async_trait]
impl QueryHydrator<ReportQuery> for DateWindowQueryHydrator {
    fn enable(&self, query: &ReportQuery) -> bool {
        !query.date_range.is_resolved()
    }

    async fn hydrate(&self, query: &ReportQuery) -> Result<ReportQuery, String> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        Ok(ReportQuery {
            date_range: Self::window(today, query.window_days),
            ..query.clone()
        })
    }

    fn update(&self, query: &mut ReportQuery, hydrated: ReportQuery) {
        query.date_range = hydrated.date_range;
    }
}
