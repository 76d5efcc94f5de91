pub mod advertised_overlap_filter;
pub mod catalog_health_hydrator;
pub mod date_window_query_hydrator;
pub mod insight_scorer;
pub mod marketplace_source;
pub mod performance_hydrator;
pub mod priority_selector;
pub mod report_side_effect;
