use std::collections::HashSet;

/// Extract a short type name from the full module path.
///
/// Given `"insight_pipeline::components::InsightScorer"`, returns `"InsightScorer"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Deduplicate ids while keeping the first-seen order.
pub fn unique_in_order<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_module_path() {
        assert_eq!(short_type_name("a::b::PrioritySelector"), "PrioritySelector");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let ids = unique_in_order(["MLB2", "MLB1", "MLB2", "MLB3", "MLB1"]);
        assert_eq!(ids, vec!["MLB2", "MLB1", "MLB3"]);
    }
}
