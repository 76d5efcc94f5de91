use std::collections::HashSet;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::filter::{Filter, FilterResult};
use crate::types::{EntityCandidate, ReportQuery};

/// Keeps only the potential items that are not advertised yet.
///
/// A potential item is removed when an advertised item with the same id is
/// in the run, or when an earlier potential item already carried its id.
/// Campaigns and advertised items always pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvertisedOverlapFilter;

#[async_trait]
impl Filter<ReportQuery, EntityCandidate> for AdvertisedOverlapFilter {
    async fn filter(
        &self,
        _query: &ReportQuery,
        candidates: Vec<EntityCandidate>,
    ) -> Result<FilterResult<EntityCandidate>, String> {
        let mut seen: HashSet<String> = candidates
            .iter()
            .filter_map(|c| match &c.entity {
                Entity::AdvertisedItem(item) => Some(item.item_id.clone()),
                _ => None,
            })
            .collect();

        let (kept, removed): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|c| match &c.entity {
            Entity::PotentialItem(item) => seen.insert(item.item_id.clone()),
            _ => true,
        });

        Ok(FilterResult { kept, removed })
    }
}
