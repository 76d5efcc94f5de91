use std::sync::Arc;

use async_trait::async_trait;

use crate::collector::DetailResolver;
use crate::entity::Entity;
use crate::hydrator::Hydrator;
use crate::types::{EntityCandidate, ReportQuery};
use crate::util;

/// Attaches catalog attributes and the health flag to listings.
///
/// Potential items receive every catalog field; advertised items only take
/// the health flag, their other fields come from the ads report. Listings
/// the resolver does not know keep their defaults.
pub struct CatalogHealthHydrator {
    resolver: Arc<dyn DetailResolver>,
}

impl CatalogHealthHydrator {
    pub fn new(resolver: Arc<dyn DetailResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Hydrator<ReportQuery, EntityCandidate> for CatalogHealthHydrator {
    async fn hydrate(
        &self,
        query: &ReportQuery,
        candidates: &[EntityCandidate],
    ) -> Result<Vec<EntityCandidate>, String> {
        let ids = util::unique_in_order(candidates.iter().filter_map(|c| c.entity.item_id()));
        let details = self.resolver.item_details(&ids).await?;

        log::info!(
            "request_id={} resolved {} of {} listing details",
            query.request_id,
            details.len(),
            ids.len()
        );

        let hydrated = candidates
            .iter()
            .map(|c| {
                let mut entity = c.entity.clone();
                if let Some(detail) = entity.item_id().and_then(|id| details.get(id)) {
                    match &mut entity {
                        Entity::PotentialItem(item) => item.apply_detail(detail),
                        Entity::AdvertisedItem(item) => item.health = detail.health.clone(),
                        Entity::Campaign(_) => {}
                    }
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
