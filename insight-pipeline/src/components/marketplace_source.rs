use std::sync::Arc;

use async_trait::async_trait;

use crate::collector::EntityCollector;
use crate::entity::{Entity, PotentialItem};
use crate::source::Source;
use crate::types::{EntityCandidate, ReportQuery};

/// Pulls campaigns, advertised items and active listing ids from a collector.
///
/// Candidates are numbered in fetch order: campaigns first, then advertised
/// items, then every active listing as a potential item. A population that
/// fails to load is logged and left out; the other two still flow.
pub struct MarketplaceSource {
    collector: Arc<dyn EntityCollector>,
}

impl MarketplaceSource {
    pub fn new(collector: Arc<dyn EntityCollector>) -> Self {
        Self { collector }
    }
}

fn or_empty<T>(request_id: &str, population: &str, result: Result<Vec<T>, String>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        log::warn!(
            "request_id={} population={} skipped: {}",
            request_id,
            population,
            err
        );
        Vec::new()
    })
}

#[async_trait]
impl Source<ReportQuery, EntityCandidate> for MarketplaceSource {
    async fn get_candidates(&self, query: &ReportQuery) -> Result<Vec<EntityCandidate>, String> {
        let range = &query.date_range;
        let (campaigns, advertised, active_ids) = futures::join!(
            self.collector.campaigns(range),
            self.collector.advertised_items(range),
            self.collector.active_item_ids(),
        );

        let rid = query.request_id.as_str();
        let campaigns = or_empty(rid, "campaigns", campaigns);
        let advertised = or_empty(rid, "advertised_items", advertised);
        let active_ids = or_empty(rid, "active_items", active_ids);

        log::info!(
            "request_id={} seller_id={} from={} to={} campaigns={} advertised={} active={}",
            rid,
            query.seller_id,
            range.date_from,
            range.date_to,
            campaigns.len(),
            advertised.len(),
            active_ids.len()
        );

        let entities = campaigns
            .into_iter()
            .map(Entity::Campaign)
            .chain(advertised.into_iter().map(Entity::AdvertisedItem))
            .chain(
                active_ids
                    .into_iter()
                    .map(|id| Entity::PotentialItem(PotentialItem::new(id))),
            );

        Ok(entities
            .enumerate()
            .map(|(ordinal, entity)| EntityCandidate::new(ordinal, entity))
            .collect())
    }
}
