//! Rule-based insight engine.
//!
//! Every entity kind has an ordered rule list. Each rule is a predicate over
//! the entity and the run's `Thresholds`; when it holds, the rule contributes
//! one recommendation (formatted with the observed values) and a fixed number
//! of priority points. Priority is purely additive: all rules are evaluated,
//! nothing is capped and nothing short-circuits. An entity on which no rule
//! fires gets its kind's "within target" recommendation and priority 0.

use crate::entity::{Entity, EntityKind, MetricBlock, PotentialItem};
use crate::performance::PerformanceRecord;
use crate::thresholds::Thresholds;

// ---------------------------------------------------------------------------
// Rule constants
// ---------------------------------------------------------------------------

/// Minimum clicks before a low conversion rate is considered meaningful.
pub const CVR_MIN_CLICKS: f64 = 30.0;
/// Prices above this are flagged for audience/CPC review.
pub const HIGH_PRICE_CUTOFF: f64 = 5000.0;
/// Listings with fewer pictures than this get a picture recommendation.
pub const MIN_PICTURES: usize = 5;
/// Case-insensitive campaign name fragments that mark a generic label.
pub const GENERIC_NAME_MARKERS: [&str; 2] = ["geral", "test"];

/// Quality tier wordings across the marketplace locales (lowercased).
const BASIC_TIER_WORDINGS: [&str; 3] = ["básica", "basica", "basic"];
const STANDARD_TIER_WORDINGS: [&str; 3] = ["satisfatória", "standard", "estándar"];
const PROFESSIONAL_TIER_WORDINGS: [&str; 2] = ["profissional", "profesional"];

pub const POINTS_LOW_ROAS: u32 = 5;
pub const POINTS_HIGH_ACOS: u32 = 4;
pub const POINTS_HIGH_CPC: u32 = 3;
pub const POINTS_LOW_CTR: u32 = 2;
pub const POINTS_LOW_CVR: u32 = 3;
pub const POINTS_GENERIC_NAME: u32 = 1;
pub const POINTS_UNHEALTHY: u32 = 10;
pub const POINTS_WARNING: u32 = 5;
pub const POINTS_HEALTHY: u32 = 1;
pub const POINTS_AD_BEST_SELLER: u32 = 6;
pub const POINTS_BASIC_TIER: u32 = 5;
pub const POINTS_STANDARD_TIER: u32 = 3;
pub const POINTS_PROFESSIONAL_TIER: u32 = 1;
pub const POINTS_HIGH_SALES: u32 = 10;
pub const POINTS_MODERATE_SALES: u32 = 5;
pub const POINTS_LOW_SALES: u32 = 2;
pub const POINTS_NO_FREE_SHIPPING: u32 = 2;
pub const POINTS_FEW_PICTURES: u32 = 2;
pub const POINTS_BRAND: u32 = 1;
pub const POINTS_MISSING_PRICE: u32 = 5;
pub const POINTS_HIGH_PRICE: u32 = 3;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Identity of a rule. Which rules apply, and in which order, is decided by
/// the entity kind's rule list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// First match of unhealthy / warning / healthy over health flag or
    /// performance level.
    HealthLevel,
    LowRoas,
    HighAcos,
    HighCpc,
    LowCtr,
    LowCvr,
    GenericCampaignName,
    AdBestSeller,
    /// Three mutually exclusive sales-volume tiers; exactly one fires.
    SalesTier,
    NoFreeShipping,
    FewPictures,
    /// Brand present or absent; exactly one fires.
    Brand,
    MissingPrice,
    HighPrice,
    /// Quality tier keyed on the performance level wording.
    QualityTier,
}

pub const CAMPAIGN_RULES: &[Rule] = &[
    Rule::LowRoas,
    Rule::HighAcos,
    Rule::HighCpc,
    Rule::LowCtr,
    Rule::LowCvr,
    Rule::GenericCampaignName,
];

pub const ADVERTISED_ITEM_RULES: &[Rule] = &[
    Rule::HealthLevel,
    Rule::LowRoas,
    Rule::HighAcos,
    Rule::HighCpc,
    Rule::LowCtr,
    Rule::LowCvr,
    Rule::AdBestSeller,
    Rule::QualityTier,
];

pub const POTENTIAL_ITEM_RULES: &[Rule] = &[
    Rule::HealthLevel,
    Rule::SalesTier,
    Rule::NoFreeShipping,
    Rule::FewPictures,
    Rule::Brand,
    Rule::MissingPrice,
    Rule::HighPrice,
    Rule::QualityTier,
];

/// Ordered rule list for an entity kind.
pub fn rules_for(kind: EntityKind) -> &'static [Rule] {
    match kind {
        EntityKind::Campaign => CAMPAIGN_RULES,
        EntityKind::AdvertisedItem => ADVERTISED_ITEM_RULES,
        EntityKind::PotentialItem => POTENTIAL_ITEM_RULES,
    }
}

/// Recommendation used when no rule fires.
pub fn default_recommendation(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Campaign => "Campaign within targets. Monitor regularly.",
        EntityKind::AdvertisedItem => "Item within targets. Follow up normally.",
        EntityKind::PotentialItem => "Item ready for Ads. Monitor initial performance.",
    }
}

/// One fired rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    pub rule: Rule,
    pub points: u32,
    pub message: String,
}

impl Finding {
    fn new(rule: Rule, points: u32, message: impl Into<String>) -> Self {
        Self {
            rule,
            points,
            message: message.into(),
        }
    }
}

/// Scoring output for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Insight {
    pub priority: u32,
    pub recommendations: Vec<String>,
    pub findings: Vec<Finding>,
}

/// Run the entity's rule list against the thresholds.
pub fn evaluate(entity: &Entity, thresholds: &Thresholds) -> Insight {
    let kind = entity.kind();
    let findings: Vec<Finding> = rules_for(kind)
        .iter()
        .filter_map(|rule| apply(*rule, entity, thresholds))
        .collect();

    let priority = findings.iter().map(|f| f.points).sum();
    let mut recommendations: Vec<String> = findings.iter().map(|f| f.message.clone()).collect();
    if recommendations.is_empty() {
        recommendations.push(default_recommendation(kind).to_string());
    }

    Insight {
        priority,
        recommendations,
        findings,
    }
}

/// Evaluate a single rule. Rules that do not apply to the entity's kind
/// never fire.
pub fn apply(rule: Rule, entity: &Entity, t: &Thresholds) -> Option<Finding> {
    let kind = entity.kind();
    // Absent metrics count as 0 for every comparison.
    let metrics = entity.metrics().map(MetricBlock::filled);
    let metrics = metrics.as_ref();
    match rule {
        Rule::HealthLevel => health_level(kind, entity),
        Rule::LowRoas => metrics.and_then(|m| low_roas(kind, m, t)),
        Rule::HighAcos => metrics.and_then(|m| high_acos(kind, m, t)),
        Rule::HighCpc => metrics.and_then(|m| high_cpc(m, t)),
        Rule::LowCtr => metrics.and_then(|m| low_ctr(kind, m, t)),
        Rule::LowCvr => metrics.and_then(|m| low_cvr(kind, m, t)),
        Rule::GenericCampaignName => match entity {
            Entity::Campaign(c) => generic_name(&c.name),
            _ => None,
        },
        Rule::AdBestSeller => match (entity, metrics) {
            (Entity::AdvertisedItem(_), Some(m)) if m.units_quantity > t.best_seller_threshold => {
                Some(Finding::new(
                    rule,
                    POINTS_AD_BEST_SELLER,
                    "Champion product in Ads. Increase investment/targeting.",
                ))
            }
            _ => None,
        },
        Rule::QualityTier => entity.performance().and_then(|p| quality_tier(kind, p)),
        Rule::SalesTier
        | Rule::NoFreeShipping
        | Rule::FewPictures
        | Rule::Brand
        | Rule::MissingPrice
        | Rule::HighPrice => match entity {
            Entity::PotentialItem(item) => listing_rule(rule, item, t),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

fn health_level(kind: EntityKind, entity: &Entity) -> Option<Finding> {
    let health = entity.health().as_str().to_lowercase();
    let level = entity
        .performance()
        .map(|p| p.level.to_lowercase())
        .unwrap_or_default();
    let either = |value: &str| health == value || level == value;

    let listing = if kind == EntityKind::AdvertisedItem { "Ad" } else { "Item" };

    if either("unhealthy") {
        let message = match kind {
            EntityKind::AdvertisedItem => "Ad is losing exposure (unhealthy). Act urgently!",
            _ => "Item losing exposure (unhealthy). Fix required!",
        };
        Some(Finding::new(Rule::HealthLevel, POINTS_UNHEALTHY, message))
    } else if either("warning") {
        Some(Finding::new(
            Rule::HealthLevel,
            POINTS_WARNING,
            format!("{listing} may lose exposure (warning). Fix pending issues!"),
        ))
    } else if either("healthy") {
        let message = match kind {
            EntityKind::AdvertisedItem => "Ad is healthy. Keep good practices.",
            _ => "Item is healthy. Positive potential.",
        };
        Some(Finding::new(Rule::HealthLevel, POINTS_HEALTHY, message))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Metric rules (campaigns and advertised items)
// ---------------------------------------------------------------------------

fn low_roas(kind: EntityKind, m: &MetricBlock, t: &Thresholds) -> Option<Finding> {
    (m.roas < t.roi_threshold).then(|| {
        let advice = match kind {
            EntityKind::Campaign => "Adjust bids/margins.",
            _ => "Check bids/margins.",
        };
        Finding::new(
            Rule::LowRoas,
            POINTS_LOW_ROAS,
            format!("ROAS {:.2} < {:.2}. {}", m.roas, t.roi_threshold, advice),
        )
    })
}

fn high_acos(kind: EntityKind, m: &MetricBlock, t: &Thresholds) -> Option<Finding> {
    (m.acos > t.acos_benchmark).then(|| {
        let advice = match kind {
            EntityKind::Campaign => "Reduce CPC or optimize cost.",
            _ => "Optimize CPC or negate keywords.",
        };
        Finding::new(
            Rule::HighAcos,
            POINTS_HIGH_ACOS,
            format!("ACOS {:.2}% > {:.2}%. {}", m.acos, t.acos_benchmark, advice),
        )
    })
}

fn high_cpc(m: &MetricBlock, t: &Thresholds) -> Option<Finding> {
    (m.cpc > t.cpc_threshold).then(|| {
        Finding::new(
            Rule::HighCpc,
            POINTS_HIGH_CPC,
            format!(
                "CPC R${:.2} > R${:.2}. Negate expensive keywords.",
                m.cpc, t.cpc_threshold
            ),
        )
    })
}

fn low_ctr(kind: EntityKind, m: &MetricBlock, t: &Thresholds) -> Option<Finding> {
    (m.ctr < t.ctr_threshold).then(|| {
        let advice = match kind {
            EntityKind::Campaign => "Improve ads/creatives.",
            _ => "Optimize images/title.",
        };
        Finding::new(
            Rule::LowCtr,
            POINTS_LOW_CTR,
            format!("CTR {:.2}% < {:.2}%. {}", m.ctr, t.ctr_threshold, advice),
        )
    })
}

fn low_cvr(kind: EntityKind, m: &MetricBlock, t: &Thresholds) -> Option<Finding> {
    (m.cvr < t.cvr_threshold && m.clicks > CVR_MIN_CLICKS).then(|| {
        let advice = match kind {
            EntityKind::Campaign => "Check competitiveness/price.",
            _ => "Review listing/price.",
        };
        Finding::new(
            Rule::LowCvr,
            POINTS_LOW_CVR,
            format!("CVR {:.2}% < {:.2}%. {}", m.cvr, t.cvr_threshold, advice),
        )
    })
}

fn generic_name(name: &str) -> Option<Finding> {
    let lowered = name.to_lowercase();
    GENERIC_NAME_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        .then(|| {
            Finding::new(
                Rule::GenericCampaignName,
                POINTS_GENERIC_NAME,
                "Rename campaign to something more specific (avoid generic labels).",
            )
        })
}

// ---------------------------------------------------------------------------
// Listing rules (potential items)
// ---------------------------------------------------------------------------

fn listing_rule(rule: Rule, item: &PotentialItem, t: &Thresholds) -> Option<Finding> {
    match rule {
        Rule::SalesTier => {
            let sold = item.sold_quantity as f64;
            let finding = if sold > t.best_seller_threshold {
                Finding::new(
                    rule,
                    POINTS_HIGH_SALES,
                    "High organic sales. Strong potential for Ads.",
                )
            } else if sold > t.best_seller_threshold * 0.5 {
                Finding::new(rule, POINTS_MODERATE_SALES, "Moderate sales. Ads can scale.")
            } else {
                Finding::new(
                    rule,
                    POINTS_LOW_SALES,
                    "Low sales. Check ROI before investing in Ads.",
                )
            };
            Some(finding)
        }
        Rule::NoFreeShipping => (!item.free_shipping).then(|| {
            Finding::new(
                rule,
                POINTS_NO_FREE_SHIPPING,
                "Consider free shipping to improve conversion.",
            )
        }),
        Rule::FewPictures => (item.picture_count < MIN_PICTURES).then(|| {
            Finding::new(
                rule,
                POINTS_FEW_PICTURES,
                format!(
                    "Few pictures ({}). Add quality images.",
                    item.picture_count
                ),
            )
        }),
        Rule::Brand => {
            let finding = match item.brand.as_deref().filter(|b| !b.is_empty()) {
                Some(brand) => Finding::new(
                    rule,
                    POINTS_BRAND,
                    format!("Brand '{brand}'. Highlight it in the campaign/listing."),
                ),
                None => Finding::new(
                    rule,
                    POINTS_BRAND,
                    "No brand. If generic, assess differentiation.",
                ),
            };
            Some(finding)
        }
        Rule::MissingPrice => (item.price <= 0.0).then(|| {
            Finding::new(
                rule,
                POINTS_MISSING_PRICE,
                "Price missing or zero. Fix before Ads.",
            )
        }),
        Rule::HighPrice => (item.price > HIGH_PRICE_CUTOFF).then(|| {
            Finding::new(
                rule,
                POINTS_HIGH_PRICE,
                format!(
                    "High price (R${:.2}). Review target audience and CPC.",
                    item.price
                ),
            )
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Quality tier
// ---------------------------------------------------------------------------

fn quality_tier(kind: EntityKind, performance: &PerformanceRecord) -> Option<Finding> {
    let score = performance.score?;
    let wording = &performance.level_wording;
    let lowered = wording.to_lowercase();
    let is_ad = kind == EntityKind::AdvertisedItem;

    if BASIC_TIER_WORDINGS.contains(&lowered.as_str()) {
        let action = if is_ad { "Complete" } else { "Fix" };
        Some(Finding::new(
            Rule::QualityTier,
            POINTS_BASIC_TIER,
            format!("Listing quality '{wording}'. {action} pending items (score={score})."),
        ))
    } else if STANDARD_TIER_WORDINGS.contains(&lowered.as_str()) {
        let action = if is_ad {
            "Improve actions"
        } else {
            "Improve for more exposure"
        };
        Some(Finding::new(
            Rule::QualityTier,
            POINTS_STANDARD_TIER,
            format!("Average quality '{wording}'. {action} (score={score})."),
        ))
    } else if PROFESSIONAL_TIER_WORDINGS.contains(&lowered.as_str()) {
        let label = if is_ad { "Quality" } else { "Good quality" };
        Some(Finding::new(
            Rule::QualityTier,
            POINTS_PROFESSIONAL_TIER,
            format!(
                "{label} '{wording}'. Pending: {}.",
                performance.pending_count
            ),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AdvertisedItem, Campaign, HealthFlag};
    use crate::performance::synthesize;

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    /// Metrics on which no campaign/ad metric rule fires under the defaults.
    fn calm_metrics() -> MetricBlock {
        MetricBlock {
            roas: 5.0,
            acos: 5.0,
            cpc: 1.0,
            ctr: 2.0,
            cvr: 2.0,
            clicks: 100.0,
            ..MetricBlock::default()
        }
    }

    fn campaign(name: &str, metrics: MetricBlock) -> Entity {
        Entity::Campaign(Campaign {
            campaign_id: "C1".into(),
            name: name.into(),
            metrics,
            ..Campaign::default()
        })
    }

    fn ad(metrics: MetricBlock, health: HealthFlag, performance: Option<PerformanceRecord>) -> Entity {
        Entity::AdvertisedItem(AdvertisedItem {
            item_id: "MLB1".into(),
            metrics,
            health,
            performance,
            ..AdvertisedItem::default()
        })
    }

    fn potential(configure: impl FnOnce(&mut PotentialItem)) -> Entity {
        let mut item = PotentialItem {
            item_id: "MLB9".into(),
            sold_quantity: 10,
            price: 100.0,
            brand: Some("Acme".into()),
            free_shipping: true,
            picture_count: 8,
            ..PotentialItem::default()
        };
        configure(&mut item);
        Entity::PotentialItem(item)
    }

    fn rules_fired(insight: &Insight) -> Vec<Rule> {
        insight.findings.iter().map(|f| f.rule).collect()
    }

    #[test]
    fn campaign_example_scores_ten() {
        let metrics = MetricBlock {
            roas: 1.0,
            acos: 15.0,
            cpc: 1.0,
            ctr: 2.0,
            cvr: 0.1,
            clicks: 10.0,
            ..MetricBlock::default()
        };
        let insight = evaluate(&campaign("Campanha Geral", metrics), &thresholds());

        assert_eq!(insight.priority, 10);
        assert_eq!(
            insight.recommendations,
            vec![
                "ROAS 1.00 < 2.00. Adjust bids/margins.".to_string(),
                "ACOS 15.00% > 10.00%. Reduce CPC or optimize cost.".to_string(),
                "Rename campaign to something more specific (avoid generic labels).".to_string(),
            ]
        );
    }

    #[test]
    fn calm_campaign_gets_default_recommendation() {
        let insight = evaluate(&campaign("Drills Q3", calm_metrics()), &thresholds());
        assert_eq!(insight.priority, 0);
        assert_eq!(
            insight.recommendations,
            vec![default_recommendation(EntityKind::Campaign).to_string()]
        );
        assert!(insight.findings.is_empty());
    }

    #[test]
    fn cvr_rule_needs_more_than_thirty_clicks() {
        let mut metrics = calm_metrics();
        metrics.cvr = 0.2;
        metrics.clicks = 30.0;
        let quiet = evaluate(&campaign("Drills", metrics.clone()), &thresholds());
        assert!(!rules_fired(&quiet).contains(&Rule::LowCvr));

        metrics.clicks = 31.0;
        let loud = evaluate(&campaign("Drills", metrics), &thresholds());
        assert_eq!(rules_fired(&loud), vec![Rule::LowCvr]);
        assert_eq!(loud.priority, POINTS_LOW_CVR);
    }

    #[test]
    fn generic_marker_is_case_insensitive() {
        let insight = evaluate(&campaign("TESTE black friday", calm_metrics()), &thresholds());
        assert_eq!(rules_fired(&insight), vec![Rule::GenericCampaignName]);
    }

    #[test]
    fn all_campaign_rules_fire_in_order() {
        let metrics = MetricBlock {
            roas: 0.5,
            acos: 40.0,
            cpc: 3.5,
            ctr: 0.2,
            cvr: 0.1,
            clicks: 200.0,
            ..MetricBlock::default()
        };
        let insight = evaluate(&campaign("geral", metrics), &thresholds());
        assert_eq!(rules_fired(&insight), CAMPAIGN_RULES.to_vec());
        assert_eq!(insight.priority, 5 + 4 + 3 + 2 + 3 + 1);
        assert_eq!(insight.recommendations[2], "CPC R$3.50 > R$2.00. Negate expensive keywords.");
    }

    #[test]
    fn unhealthy_level_beats_healthy_flag() {
        let performance = PerformanceRecord {
            score: Some(30.0),
            level: "Unhealthy".into(),
            level_wording: "Custom".into(),
            pending_count: 0,
        };
        let insight = evaluate(
            &ad(calm_metrics(), HealthFlag::Healthy, Some(performance)),
            &thresholds(),
        );
        assert_eq!(rules_fired(&insight), vec![Rule::HealthLevel]);
        assert_eq!(insight.priority, POINTS_UNHEALTHY);
        assert_eq!(
            insight.recommendations,
            vec!["Ad is losing exposure (unhealthy). Act urgently!".to_string()]
        );
    }

    #[test]
    fn warning_flag_fires_without_performance() {
        let insight = evaluate(&ad(calm_metrics(), HealthFlag::Warning, None), &thresholds());
        assert_eq!(insight.priority, POINTS_WARNING);
        assert_eq!(
            insight.recommendations,
            vec!["Ad may lose exposure (warning). Fix pending issues!".to_string()]
        );
    }

    #[test]
    fn absent_health_and_performance_fire_nothing() {
        let performance = synthesize(&HealthFlag::Absent);
        let insight = evaluate(
            &ad(calm_metrics(), HealthFlag::Absent, Some(performance)),
            &thresholds(),
        );
        assert_eq!(insight.priority, 0);
        assert_eq!(
            insight.recommendations,
            vec![default_recommendation(EntityKind::AdvertisedItem).to_string()]
        );
    }

    #[test]
    fn synthesized_healthy_record_fires_healthy_branch_only() {
        let performance = synthesize(&HealthFlag::Healthy);
        let insight = evaluate(
            &ad(calm_metrics(), HealthFlag::Healthy, Some(performance)),
            &thresholds(),
        );
        assert_eq!(rules_fired(&insight), vec![Rule::HealthLevel]);
        assert_eq!(insight.priority, POINTS_HEALTHY);
    }

    #[test]
    fn ad_best_seller_and_quality_tiers() {
        let mut metrics = calm_metrics();
        metrics.units_quantity = 81.0;
        let performance = PerformanceRecord {
            score: Some(45.0),
            level: String::new(),
            level_wording: "Básica".into(),
            pending_count: 4,
        };
        let insight = evaluate(&ad(metrics, HealthFlag::Absent, Some(performance)), &thresholds());
        assert_eq!(rules_fired(&insight), vec![Rule::AdBestSeller, Rule::QualityTier]);
        assert_eq!(insight.priority, POINTS_AD_BEST_SELLER + POINTS_BASIC_TIER);
        assert_eq!(
            insight.recommendations[1],
            "Listing quality 'Básica'. Complete pending items (score=45)."
        );
    }

    #[test]
    fn quality_tier_wordings_map_across_locales() {
        for (wording, points) in [
            ("basic", POINTS_BASIC_TIER),
            ("Satisfatória", POINTS_STANDARD_TIER),
            ("Estándar", POINTS_STANDARD_TIER),
            ("Profesional", POINTS_PROFESSIONAL_TIER),
            ("PROFISSIONAL", POINTS_PROFESSIONAL_TIER),
        ] {
            let performance = PerformanceRecord {
                score: Some(70.0),
                level: String::new(),
                level_wording: wording.into(),
                pending_count: 2,
            };
            let insight =
                evaluate(&ad(calm_metrics(), HealthFlag::Absent, Some(performance)), &thresholds());
            assert_eq!(insight.priority, points, "wording {wording}");
        }
    }

    #[test]
    fn quality_tier_skipped_without_score() {
        let performance = PerformanceRecord {
            score: None,
            level: String::new(),
            level_wording: "basic".into(),
            pending_count: 0,
        };
        let insight = evaluate(&ad(calm_metrics(), HealthFlag::Absent, Some(performance)), &thresholds());
        assert!(insight.findings.is_empty());
    }

    #[test]
    fn moderate_sales_tier_between_half_and_full_threshold() {
        let insight = evaluate(&potential(|i| i.sold_quantity = 50), &thresholds());
        let sales: Vec<&Finding> = insight
            .findings
            .iter()
            .filter(|f| f.rule == Rule::SalesTier)
            .collect();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].points, POINTS_MODERATE_SALES);
        assert_eq!(sales[0].message, "Moderate sales. Ads can scale.");
    }

    #[test]
    fn sales_tier_boundaries() {
        let points = |sold: u64| {
            let insight = evaluate(&potential(|i| i.sold_quantity = sold), &thresholds());
            insight
                .findings
                .iter()
                .find(|f| f.rule == Rule::SalesTier)
                .map(|f| f.points)
        };
        assert_eq!(points(81), Some(POINTS_HIGH_SALES));
        assert_eq!(points(80), Some(POINTS_MODERATE_SALES));
        assert_eq!(points(41), Some(POINTS_MODERATE_SALES));
        assert_eq!(points(40), Some(POINTS_LOW_SALES));
        assert_eq!(points(0), Some(POINTS_LOW_SALES));
    }

    #[test]
    fn potential_item_listing_rules() {
        let insight = evaluate(
            &potential(|i| {
                i.free_shipping = false;
                i.picture_count = 2;
                i.brand = None;
                i.price = 0.0;
                i.health = HealthFlag::Unhealthy;
            }),
            &thresholds(),
        );
        assert_eq!(
            rules_fired(&insight),
            vec![
                Rule::HealthLevel,
                Rule::SalesTier,
                Rule::NoFreeShipping,
                Rule::FewPictures,
                Rule::Brand,
                Rule::MissingPrice,
            ]
        );
        assert_eq!(insight.priority, 10 + 2 + 2 + 2 + 1 + 5);
        assert_eq!(insight.recommendations[0], "Item losing exposure (unhealthy). Fix required!");
        assert_eq!(insight.recommendations[3], "Few pictures (2). Add quality images.");
        assert_eq!(insight.recommendations[4], "No brand. If generic, assess differentiation.");
    }

    #[test]
    fn branded_expensive_potential_item() {
        let insight = evaluate(&potential(|i| i.price = 7999.9), &thresholds());
        assert_eq!(
            insight.recommendations,
            vec![
                "Low sales. Check ROI before investing in Ads.".to_string(),
                "Brand 'Acme'. Highlight it in the campaign/listing.".to_string(),
                "High price (R$7999.90). Review target audience and CPC.".to_string(),
            ]
        );
        assert_eq!(insight.priority, POINTS_LOW_SALES + POINTS_BRAND + POINTS_HIGH_PRICE);
    }

    #[test]
    fn potential_item_always_has_findings() {
        let insight = evaluate(&potential(|_| {}), &thresholds());
        assert!(insight.priority > 0);
        assert!(!insight.findings.is_empty());
    }

    #[test]
    fn rules_for_other_kinds_never_fire() {
        let entity = campaign("geral", calm_metrics());
        assert!(apply(Rule::SalesTier, &entity, &thresholds()).is_none());
        assert!(apply(Rule::HealthLevel, &entity, &thresholds()).is_none());
        assert!(apply(Rule::AdBestSeller, &entity, &thresholds()).is_none());
        let item = potential(|_| {});
        assert!(apply(Rule::LowRoas, &item, &thresholds()).is_none());
        assert!(apply(Rule::GenericCampaignName, &item, &thresholds()).is_none());
    }
}
