//! Organic sales ranking.
//!
//! Ranks a seller's listings by revenue per visit and marks which ones are
//! worth recommending for advertising. Input is a CSV with columns:
//!   item_id, title, price, visits, sales, stock, quality_score
//! Missing numeric cells are read as absent.

use std::cmp::Ordering;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Preferred sales share for the recommended group.
pub const PRIMARY_SHARE: f64 = 0.10;
/// Fallback share when nobody reaches `PRIMARY_SHARE`.
pub const FALLBACK_SHARE: f64 = 0.05;
/// Size of the last-resort recommended group, taken by sales.
pub const TOP_SELLERS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RankedItem {
    pub item_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub visits: Option<f64>,
    #[serde(default)]
    pub sales: Option<f64>,
    #[serde(default)]
    pub stock: Option<f64>,
    #[serde(default)]
    pub quality_score: Option<f64>,
}

impl RankedItem {
    pub fn sales(&self) -> f64 {
        self.sales.unwrap_or(0.0)
    }

    /// Sales per visit; 0 without visits.
    pub fn conversion(&self) -> f64 {
        match self.visits {
            Some(visits) if visits > 0.0 => self.sales() / visits,
            _ => 0.0,
        }
    }

    /// Expected revenue per visit.
    pub fn sales_potential(&self) -> f64 {
        self.conversion() * self.price
    }
}

/// Recommendation group of a ranked listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductGroup {
    /// No sales in the window.
    Unranked,
    /// At least one sale.
    Selling,
    /// Recommended for advertising.
    Recommended,
}

impl ProductGroup {
    pub fn code(self) -> i8 {
        match self {
            ProductGroup::Unranked => -1,
            ProductGroup::Selling => 1,
            ProductGroup::Recommended => 2,
        }
    }
}

impl Serialize for ProductGroup {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

/// Output row of the ranking.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedRow {
    pub item_id: String,
    pub title: String,
    pub price: f64,
    pub visits: Option<f64>,
    pub sales: Option<f64>,
    pub stock: Option<f64>,
    pub quality_score: Option<f64>,
    pub conversion: f64,
    pub sales_potential: f64,
    pub sales_share: f64,
    pub product_group: ProductGroup,
}

/// Rank items by sales potential (descending, stable) and assign groups.
pub fn rank(items: Vec<RankedItem>) -> Vec<RankedRow> {
    let total_sales: f64 = items.iter().map(RankedItem::sales).sum();
    let share = |item: &RankedItem| {
        if total_sales > 0.0 {
            item.sales() / total_sales
        } else {
            0.0
        }
    };

    let groups = assign_groups(&items, &share);

    let mut rows: Vec<RankedRow> = items
        .into_iter()
        .zip(groups)
        .map(|(item, product_group)| RankedRow {
            conversion: item.conversion(),
            sales_potential: item.sales_potential(),
            sales_share: share(&item),
            product_group,
            item_id: item.item_id,
            title: item.title,
            price: item.price,
            visits: item.visits,
            sales: item.sales,
            stock: item.stock,
            quality_score: item.quality_score,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.sales_potential
            .partial_cmp(&a.sales_potential)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

fn assign_groups(items: &[RankedItem], share: &dyn Fn(&RankedItem) -> f64) -> Vec<ProductGroup> {
    let mut groups: Vec<ProductGroup> = items
        .iter()
        .map(|item| {
            if item.sales() >= 1.0 {
                ProductGroup::Selling
            } else {
                ProductGroup::Unranked
            }
        })
        .collect();

    let promote_by_share = |groups: &mut [ProductGroup], cutoff: f64| {
        let mut promoted = false;
        for (group, item) in groups.iter_mut().zip(items) {
            if share(item) >= cutoff {
                *group = ProductGroup::Recommended;
                promoted = true;
            }
        }
        promoted
    };

    if promote_by_share(&mut groups, PRIMARY_SHARE) || promote_by_share(&mut groups, FALLBACK_SHARE) {
        return groups;
    }

    let mut by_sales: Vec<usize> = (0..items.len()).filter(|&i| items[i].sales() > 0.0).collect();
    by_sales.sort_by(|&a, &b| {
        items[b]
            .sales()
            .partial_cmp(&items[a].sales())
            .unwrap_or(Ordering::Equal)
    });
    for index in by_sales.into_iter().take(TOP_SELLERS) {
        groups[index] = ProductGroup::Recommended;
    }
    groups
}

/// Load ranking input from a CSV reader.
pub fn load_ranking<R: Read>(reader: R) -> ReportResult<Vec<RankedItem>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut items = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let item: RankedItem = result.map_err(|source| ReportError::CsvRecord {
            line: line_num + 2,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

pub fn load_ranking_file(path: &Path) -> ReportResult<Vec<RankedItem>> {
    let file = std::fs::File::open(path).map_err(|e| ReportError::io(path, e))?;
    load_ranking(file)
}

/// Write ranked rows as CSV.
pub fn write_ranking<W: std::io::Write>(writer: W, rows: &[RankedRow]) -> ReportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
item_id,title,price,visits,sales,stock,quality_score
MLB1,Drill,200.0,100,10,5,80
MLB2,Saw,50.0,0,0,,
MLB3,Hammer,30.0,50,5,12,
MLB4,Level,80.0,,1,3,65
";

    fn item(id: &str, price: f64, visits: f64, sales: f64) -> RankedItem {
        RankedItem {
            item_id: id.into(),
            price,
            visits: Some(visits),
            sales: Some(sales),
            ..RankedItem::default()
        }
    }

    fn group_of(rows: &[RankedRow], id: &str) -> ProductGroup {
        rows.iter().find(|r| r.item_id == id).unwrap().product_group
    }

    #[test]
    fn load_sample_csv() {
        let items = load_ranking(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].title, "Drill");
        assert_eq!(items[1].stock, None);
        assert_eq!(items[3].visits, None);
        assert_eq!(items[3].quality_score, Some(65.0));
    }

    #[test]
    fn conversion_guards_missing_visits() {
        let items = load_ranking(SAMPLE_CSV.as_bytes()).unwrap();
        assert!((items[0].conversion() - 0.1).abs() < 1e-9);
        assert!((items[0].sales_potential() - 20.0).abs() < 1e-9);
        assert_eq!(items[1].conversion(), 0.0);
        assert_eq!(items[3].conversion(), 0.0);
    }

    #[test]
    fn rows_sorted_by_sales_potential() {
        let rows = rank(load_ranking(SAMPLE_CSV.as_bytes()).unwrap());
        let ids: Vec<&str> = rows.iter().map(|r| r.item_id.as_str()).collect();
        // MLB1 = 20.0, MLB3 = 3.0, MLB2 and MLB4 = 0 keep input order
        assert_eq!(ids, vec!["MLB1", "MLB3", "MLB2", "MLB4"]);
    }

    #[test]
    fn ten_percent_share_is_recommended() {
        let rows = rank(load_ranking(SAMPLE_CSV.as_bytes()).unwrap());
        // total sales = 16
        assert_eq!(group_of(&rows, "MLB1"), ProductGroup::Recommended);
        assert_eq!(group_of(&rows, "MLB3"), ProductGroup::Recommended);
        assert_eq!(group_of(&rows, "MLB4"), ProductGroup::Selling);
        assert_eq!(group_of(&rows, "MLB2"), ProductGroup::Unranked);
        assert_eq!(ProductGroup::Unranked.code(), -1);
    }

    #[test]
    fn falls_back_to_five_percent_share() {
        // 12 sellers at 6/75 = 8% each, one non-seller
        let mut items: Vec<RankedItem> = (0..12)
            .map(|i| item(&format!("A{i}"), 10.0, 100.0, 6.0))
            .collect();
        items.push(item("B", 10.0, 100.0, 3.0));
        items.push(item("Z", 10.0, 100.0, 0.0));

        let rows = rank(items);
        assert_eq!(group_of(&rows, "A0"), ProductGroup::Recommended);
        assert_eq!(group_of(&rows, "B"), ProductGroup::Selling);
        assert_eq!(group_of(&rows, "Z"), ProductGroup::Unranked);
    }

    #[test]
    fn falls_back_to_top_three_sellers() {
        // 40 sellers, the best one holds 49/1180 of the sales
        let items: Vec<RankedItem> = (0..40)
            .map(|i| item(&format!("I{i}"), 10.0, 100.0, 10.0 + i as f64))
            .collect();
        let rows = rank(items);

        let recommended: Vec<&str> = rows
            .iter()
            .filter(|r| r.product_group == ProductGroup::Recommended)
            .map(|r| r.item_id.as_str())
            .collect();
        assert_eq!(recommended, vec!["I39", "I38", "I37"]);
        assert_eq!(group_of(&rows, "I0"), ProductGroup::Selling);
    }

    #[test]
    fn no_sales_recommends_nothing() {
        let rows = rank(vec![item("A", 10.0, 0.0, 0.0), item("B", 10.0, 5.0, 0.0)]);
        assert!(rows.iter().all(|r| r.product_group == ProductGroup::Unranked));
        assert!(rows.iter().all(|r| r.sales_share == 0.0));
    }

    #[test]
    fn written_ranking_has_group_codes() {
        let rows = rank(load_ranking(SAMPLE_CSV.as_bytes()).unwrap());
        let mut buf = Vec::new();
        write_ranking(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.ends_with("sales_share,product_group"));
        assert!(text.lines().nth(1).unwrap().ends_with(",2"));
        assert!(text.lines().last().unwrap().ends_with(",1"));
    }
}
