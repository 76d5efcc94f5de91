pub mod product_ads_report;
