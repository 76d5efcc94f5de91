mod cli;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use insight_market::{FixtureStore, MarketConfig, MarketplaceApi};
use insight_pipeline::candidate_pipeline::{CandidatePipeline, PipelineResult};
use insight_pipeline::ranking::{self, ProductGroup};
use insight_pipeline::report::{ScoredEntity, RECOMMENDATION_SEPARATOR};
use insight_pipeline::{
    CsvReportWriter, EntityCandidate, InsightReport, PipelineDeps, ProductAdsReportPipeline,
    ReportQuery, ReportSink,
};

use cli::{Cli, Command, RankArgs, ReportArgs};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson<'a> {
    generated_at: String,
    pipeline_ms: u128,
    summary: SummaryJson,
    files: Vec<String>,
    #[serde(flatten)]
    report: &'a InsightReport,
}

#[derive(Serialize)]
struct SummaryJson {
    retrieved: usize,
    already_advertised: usize,
    scored: usize,
    campaigns: usize,
    advertised_items: usize,
    potential_items: usize,
}

fn summarize(result: &PipelineResult<ReportQuery, EntityCandidate>, report: &InsightReport) -> SummaryJson {
    SummaryJson {
        retrieved: result.retrieved_candidates.len(),
        already_advertised: result.filtered_candidates.len(),
        scored: result.selected_candidates.len(),
        campaigns: report.campaigns.len(),
        advertised_items: report.advertised_items.len(),
        potential_items: report.potential_items.len(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_table<T>(title: &str, rows: &[ScoredEntity<T>], top: usize, label: impl Fn(&T) -> String) {
    println!("  {} ({} rows)", title, rows.len());
    println!("  {:-<64}", "");
    if rows.is_empty() {
        println!("  nothing to report");
    }
    for (i, row) in rows.iter().take(top).enumerate() {
        let marker = match row.priority {
            p if p >= 10 => "!!",
            p if p >= 5 => "! ",
            _ => "  ",
        };
        println!("  {} {}. {:<40} priority {}", marker, i + 1, label(&row.entity), row.priority);
        if let Some(first) = row.recommendations.split(RECOMMENDATION_SEPARATOR).next() {
            println!("       {}", first);
        }
    }
    println!();
}

fn print_human(
    summary: &SummaryJson,
    report: &InsightReport,
    files: &[String],
    top: usize,
    pipeline_ms: u128,
) {
    println!();
    println!("  PRODUCT ADS INSIGHTS  seller {}", report.seller_id);
    println!(
        "  window {} .. {}  \u{00b7}  {} entities scored  \u{00b7}  {} already advertised",
        report.date_range.date_from,
        report.date_range.date_to,
        summary.scored,
        summary.already_advertised
    );
    let t = &report.thresholds;
    println!(
        "  thresholds: ROAS {:.2}  ACOS {:.2}%  CPC R${:.2}  CTR {:.2}%  CVR {:.2}%  best seller {:.0} units",
        t.roi_threshold,
        t.acos_benchmark,
        t.cpc_threshold,
        t.ctr_threshold,
        t.cvr_threshold,
        t.best_seller_threshold
    );
    println!();

    print_table("Campaigns", &report.campaigns, top, |c| {
        format!("{} {}", c.campaign_id, c.name)
    });
    print_table("Advertised items", &report.advertised_items, top, |i| {
        format!("{} {}", i.item_id, i.title)
    });
    print_table("Potential items", &report.potential_items, top, |i| {
        format!("{} {}", i.item_id, i.title)
    });

    for file in files {
        println!("  wrote {}", file);
    }
    println!("  pipeline ran in {}ms", pipeline_ms);
    println!();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn build_run(args: &ReportArgs, request_id: String) -> Result<(PipelineDeps, ReportQuery)> {
    if let Some(dir) = &args.fixtures {
        let store = Arc::new(
            FixtureStore::load(dir)
                .with_context(|| format!("loading fixtures from {}", dir.display()))?,
        );
        let deps = PipelineDeps::new(store.clone(), store.clone(), store)
            .with_concurrency(args.concurrency);
        let query = ReportQuery::new(request_id, args.seller_id.clone(), args.days);
        return Ok((deps, query));
    }

    let token_file = args
        .token_file
        .as_deref()
        .context("--token-file is required without --fixtures")?;
    let mut config = MarketConfig::from_token_file(token_file)
        .with_context(|| format!("reading token from {}", token_file.display()))?
        .with_base_url(args.base_url.clone());
    config.date_window_days = args.days;
    config.performance_concurrency = args.concurrency;

    let api = Arc::new(
        MarketplaceApi::connect(config)
            .await
            .context("connecting to the marketplace")?,
    );
    tracing::info!(
        "connected seller_id={} advertiser_id={}",
        api.seller_id(),
        api.advertiser_id()
    );
    let query = api.report_query(request_id);
    Ok((api.pipeline_deps(), query))
}

async fn run_report(args: ReportArgs) -> Result<()> {
    let request_id = format!("report-{}", Utc::now().format("%Y%m%d%H%M%S"));
    let (deps, query) = build_run(&args, request_id).await?;
    let writer = CsvReportWriter::new(&args.out_dir, &args.prefix);
    let pipeline = ProductAdsReportPipeline::new(deps);

    let started = Instant::now();
    let result = pipeline.execute(query).await;
    let pipeline_ms = started.elapsed().as_millis();

    let report = InsightReport::from_candidates(&result.query, &result.selected_candidates);
    let summary = summarize(&result, &report);
    let files: Vec<String> = writer
        .emit(&report)
        .await
        .with_context(|| format!("writing report to {}", args.out_dir.display()))?
        .iter()
        .map(|path| path.display().to_string())
        .collect();

    if args.json {
        let json = ReportJson {
            generated_at: Utc::now().to_rfc3339(),
            pipeline_ms,
            summary,
            files,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print_human(&summary, &report, &files, args.top, pipeline_ms);
    }
    Ok(())
}

fn run_rank(args: &RankArgs) -> Result<()> {
    let items = ranking::load_ranking_file(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let rows = ranking::rank(items);

    let recommended = rows
        .iter()
        .filter(|r| r.product_group == ProductGroup::Recommended)
        .count();
    tracing::info!("ranked {} items, {} recommended", rows.len(), recommended);

    match &args.output {
        Some(path) => write_ranking_file(path, &rows),
        None => {
            ranking::write_ranking(std::io::stdout().lock(), &rows)?;
            Ok(())
        }
    }
}

fn write_ranking_file(path: &Path, rows: &[ranking::RankedRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    ranking::write_ranking(file, rows)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(args) => run_report(args).await,
        Command::Rank(args) => run_rank(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rank_command_writes_grouped_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("items.csv");
        let output = dir.path().join("ranked.csv");
        std::fs::write(
            &input,
            "item_id,title,price,visits,sales,stock,quality_score\n\
             MLB1,Drill,100,50,5,10,80\n\
             MLB2,Saw,40,100,20,3,\n\
             MLB3,Glue,10,,0,,\n",
        )
        .unwrap();

        run_rank(&RankArgs {
            input: input.clone(),
            output: Some(output.clone()),
        })
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("MLB1,"));
        assert!(lines[3].starts_with("MLB3,"));
        assert!(lines[3].ends_with(",-1"));
    }

    #[tokio::test]
    async fn report_command_writes_tables_from_fixtures() {
        let out = tempfile::tempdir().unwrap();
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures/sample");

        run_report(ReportArgs {
            token_file: None,
            base_url: String::new(),
            fixtures: Some(fixtures),
            seller_id: "offline".into(),
            days: 30,
            concurrency: 2,
            out_dir: out.path().to_path_buf(),
            prefix: "sample".into(),
            top: 1,
            json: true,
        })
        .await
        .unwrap();

        for name in [
            "sample_campaigns.csv",
            "sample_advertised_items.csv",
            "sample_potential_items.csv",
            "sample_thresholds.json",
        ] {
            assert!(out.path().join(name).exists(), "{name} not written");
        }
    }

    #[test]
    fn rank_command_reports_missing_input() {
        let err = run_rank(&RankArgs {
            input: PathBuf::from("/nonexistent/items.csv"),
            output: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/items.csv"));
    }
}
