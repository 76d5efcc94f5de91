//! Drives `MarketClient` against a minimal in-process HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use insight_market::{MarketClient, MarketConfig, MarketError, MarketplaceApi};
use insight_pipeline::collector::{DetailResolver, EntityCollector};
use insight_pipeline::entity::HealthFlag;
use insight_pipeline::types::DateRange;

const TOKEN: &str = "APP_USR-1-2-77";

fn route(target: &str, authorized: bool) -> (u16, String) {
    if !authorized {
        return (401, r#"{"message": "invalid token"}"#.into());
    }
    let target = target.replace("%2C", ",");
    let (path, query) = target.split_once('?').unwrap_or((target.as_str(), ""));

    match path {
        "/advertising/advertisers" => (200, r#"{"advertisers": [{"advertiser_id": 42}]}"#.into()),
        "/advertising/advertisers/42/product_ads/campaigns" if query.contains("offset=0") => (
            200,
            r#"{"paging": {"total": 3}, "results": [
                {"id": 1, "name": "A", "status": "active", "metrics": {"clicks": 5}},
                {"id": 2, "name": "B", "status": "active"}]}"#
                .into(),
        ),
        "/advertising/advertisers/42/product_ads/campaigns" if query.contains("offset=2") => (
            200,
            r#"{"paging": {"total": 3}, "results": [{"id": 3, "name": "C", "status": "paused"}]}"#
                .into(),
        ),
        "/advertising/advertisers/42/product_ads/items" => {
            (200, r#"{"paging": {"total": 0}, "results": []}"#.into())
        }
        "/users/77/items/search" if query.contains("scroll_id=s1") => {
            (200, r#"{"results": ["MLB3"], "scroll_id": "s1"}"#.into())
        }
        "/users/77/items/search" => (200, r#"{"results": ["MLB1", "MLB2"], "scroll_id": "s1"}"#.into()),
        "/items" => {
            let ids = query
                .split('&')
                .find_map(|kv| kv.strip_prefix("ids="))
                .unwrap_or("");
            if ids.split(',').any(|id| id == "BAD3") {
                return (500, r#"{"message": "internal error"}"#.into());
            }
            let entries: Vec<String> = ids
                .split(',')
                .map(|id| {
                    if id == "MLB3" {
                        format!(r#"{{"code": 404, "body": {{"message": "{id} not found"}}}}"#)
                    } else {
                        format!(r#"{{"code": 200, "body": {{"id": "{id}", "health": "warning"}}}}"#)
                    }
                })
                .collect();
            (200, format!("[{}]", entries.join(",")))
        }
        "/item/MLB1/performance" => (
            200,
            r#"{"score": 72, "level": "HEALTHY", "level_wording": "Profissional",
                "buckets": [{"status": "PENDING"}]}"#
                .into(),
        ),
        _ => (404, r#"{"message": "not found"}"#.into()),
    }
}

async fn serve(mut stream: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf).to_string();
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let authorized = head
        .lines()
        .any(|line| line.eq_ignore_ascii_case(&format!("authorization: Bearer {TOKEN}")));

    let (status, body) = route(&target, authorized);
    let response = format!(
        "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream));
        }
    });
    addr
}

async fn config(token: &str) -> MarketConfig {
    let addr = start_server().await;
    let mut config = MarketConfig::new(token)
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    config.page_limit = 2;
    config.multiget_chunk = 2;
    config
}

#[tokio::test]
async fn offset_pages_are_concatenated() {
    let client = MarketClient::new(config(TOKEN).await).unwrap();
    let range = DateRange::new("2025-01-01", "2025-01-31");

    let campaigns = client.campaigns("42", &range).await.unwrap();
    let ids: Vec<&str> = campaigns.iter().map(|c| c.campaign_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(campaigns[0].metrics.clicks, 5.0);
    assert_eq!(campaigns[1].metrics.clicks, 0.0);

    assert!(client.advertised_items("42", &range).await.unwrap().is_empty());
}

#[tokio::test]
async fn scroll_stops_on_repeated_scroll_id() {
    let client = MarketClient::new(config(TOKEN).await).unwrap();
    let ids = client.active_item_ids().await.unwrap();
    assert_eq!(ids, vec!["MLB1", "MLB2", "MLB3"]);
}

#[tokio::test]
async fn multiget_chunks_and_drops_unresolved() {
    let client = MarketClient::new(config(TOKEN).await).unwrap();
    let ids: Vec<String> = ["MLB1", "MLB2", "MLB3", "MLB1"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let details = client.item_details(&ids).await.unwrap();
    let resolved: Vec<&str> = details.iter().map(|d| d.item_id.as_str()).collect();
    assert_eq!(resolved, vec!["MLB1", "MLB2"]);
    assert!(details.iter().all(|d| d.health == HealthFlag::Warning));
}

#[tokio::test]
async fn failed_multiget_chunk_keeps_resolved_chunks() {
    let client = MarketClient::new(config(TOKEN).await).unwrap();
    let ids: Vec<String> = ["MLB1", "MLB2", "BAD3", "MLB4"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let details = client.item_details(&ids).await.unwrap();
    let resolved: Vec<&str> = details.iter().map(|d| d.item_id.as_str()).collect();
    assert_eq!(resolved, vec!["MLB1", "MLB2"]);
}

#[tokio::test]
async fn performance_is_absent_on_error_status() {
    let client = MarketClient::new(config(TOKEN).await).unwrap();

    let record = client.performance("MLB1").await.unwrap();
    assert_eq!(record.score, Some(72.0));
    assert_eq!(record.pending_count, 1);

    assert!(client.performance("MLB9").await.is_none());
}

#[tokio::test]
async fn rejected_token_maps_to_unauthorized() {
    let client = MarketClient::new(config("APP_USR-9-9-77").await).unwrap();
    assert!(matches!(
        client.advertiser_id().await,
        Err(MarketError::Unauthorized { .. })
    ));
}

#[tokio::test]
async fn connected_api_serves_collector_traits() {
    let api = MarketplaceApi::connect(config(TOKEN).await).await.unwrap();
    assert_eq!(api.advertiser_id(), "42");
    assert_eq!(api.seller_id(), "77");

    let range = DateRange::new("2025-01-01", "2025-01-31");
    assert_eq!(api.campaigns(&range).await.unwrap().len(), 3);

    let details = api
        .item_details(&["MLB2".to_string(), "MLB3".to_string()])
        .await
        .unwrap();
    assert!(details.contains_key("MLB2"));
    assert!(!details.contains_key("MLB3"));
}

#[tokio::test]
async fn run_settings_come_from_market_config() {
    let mut config = config(TOKEN).await;
    config.date_window_days = 14;
    config.performance_concurrency = 3;
    let api = Arc::new(MarketplaceApi::connect(config).await.unwrap());

    let query = api.report_query("run-1");
    assert_eq!(query.request_id, "run-1");
    assert_eq!(query.seller_id, "77");
    assert_eq!(query.window_days, 14);

    assert_eq!(api.pipeline_deps().performance_concurrency, 3);
}
