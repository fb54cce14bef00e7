//! In-process scenario tests for the radar HTTP endpoints.
//!
//! The router is driven with `tower::ServiceExt::oneshot`; no socket is bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use radar_api::{build_router, AppState};
use radar_core::domain::radar::{Nation, SalesRecord};
use radar_core::ingest::mock::MockSalesSource;
use radar_core::ingest::types::MonthlySales;
use radar_core::ingest::SalesDataSource;
use radar_core::service::RadarService;
use radar_core::storage::cache::RadarCache;
use radar_core::time::month::Month;

/// Three-model scenario: A 100/50, B 80/80, C 60/new.
struct FixedSource {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl SalesDataSource for FixedSource {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch_month_sales(&self, month: Month, nation: Nation) -> anyhow::Result<MonthlySales> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records = if month.to_string() == "2024-05" {
            vec![
                SalesRecord::new("X", "A", 100),
                SalesRecord::new("X", "B", 80),
                SalesRecord::new("X", "C", 60),
            ]
        } else {
            vec![SalesRecord::new("X", "A", 50), SalesRecord::new("X", "B", 80)]
        };
        Ok(MonthlySales {
            month,
            nation,
            records,
        })
    }
}

struct BrokenSource;

#[async_trait::async_trait]
impl SalesDataSource for BrokenSource {
    fn source_name(&self) -> &'static str {
        "broken"
    }

    async fn fetch_month_sales(&self, _: Month, _: Nation) -> anyhow::Result<MonthlySales> {
        anyhow::bail!("upstream timed out")
    }
}

fn router_with(source: Arc<dyn SalesDataSource>) -> axum::Router {
    build_router(AppState {
        service: RadarService::new(source, RadarCache::new()),
    })
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn healthz_returns_ok() {
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let resp = router_with(Arc::new(MockSalesSource)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn radar_returns_ranked_and_scored_models() {
    let source = Arc::new(FixedSource {
        calls: AtomicUsize::new(0),
    });
    let router = router_with(source.clone());

    let (status, json) = get(router.clone(), "/api/radar?month=2024-05&nation=domestic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["month"], "2024-05");
    assert_eq!(json["nation"], "domestic");
    assert!(json["fetchedAt"].is_string());

    let models = json["models"].as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["modelName"], "A");
    assert_eq!(models[0]["rank"], 1);
    assert_eq!(models[0]["prevRank"], 2);
    assert_eq!(models[0]["rankChange"], 1);
    assert_eq!(models[1]["modelName"], "B");
    assert_eq!(models[1]["momAbs"], 0);
    assert_eq!(models[1]["score"], 0.0);
    assert_eq!(models[2]["modelName"], "C");
    assert_eq!(models[2]["prevRank"], serde_json::Value::Null);
    assert_eq!(models[2]["prevSales"], 0);
    assert_eq!(models[2]["momPct"], 5.0);
    assert!(models[2]["score"].as_f64().unwrap() > models[0]["score"].as_f64().unwrap());

    // Second request is served from the cache.
    let (status, again) = get(router, "/api/radar?month=2024-05&nation=domestic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, json);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn radar_rejects_bad_parameters_with_field_details() {
    let router = router_with(Arc::new(MockSalesSource));

    let (status, json) = get(router.clone(), "/api/radar?month=2024-5&nation=domestic").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid parameters");
    assert_eq!(json["details"][0]["field"], "month");
    assert_eq!(json["details"][0]["message"], "Month must be in YYYY-MM format");

    let (status, json) = get(router.clone(), "/api/radar?month=2024-05&nation=mars").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"][0]["field"], "nation");

    let (status, json) = get(router, "/api/radar").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn radar_hides_source_failures_behind_generic_error() {
    let router = router_with(Arc::new(BrokenSource));
    let (status, json) = get(router, "/api/radar?month=2024-05&nation=export").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to fetch radar data" }));
}

#[tokio::test]
async fn rising_view_is_filtered_sorted_and_capped() {
    let router = router_with(Arc::new(MockSalesSource));
    let (status, json) = get(
        router,
        "/api/radar/rising?month=2024-05&nation=domestic&minSales=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let models = json["models"].as_array().unwrap();
    assert!(models.len() <= 20);
    assert!(models.iter().all(|m| m["momAbs"].as_i64().unwrap() > 0));
    let scores: Vec<f64> = models.iter().map(|m| m["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let stats = &json["stats"];
    let total = stats["total"].as_u64().unwrap();
    let rising = stats["rising"].as_u64().unwrap();
    let falling = stats["falling"].as_u64().unwrap();
    assert!(total > 0);
    assert!(rising + falling <= total);
    assert!(rising >= models.len() as u64);
}

#[tokio::test]
async fn rising_view_honors_filters() {
    let router = router_with(Arc::new(FixedSource {
        calls: AtomicUsize::new(0),
    }));
    let (status, json) = get(
        router.clone(),
        "/api/radar/rising?month=2024-05&nation=domestic&minSales=0&excludeNewEntries=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = json["models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["modelName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["A"]);
    assert_eq!(json["stats"]["rising"], 2);
    assert_eq!(json["filters"]["excludeNewEntries"], true);

    // Default minSales (300) drops every fixture model.
    let (_, json) = get(router.clone(), "/api/radar/rising?month=2024-05&nation=domestic").await;
    assert!(json["models"].as_array().unwrap().is_empty());

    let (status, json) = get(
        router,
        "/api/radar/rising?month=2024-05&nation=domestic&limit=abc",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"][0]["field"], "limit");
}

#[tokio::test]
async fn months_lists_twelve_previous_months() {
    let (status, json) = get(router_with(Arc::new(MockSalesSource)), "/api/months").await;
    assert_eq!(status, StatusCode::OK);
    let months = json["months"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    let first: Month = months[0].as_str().unwrap().parse().unwrap();
    let second: Month = months[1].as_str().unwrap().parse().unwrap();
    assert_eq!(first.prev(), second);
}
