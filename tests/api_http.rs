// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/
// - POST /api/analyze-content
// - GET /api/leads (context ranking + filters)
// - GET /api/deals
// - GET /api/stats

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use growth_signals::ai_adapter::DisabledClient;
use growth_signals::api::{create_router, AppState};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Router with AI disabled so tests are deterministic and offline.
fn test_router() -> Router {
    create_router(AppState::with_client(Arc::new(DisabledClient)))
}

async fn get_json(app: Router, uri: &str) -> Json {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET request");
    let resp = app.oneshot(req).await.expect("oneshot");
    assert!(
        resp.status().is_success(),
        "GET {uri} should be 2xx, got {}",
        resp.status()
    );
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).unwrap(), "ok");
}

#[tokio::test]
async fn root_reports_operational() {
    let v = get_json(test_router(), "/api/").await;
    assert_eq!(v["status"], json!("operational"));
}

#[tokio::test]
async fn analyze_content_returns_expected_json_fields() {
    let app = test_router();

    let payload = json!({
        "content": "Fresh off our $8M Series A! Scaling the sales team 5x.",
        "company_context": "B2B SaaS"
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/analyze-content")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /api/analyze-content");

    let resp = app.oneshot(req).await.expect("oneshot analyze-content");
    assert!(resp.status().is_success());

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse analyze json");

    // Contract checks for UI consumers
    assert!(v.get("intent_signals").is_some(), "missing 'intent_signals'");
    assert!(v.get("priority").is_some(), "missing 'priority'");
    assert!(v.get("score").is_some(), "missing 'score'");
    assert!(v.get("relevance_score").is_some(), "missing 'relevance_score'");

    // Funding + scaling rules fire: score 5.0 and High tier.
    assert_eq!(v["score"].as_f64().unwrap(), 5.0);
    assert_eq!(v["priority"], json!("High"));
}

#[tokio::test]
async fn analyze_content_rejects_missing_content_field() {
    let app = test_router();
    let req = Request::builder()
        .method("POST")
        .uri("/api/analyze-content")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "wrong field" }).to_string()))
        .expect("build POST");

    let resp = app.oneshot(req).await.expect("oneshot");
    assert!(
        resp.status().is_client_error(),
        "invalid input must surface as a 4xx, got {}",
        resp.status()
    );
}

#[tokio::test]
async fn leads_are_sorted_descending_when_context_given() {
    let v = get_json(test_router(), "/api/leads?context=cro%20hiring").await;

    let leads = v["leads"].as_array().expect("leads array");
    assert!(!leads.is_empty(), "fallback leads must be non-empty");
    assert_eq!(v["total"].as_u64().unwrap() as usize, leads.len());

    let scores: Vec<f64> = leads
        .iter()
        .map(|l| l["score"].as_f64().expect("score"))
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "scores not descending: {scores:?}");
    }
    // The CloudSync lead carries the CRO signal and must be escalated.
    let cloudsync = leads
        .iter()
        .find(|l| l["company"] == json!("CloudSync"))
        .expect("CloudSync lead present");
    assert_eq!(cloudsync["priority"], json!("High"));
    assert_eq!(cloudsync["context_match"], json!(true));
}

#[tokio::test]
async fn leads_filters_compose_with_ranking() {
    let v = get_json(
        test_router(),
        "/api/leads?role=ceo&priority=High&min_score=8.0",
    )
    .await;
    let leads = v["leads"].as_array().expect("leads array");
    for lead in leads {
        assert_eq!(lead["role"], json!("CEO"));
        assert_eq!(lead["priority"], json!("High"));
        assert!(lead["score"].as_f64().unwrap() >= 8.0);
    }
}

#[tokio::test]
async fn deals_endpoint_serves_fallback_collection() {
    let v = get_json(test_router(), "/api/deals?context=saas%20platform").await;
    let deals = v["deals"].as_array().expect("deals array");
    assert!(!deals.is_empty());
    for deal in deals {
        assert!(deal.get("type").is_some(), "deal missing 'type'");
        assert!(deal.get("amount").is_some(), "deal missing 'amount'");
    }
}

#[tokio::test]
async fn news_without_context_keeps_fixture_order() {
    let v = get_json(test_router(), "/api/startup-news").await;
    let news = v["news"].as_array().expect("news array");
    assert!(!news.is_empty());
    assert_eq!(
        news[0]["source"],
        json!("PitchBook"),
        "identity ranking must keep fixture order"
    );
}

#[tokio::test]
async fn live_tweets_attach_intent_analysis() {
    let v = get_json(test_router(), "/api/live-tweets?search_context=funding").await;
    let tweets = v["tweets"].as_array().expect("tweets array");
    assert!(!tweets.is_empty());
    for tweet in tweets {
        let analysis = tweet
            .get("intent_analysis")
            .expect("tweet missing intent_analysis");
        assert!(analysis.get("priority").is_some());
        assert!(analysis.get("score").is_some());
    }
}

#[tokio::test]
async fn stats_summarize_the_lead_baseline() {
    let v = get_json(test_router(), "/api/stats").await;
    let total = v["total_leads"].as_u64().expect("total_leads");
    assert!(total > 0);
    assert!(v["high_priority_leads"].as_u64().unwrap() <= total);
    let avg = v["avg_lead_score"].as_f64().unwrap();
    assert!((0.0..=10.0).contains(&avg));
}
