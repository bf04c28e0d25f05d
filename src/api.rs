//! Thin HTTP plumbing over the analysis core. Handlers extract, delegate to
//! `analyze`/`rerank`, and serialize; no decision logic lives here.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::analyze::{self, ai_adapter, DynAiClient, ScoringConfig};
use crate::analyze::rerank::rank_items;
use crate::fallback::{self, ContentKind};
use crate::model::{AnalysisResult, ContentItem, Priority};

#[derive(Clone)]
pub struct AppState {
    pub ai: DynAiClient,
    pub scoring: Arc<ScoringConfig>,
}

impl AppState {
    /// Client from `config/ai.json`, scoring knobs from env/defaults.
    pub fn from_env() -> Self {
        Self {
            ai: ai_adapter::build_ai_client(),
            scoring: Arc::new(ScoringConfig::from_env()),
        }
    }

    /// Explicit injection point for tests and alternative providers.
    pub fn with_client(ai: DynAiClient) -> Self {
        Self {
            ai,
            scoring: Arc::new(ScoringConfig::from_env()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/", get(root))
        .route("/api/analyze-content", post(analyze_content))
        .route("/api/leads", get(get_leads))
        .route("/api/live-tweets", get(get_live_tweets))
        .route("/api/startup-news", get(get_startup_news))
        .route("/api/deals", get(get_deals))
        .route("/api/stats", get(get_stats))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Growth Signals API v1.0.0", "status": "operational" }))
}

#[derive(Deserialize)]
struct AnalyzeContentReq {
    content: String,
    #[serde(default)]
    company_context: Option<String>,
}

async fn analyze_content(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeContentReq>,
) -> Json<AnalysisResult> {
    let result = analyze::analyze_content(
        &body.content,
        body.company_context.as_deref(),
        &state.ai,
        &state.scoring,
    )
    .await;
    Json(result)
}

#[derive(Deserialize)]
struct LeadsQuery {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    geography: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    min_score: Option<f32>,
    #[serde(default)]
    context: Option<String>,
}

async fn get_leads(
    State(state): State<AppState>,
    Query(q): Query<LeadsQuery>,
) -> Json<serde_json::Value> {
    let items = fallback::baseline(ContentKind::Leads);
    let ranked = rank_items(items, q.context.as_deref(), &state.ai, &state.scoring).await;

    let leads: Vec<ContentItem> = ranked
        .into_iter()
        .filter(|item| lead_passes_filters(item, &q))
        .collect();
    let total = leads.len();

    Json(json!({ "leads": leads, "total": total }))
}

fn lead_passes_filters(item: &ContentItem, q: &LeadsQuery) -> bool {
    let ContentItem::Lead(lead) = item else {
        return false;
    };
    if let Some(role) = &q.role {
        if !lead.role.to_lowercase().contains(&role.to_lowercase()) {
            return false;
        }
    }
    if let Some(geo) = &q.geography {
        if !lead.geography.to_lowercase().contains(&geo.to_lowercase()) {
            return false;
        }
    }
    if let Some(priority) = &q.priority {
        if !lead.priority.as_str().eq_ignore_ascii_case(priority) {
            return false;
        }
    }
    if let Some(min) = q.min_score {
        if lead.score < min {
            return false;
        }
    }
    true
}

#[derive(Deserialize)]
struct TweetsQuery {
    #[serde(default)]
    search_context: Option<String>,
}

async fn get_live_tweets(
    State(state): State<AppState>,
    Query(q): Query<TweetsQuery>,
) -> Json<serde_json::Value> {
    let mut items = fallback::baseline(ContentKind::Tweets);

    // Attach per-post intent analysis before ranking so signal-term boosts
    // can see the detected signals.
    for item in items.iter_mut() {
        if let ContentItem::Post(post) = item {
            let analysis = analyze::analyze_content(
                &post.content,
                q.search_context.as_deref(),
                &state.ai,
                &state.scoring,
            )
            .await;
            post.intent_analysis = Some(analysis);
        }
    }

    let ranked = rank_items(items, q.search_context.as_deref(), &state.ai, &state.scoring).await;
    let total = ranked.len();
    Json(json!({ "tweets": ranked, "total": total }))
}

#[derive(Deserialize)]
struct ContextQuery {
    #[serde(default)]
    context: Option<String>,
}

async fn get_startup_news(
    State(state): State<AppState>,
    Query(q): Query<ContextQuery>,
) -> Json<serde_json::Value> {
    let items = fallback::baseline(ContentKind::News);
    let ranked = rank_items(items, q.context.as_deref(), &state.ai, &state.scoring).await;
    let total = ranked.len();
    Json(json!({ "news": ranked, "total": total }))
}

async fn get_deals(
    State(state): State<AppState>,
    Query(q): Query<ContextQuery>,
) -> Json<serde_json::Value> {
    let items = fallback::baseline(ContentKind::Deals);
    let ranked = rank_items(items, q.context.as_deref(), &state.ai, &state.scoring).await;
    let total = ranked.len();
    Json(json!({ "deals": ranked, "total": total }))
}

async fn get_stats(State(_state): State<AppState>) -> Json<serde_json::Value> {
    let leads = fallback::baseline(ContentKind::Leads);
    let total = leads.len();
    let mut high = 0usize;
    let mut signals = 0usize;
    let mut score_sum = 0.0f32;
    for item in &leads {
        if let ContentItem::Lead(l) = item {
            if l.priority == Priority::High {
                high += 1;
            }
            signals += l.intent_signals.len();
            score_sum += l.score;
        }
    }
    let avg = if total > 0 {
        score_sum / total as f32
    } else {
        0.0
    };

    Json(json!({
        "total_leads": total,
        "high_priority_leads": high,
        "avg_lead_score": (avg * 10.0).round() / 10.0,
        "total_signals_detected": signals,
    }))
}
