//! Shared data model: intent signals, analysis results, and the tagged
//! content variants the ranker operates on.
//!
//! The four content types (leads, posts, news, deals) expose a narrow shared
//! interface (`searchable_text`, `keywords`, score get/set) used uniformly by
//! the re-ranker; everything else is display data outside the ranking
//! contract.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound for item/analysis scores. Everything user-visible is clamped
/// into `[0, SCORE_CEILING]`.
pub const SCORE_CEILING: f32 = 10.0;

/// Three-tier classification derived from an accumulated numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// A named indicator that a piece of text expresses a specific business
/// growth/buying behavior. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSignal {
    /// Label from the signal catalog, e.g. "CRO Hiring Urgency".
    pub signal: String,
    /// Point estimate in `[0, 1]`, not a probability distribution.
    pub confidence: f32,
    /// Short human-readable justification.
    pub reasoning: String,
}

impl IntentSignal {
    pub fn new(signal: impl Into<String>, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            confidence: clamp01(confidence),
            reasoning: reasoning.into(),
        }
    }
}

/// Final shape returned by content analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub intent_signals: Vec<IntentSignal>,
    pub priority: Priority,
    pub score: f32,
    pub relevance_score: f32,
}

impl AnalysisResult {
    /// The degenerate zero result: valid terminal state for unmatched text.
    pub fn empty() -> Self {
        Self {
            intent_signals: Vec::new(),
            priority: Priority::Low,
            score: 0.0,
            relevance_score: 0.0,
        }
    }

    /// Build a result with both score fields clamped into `[0, 10]`.
    pub fn clamped(intent_signals: Vec<IntentSignal>, priority: Priority, score: f32) -> Self {
        let s = clamp_score(score);
        Self {
            intent_signals,
            priority,
            score: s,
            relevance_score: s,
        }
    }
}

/// A prospective business contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub id: String,
    pub company: String,
    pub name: String,
    pub role: String,
    pub geography: String,
    pub priority: Priority,
    pub score: f32,
    #[serde(default)]
    pub intent_signals: Vec<IntentSignal>,
    pub social_content: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub context_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_boost: Option<usize>,
}

fn default_status() -> String {
    "New".to_string()
}

/// A social post (tweet-shaped) with optional attached intent analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    #[serde(default)]
    pub id: String,
    pub tweet_id: String,
    pub content: String,
    pub author_name: String,
    pub author_handle: String,
    #[serde(default)]
    pub engagement_metrics: HashMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_analysis: Option<AnalysisResult>,
    pub relevance_score: f32,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub context_match: bool,
}

/// A startup/funding news item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub category: String,
    pub relevance_score: f32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub context_match: bool,
}

/// A deal announcement (financing round or M&A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub title: String,
    pub description: String,
    pub company: String,
    #[serde(rename = "type")]
    pub deal_type: String,
    pub amount: String,
    pub relevance_score: f32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub context_match: bool,
}

/// Tagged content variant. The re-ranker only touches the shared subset
/// below; it never inspects variant-specific display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    Lead(Lead),
    Post(SocialPost),
    Deal(Deal),
    News(NewsItem),
}

impl ContentItem {
    /// Lowercased text the context tokens are matched against.
    pub fn searchable_text(&self) -> String {
        match self {
            ContentItem::Lead(l) => format!(
                "{} {} {} {}",
                l.role, l.company, l.geography, l.social_content
            )
            .to_lowercase(),
            ContentItem::Post(p) => p.content.to_lowercase(),
            ContentItem::News(n) => format!("{} {}", n.title, n.description).to_lowercase(),
            ContentItem::Deal(d) => format!("{} {}", d.title, d.description).to_lowercase(),
        }
    }

    /// Lowercased keyword set per variant: signal labels for leads, hashtags
    /// for posts, category/type for news and deals.
    pub fn keywords(&self) -> Vec<String> {
        match self {
            ContentItem::Lead(l) => l
                .intent_signals
                .iter()
                .map(|s| s.signal.to_lowercase())
                .collect(),
            ContentItem::Post(p) => parse_hashtags(&p.content),
            ContentItem::News(n) => vec![n.category.to_lowercase()],
            ContentItem::Deal(d) => vec![d.deal_type.to_lowercase()],
        }
    }

    /// The score field the ranker orders by.
    pub fn ranking_score(&self) -> f32 {
        match self {
            ContentItem::Lead(l) => l.score,
            ContentItem::Post(p) => p.relevance_score,
            ContentItem::News(n) => n.relevance_score,
            ContentItem::Deal(d) => d.relevance_score,
        }
    }

    pub fn set_ranking_score(&mut self, score: f32) {
        let s = clamp_score(score);
        match self {
            ContentItem::Lead(l) => l.score = s,
            ContentItem::Post(p) => p.relevance_score = s,
            ContentItem::News(n) => n.relevance_score = s,
            ContentItem::Deal(d) => d.relevance_score = s,
        }
    }

    /// Record that `matches` context tokens hit this item.
    pub fn mark_context_match(&mut self, matches: usize) {
        match self {
            ContentItem::Lead(l) => {
                l.context_match = true;
                l.relevance_boost = Some(matches);
            }
            ContentItem::Post(p) => p.context_match = true,
            ContentItem::News(n) => n.context_match = true,
            ContentItem::Deal(d) => d.context_match = true,
        }
    }

    /// True if the item already carries the named intent signal. Only leads
    /// and analyzed posts can carry signals.
    pub fn carries_signal(&self, signal: &str) -> bool {
        match self {
            ContentItem::Lead(l) => l.intent_signals.iter().any(|s| s.signal == signal),
            ContentItem::Post(p) => p
                .intent_analysis
                .as_ref()
                .map(|a| a.intent_signals.iter().any(|s| s.signal == signal))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Secondary boosts may escalate a lead to High priority; a no-op for
    /// variants without a priority field.
    pub fn escalate_priority(&mut self) {
        if let ContentItem::Lead(l) = self {
            l.priority = Priority::High;
        }
    }
}

/// Extract hashtags like `#SeriesA`, `#hiring`.
/// Returns distinct, lowercased tags (without `#`).
pub fn parse_hashtags(input: &str) -> Vec<String> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)(?P<tag>#[a-z0-9_]+)\b").expect("hashtag regex"));
    let mut tags = Vec::new();
    for caps in RE.captures_iter(input) {
        if let Some(m) = caps.name("tag") {
            tags.push(m.as_str()[1..].to_ascii_lowercase());
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Clamp into `[0, 10]` regardless of upstream arithmetic.
pub fn clamp_score(x: f32) -> f32 {
    if x.is_finite() {
        x.clamp(0.0, SCORE_CEILING)
    } else {
        0.0
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
