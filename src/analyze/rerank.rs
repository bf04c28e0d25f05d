//! Contextual re-ranker: boosts items whose content or keywords overlap the
//! caller's targeting context, then sorts descending by score.
//!
//! Ordering is stable: exact score ties keep insertion order. An empty or
//! absent context is an identity ranking with no scoring side effects.

use tracing::{debug, warn};

use crate::analyze::ai_adapter::DynAiClient;
use crate::analyze::scoring::ScoringConfig;
use crate::model::ContentItem;

/// Context terms that corroborate a carried signal and earn a secondary
/// boost. Tuple: (term group, signal label, escalate priority to High).
const SIGNAL_TERM_GROUPS: &[(&[&str], &str, bool)] = &[
    (&["cro", "chief revenue", "vp sales"], "CRO Hiring Urgency", true),
    (
        &["series a", "series b", "funding", "raised"],
        "Series A Follow-On Needed",
        true,
    ),
    (&["scaling", "scale", "growth"], "Sales Team Scaling", false),
];

/// Max snippet length offered to AI rescoring, to respect payload limits.
const SNIPPET_CHARS: usize = 200;

/// Case-folded whitespace tokenization of a context string.
pub fn context_tokens(context: &str) -> Vec<String> {
    context
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of context tokens hitting this item: substring hits on the
/// searchable text plus overlap with the item's keyword set. Both signals
/// are additive.
pub fn match_count(item: &ContentItem, tokens: &[String]) -> usize {
    let text = item.searchable_text();
    let keywords = item.keywords();

    let content_hits = tokens.iter().filter(|t| text.contains(t.as_str())).count();
    let keyword_hits = tokens
        .iter()
        .filter(|t| keywords.iter().any(|k| k == *t))
        .count();

    content_hits + keyword_hits
}

/// Rank a heterogeneous collection against `context`. Total over any input;
/// a zero-item collection returns empty.
pub async fn rank_items(
    mut items: Vec<ContentItem>,
    context: Option<&str>,
    ai: &DynAiClient,
    cfg: &ScoringConfig,
) -> Vec<ContentItem> {
    let context = context.unwrap_or("").trim();
    if context.is_empty() || items.is_empty() {
        return items;
    }

    let context_lower = context.to_lowercase();
    let tokens = context_tokens(context);

    for item in items.iter_mut() {
        let matches = match_count(item, &tokens);
        if matches > 0 {
            let boosted = item.ranking_score() + matches as f32 * cfg.boost_unit;
            item.set_ranking_score(boosted);
            item.mark_context_match(matches);
        }
        apply_signal_term_boosts(item, &context_lower, cfg);
    }

    rescore_prefix_with_ai(&mut items, &context_lower, ai, cfg).await;

    sort_desc_stable(&mut items);
    items
}

/// Secondary boost: a curated context term plus an already-carried matching
/// signal is stronger evidence than raw token overlap.
fn apply_signal_term_boosts(item: &mut ContentItem, context_lower: &str, cfg: &ScoringConfig) {
    for (terms, signal, escalate) in SIGNAL_TERM_GROUPS {
        let term_hit = terms.iter().any(|t| context_lower.contains(t));
        if term_hit && item.carries_signal(signal) {
            let boost = if *escalate {
                cfg.signal_term_boost
            } else {
                cfg.scaling_term_boost
            };
            item.set_ranking_score(item.ranking_score() + boost);
            if *escalate {
                item.escalate_priority();
            }
        }
    }
}

/// Offer a bounded prefix of the collection to AI rescoring. On success the
/// returned scores overwrite the boosted ones; on any soft failure or
/// deadline expiry the keyword boosts stand and the late reply is dropped.
async fn rescore_prefix_with_ai(
    items: &mut [ContentItem],
    context: &str,
    ai: &DynAiClient,
    cfg: &ScoringConfig,
) {
    let limit = cfg.ai_rerank_limit.min(items.len());
    if limit == 0 {
        return;
    }

    let snippets: Vec<String> = items[..limit]
        .iter()
        .map(|it| it.searchable_text().chars().take(SNIPPET_CHARS).collect())
        .collect();

    match tokio::time::timeout(cfg.ai_deadline, ai.rescore(context, &snippets)).await {
        Ok(Ok(scores)) => {
            debug!(target: "rerank", n = scores.len(), "AI rescoring applied");
            for (item, score) in items.iter_mut().zip(scores) {
                item.set_ranking_score(score);
            }
        }
        Ok(Err(super::SoftFailure::Disabled)) => {}
        Ok(Err(reason)) => {
            warn!(target: "rerank", %reason, "AI rescoring failed; keeping keyword boosts");
        }
        Err(_elapsed) => {
            warn!(target: "rerank", reason = %super::SoftFailure::Timeout, "AI rescoring failed; keeping keyword boosts");
        }
    }
}

/// Stable descending sort on the ranking score; ties keep prior order.
pub fn sort_desc_stable(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.ranking_score().total_cmp(&a.ranking_score()));
}
