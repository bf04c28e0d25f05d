//! Analysis pipeline entry: keyword baseline plus optional AI enhancement.
//!
//! The keyword path is the guaranteed baseline; the AI path may replace it
//! wholesale, but only when its score is strictly higher, and every AI
//! failure mode is absorbed here as a soft fallback.

pub mod ai_adapter;
pub mod rerank;
pub mod rules;
pub mod scoring;

use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::model::AnalysisResult;

// Re-export convenient types.
pub use crate::analyze::ai_adapter::{AiOutcome, DynAiClient, SoftFailure};
pub use crate::analyze::rules::{HotReloadRules, RuleSet};
pub use crate::analyze::scoring::ScoringConfig;

/// Global hot-reloaded rule config.
static HOT_RULES: OnceLock<HotReloadRules> = OnceLock::new();

fn hot_rules() -> RuleSet {
    HOT_RULES.get_or_init(|| HotReloadRules::new(None)).current()
}

/// Pure keyword analysis over an explicit rule set. Deterministic: identical
/// input yields identical output.
pub fn keyword_analysis(text: &str, rules: &RuleSet, cfg: &ScoringConfig) -> AnalysisResult {
    let (signals, score) = rules::match_signals(text, rules);
    let priority = cfg.priority_for(score);
    AnalysisResult::clamped(signals, priority, score)
}

/// Keyword analysis with the service-wide (hot-reloaded) rule set.
pub fn analyze_keywords(text: &str, cfg: &ScoringConfig) -> AnalysisResult {
    keyword_analysis(text, &hot_rules(), cfg)
}

/// Full content analysis: keyword baseline first, then a deadline-bounded AI
/// assessment that wins only when its score is strictly higher.
///
/// Never errors. Absence of any signal is a valid terminal state
/// (`signals=[]`, `priority=Low`, `score=0`).
pub async fn analyze_content(
    text: &str,
    context: Option<&str>,
    ai: &DynAiClient,
    cfg: &ScoringConfig,
) -> AnalysisResult {
    let baseline = analyze_keywords(text, cfg);

    let ctx = context.unwrap_or("");
    match tokio::time::timeout(cfg.ai_deadline, ai.assess(text, ctx)).await {
        Ok(Ok(ai_result)) => {
            if ai_result.score > baseline.score {
                debug!(
                    target: "analyze",
                    id = %anon_hash(text),
                    ai_score = ai_result.score,
                    keyword_score = baseline.score,
                    "AI assessment replaces keyword result"
                );
                return AnalysisResult::clamped(
                    ai_result.intent_signals,
                    ai_result.priority,
                    ai_result.score,
                );
            }
            debug!(
                target: "analyze",
                id = %anon_hash(text),
                "AI score not higher than keyword baseline; keeping keyword result"
            );
        }
        Ok(Err(SoftFailure::Disabled)) => {}
        Ok(Err(reason)) => {
            warn!(target: "analyze", id = %anon_hash(text), %reason, "AI assessment failed; using keyword fallback");
        }
        // Deadline expired: proceed immediately, discard the late reply.
        Err(_elapsed) => {
            warn!(target: "analyze", id = %anon_hash(text), reason = %SoftFailure::Timeout, "AI assessment failed; using keyword fallback");
        }
    }

    baseline
}

/// Short hash for log correlation. Raw content is never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
