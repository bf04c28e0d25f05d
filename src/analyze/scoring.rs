//! Scoring constants and the score → priority mapping.
//!
//! Thresholds are configuration, not per-call literals: the service builds
//! one `ScoringConfig` at startup (env overrides allowed) and threads it
//! through the combiner and the re-ranker.

use std::time::Duration;

use crate::model::Priority;

// --- env names ---
pub const ENV_HIGH_THRESHOLD: &str = "SIGNALS_HIGH_THRESHOLD";
pub const ENV_MEDIUM_THRESHOLD: &str = "SIGNALS_MEDIUM_THRESHOLD";
pub const ENV_AI_DEADLINE_SECS: &str = "SIGNALS_AI_DEADLINE_SECS";

/// Tuning knobs shared by the combiner and the re-ranker.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Running score at or above this maps to `Priority::High`.
    pub high_threshold: f32,
    /// Running score at or above this (and below high) maps to `Medium`.
    pub medium_threshold: f32,
    /// Per-token-match additive boost applied during re-ranking.
    pub boost_unit: f32,
    /// Secondary boost when context terms corroborate a carried signal.
    pub signal_term_boost: f32,
    /// Smaller secondary boost for the scaling term group.
    pub scaling_term_boost: f32,
    /// Hard deadline for any single AI call. On expiry the keyword result
    /// stands and a late AI reply is discarded.
    pub ai_deadline: Duration,
    /// How many items of a collection are offered to AI rescoring.
    pub ai_rerank_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_threshold: 5.0,
            medium_threshold: 2.0,
            boost_unit: 0.5,
            signal_term_boost: 2.0,
            scaling_term_boost: 1.5,
            ai_deadline: Duration::from_secs(5),
            ai_rerank_limit: 8,
        }
    }
}

impl ScoringConfig {
    /// Defaults with optional env overrides; bad values fall back silently.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = parse_f32_env(ENV_HIGH_THRESHOLD) {
            cfg.high_threshold = v;
        }
        if let Some(v) = parse_f32_env(ENV_MEDIUM_THRESHOLD) {
            cfg.medium_threshold = v;
        }
        if let Some(secs) = parse_f32_env(ENV_AI_DEADLINE_SECS) {
            if secs > 0.0 {
                cfg.ai_deadline = Duration::from_secs_f32(secs);
            }
        }
        // Keep the interval valid even with odd overrides.
        if cfg.medium_threshold > cfg.high_threshold {
            std::mem::swap(&mut cfg.medium_threshold, &mut cfg.high_threshold);
        }
        cfg
    }

    /// Deterministic, monotonic mapping from accumulated score to tier.
    pub fn priority_for(&self, score: f32) -> Priority {
        if score >= self.high_threshold {
            Priority::High
        } else if score >= self.medium_threshold {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

fn parse_f32_env(name: &str) -> Option<f32> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
}
