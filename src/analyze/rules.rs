//! Keyword matcher: maps free text to intent signals via substring rules.
//!
//! Rule shape (JSON, hot-reloaded from `config/signals.json`):
//! - `keywords`:   rule fires if ANY keyword appears (case-insensitive)
//! - `signal`:     catalog label emitted when the rule fires
//! - `confidence`: point estimate attached to the emitted signal
//! - `reasoning`:  short justification attached to the emitted signal
//! - `weight`:     contribution to the running score
//!
//! Rules are independent; each fires at most once per text. The file is
//! reloaded on mtime change at each `current()` call; when no file exists the
//! built-in default rules apply.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

use crate::model::IntentSignal;

#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<SignalRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalRule {
    pub keywords: Vec<String>,
    pub signal: String,
    pub confidence: f32,
    pub reasoning: String,
    pub weight: f32,
}

impl Default for RuleSet {
    fn default() -> Self {
        builtin_rules()
    }
}

/// The three rules the demo ships with. Used whenever `config/signals.json`
/// is absent or unreadable, so the matcher is always available.
pub fn builtin_rules() -> RuleSet {
    RuleSet {
        rules: vec![
            SignalRule {
                keywords: vec![
                    "cro".into(),
                    "chief revenue".into(),
                    "vp sales".into(),
                    "hiring".into(),
                ],
                signal: "CRO Hiring Urgency".into(),
                confidence: 0.85,
                reasoning: "Executive hiring keywords detected".into(),
                weight: 3.0,
            },
            SignalRule {
                keywords: vec![
                    "series a".into(),
                    "series b".into(),
                    "funding".into(),
                    "raised".into(),
                ],
                signal: "Series A Follow-On Needed".into(),
                confidence: 0.80,
                reasoning: "Funding keywords detected".into(),
                weight: 3.0,
            },
            SignalRule {
                keywords: vec![
                    "scaling".into(),
                    "scale".into(),
                    "growth".into(),
                    "expand".into(),
                ],
                signal: "Sales Team Scaling".into(),
                confidence: 0.75,
                reasoning: "Scaling keywords detected".into(),
                weight: 2.0,
            },
        ],
    }
}

#[derive(Debug)]
pub struct HotReloadRules {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    rules: RuleSet,
    last_modified: Option<SystemTime>,
}

impl HotReloadRules {
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config/signals.json"));
        Self {
            path,
            inner: RwLock::new(State {
                rules: RuleSet::default(),
                last_modified: None,
            }),
        }
    }

    pub fn current(&self) -> RuleSet {
        let (needs_reload, _new_mtime) = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap();
                let changed = guard.last_modified != Some(mtime);
                (changed, Some(mtime))
            }
            Err(_) => (false, None),
        };

        if !needs_reload {
            return self.inner.read().unwrap().rules.clone();
        }

        let mut guard = self.inner.write().unwrap();
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    if let Ok(rules) = load_rules_file(&self.path) {
                        guard.rules = rules;
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.rules.clone()
    }
}

pub fn load_rules_file(path: &Path) -> io::Result<RuleSet> {
    let bytes = fs::read(path)?;
    let rules: RuleSet = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(rules)
}

/// Apply `rules` to `text`. Returns the emitted signals in rule order plus
/// the accumulated score. Unmatched (or empty) text yields `([], 0.0)`.
/// Never fails; no side effects.
pub fn match_signals(text: &str, rules: &RuleSet) -> (Vec<IntentSignal>, f32) {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return (Vec::new(), 0.0);
    }

    let mut signals: Vec<IntentSignal> = Vec::new();
    let mut score: f32 = 0.0;

    for rule in &rules.rules {
        let fired = rule.keywords.iter().any(|kw| contains(&normalized, kw));
        if fired {
            signals.push(IntentSignal::new(
                rule.signal.clone(),
                rule.confidence,
                rule.reasoning.clone(),
            ));
            score += rule.weight;
        }
    }

    (signals, score)
}

// --- internals ---

fn contains(normalized_text: &str, pat: &str) -> bool {
    let p = normalize(pat);
    if p.is_empty() {
        return true;
    }
    normalized_text.contains(p.as_str())
}

/// Lowercase and condense whitespace so multi-word keywords match across
/// line breaks and double spaces.
fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(lc);
            last_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_fire_on_funding_and_hiring() {
        let rules = builtin_rules();
        let (signals, score) =
            match_signals("We just closed our Series A and are hiring a VP Sales", &rules);
        let names: Vec<&str> = signals.iter().map(|s| s.signal.as_str()).collect();
        assert!(names.contains(&"CRO Hiring Urgency"));
        assert!(names.contains(&"Series A Follow-On Needed"));
        assert_eq!(score, 6.0);
    }

    #[test]
    fn rule_fires_once_even_with_multiple_keyword_hits() {
        let rules = builtin_rules();
        // "hiring" and "vp sales" both belong to the hiring rule.
        let (signals, score) = match_signals("hiring a VP Sales, hiring fast", &rules);
        assert_eq!(signals.len(), 1);
        assert_eq!(score, 3.0);
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        let rules = builtin_rules();
        let (signals, _) = match_signals("  SERIES   A\tclosed ", &rules);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal, "Series A Follow-On Needed");
    }

    #[test]
    fn empty_and_unmatched_text_yield_zero() {
        let rules = builtin_rules();
        assert_eq!(match_signals("", &rules), (vec![], 0.0));
        let (signals, score) = match_signals("the weather is nice today", &rules);
        assert!(signals.is_empty());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn rules_parse_from_json() {
        let json = r#"{
            "rules": [
                {
                    "keywords": ["pipeline"],
                    "signal": "Pipeline Anxiety",
                    "confidence": 0.9,
                    "reasoning": "Pipeline keywords detected",
                    "weight": 4.0
                }
            ]
        }"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();
        let (signals, score) = match_signals("our pipeline is inconsistent", &rules);
        assert_eq!(signals[0].signal, "Pipeline Anxiety");
        assert_eq!(score, 4.0);
    }

    #[test]
    fn builtin_signals_are_catalog_entries() {
        for rule in builtin_rules().rules {
            assert!(
                crate::catalog::is_known_signal(&rule.signal),
                "rule emits unknown signal: {}",
                rule.signal
            );
        }
    }
}
