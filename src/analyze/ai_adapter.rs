//! AI enhancer adapter: provider abstraction with explicit soft-failure
//! results. No failure on this path ever reaches a caller as an error; the
//! combiner and re-ranker branch on `AiOutcome` instead of catching anything.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog;
use crate::model::{IntentSignal, Priority};

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// Well-formed payload from an AI assessment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub intent_signals: Vec<IntentSignal>,
    pub priority: Priority,
    pub score: f32,
}

/// Why an AI call produced nothing usable. Every variant is recoverable
/// locally; callers fall back to the keyword result and log the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftFailure {
    /// Capability not configured (no provider, no key).
    Disabled,
    /// Deadline expired before a usable reply arrived.
    Timeout,
    /// Connection/transport-level error.
    Transport(String),
    /// Non-success HTTP status from the provider.
    Http(u16),
    /// Reply arrived but could not be parsed into the expected shape.
    Malformed,
}

impl fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftFailure::Disabled => write!(f, "ai disabled"),
            SoftFailure::Timeout => write!(f, "ai deadline expired"),
            SoftFailure::Transport(e) => write!(f, "ai transport error: {e}"),
            SoftFailure::Http(code) => write!(f, "ai http status {code}"),
            SoftFailure::Malformed => write!(f, "ai payload malformed"),
        }
    }
}

pub type AiOutcome = Result<AiAnalysis, SoftFailure>;

/// Trait object injected into the combiner and re-ranker. Implementations
/// must be cheap to call when disabled.
pub trait AiClient: Send + Sync {
    /// Assess `text` (with targeting `context`) for intent signals.
    fn assess<'a>(
        &'a self,
        text: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = AiOutcome> + Send + 'a>>;

    /// Score a bounded batch of item snippets against `context`; one score
    /// per snippet, same order.
    fn rescore<'a>(
        &'a self,
        context: &'a str,
        snippets: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, SoftFailure>> + Send + 'a>>;

    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
}

pub type DynAiClient = Arc<dyn AiClient>;

// ------------------------------------------------------------
// Config
// ------------------------------------------------------------

/// Loaded from `config/ai.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    /// "openai" (case-insensitive); anything else resolves to disabled.
    #[serde(default)]
    pub provider: Option<String>,
    /// "ENV" means: read from OPENAI_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_max_output_tokens() -> u32 {
    120
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: None,
            api_key: None,
            model: None,
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl AiConfig {
    /// Read config from disk; a missing or unreadable file means disabled.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }
}

/// Factory: build a client according to config and environment.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the real provider (OpenAI).
pub fn build_client_from_config(config: &AiConfig) -> DynAiClient {
    if env::var("AI_TEST_MODE").map(|v| v == "mock").unwrap_or(false) {
        return Arc::new(MockClient::default());
    }

    if !config.enabled {
        return Arc::new(DisabledClient);
    }

    match config.provider.as_deref().map(str::to_lowercase).as_deref() {
        Some("openai") => {
            let provider = OpenAiProvider::new(config);
            info!(provider = provider.provider_name(), "AI enhancer configured");
            Arc::new(provider)
        }
        _ => Arc::new(DisabledClient),
    }
}

/// Convenience used by the binary and tests: reads `config/ai.json`.
pub fn build_ai_client() -> DynAiClient {
    let cfg = AiConfig::load_from_file("config/ai.json");
    build_client_from_config(&cfg)
}

// ------------------------------------------------------------
// Concrete clients
// ------------------------------------------------------------

/// Returns `SoftFailure::Disabled` always; used when AI is not configured.
pub struct DisabledClient;

impl AiClient for DisabledClient {
    fn assess<'a>(
        &'a self,
        _text: &'a str,
        _context: &'a str,
    ) -> Pin<Box<dyn Future<Output = AiOutcome> + Send + 'a>> {
        Box::pin(async { Err(SoftFailure::Disabled) })
    }
    fn rescore<'a>(
        &'a self,
        _context: &'a str,
        _snippets: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, SoftFailure>> + Send + 'a>> {
        Box::pin(async { Err(SoftFailure::Disabled) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic client for tests and local runs. Optional `delay` lets
/// deadline tests simulate a slow provider.
#[derive(Clone, Default)]
pub struct MockClient {
    pub assessment: Option<AiAnalysis>,
    pub scores: Option<Vec<f32>>,
    pub delay: Option<Duration>,
}

impl AiClient for MockClient {
    fn assess<'a>(
        &'a self,
        _text: &'a str,
        _context: &'a str,
    ) -> Pin<Box<dyn Future<Output = AiOutcome> + Send + 'a>> {
        let out = self.assessment.clone();
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            out.ok_or(SoftFailure::Malformed)
        })
    }
    fn rescore<'a>(
        &'a self,
        _context: &'a str,
        snippets: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, SoftFailure>> + Send + 'a>> {
        let out = self.scores.clone();
        let delay = self.delay;
        let n = snippets.len();
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            match out {
                Some(scores) if scores.len() == n => Ok(scores),
                Some(_) => Err(SoftFailure::Malformed),
                None => Err(SoftFailure::Malformed),
            }
        })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// OpenAI provider (Chat Completions API). Requires `OPENAI_API_KEY` unless
/// the key is inlined in config.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_output_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(config: &AiConfig) -> Self {
        let api_key = match config.api_key.as_deref() {
            Some(k) if !k.trim().eq_ignore_ascii_case("env") => k.to_string(),
            _ => env::var("OPENAI_API_KEY").unwrap_or_default(),
        };
        let http = reqwest::Client::builder()
            .user_agent("growth-signals/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| "gpt-4o-mini".to_string());
        Self {
            http,
            api_key,
            model,
            max_output_tokens: config.max_output_tokens,
        }
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, SoftFailure> {
        if self.api_key.is_empty() {
            return Err(SoftFailure::Disabled);
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.1,
            max_tokens: self.max_output_tokens,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| SoftFailure::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SoftFailure::Http(resp.status().as_u16()));
        }
        let body: Resp = resp.json().await.map_err(|_| SoftFailure::Malformed)?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        if content.is_empty() {
            Err(SoftFailure::Malformed)
        } else {
            Ok(content)
        }
    }
}

impl AiClient for OpenAiProvider {
    fn assess<'a>(
        &'a self,
        text: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = AiOutcome> + Send + 'a>> {
        Box::pin(async move {
            let system = format!(
                "You are a B2B intent-signal analyst. Return JSON only: \
                 {{\"intent_signals\":[{{\"signal\":\"name\",\"confidence\":0.8,\"reasoning\":\"brief\"}}],\
                 \"priority\":\"High\",\"score\":8}}. \
                 Use only these signal labels: {}.",
                catalog::prompt_label_list()
            );
            let user = if context.is_empty() {
                format!("Analyze for B2B intent: '{text}'")
            } else {
                format!("Analyze for B2B intent: '{text}'. Targeting context: '{context}'")
            };
            let content = self.chat(&system, &user).await?;
            parse_assessment(&content)
        })
    }

    fn rescore<'a>(
        &'a self,
        context: &'a str,
        snippets: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, SoftFailure>> + Send + 'a>> {
        Box::pin(async move {
            let system = "You rank B2B content by relevance to a targeting context. \
                          Return a JSON array of scores between 0 and 10, one per item, \
                          same order, nothing else.";
            let mut user = format!("Context: '{context}'\nItems:\n");
            for (i, s) in snippets.iter().enumerate() {
                use std::fmt::Write as _;
                let _ = writeln!(&mut user, "{}. {}", i + 1, s);
            }
            let content = self.chat(system, &user).await?;
            let scores: Vec<f32> = serde_json::from_str(strip_code_fences(&content))
                .map_err(|_| SoftFailure::Malformed)?;
            if scores.len() == snippets.len() && scores.iter().all(|s| s.is_finite()) {
                Ok(scores)
            } else {
                Err(SoftFailure::Malformed)
            }
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// ------------------------------------------------------------
// Payload parsing
// ------------------------------------------------------------

/// Parse a model reply into `AiAnalysis`. Signals with labels outside the
/// catalog are dropped; any shape violation is `Malformed`.
pub fn parse_assessment(content: &str) -> AiOutcome {
    let mut analysis: AiAnalysis =
        serde_json::from_str(strip_code_fences(content)).map_err(|_| SoftFailure::Malformed)?;
    if !analysis.score.is_finite() {
        return Err(SoftFailure::Malformed);
    }
    analysis
        .intent_signals
        .retain(|s| catalog::is_known_signal(&s.signal));
    Ok(analysis)
}

/// Models occasionally wrap JSON in markdown fences; unwrap before parsing.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
