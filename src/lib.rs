// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod catalog;
pub mod fallback;
pub mod model;

// Scoring/ranking pipeline (rules, scoring, AI adapter, rerank)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use analyze::ai_adapter;
pub use crate::api::{create_router, AppState};
pub use crate::model::{AnalysisResult, ContentItem, IntentSignal, Priority};
