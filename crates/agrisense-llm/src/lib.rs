//! Generative-text layer: the transport client, structured disease
//! analysis with a guaranteed fallback, and the Q&A assistant.

pub mod assistant;
pub mod client;
pub mod enrich;

pub use assistant::{AssistantError, AssistantService, ChatExchange};
pub use client::{GenerateError, LlmConfig, OllamaClient, TextGenerator};
pub use enrich::{EnrichedAnalysis, EnrichmentService, Provenance, Severity, Treatment};
