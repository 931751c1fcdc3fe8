//! Free-form agronomy Q&A. Unlike enrichment, failures here surface to the
//! caller as typed errors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::client::{GenerateError, TextGenerator};

const ASSISTANT_INSTRUCTION: &str = "\
You are an agronomy assistant for farmers and gardeners. Answer questions \
about crops, soil, fertilizers, irrigation, pests, and plant diseases with \
short, practical advice a grower can act on.

If the question is not about agriculture, farming, or gardening, reply with \
exactly this sentence and nothing else: I can help with farming and crop \
questions. Ask me about crops, soil, fertilizers, or plant diseases.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("assistant unavailable: {0}")]
    Upstream(#[from] GenerateError),
}

/// One answered question, stamped when it was asked.
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

pub struct AssistantService<G> {
    generator: G,
}

impl<G: TextGenerator> AssistantService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Answer a grower's question. Empty questions are rejected before any
    /// backend call.
    pub async fn ask(&self, question: &str) -> Result<ChatExchange, AssistantError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let asked_at = Utc::now();
        debug!(len = question.len(), "forwarding question");
        let answer = self
            .generator
            .generate(ASSISTANT_INSTRUCTION, question)
            .await?;

        Ok(ChatExchange {
            question: question.to_string(),
            answer: answer.trim().to_string(),
            asked_at,
        })
    }
}
