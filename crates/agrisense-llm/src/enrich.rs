//! Structured disease explanations from the generative-text service.
//!
//! The service is untrusted: replies are fence-stripped, parsed, and
//! field-validated, and any failure along the way (timeout, transport,
//! malformed JSON, missing or empty fields) degrades to a deterministic
//! fallback. A disease finding is never rendered without an analysis.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use agrisense_core::Crop;

use crate::client::{GenerateError, TextGenerator};

// ── Prompt templates ──

const ANALYST_INSTRUCTION: &str = "\
You are a plant pathology assistant for field agronomy.

Given a crop and a leaf disease detected on it, produce a concise practical \
analysis for the grower.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"severity\": \"Low\" | \"Moderate\" | \"High\" | \"Critical\",
  \"description\": \"what this disease is and how it behaves on this crop\",
  \"symptoms\": [\"observable sign\"],
  \"causes\": [\"pathogen or condition that drives it\"],
  \"treatment\": {
    \"immediate\": [\"action to take today\"],
    \"chemical\": [\"product class and how to use it\"],
    \"organic\": [\"low-input alternative\"]
  },
  \"prevention\": [\"practice that reduces recurrence\"],
  \"impact\": \"expected effect on yield if untreated\",
  \"timeline\": \"expected course with and without treatment\",
  \"tips\": [\"short practical tip\"]
}

Keep every list entry short and actionable. If the finding is a healthy \
plant, say so and keep the treatment lists to monitoring advice.";

fn build_analysis_prompt(crop: Crop, disease: &str) -> String {
    format!("Crop: {}\nDetected disease: {disease}", crop.as_str())
}

// ── Types ──

/// Severity scale for a confirmed disease. `Unknown` is the degraded form
/// used when the backend is unavailable or replies with an unrecognized
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    Unknown,
}

impl Severity {
    /// Case-insensitive parse; anything unrecognized degrades to `Unknown`
    /// rather than failing the whole analysis.
    pub fn parse(raw: &str) -> Severity {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "moderate" => Severity::Moderate,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::Unknown => "Unknown",
        }
    }
}

/// Treatment options grouped the way growers act on them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Treatment {
    pub immediate: Vec<String>,
    pub chemical: Vec<String>,
    pub organic: Vec<String>,
}

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Generated,
    Fallback,
}

/// A complete disease analysis. Every field is populated whether the text
/// came from the backend or from the fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedAnalysis {
    pub crop: Crop,
    pub disease: String,
    pub severity: Severity,
    pub description: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub treatment: Treatment,
    pub prevention: Vec<String>,
    pub impact: String,
    pub timeline: String,
    pub tips: Vec<String>,
    pub provenance: Provenance,
}

// ── Wire format ──

#[derive(Deserialize)]
struct RawAnalysis {
    severity: String,
    description: String,
    symptoms: Vec<String>,
    causes: Vec<String>,
    treatment: RawTreatment,
    prevention: Vec<String>,
    impact: String,
    timeline: String,
    #[serde(default)]
    tips: Vec<String>,
}

#[derive(Deserialize)]
struct RawTreatment {
    immediate: Vec<String>,
    #[serde(default)]
    chemical: Vec<String>,
    #[serde(default)]
    organic: Vec<String>,
}

#[derive(Debug, Error)]
enum EnrichFailure {
    #[error("generate: {0}")]
    Generate(#[from] GenerateError),

    #[error("parse analysis: {source} (raw: {raw})")]
    Parse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("incomplete analysis: {0}")]
    Incomplete(String),
}

// ── Service ──

/// Produces an [`EnrichedAnalysis`] for a disease finding. Infallible by
/// contract: every backend failure becomes the fallback analysis.
pub struct EnrichmentService<G> {
    generator: G,
}

impl<G: TextGenerator> EnrichmentService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Ask the backend for an analysis of `disease` on `crop`. Never fails;
    /// the result is marked [`Provenance::Fallback`] when the backend
    /// could not produce a valid one.
    pub async fn enrich(&self, crop: Crop, disease: &str) -> EnrichedAnalysis {
        match self.request(crop, disease).await {
            Ok(analysis) => analysis,
            Err(reason) => {
                warn!(
                    crop = crop.as_str(),
                    disease,
                    %reason,
                    "analysis generation failed, using fallback"
                );
                fallback(crop, disease)
            }
        }
    }

    async fn request(&self, crop: Crop, disease: &str) -> Result<EnrichedAnalysis, EnrichFailure> {
        let reply = self
            .generator
            .generate(ANALYST_INSTRUCTION, &build_analysis_prompt(crop, disease))
            .await?;

        let body = strip_code_fences(&reply);
        let raw: RawAnalysis = serde_json::from_str(body).map_err(|source| EnrichFailure::Parse {
            source,
            raw: body.chars().take(160).collect(),
        })?;

        raw.into_analysis(crop, disease)
            .map_err(EnrichFailure::Incomplete)
    }
}

impl RawAnalysis {
    fn into_analysis(self, crop: Crop, disease: &str) -> Result<EnrichedAnalysis, String> {
        Ok(EnrichedAnalysis {
            crop,
            disease: disease.to_string(),
            severity: Severity::parse(&self.severity),
            description: required_text("description", self.description)?,
            symptoms: required_list("symptoms", self.symptoms)?,
            causes: required_list("causes", self.causes)?,
            treatment: Treatment {
                immediate: required_list("treatment.immediate", self.treatment.immediate)?,
                chemical: clean_list(self.treatment.chemical),
                organic: clean_list(self.treatment.organic),
            },
            prevention: required_list("prevention", self.prevention)?,
            impact: required_text("impact", self.impact)?,
            timeline: required_text("timeline", self.timeline)?,
            tips: clean_list(self.tips),
            provenance: Provenance::Generated,
        })
    }
}

/// Strip the Markdown code fences some backends add despite the instruction.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn required_text(field: &'static str, value: String) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("empty field '{field}'"));
    }
    Ok(value.to_string())
}

fn required_list(field: &'static str, values: Vec<String>) -> Result<Vec<String>, String> {
    let values = clean_list(values);
    if values.is_empty() {
        return Err(format!("empty list '{field}'"));
    }
    Ok(values)
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Deterministic analysis used whenever the backend cannot produce a valid
/// one: severity unknown, generic consult-an-expert guidance naming the
/// crop and disease.
fn fallback(crop: Crop, disease: &str) -> EnrichedAnalysis {
    EnrichedAnalysis {
        crop,
        disease: disease.to_string(),
        severity: Severity::Unknown,
        description: format!(
            "{disease} detected on {}. A detailed analysis is temporarily \
             unavailable; treat this finding as provisional and confirm it \
             with a local agronomist or extension service.",
            crop.as_str()
        ),
        symptoms: vec!["Visible leaf damage consistent with the detected condition".to_string()],
        causes: vec!["Common fungal, bacterial, or viral pathogens for this crop".to_string()],
        treatment: Treatment {
            immediate: vec![
                "Isolate affected plants where practical".to_string(),
                "Remove heavily damaged leaves with clean tools".to_string(),
            ],
            chemical: vec!["Consult a local expert before applying any product".to_string()],
            organic: vec![
                "Neem-based sprays are a low-risk first step for many leaf diseases".to_string(),
            ],
        },
        prevention: vec![
            "Rotate crops and avoid overhead watering".to_string(),
            "Inspect plants weekly during humid periods".to_string(),
        ],
        impact: "Untreated leaf disease can reduce yield; severity varies with \
                 weather and growth stage."
            .to_string(),
        timeline: "Reassess within 7 to 14 days of first treatment.".to_string(),
        tips: vec![format!(
            "Photograph the {} leaves weekly to track progression",
            crop.as_str()
        )],
        provenance: Provenance::Fallback,
    }
}
