//! Card display for prediction results, disease analyses, and assistant
//! replies.

use agrisense_core::result::{
    CropRecommendation, DiseaseFinding, FertilizerRecommendation, PredictionResult,
};
use agrisense_llm::{ChatExchange, EnrichedAnalysis, Provenance};

// ── Result cards ──

pub fn print_result(result: &PredictionResult) {
    match result {
        PredictionResult::Crop(rec) => print_crop(rec),
        PredictionResult::Fertilizer(rec) => print_fertilizer(rec),
        PredictionResult::Disease(finding) => print_disease(finding),
    }
}

fn print_crop(rec: &CropRecommendation) {
    println!("=== Crop Recommendation ===");
    row("crop", &rec.name);
    row("confidence", &percent(rec.confidence));
}

fn print_fertilizer(rec: &FertilizerRecommendation) {
    println!("=== Fertilizer Recommendation ===");
    row("fertilizer", &rec.name);
    row("soil", rec.soil.as_str());
    row("crop", rec.crop.as_str());
    row("confidence", &percent(rec.confidence));
    println!();
    println!("{}", rec.guidance);
}

fn print_disease(finding: &DiseaseFinding) {
    println!("=== Leaf Diagnosis ===");
    row("crop", finding.crop.as_str());
    row("condition", &finding.disease);
    row("healthy", if finding.is_healthy() { "yes" } else { "no" });
    row("confidence", &percent(finding.confidence));
}

// ── Analysis card ──

pub fn print_analysis(analysis: &EnrichedAnalysis) {
    println!();
    println!("=== {} on {} ===", analysis.disease, analysis.crop.as_str());
    if analysis.provenance == Provenance::Fallback {
        println!("(generated analysis unavailable, showing general guidance)");
    }
    row("severity", analysis.severity.as_str());
    println!();
    println!("{}", analysis.description);

    print_list("Symptoms", &analysis.symptoms);
    print_list("Causes", &analysis.causes);
    print_list("Immediate Actions", &analysis.treatment.immediate);
    print_list("Chemical Control", &analysis.treatment.chemical);
    print_list("Organic Control", &analysis.treatment.organic);
    print_list("Prevention", &analysis.prevention);

    println!();
    row("impact", &analysis.impact);
    row("timeline", &analysis.timeline);
    print_list("Tips", &analysis.tips);
}

pub fn print_exchange(exchange: &ChatExchange) {
    println!("Q: {}", exchange.question);
    println!();
    println!("{}", exchange.answer);
}

// ── Row helpers ──

fn row(label: &str, value: &str) {
    println!("  {label:<12} {value}");
}

fn percent(confidence: f32) -> String {
    format!("{:.1}%", confidence * 100.0)
}

fn print_list(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{header}");
    for item in items {
        println!("  - {item}");
    }
}
