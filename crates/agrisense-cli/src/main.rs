//! agrisense - crop, fertilizer, and leaf disease advisor
//!
//! Usage:
//!   agrisense crop --nitrogen 90 --phosphorus 42 --potassium 43 \
//!       --temperature 20.8 --humidity 82 --ph 6.5 --rainfall 202.9
//!   agrisense fertilizer --temperature 26 --humidity 52 --moisture 38 \
//!       --nitrogen 37 --potassium 0 --phosphorus 0 --soil 0 --crop 4
//!   agrisense disease --crop tomato --image leaf.png
//!   agrisense ask how often should I water tomatoes

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use agrisense_ai::ModelRegistry;
use agrisense_core::ImageUpload;
use agrisense_core::result::PredictionResult;
use agrisense_llm::{AssistantService, EnrichmentService, LlmConfig, OllamaClient};
use agrisense_service::{PredictError, PredictionService};

mod display;

#[derive(Parser)]
#[command(name = "agrisense", version, about = "Crop, fertilizer, and leaf disease advisor")]
struct Cli {
    /// Directory holding the model artifacts.
    #[arg(long, env = "AGRISENSE_MODELS_DIR", default_value = "models", global = true)]
    models_dir: PathBuf,

    /// Base URL of the generative-text service.
    #[arg(
        long,
        env = "AGRISENSE_LLM_URL",
        default_value = "http://localhost:11434",
        global = true
    )]
    llm_url: String,

    /// Model the generative-text service should run.
    #[arg(long, env = "AGRISENSE_LLM_MODEL", default_value = "llama3.1:8b", global = true)]
    llm_model: String,

    /// Print results as JSON instead of cards.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recommend a crop for measured soil and climate conditions.
    Crop(CropArgs),
    /// Recommend a fertilizer product for measured conditions.
    Fertilizer(FertilizerArgs),
    /// Diagnose a leaf photo against the detector for one crop.
    Disease(DiseaseArgs),
    /// Ask the agronomy assistant a free-form question.
    Ask {
        /// The question, as free text.
        #[arg(required = true)]
        question: Vec<String>,
    },
}

#[derive(Args)]
struct CropArgs {
    /// Soil nitrogen content (kg/ha).
    #[arg(long)]
    nitrogen: String,
    /// Soil phosphorus content (kg/ha).
    #[arg(long)]
    phosphorus: String,
    /// Soil potassium content (kg/ha).
    #[arg(long)]
    potassium: String,
    /// Mean temperature in degrees Celsius.
    #[arg(long)]
    temperature: String,
    /// Relative humidity in percent.
    #[arg(long)]
    humidity: String,
    /// Soil pH.
    #[arg(long)]
    ph: String,
    /// Rainfall in millimetres.
    #[arg(long)]
    rainfall: String,
}

#[derive(Args)]
struct FertilizerArgs {
    /// Air temperature in degrees Celsius.
    #[arg(long)]
    temperature: String,
    /// Relative humidity in percent.
    #[arg(long)]
    humidity: String,
    /// Soil moisture in percent.
    #[arg(long)]
    moisture: String,
    /// Soil nitrogen content.
    #[arg(long)]
    nitrogen: String,
    /// Soil potassium content.
    #[arg(long)]
    potassium: String,
    /// Soil phosphorus content.
    #[arg(long)]
    phosphorus: String,
    /// Soil type code (0=Sandy, 1=Loamy, 2=Black, 3=Red, 4=Clayey).
    #[arg(long)]
    soil: String,
    /// Crop code (0=Maize, 1=Sugarcane, 2=Cotton, 3=Tobacco, 4=Paddy,
    /// 5=Barley, 6=Wheat, 7=Millets, 8=Oil seeds, 9=Pulses, 10=Ground Nuts).
    #[arg(long)]
    crop: String,
}

#[derive(Args)]
struct DiseaseArgs {
    /// Crop the leaf belongs to.
    #[arg(long)]
    crop: String,
    /// Path to the leaf photo.
    #[arg(long)]
    image: PathBuf,
    /// Skip the generated analysis.
    #[arg(long)]
    no_enrich: bool,
}

impl Cli {
    fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            base_url: self.llm_url.clone(),
            model: self.llm_model.clone(),
            ..LlmConfig::default()
        }
    }
}

impl CropArgs {
    fn fields(&self) -> HashMap<String, String> {
        HashMap::from([
            ("nitrogen".to_string(), self.nitrogen.clone()),
            ("phosphorus".to_string(), self.phosphorus.clone()),
            ("potassium".to_string(), self.potassium.clone()),
            ("temperature".to_string(), self.temperature.clone()),
            ("humidity".to_string(), self.humidity.clone()),
            ("ph".to_string(), self.ph.clone()),
            ("rainfall".to_string(), self.rainfall.clone()),
        ])
    }
}

impl FertilizerArgs {
    fn fields(&self) -> HashMap<String, String> {
        HashMap::from([
            ("temperature".to_string(), self.temperature.clone()),
            ("humidity".to_string(), self.humidity.clone()),
            ("moisture".to_string(), self.moisture.clone()),
            ("nitrogen".to_string(), self.nitrogen.clone()),
            ("potassium".to_string(), self.potassium.clone()),
            ("phosphorus".to_string(), self.phosphorus.clone()),
            ("soil".to_string(), self.soil.clone()),
            ("crop".to_string(), self.crop.clone()),
        ])
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    info!("agrisense v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match &cli.command {
        Command::Crop(args) => {
            let service = load_service(&cli.models_dir)?;
            let result = finish(service.recommend_crop(&args.fields()))?;
            emit(&cli, &result)?;
        }
        Command::Fertilizer(args) => {
            let service = load_service(&cli.models_dir)?;
            let result = finish(service.recommend_fertilizer(&args.fields()))?;
            emit(&cli, &result)?;
        }
        Command::Disease(args) => run_disease(&cli, args).await?,
        Command::Ask { question } => run_ask(&cli, question).await?,
    }
    Ok(())
}

async fn run_disease(cli: &Cli, args: &DiseaseArgs) -> anyhow::Result<()> {
    let service = load_service(&cli.models_dir)?;
    let upload = read_upload(&args.image)?;
    let result = finish(service.detect_disease(&args.crop, Some(&upload)))?;

    // Every finding is rendered with an analysis unless the caller opted
    // out; for healthy findings the analyst keeps to monitoring advice.
    let analysis = if let PredictionResult::Disease(finding) = &result
        && !args.no_enrich
    {
        let client = OllamaClient::new(&cli.llm_config())?;
        let analyst = EnrichmentService::new(client);
        Some(analyst.enrich(finding.crop, &finding.disease).await)
    } else {
        None
    };

    if cli.json {
        match &analysis {
            Some(analysis) => {
                let body = serde_json::json!({ "finding": result, "analysis": analysis });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            None => println!("{}", serde_json::to_string_pretty(&result)?),
        }
    } else {
        display::print_result(&result);
        if let Some(analysis) = &analysis {
            display::print_analysis(analysis);
        }
    }
    Ok(())
}

async fn run_ask(cli: &Cli, question: &[String]) -> anyhow::Result<()> {
    let client = OllamaClient::new(&cli.llm_config())?;
    let assistant = AssistantService::new(client);
    let exchange = assistant.ask(&question.join(" ")).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&exchange)?);
    } else {
        display::print_exchange(&exchange);
    }
    Ok(())
}

fn load_service(dir: &Path) -> anyhow::Result<PredictionService> {
    let registry = ModelRegistry::load(dir)
        .with_context(|| format!("loading models from {}", dir.display()))?;
    for (model, version) in registry.versions() {
        info!(model = %model, version = %version, "model ready");
    }
    Ok(PredictionService::new(Arc::new(registry)))
}

fn read_upload(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    Ok(ImageUpload::new(filename, bytes))
}

/// Internal faults get an operator log line and a vague user message;
/// validation failures are printed as they are.
fn finish(result: Result<PredictionResult, PredictError>) -> anyhow::Result<PredictionResult> {
    result.map_err(|err| {
        if err.is_internal() {
            error!(error = %err, "prediction failed");
        }
        anyhow::anyhow!(err.user_message())
    })
}

fn emit(cli: &Cli, result: &PredictionResult) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        display::print_result(result);
    }
    Ok(())
}
