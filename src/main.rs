//! Bias Detector - dataset and model bias auditing CLI
//!
//! Loads a JSON dataset, reports the distribution of sensitive attributes,
//! optionally evaluates a classifier per group, and prints mitigation
//! recommendations.
//!
//! Exit codes:
//!   0 - Success (no bias found, or no --fail-on-bias set)
//!   1 - Runtime error (unreadable data, bad config, invalid columns, etc.)
//!   2 - Bias found with --fail-on-bias

mod cli;
mod config;

use anyhow::{bail, Context, Result};
use bias_detector::report::{generate_json_report, generate_text_report, write_report};
use bias_detector::{
    AuditReport, Dataset, DatasetAnalyzer, MitigationRecommender, ModelAnalysis, ModelAnalyzer,
    ReportMetadata,
};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Bias Detector v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_audit(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Audit failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .biasdetector.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set sensitive attributes, target, thresholds and model.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` takes precedence.
fn init_logging(args: &Args) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete audit workflow. Returns exit code (0 or 2).
fn run_audit(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if config.analysis.sensitive_attributes.is_empty() {
        bail!("No sensitive attributes given. Use --sensitive or [analysis] in the config file.");
    }

    // Step 1: Load the dataset
    let data_path = args.data.as_deref().context("--data is required")?;
    let dataset = Dataset::load(data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;
    info!(
        "Loaded {} rows, {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        data_path.display()
    );

    // Step 2: Dataset distribution
    let mut dataset_analyzer =
        DatasetAnalyzer::new(&dataset, config.analysis.sensitive_attributes.clone())?;
    let dataset_analysis = dataset_analyzer.analyze()?.clone();

    // Step 3: Model performance, when a classifier and target are configured
    let model_analysis = analyze_model(&config, &dataset)?;

    // Step 4: Recommendations
    let recommender =
        MitigationRecommender::new(Some(&dataset_analysis), model_analysis.as_ref());
    let findings = recommender.recommend(&config.thresholds);
    let bias_detected = findings.iter().any(|f| f.is_bias());
    let recommendations: Vec<String> = findings.iter().map(ToString::to_string).collect();

    // Step 5: Build and write the report
    let report = AuditReport {
        metadata: ReportMetadata {
            data_path: data_path.display().to_string(),
            analysis_date: Utc::now(),
            rows: dataset.len(),
            columns: dataset.columns().len(),
            sensitive_attributes: config.analysis.sensitive_attributes.clone(),
            target: model_analysis
                .as_ref()
                .and(config.analysis.target.clone()),
            model_name: model_analysis
                .as_ref()
                .and(config.model.as_ref())
                .map(|m| m.build().name().to_string()),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        dataset: dataset_analysis,
        model: model_analysis,
        recommendations,
        bias_detected,
    };

    let output = match config.report.format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Text => generate_text_report(&report, config.report.detailed),
    };

    match args.output {
        Some(ref path) => {
            write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    if args.fail_on_bias && bias_detected {
        warn!("Bias detected. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Evaluate the configured classifier, or return `None` if no model is set up.
fn analyze_model(config: &Config, dataset: &Dataset) -> Result<Option<ModelAnalysis>> {
    let Some(ref model_config) = config.model else {
        debug!("No model configured, skipping model analysis");
        return Ok(None);
    };

    let Some(ref target) = config.analysis.target else {
        warn!("A model is configured but no target column is set; skipping model analysis");
        return Ok(None);
    };

    let classifier = model_config.build();
    let mut analyzer = ModelAnalyzer::new(
        classifier.as_ref(),
        dataset,
        target.clone(),
        config.analysis.sensitive_attributes.clone(),
    )?;
    debug!("Feature columns: {:?}", analyzer.features());

    Ok(Some(analyzer.analyze()?.clone()))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
