use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use freshscan_rs::logger::{self, error, info};
use freshscan_rs::scan_pipeline::{
    FsBlobStore, HandleOutcome, JsonLinesScanStore, SafeRangeTable, ScanAnalyzer, ScanConfig,
    ScanRecord, ScanRequestHandler,
};

/// Estimates food freshness from photos of pH indicator strips
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one photo and print the scan update as a JSON line
    Scan(ScanArgs),
    /// Load the model artifacts and report whether they are usable
    Health(ModelArgs),
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Directory holding scaler.json and svr_model.json
    #[arg(long, default_value = "models", value_name = "DIR")]
    model_dir: PathBuf,

    /// Scaler artifact file name inside the model directory
    #[arg(long, value_name = "FILE")]
    scaler_file: Option<String>,

    /// Regressor artifact file name inside the model directory
    #[arg(long, value_name = "FILE")]
    regressor_file: Option<String>,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Photo of the indicator strip
    #[arg(long, value_name = "FILE")]
    image: PathBuf,

    /// Food the strip was placed on, e.g. chicken
    #[arg(long, default_value = "")]
    food: String,

    #[arg(long, default_value = "")]
    category: String,

    /// Identifier written with the update; defaults to the photo's file stem
    #[arg(long)]
    scan_id: Option<String>,

    /// JSON object mapping food names to [min, max] safe pH
    #[arg(long, value_name = "FILE")]
    safe_ranges: Option<PathBuf>,

    /// Version tag recorded on completed scans
    #[arg(long)]
    model_version: Option<String>,

    #[command(flatten)]
    models: ModelArgs,
}

impl ModelArgs {
    fn config(&self, model_version: Option<&str>) -> ScanConfig {
        let mut builder = ScanConfig::builder().model_dir(&self.model_dir);
        if let Some(name) = &self.scaler_file {
            builder = builder.scaler_file(name);
        }
        if let Some(name) = &self.regressor_file {
            builder = builder.regressor_file(name);
        }
        if let Some(version) = model_version {
            builder = builder.model_version(version);
        }
        builder.build()
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    match Cli::parse().command {
        Command::Scan(args) => run_scan(args),
        Command::Health(args) => run_health(args),
    }
}

fn run_health(args: ModelArgs) -> anyhow::Result<()> {
    let analyzer = ScanAnalyzer::new(args.config(None), SafeRangeTable::default());
    analyzer
        .check_models()
        .with_context(|| format!("models in {} are not usable", args.model_dir.display()))?;

    info!("Model bundle loaded");
    println!("OK");
    Ok(())
}

fn run_scan(args: ScanArgs) -> anyhow::Result<()> {
    let table = match &args.safe_ranges {
        Some(path) => SafeRangeTable::from_file(path)
            .with_context(|| format!("reading safe ranges from {}", path.display()))?,
        None => SafeRangeTable::default(),
    };
    let config = args.models.config(args.model_version.as_deref());
    info!(
        "Starting scan with models from {}",
        config.model_dir.display()
    );

    let (blob_root, file_name) = split_image_path(&args.image)?;
    let scan_id = args.scan_id.clone().unwrap_or_else(|| {
        Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone())
    });

    let record = ScanRecord {
        selected_food: Some(args.food),
        selected_category: Some(args.category),
        ..ScanRecord::pending(file_name)
    };

    let handler = ScanRequestHandler::new(
        ScanAnalyzer::new(config, table),
        FsBlobStore::new(blob_root),
        JsonLinesScanStore::new(std::io::stdout()),
    );

    match handler.handle(&scan_id, Some(&record))? {
        HandleOutcome::Completed(result) => {
            info!("Scan {} complete: pH {:.2}, {}", scan_id, result.ph_value, result.freshness);
            Ok(())
        }
        HandleOutcome::Failed(message) => {
            error!("Scan {} failed", scan_id);
            bail!(message)
        }
        HandleOutcome::Skipped(reason) => bail!("scan {} skipped: {:?}", scan_id, reason),
    }
}

/// Splits a photo path into the directory served as blob root and the file
/// name used as storage path.
fn split_image_path(image: &Path) -> anyhow::Result<(PathBuf, String)> {
    let Some(file_name) = image.file_name() else {
        bail!("{} does not name a file", image.display());
    };
    let root = match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((root, file_name.to_string_lossy().into_owned()))
}
