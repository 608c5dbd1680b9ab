//! UMM-Var generator.
//!
//! Reads a NetCDF-4 granule, builds one UMM-Var record per variable and
//! either prints them as JSON or publishes them to a CMR collection.

mod config;
mod publish;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cmr_client::{fetch_document, read_launchpad_token, CmrClient, CmrEnvironment};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use ummvar::{filter_by_name, GranuleProcessor, SchemaCatalog, VocabularyTable};

use config::GeneratorConfig;

#[derive(Parser, Debug)]
#[command(name = "ummvar-gen")]
#[command(about = "Generate UMM Variable records in JSON format and ingest them to CMR")]
struct Args {
    /// Source granule (NetCDF-4/HDF5)
    granule: PathBuf,

    /// Target collection in CMR, by concept-id; records are printed when omitted
    #[arg(short, long)]
    collection: Option<String>,

    /// Only emit the variable with this Name
    #[arg(short, long)]
    variable: Option<String>,

    /// Target CMR environment: ops, uat or sit
    #[arg(short, long)]
    environment: Option<CmrEnvironment>,

    /// Local UMM-Var JSON schema document
    #[arg(long)]
    schema: Option<PathBuf>,

    /// CF standard name table XML
    #[arg(long)]
    cf_table: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing; stdout carries the JSON output
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = GeneratorConfig::from_env()?;
    if let Some(environment) = args.environment {
        config.environment = environment;
    }
    if let Some(schema) = &args.schema {
        config.schema_path = Some(schema.clone());
    }
    if let Some(cf_table) = &args.cf_table {
        config.cf_table_path = Some(cf_table.clone());
    }
    info!(
        granule = %args.granule.display(),
        environment = %config.environment,
        "Starting UMM-Var generation"
    );

    let schema = load_schema(&config).await?;
    let vocabulary = load_vocabulary(&config).await?;

    let processor = GranuleProcessor::new(&schema, &vocabulary);
    let mut records = processor
        .process_path(&args.granule)
        .with_context(|| format!("Failed to process {}", args.granule.display()))?;

    if let Some(variable) = &args.variable {
        records = filter_by_name(records, variable);
    }

    let Some(collection) = &args.collection else {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    };

    let token = read_launchpad_token(&config.token_path, config.environment)?;
    let Some(token) = token else {
        warn!("Launchpad token file has no token, printing records instead of publishing");
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    };

    let client = CmrClient::new(config.environment, token)?;
    let ingest_log = publish::publish_records(&client, collection, &records).await?;
    println!("{}", serde_json::to_string_pretty(&ingest_log)?);

    Ok(())
}

async fn load_schema(config: &GeneratorConfig) -> Result<SchemaCatalog> {
    let schema = match &config.schema_path {
        Some(path) => SchemaCatalog::from_path(path)
            .with_context(|| format!("Failed to load schema {}", path.display()))?,
        None => {
            let text = fetch_document(&config.schema_url)
                .await
                .with_context(|| format!("Failed to download schema {}", config.schema_url))?;
            SchemaCatalog::from_schema_json(&text)?
        }
    };
    info!(properties = schema.len(), "Loaded UMM-Var schema");
    Ok(schema)
}

/// The CF table only feeds `CF_Standard_Description`; without it records are
/// still produced. A local copy wins; otherwise the published table is
/// downloaded.
async fn load_vocabulary(config: &GeneratorConfig) -> Result<VocabularyTable> {
    if let Some(path) = config.cf_table() {
        if !path.is_file() {
            warn!(
                path = %path.display(),
                "CF standard name table not found, standard name descriptions are skipped"
            );
            return Ok(VocabularyTable::empty());
        }
        return VocabularyTable::from_path(&path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    match fetch_document(&config.cf_table_url).await {
        Ok(xml) => VocabularyTable::from_xml(&xml)
            .with_context(|| format!("Failed to parse {}", config.cf_table_url)),
        Err(e) => {
            warn!(
                url = %config.cf_table_url,
                error = %e,
                "CF standard name table unavailable, standard name descriptions are skipped"
            );
            Ok(VocabularyTable::empty())
        }
    }
}
