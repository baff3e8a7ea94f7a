use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use commodity_cache::{
    clock::system_clock,
    config::{PipelineConfig, load_config_path},
    fanout::FanOutCoordinator,
    freshness::age_days,
    orchestrator::RefreshOrchestrator,
    providers::build_provider,
    request::{PipelineRequest, handle},
    store::sqlite::SqliteStore,
};
use commodity_ingestor::models::commodity::CommodityKey;
use serde_json::json;
use shared_utils::env::get_env_var_or;

const DEFAULT_DATABASE: &str = "commodity_cache.db";

#[derive(Parser)]
#[command(version, about = "Commodity price cache CLI")]
struct Cli {
    /// Pipeline config file (TOML). Defaults apply when omitted.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// SQLite database path. Falls back to $DATABASE_URL, then ./commodity_cache.db.
    #[arg(long, value_name = "PATH", global = true)]
    database: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Serve one commodity (or all) through the cache, refreshing stale records.
    Resolve(ResolveCmd),
    /// List the known commodity keys.
    List,
    /// Print the stored record for a commodity without contacting the provider.
    Show {
        #[arg(long)]
        commodity: String,
    },
}

#[derive(Args)]
struct ResolveCmd {
    /// Commodity key, e.g. WTI or NATURAL_GAS. Unknown keys fall back to WTI.
    #[arg(long)]
    commodity: Option<String>,
    /// Resolve every known commodity concurrently.
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => PipelineConfig::default(),
    };

    match cli.cmd {
        Cmd::List => {
            let keys: Vec<_> = CommodityKey::ALL
                .iter()
                .map(|k| json!({ "commodity": k, "category": k.category() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        Cmd::Show { commodity } => {
            let key: CommodityKey = commodity.parse()?;
            let orchestrator = build_orchestrator(cli.database.as_deref(), &config)?;
            let record = orchestrator.store().read(key).await?;
            let now = chrono::Utc::now();

            let out = json!({
                "commodity": key,
                "path": orchestrator.store().document_path(key),
                "fresh": orchestrator.freshness().is_fresh(record.as_ref(), now),
                "ageDays": record.as_ref().map(|r| age_days(r, now)),
                "record": record,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Cmd::Resolve(ResolveCmd { commodity, all }) => {
            let orchestrator = build_orchestrator(cli.database.as_deref(), &config)?;
            let coordinator = FanOutCoordinator::new(Arc::new(orchestrator));
            let api_key = config.api_key();

            let request = PipelineRequest::from_parts(commodity.as_deref(), all);
            let response = handle(&coordinator, request, &api_key).await;

            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build_orchestrator(
    database: Option<&str>,
    config: &PipelineConfig,
) -> Result<RefreshOrchestrator> {
    let database_url = match database {
        Some(path) => path.to_string(),
        None => get_env_var_or("DATABASE_URL", DEFAULT_DATABASE).0,
    };

    let store = SqliteStore::open(&database_url)
        .with_context(|| format!("opening document store at {database_url}"))?;
    let provider = build_provider(config)?;

    Ok(RefreshOrchestrator::from_config(
        config,
        Arc::new(store),
        provider,
        system_clock(),
    ))
}
