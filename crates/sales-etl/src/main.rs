use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sales_etl_core::config::Settings;
use sales_etl_core::db;
use sales_etl_core::pipeline::run_etl;
use sales_etl_core::store::{PgSalesStore, SalesStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sales CSV import service and API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Create the sales_data table if it does not exist
    Migrate,
    /// Run the ETL pipeline once against a file in the data directory
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// File name, resolved inside DATA_DIR
    #[arg(long, default_value = sales_etl_api::DEFAULT_FILE_NAME)]
    file_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Arc::new(Settings::from_env());

    let default_level = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let store = connect_store(&settings).await?;
            store.ensure_schema().await?;
            info!(app = %settings.app_name, version = %settings.app_version, "starting API server");
            sales_etl_api::serve(settings, store).await
        }
        Command::Migrate => {
            let store = connect_store(&settings).await?;
            store.ensure_schema().await?;
            info!("sales_data schema is in place");
            Ok(())
        }
        Command::Run(args) => {
            let Some(path) = settings.resolve_data_file(&args.file_name) else {
                bail!("File {} not found", args.file_name);
            };
            let store = connect_store(&settings).await?;
            let outcome = run_etl(&path, store.as_ref()).await;
            println!("{}", serde_json::to_string_pretty(&outcome.report())?);
            if !outcome.is_success() {
                bail!("ETL run on {} did not succeed", path.display());
            }
            Ok(())
        }
    }
}

async fn connect_store(settings: &Settings) -> Result<Arc<dyn SalesStore>> {
    let pool = db::connect(&settings.database_url)
        .await
        .context("could not open the sales database")?;
    Ok(Arc::new(PgSalesStore::new(pool)))
}
