//! Cash-flow back office main entry point

use anyhow::Context;
use cashflow_api::start_server;
use cashflow_config::Config;
use cashflow_core::Backoffice;
use cashflow_gateway::HttpForecastGateway;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cashflow-web")]
#[command(version = "0.1.0")]
#[command(about = "Back office for reviewing cash-flow forecast entries", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let rt = Runtime::new()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match Config::load(&args.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[{}] {}", e.code(), e);
            if let Some(hint) = e.hint() {
                eprintln!("  - {}", hint);
            }
            return Err(e).with_context(|| format!("failed to load configuration from {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();

    log::info!(
        "Config loaded: api={}, listing page size={}",
        config.api.normalized_base_url(),
        config.listing.page_size
    );

    let gateway = HttpForecastGateway::new(&config.api).context("failed to build the forecast API client")?;
    let backoffice = Arc::new(Backoffice::new(config.clone(), Arc::new(gateway)));

    start_server(config, backoffice).await
}
