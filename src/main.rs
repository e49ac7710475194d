use anyhow::Result;
use brickprice::config::load_config;
use brickprice::harness::{HarnessOptions, run_harness};
use brickprice::pipeline::{RunOptions, run_scrape};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "brickprice", about = "Cross-site LEGO price scraper and correlator")]
struct Cli {
    #[arg(long, default_value = "configs/run.toml")]
    config: PathBuf,

    #[arg(long, default_value = "data/out")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Run {
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    Validate,
    Harness,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dry_run, limit } => {
            let report = run_scrape(&RunOptions {
                config_path: cli.config,
                out_dir: cli.out_dir,
                dry_run,
                limit,
            })?;

            info!(
                products = report.products_listed,
                link_misses = report.detail_link_misses,
                specs_table_misses = report.specs_table_misses,
                identifier_fallbacks = report.identifier_fallbacks,
                searches = report.searches,
                search_misses = report.search_misses,
                joined = report.joined_rows,
                files = report.files_written,
                "scrape summary"
            );
        }
        Commands::Validate => {
            let config = load_config(&cli.config)?;
            println!(
                "OK: {} -> {}",
                config.retailer.listing_url, config.marketplace.base_url
            );
        }
        Commands::Harness => {
            let report = run_harness(&HarnessOptions {
                out_dir: cli.out_dir,
            })?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
