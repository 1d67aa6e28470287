//! Event-Harvest main entry point
//!
//! This is the command-line interface for the Event-Harvest listing extractor.

use anyhow::Context;
use clap::Parser;
use event_harvest::config::{load_config_with_hash, Config, Field, Strategy};
use event_harvest::driver::HttpBrowser;
use event_harvest::harvest::{deliver, Delivery, Harvester};
use event_harvest::output::{print_report, write_json};
use event_harvest::sink::SqliteSink;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Event-Harvest: a resilient event listing extractor
///
/// Event-Harvest scrolls an event listing until it stops growing, visits
/// every event page it found, normalizes what it reads there and stores
/// the resulting records in one bulk insert.
#[derive(Parser, Debug)]
#[command(name = "event-harvest")]
#[command(version)]
#[command(about = "A resilient event listing extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without harvesting
    #[arg(long)]
    dry_run: bool,

    /// Write the run's records to this JSON file (overrides [output] json-path)
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Do not hand records to the sink
    #[arg(long)]
    skip_sink: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let json_path = cli
        .json
        .clone()
        .or_else(|| config.output.json_path.as_ref().map(PathBuf::from));

    handle_harvest(&config, json_path, cli.skip_sink).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("event_harvest=info,warn"),
            1 => EnvFilter::new("event_harvest=debug,info"),
            2 => EnvFilter::new("event_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Event-Harvest Dry Run ===\n");

    println!("Listing:");
    println!("  URL: {}", config.listing.url);
    println!("  Link selector: {}", config.listing.link_selector);
    println!("  Ready selector: {}", config.listing.ready_selector());
    println!("  Wait until: {:?}", config.listing.wait_until);

    println!("\nTiming:");
    println!("  Settle: {}ms", config.timing.settle_ms);
    println!(
        "  Navigation retries: {} x {}ms",
        config.timing.retry_attempts, config.timing.retry_delay_ms
    );
    println!("  Wait timeout: {}ms", config.timing.wait_timeout_ms);
    match config.timing.max_scrolls {
        Some(max) => println!("  Max scrolls: {}", max),
        None => println!("  Max scrolls: unbounded"),
    }

    println!("\nSelectors:");
    for field in Field::ALL {
        let chain = config.selectors.chain(field);
        println!("  {} ({} strategies)", field.name(), chain.len());
        for strategy in chain {
            println!("    * {}", describe(strategy));
        }
    }

    println!("\nSink:");
    println!("  Endpoint: {}", config.sink.endpoint.as_deref().unwrap_or("<unset>"));
    println!("  Database: {}", config.sink.database.as_deref().unwrap_or("<unset>"));
    println!(
        "  Collection: {}",
        config.sink.collection.as_deref().unwrap_or("<unset>")
    );

    println!("\n✓ Configuration is valid");
}

fn describe(strategy: &Strategy) -> String {
    match strategy {
        Strategy::Text {
            selector,
            segment: Some(n),
        } => format!("text of {} (segment {})", selector, n),
        Strategy::Text { selector, .. } => format!("text of {}", selector),
        Strategy::Attribute {
            selector,
            attribute,
        } => format!("{} of {}", attribute, selector),
        Strategy::Link { selector } => format!("link of {}", selector),
    }
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: &Config,
    json_path: Option<PathBuf>,
    skip_sink: bool,
) -> anyhow::Result<()> {
    let browser = HttpBrowser::new(&config.driver).context("Failed to build HTTP client")?;

    let outcome = Harvester::new(config).run(&browser).await;

    if let Some(path) = json_path {
        if let Err(e) = write_json(&outcome.records, &path) {
            tracing::error!("Failed to write {}: {}", path.display(), e);
        }
    }

    print_report(&outcome.report);

    if skip_sink {
        tracing::info!("Skipping sink ({} records)", outcome.records.len());
        return Ok(());
    }

    match deliver(&outcome.records, || SqliteSink::connect(&config.sink)) {
        Ok(Delivery::NoData) => println!("\nNo data to store"),
        Ok(Delivery::Inserted(count)) => println!("\n✓ Stored {} records", count),
        Err(e) if e.is_configuration() => {
            tracing::error!("Sink is not configured: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Failed to store records: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
