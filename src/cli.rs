use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ScrapeConfig;
use crate::engine::Engine;

#[derive(Parser)]
#[command(
    name = "mlscrape",
    version,
    about = "Mercado Livre search results as JSON (from saved page snapshots)"
)]
pub struct Cli {
    /// Config file (JSON) with the field specification and marketplace settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract products from a saved search-results page
    Extract(ExtractArgs),
    /// Print the listing URL searched for a term
    Url { term: String },
    /// Print the effective field specification
    Fields,
}

#[derive(Args)]
struct ExtractArgs {
    /// HTML snapshot of the fully scrolled listing page
    html: PathBuf,

    /// Search term the snapshot was taken for
    #[arg(long)]
    term: String,

    /// Write the JSON here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub fn run() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScrapeConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScrapeConfig::default(),
    };
    let engine = Engine::new(config).context("invalid config")?;

    match cli.cmd {
        Command::Extract(args) => extract_cmd(&engine, args),
        Command::Url { term } => {
            println!("{}", engine.listing_url(&term));
            Ok(())
        }
        Command::Fields => print_json(&engine.config().fields),
    }
}

fn extract_cmd(engine: &Engine, args: ExtractArgs) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(&args.html)
        .with_context(|| format!("reading {}", args.html.display()))?;
    let output = engine.run_html(&args.term, &html)?;
    tracing::info!(term = %output.term, count = output.count, "extraction finished");

    match args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&output)?;
            std::fs::write(&path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "saved output");
            Ok(())
        }
        None => print_json(&output),
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json<T: serde::Serialize>(val: &T) -> anyhow::Result<()> {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
