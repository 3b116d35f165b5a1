use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use price_scout::app::PriceScoutApp;
use price_scout::data::headers::HeaderSynonyms;
use price_scout::state::Session;

/// Scan a directory for CSV price lists and search them by product name.
#[derive(Parser)]
#[command(name = "price-scout", version, about)]
struct Cli {
    /// Directory containing the price lists (`*price*.csv`).
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// JSON file overriding the recognized header names.
    ///
    /// Format: `{"product": [...], "price": [...], "weight": [...]}`;
    /// omitted fields keep the built-in lists.
    #[arg(long)]
    synonyms: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let synonyms = match &cli.synonyms {
        Some(path) => HeaderSynonyms::from_path(path)?,
        None => HeaderSynonyms::default(),
    };

    println!("Loading price lists...");
    let mut session = Session::default();
    session
        .load(&cli.dir, &synonyms)
        .with_context(|| format!("loading price lists from {}", cli.dir.display()))?;

    let stdin = io::stdin();
    let mut app = PriceScoutApp::new(session);
    app.write_load_summary(io::stdout().lock())?;
    app.run(stdin.lock(), io::stdout().lock())?;
    Ok(())
}
