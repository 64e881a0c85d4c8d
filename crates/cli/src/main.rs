//! planet-data CLI - search, list and activate Planet imagery

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use planet_data::{DataClient, Item, SearchRequest, SortOrder};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "planet-data")]
#[command(author, version, about = "Planet Data API client", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Structured item search; prints one JSON line per item
    Search {
        /// Item type to search (repeatable)
        #[arg(long = "item-type", required = true)]
        item_types: Vec<String>,
        /// JSON file with the search filter (default: match everything)
        #[arg(long)]
        filter: Option<PathBuf>,
        /// Name of the search
        #[arg(long)]
        name: Option<String>,
        /// Results per page (must be less than 250)
        #[arg(long)]
        page_size: Option<u32>,
        /// Sort order: "acquired asc", "acquired desc", "published asc" or "published desc"
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortOrder>,
        /// Strictly remove false positives from the geo intersection
        #[arg(long)]
        strict: bool,
        /// Maximum number of items to return
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List the assets of an item
    Assets {
        /// Item type, e.g. PSScene
        item_type: String,
        /// Item id
        item_id: String,
    },
    /// Activate one asset of an item
    Activate {
        /// Item type, e.g. PSScene
        item_type: String,
        /// Item id
        item_id: String,
        /// Asset type, e.g. ortho_analytic_4b
        asset_type: String,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_sort(s: &str) -> std::result::Result<SortOrder, String> {
    s.parse().map_err(|e: planet_data::DataError| e.to_string())
}

fn read_filter(path: Option<&PathBuf>) -> Result<serde_json::Value> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read filter {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("filter {} is not valid JSON", path.display()))
        }
        None => Ok(serde_json::json!({"type": "AndFilter", "config": []})),
    }
}

/// Stand-in item for the asset endpoints, which only need type and id.
fn item_ref(item_type: &str, item_id: &str) -> Result<Item> {
    Item::from_record(serde_json::json!({
        "id": item_id,
        "properties": {"item_type": item_type}
    }))
    .context("failed to build item reference")
}

// ─── Main ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let client = DataClient::from_env().context("failed to create Data API client")?;

    match cli.command {
        Commands::Search {
            item_types,
            filter,
            name,
            page_size,
            sort,
            strict,
            limit,
        } => {
            let types: Vec<&str> = item_types.iter().map(String::as_str).collect();
            let mut search = SearchRequest::new(read_filter(filter.as_ref())?, &types);
            if let Some(name) = name {
                search = search.name(&name);
            }
            if let Some(n) = page_size {
                search = search.page_size(n);
            }
            if let Some(order) = sort {
                search = search.sort(order);
            }
            if strict {
                search = search.strict(true);
            }
            if let Some(n) = limit {
                search = search.limit(n);
            }

            let mut items = client.quick_search(&search).into_stream().boxed();
            let mut count = 0usize;
            while let Some(item) = items.next().await {
                let item = item.context("search failed")?;
                println!(
                    "{}",
                    serde_json::json!({"id": item.id(), "item_type": item.item_type()})
                );
                count += 1;
            }
            info!("{} items", count);
        }

        Commands::Assets { item_type, item_id } => {
            let item = item_ref(&item_type, &item_id)?;
            let pb = spinner("Listing assets...");
            let assets = client.get_assets(&item).await;
            pb.finish_and_clear();

            for asset in assets.context("failed to list assets")? {
                println!("{}\t{}", asset.asset_type(), asset.status());
            }
        }

        Commands::Activate {
            item_type,
            item_id,
            asset_type,
        } => {
            let item = item_ref(&item_type, &item_id)?;
            let assets = client
                .get_assets(&item)
                .await
                .context("failed to list assets")?;
            let Some(asset) = assets.iter().find(|a| a.asset_type() == asset_type) else {
                bail!("item {item_id} has no asset of type {asset_type}");
            };

            let pb = spinner("Activating...");
            let result = client.activate(asset).await;
            pb.finish_and_clear();

            for asset in result.context("activation failed")? {
                println!("{}\t{}", asset.asset_type(), asset.status());
            }
            info!("activation requested for {} {}", item_id, asset_type);
        }
    }

    Ok(())
}
