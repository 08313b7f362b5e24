// crates/storyreel-ui/src/main.rs
//
// storyreel <feed.json|URL> [--config gallery.toml] [--stages a,b,c] [--summary|--json]
//
// Renders a feed into the built-in stage page on a DomSurface and prints the
// markup (or just the summary). A feed that cannot be fetched or parsed still
// prints the apology page, then exits non-zero.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use storyreel_core::{parse_feed, FeedError, FeedRecord, GalleryConfig};
use storyreel_ui::helpers::log;
use storyreel_ui::{build_stage_page, DomSurface, GalleryApp};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version, about = "Render a media feed into a staged gallery page")]
struct Args {
    /// Feed document: a local JSON file or an http(s) URL.
    feed: String,

    /// TOML file overriding gallery defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stage sections the page declares, in order. Defaults to the stages the
    /// feed mentions plus the terminal stage.
    #[arg(long, value_delimiter = ',')]
    stages: Vec<String>,

    /// Print counts and diagnostics instead of markup.
    #[arg(long)]
    summary: bool,

    /// Print the render report as JSON instead of markup.
    #[arg(long, conflicts_with = "summary")]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::init(args.verbose);

    let config = match &args.config {
        Some(path) => GalleryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GalleryConfig::default(),
    };

    let feed = load_feed(&args.feed);
    let stages = page_stages(&args.stages, &config, feed.as_deref().ok());

    let mut surface = DomSurface::new();
    build_stage_page(&mut surface, &config, &stages);
    let mut app = GalleryApp::new(surface, config);

    match app.mount_feed(feed) {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if args.summary {
                print!("{}", report.summary.render(app.diagnostics()));
            } else {
                println!("{}", app.surface().to_html());
            }
            Ok(())
        }
        Err(e) => {
            if !args.summary && !args.json {
                println!("{}", app.surface().to_html());
            }
            Err(anyhow::Error::new(e).context(format!("feed {} unavailable", args.feed)))
        }
    }
}

fn load_feed(source: &str) -> Result<Vec<FeedRecord>, FeedError> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        tracing::info!(url = source, "fetching feed");
        ureq::get(source)
            .call()
            .map_err(|e| FeedError::Fetch(e.to_string()))?
            .into_string()
            .map_err(|e| FeedError::Fetch(e.to_string()))?
    } else {
        std::fs::read_to_string(source).map_err(|e| FeedError::Fetch(format!("{source}: {e}")))?
    };
    parse_feed(&text)
}

/// Explicit `--stages`, else first-seen feed stages followed by the terminal
/// stage.
fn page_stages(explicit: &[String], config: &GalleryConfig, records: Option<&[FeedRecord]>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut push = |k: &str| {
        let k = k.trim();
        if !k.is_empty() && !keys.iter().any(|existing| existing == k) {
            keys.push(k.to_string());
        }
    };

    if explicit.is_empty() {
        for item in records.unwrap_or_default().iter().flatten() {
            if let Some(key) = item.stage_key() {
                push(key);
            }
        }
    } else {
        for key in explicit {
            push(key.as_str());
        }
    }
    push(config.terminal_stage.as_str());
    keys
}
