//! tabdash — checks a new-tab dashboard layout against the widget schemas.
//!
//! Run with:  `RUST_LOG=info tabdash [PATH] [--watch] [--init]`

use anyhow::{bail, Result};
use dash_config::{ConfigWatcher, DashboardConfig};
use dash_widgets::Registry;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    path: Option<PathBuf>,
    /// Revalidate every time the file changes.
    watch: bool,
    /// Write a starter layout when the file is missing.
    init: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-w" | "--watch" => args.watch = true,
            "--init" => args.init = true,
            flag if flag.starts_with('-') => bail!("unknown flag '{flag}'"),
            path => args.path = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("tabdash v{} starting", env!("CARGO_PKG_VERSION"));

    let args = parse_args()?;
    let path = args.path.unwrap_or_else(dash_config::default_path);
    let registry = Registry::builtin();

    if args.init && !path.exists() {
        let mut starter = DashboardConfig::default();
        starter.add(&registry, "search-bar")?;
        starter.add(&registry, "quick-links")?;
        dash_config::save(&path, &starter)?;
    }

    let valid = check(&path, &registry);
    if !args.watch {
        if !valid {
            bail!("'{}' has invalid widgets", path.display());
        }
        return Ok(());
    }

    let (watcher, mut changes) = ConfigWatcher::spawn(&path);
    while changes.recv().await.is_some() {
        check(watcher.path(), &registry);
    }
    Ok(())
}

/// Load and validate the layout, logging every problem.  Returns whether it
/// is valid.
fn check(path: &Path, registry: &Registry) -> bool {
    let config = match dash_config::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return false;
        }
    };

    match config.validate(registry) {
        Ok(()) => {
            tracing::info!("{} widget(s) valid", config.widgets.len());
            true
        }
        Err(e) => {
            for violation in e.violations() {
                tracing::warn!("{violation}");
            }
            tracing::error!("{} problem(s) in '{}'", e.violations().len(), path.display());
            false
        }
    }
}
