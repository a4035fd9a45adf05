pub mod schema;
pub mod watcher;

pub use schema::{DashboardConfig, GlobalConfig, PlacedWidget};
pub use watcher::ConfigWatcher;

use dash_core::{DashError, Result};
use std::path::{Path, PathBuf};

/// Load the dashboard layout from a TOML file.  Returns
/// `DashboardConfig::default()` if the file doesn't exist so the page always
/// renders.  Widgets without an id get one assigned.
pub fn load(path: impl AsRef<Path>) -> Result<DashboardConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Dashboard file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DashboardConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DashError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let mut config: DashboardConfig =
        toml::from_str(&raw).map_err(|e| DashError::Config(format!("TOML parse error: {e}")))?;
    config.assign_missing_ids();

    tracing::info!(
        "Loaded {} widget(s) from '{}'",
        config.widgets.len(),
        path.display()
    );
    Ok(config)
}

/// Write the dashboard layout to `path`, creating parent directories.
pub fn save(path: impl AsRef<Path>, config: &DashboardConfig) -> Result<()> {
    let path = path.as_ref();
    let raw = toml::to_string_pretty(config)
        .map_err(|e| DashError::Config(format!("TOML encode error: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, raw)?;

    tracing::info!("Saved dashboard to '{}'", path.display());
    Ok(())
}

/// Return the default layout path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tabdash").join("dashboard.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_widgets::Registry;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.toml");
        let registry = Registry::builtin();

        let mut config = DashboardConfig::default();
        config.global.font = "Inter".to_string();
        config.add(&registry, "search-bar").unwrap();
        save(&path, &config).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn parse_error_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "[[widgets]\nkind = ").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
    }

    #[test]
    fn load_keeps_non_string_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "[[widgets]]\nkind = \"search-bar\"\nid = 5\n").unwrap();

        let config = load(&path).unwrap();
        let err = config.validate(&Registry::builtin()).unwrap_err();
        assert_eq!(
            err.rules_for("widgets[0].id").collect::<Vec<_>>(),
            vec![&dash_core::Rule::WrongType { expected: "string" }]
        );
    }

    #[test]
    fn default_path_file_name() {
        assert!(default_path().ends_with("tabdash/dashboard.toml"));
    }
}
