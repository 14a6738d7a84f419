//! Settings assembled from built-in defaults, an optional TOML file and
//! command-line overrides, in increasing order of precedence.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use maze_chase_system_agent::Config;
use serde::Deserialize;

const DEFAULT_WINDOW_TITLE: &str = "Maze Chase";

/// Optional keys accepted in the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) base_interval_ms: Option<f64>,
    pub(crate) empowered_duration_ms: Option<f64>,
    pub(crate) window_title: Option<String>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) base_interval_ms: Option<f64>,
    pub(crate) empowered_duration_ms: Option<f64>,
}

/// Fully resolved settings.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) agent: Config,
    pub(crate) window_title: String,
}

impl Settings {
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let defaults = Config::default();
        let base_interval_ms = overrides
            .base_interval_ms
            .or(file.base_interval_ms)
            .unwrap_or(defaults.base_interval_ms());
        let empowered_duration_ms = overrides
            .empowered_duration_ms
            .or(file.empowered_duration_ms)
            .unwrap_or(defaults.empowered_duration_ms());

        ensure!(
            base_interval_ms.is_finite() && base_interval_ms > 0.0,
            "base interval must be a positive number of milliseconds, got {base_interval_ms}"
        );
        ensure!(
            empowered_duration_ms.is_finite() && empowered_duration_ms > 0.0,
            "empowered duration must be a positive number of milliseconds, got {empowered_duration_ms}"
        );

        Ok(Self {
            agent: Config::new(base_interval_ms, empowered_duration_ms),
            window_title: file
                .window_title
                .unwrap_or_else(|| DEFAULT_WINDOW_TITLE.to_owned()),
        })
    }
}
