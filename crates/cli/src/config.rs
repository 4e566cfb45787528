//! Settings merged from `config.json` and command-line flags.
//!
//! The file lives at `~/.config/tabsweep/config.json` (platform config dir)
//! unless `--config` points elsewhere. Every field is optional; flags win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tabsweep::StaleThreshold;
use tabsweep_runtime::SafariEdition;
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, Result};

const CONFIG_DIR: &str = "tabsweep";
const CONFIG_FILE: &str = "config.json";

/// On-disk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
	#[serde(default)]
	pub stale_days: Option<u32>,
	#[serde(default)]
	pub preview: Option<bool>,
	#[serde(default)]
	pub history_db: Option<PathBuf>,
	/// URL patterns never selected for closing.
	#[serde(default)]
	pub protected_urls: Vec<String>,
}

impl FileConfig {
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
	}

	/// Loads `path`; a missing file yields the defaults.
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				debug!(target = "tabsweep.config", path = %path.display(), "no config file; using defaults");
				return Ok(Self::default());
			}
			Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
		};
		serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
	}
}

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
	pub threshold: StaleThreshold,
	pub edition: SafariEdition,
	pub history_db: Option<PathBuf>,
	pub fixture: Option<PathBuf>,
	pub protected_urls: Vec<String>,
}

impl Settings {
	/// Reads the config file named by `cli` (or the default one) and applies flags.
	pub fn from_cli(cli: &Cli) -> Result<Self> {
		let file = match cli.config.clone().or_else(FileConfig::default_path) {
			Some(path) => FileConfig::load(&path).map_err(|err| CliError::Config(format!("{err:#}")))?,
			None => FileConfig::default(),
		};
		Self::merge(cli, file)
	}

	pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
		let days = cli.stale_days.or(file.stale_days).unwrap_or(StaleThreshold::DEFAULT_DAYS);
		let threshold = StaleThreshold::new(days).map_err(|err| CliError::Config(err.to_string()))?;

		let mut protected_urls = file.protected_urls;
		protected_urls.extend(cli.protect.iter().cloned());

		let settings = Self {
			threshold,
			edition: SafariEdition::from_preview(cli.preview || file.preview.unwrap_or(false)),
			history_db: cli.history_db.clone().or(file.history_db),
			fixture: cli.fixture.clone(),
			protected_urls,
		};
		debug!(target = "tabsweep.config", ?settings, "resolved settings");
		Ok(settings)
	}
}
