//! JSON-file browser and history for offline runs.
//!
//! The file is re-read on every call and rewritten after every close, so edits
//! made between a scan and a close behave like a user rearranging tabs in the
//! real browser.
//!
//! ```json
//! {
//!   "windows": [{ "tabs": [{ "title": "Docs", "url": "https://docs.rs/" }] }],
//!   "history": { "https://docs.rs/": "2026-01-05T10:00:00Z" },
//!   "locked": ["https://bank.example.com/"],
//!   "unreachable": false
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tabsweep::{BrowserAutomation, Error, HistoryStore, RawTab, TabPosition};
use tracing::debug;

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTab {
	#[serde(default)]
	pub title: String,
	pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureWindow {
	#[serde(default)]
	pub tabs: Vec<FixtureTab>,
}

/// On-disk fixture format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureFile {
	#[serde(default)]
	pub windows: Vec<FixtureWindow>,
	/// Last visit per URL.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub history: BTreeMap<String, DateTime<Utc>>,
	/// URLs whose tabs refuse to close.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub locked: Vec<String>,
	/// Simulates a browser that is not running.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub unreachable: bool,
}

impl FixtureFile {
	pub fn load(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path)?;
		serde_json::from_str(&content).map_err(|err| RuntimeError::Fixture {
			path: path.to_path_buf(),
			message: err.to_string(),
		})
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}
		fs::write(path, serde_json::to_string_pretty(self)?)?;
		Ok(())
	}

	pub fn snapshot(&self) -> Vec<RawTab> {
		self.windows
			.iter()
			.enumerate()
			.flat_map(|(w, window)| {
				window
					.tabs
					.iter()
					.enumerate()
					.map(move |(t, tab)| RawTab::new(w as u32 + 1, t as u32 + 1, tab.title.clone(), tab.url.clone()))
			})
			.collect()
	}

	/// Removes a tab; a window losing its last tab closes with it.
	pub fn close_tab(&mut self, position: TabPosition) -> std::result::Result<(), String> {
		let w = position.window_index as usize;
		let t = position.tab_index as usize;
		let window = w.checked_sub(1).and_then(|i| self.windows.get_mut(i)).ok_or("no such window")?;
		let tab = t.checked_sub(1).and_then(|i| window.tabs.get(i)).ok_or("no such tab")?;
		if self.locked.iter().any(|url| *url == tab.url) {
			return Err("tab is locked".to_string());
		}
		window.tabs.remove(t - 1);
		if window.tabs.is_empty() {
			self.windows.remove(w - 1);
		}
		Ok(())
	}

	pub fn close_window(&mut self, window_index: u32) -> std::result::Result<(), String> {
		let w = window_index as usize;
		if w == 0 || w > self.windows.len() {
			return Err("no such window".to_string());
		}
		self.windows.remove(w - 1);
		Ok(())
	}
}

/// [`BrowserAutomation`] over a fixture file.
#[derive(Debug)]
pub struct FixtureBrowser {
	path: PathBuf,
	write_lock: Mutex<()>,
}

impl FixtureBrowser {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			write_lock: Mutex::new(()),
		}
	}

	fn mutate(&self, target: String, op: impl FnOnce(&mut FixtureFile) -> std::result::Result<(), String>) -> tabsweep::Result<()> {
		let _guard = self.write_lock.lock();
		let mut file = FixtureFile::load(&self.path).map_err(|err| Error::close(&target, err.to_string()))?;
		op(&mut file).map_err(|message| Error::close(&target, message))?;
		file.save(&self.path).map_err(|err| Error::close(&target, err.to_string()))?;
		debug!(target = "tabsweep.fixture", closed = %target, "fixture updated");
		Ok(())
	}
}

impl BrowserAutomation for FixtureBrowser {
	fn enumerate(&self) -> tabsweep::Result<Vec<RawTab>> {
		let file = FixtureFile::load(&self.path)?;
		if file.unreachable {
			return Err(Error::snapshot(format!("fixture {} marks the browser unreachable", self.path.display())));
		}
		Ok(file.snapshot())
	}

	fn close_tab(&self, position: TabPosition) -> tabsweep::Result<()> {
		self.mutate(position.to_string(), |file| file.close_tab(position))
	}

	fn close_window(&self, window_index: u32) -> tabsweep::Result<()> {
		self.mutate(format!("window {window_index}"), |file| file.close_window(window_index))
	}
}

/// [`HistoryStore`] over the `history` map of a fixture file.
#[derive(Debug, Clone, Default)]
pub struct FixtureHistory {
	visits: BTreeMap<String, DateTime<Utc>>,
}

impl FixtureHistory {
	pub fn load(path: &Path) -> Result<Self> {
		Ok(Self {
			visits: FixtureFile::load(path)?.history,
		})
	}
}

impl HistoryStore for FixtureHistory {
	fn last_visit(&self, url: &str) -> Option<DateTime<Utc>> {
		self.visits.get(url).copied()
	}
}
