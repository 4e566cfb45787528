//! Classified tab list.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabsweep_protocol::{RawTab, TabPosition};

/// One open tab after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
	pub window_index: u32,
	pub tab_index: u32,
	pub title: String,
	pub url: String,
	/// Most recent recorded visit; `None` when history has no record.
	pub last_visit: Option<DateTime<Utc>>,
	pub is_stale: bool,
	/// Ordinal of an earlier tab in the same list that this tab duplicates.
	pub duplicate_of: Option<usize>,
	/// Default close selection.
	pub selected: bool,
}

impl Tab {
	/// Builds an unclassified tab from a snapshot row.
	pub fn from_raw(raw: RawTab) -> Self {
		Self {
			window_index: raw.window_index,
			tab_index: raw.tab_index,
			title: raw.title,
			url: raw.url,
			last_visit: None,
			is_stale: false,
			duplicate_of: None,
			selected: false,
		}
	}

	pub fn position(&self) -> TabPosition {
		TabPosition::new(self.window_index, self.tab_index)
	}

	pub fn is_duplicate(&self) -> bool {
		self.duplicate_of.is_some()
	}
}

/// Result of one classification pass over a snapshot.
///
/// Immutable once built: selection state lives in [`Selection`](crate::Selection)
/// and a browser change calls for a new classification.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
	tabs: Vec<Tab>,
	emptied_windows: Vec<u32>,
	pinned_urls: BTreeSet<String>,
}

impl Classification {
	pub(crate) fn new(tabs: Vec<Tab>, emptied_windows: Vec<u32>, pinned_urls: BTreeSet<String>) -> Self {
		Self {
			tabs,
			emptied_windows,
			pinned_urls,
		}
	}

	pub fn tabs(&self) -> &[Tab] {
		&self.tabs
	}

	pub fn get(&self, ordinal: usize) -> Option<&Tab> {
		self.tabs.get(ordinal)
	}

	pub fn len(&self) -> usize {
		self.tabs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tabs.is_empty()
	}

	/// Windows whose every tab was removed by pinned filtering.
	pub fn emptied_windows(&self) -> &[u32] {
		&self.emptied_windows
	}

	pub fn pinned_urls(&self) -> &BTreeSet<String> {
		&self.pinned_urls
	}

	pub fn duplicate_count(&self) -> usize {
		self.tabs.iter().filter(|tab| tab.is_duplicate()).count()
	}

	pub fn stale_count(&self) -> usize {
		self.tabs.iter().filter(|tab| tab.is_stale).count()
	}
}
