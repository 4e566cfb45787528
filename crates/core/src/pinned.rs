//! Positional-frequency heuristic for pinned tabs.
//!
//! Safari does not expose pinned state to scripting, but pinned tabs are
//! mirrored into every window at the leading positions. A URL that sits in the
//! first [`PIN_CANDIDATE_SLOTS`] of at least [`PIN_WINDOW_THRESHOLD`] distinct
//! windows is treated as pinned everywhere.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tabsweep_protocol::RawTab;
use tracing::debug;

/// Leading positions of a window eligible for the pinned heuristic.
pub const PIN_CANDIDATE_SLOTS: u32 = 4;

/// Distinct windows a candidate URL must appear in to count as pinned.
pub const PIN_WINDOW_THRESHOLD: usize = 3;

/// Output of [`filter_pinned`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedFilter {
	/// Input tabs minus pinned ones, in input order.
	pub tabs: Vec<RawTab>,
	/// Windows that had tabs and lost all of them, ascending.
	pub emptied_windows: Vec<u32>,
	pub pinned_urls: BTreeSet<String>,
}

pub fn is_pin_candidate(tab: &RawTab) -> bool {
	tab.tab_index <= PIN_CANDIDATE_SLOTS
}

/// Removes pinned tabs and reports the windows left empty by the removal.
pub fn filter_pinned(tabs: Vec<RawTab>) -> PinnedFilter {
	let mut candidate_windows: HashMap<&str, HashSet<u32>> = HashMap::new();
	for tab in tabs.iter().filter(|tab| is_pin_candidate(tab)) {
		candidate_windows.entry(tab.url.as_str()).or_default().insert(tab.window_index);
	}

	let pinned_urls: BTreeSet<String> = candidate_windows
		.into_iter()
		.filter(|(_, windows)| windows.len() >= PIN_WINDOW_THRESHOLD)
		.map(|(url, _)| url.to_string())
		.collect();

	// (total, removed) per window
	let mut window_counts: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
	let mut kept = Vec::with_capacity(tabs.len());
	for tab in tabs {
		let counts = window_counts.entry(tab.window_index).or_default();
		counts.0 += 1;
		if is_pin_candidate(&tab) && pinned_urls.contains(&tab.url) {
			counts.1 += 1;
		} else {
			kept.push(tab);
		}
	}

	let emptied_windows: Vec<u32> = window_counts
		.into_iter()
		.filter(|(_, (total, removed))| *total > 0 && total == removed)
		.map(|(window, _)| window)
		.collect();

	if !pinned_urls.is_empty() {
		debug!(
			target = "tabsweep.pinned",
			pinned = pinned_urls.len(),
			emptied = emptied_windows.len(),
			kept = kept.len(),
			"filtered pinned tabs"
		);
	}

	PinnedFilter {
		tabs: kept,
		emptied_windows,
		pinned_urls,
	}
}
