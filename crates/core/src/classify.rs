//! Snapshot → classified list pipeline.

use chrono::{DateTime, Utc};
use tabsweep_protocol::RawTab;
use tracing::info;

use crate::duplicates::mark_duplicates;
use crate::pinned::filter_pinned;
use crate::provider::HistoryStore;
use crate::staleness::{StaleThreshold, classify_staleness};
use crate::tab::Classification;

/// Runs pinned filtering, staleness and duplicate detection over one snapshot.
pub fn classify_snapshot<H>(raw: Vec<RawTab>, threshold: StaleThreshold, now: DateTime<Utc>, history: &H) -> Classification
where
	H: HistoryStore + ?Sized,
{
	let enumerated = raw.len();
	let pinned = filter_pinned(raw);
	let tabs = classify_staleness(pinned.tabs, threshold, now, history);
	let tabs = mark_duplicates(tabs);
	let classification = Classification::new(tabs, pinned.emptied_windows, pinned.pinned_urls);

	info!(
		target = "tabsweep.classify",
		enumerated,
		kept = classification.len(),
		duplicates = classification.duplicate_count(),
		stale = classification.stale_count(),
		pinned_urls = classification.pinned_urls().len(),
		"classified snapshot"
	);

	classification
}
