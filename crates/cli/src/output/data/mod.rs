use chrono::{DateTime, Utc};
use serde::Serialize;
use tabsweep::{Classification, ClosePlan, CloseReport, Selection, Tab};

/// Classified tab with its ordinal in the list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRow<'a> {
	pub ordinal: usize,
	#[serde(flatten)]
	pub tab: &'a Tab,
}

/// Counts over one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSummary {
	pub count: usize,
	pub duplicates: usize,
	pub stale: usize,
	pub selected: usize,
	pub pinned_urls: usize,
	pub emptied_windows: Vec<u32>,
}

impl ClassificationSummary {
	pub fn new(classification: &Classification) -> Self {
		Self {
			count: classification.len(),
			duplicates: classification.duplicate_count(),
			stale: classification.stale_count(),
			selected: classification.tabs().iter().filter(|tab| tab.selected).count(),
			pinned_urls: classification.pinned_urls().len(),
			emptied_windows: classification.emptied_windows().to_vec(),
		}
	}
}

/// Result data for the scan command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanData<'a> {
	pub threshold_days: u32,
	pub scanned_at: DateTime<Utc>,
	pub summary: ClassificationSummary,
	pub pinned_urls: Vec<&'a str>,
	pub tabs: Vec<TabRow<'a>>,
}

/// A tab chosen for closing, as it appeared in the scanned snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTab<'a> {
	pub ordinal: usize,
	pub title: &'a str,
	pub url: &'a str,
}

impl<'a> SelectedTab<'a> {
	pub fn collect(selection: &Selection, classification: &'a Classification) -> Vec<Self> {
		selection
			.ordinals()
			.filter_map(|ordinal| {
				classification.get(ordinal).map(|tab| SelectedTab {
					ordinal,
					title: &tab.title,
					url: &tab.url,
				})
			})
			.collect()
	}
}

/// Result data for the close command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseData<'a> {
	pub dry_run: bool,
	pub selected: Vec<SelectedTab<'a>>,
	pub protected_skipped: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub plan: Option<ClosePlan>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub report: Option<CloseReport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub remaining: Option<ClassificationSummary>,
}
