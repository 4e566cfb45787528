//! Closing a URL-identified selection against a fresh snapshot.
//!
//! Positions from the snapshot the user selected from may be stale by the time
//! they confirm, so the reconciler re-enumerates, re-resolves every selected
//! URL to its current position and only then issues closes. Closes go from the
//! highest window and tab downwards so that no close shifts a position that is
//! still pending. Pinned-only windows close last; each is re-checked against
//! the fresh snapshot and shifted down past every lower window that the tab
//! closes actually emptied.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tabsweep_protocol::{RawTab, TabPosition};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::pinned::filter_pinned;
use crate::provider::BrowserAutomation;

/// URL-identified close request built from a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseRequest {
	/// One entry per selected tab; a URL listed twice closes up to two live tabs.
	pub urls: Vec<String>,
	/// Windows emptied by pinned filtering, closed after the tabs.
	pub emptied_windows: Vec<u32>,
}

impl CloseRequest {
	pub fn is_empty(&self) -> bool {
		self.urls.is_empty() && self.emptied_windows.is_empty()
	}
}

/// Ordered close commands for one request. Discarded after execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePlan {
	/// Descending by window, then by tab.
	pub tabs: Vec<TabPosition>,
	/// Descending, as addressed once every tab close has landed.
	pub windows: Vec<u32>,
	/// Live indices of the pinned-only windows behind `windows`, descending.
	#[serde(skip)]
	pinned_windows: Vec<u32>,
	/// Live windows whose every tab is in `tabs`, ascending.
	#[serde(skip)]
	emptied_by_tabs: Vec<u32>,
}

impl ClosePlan {
	pub fn is_empty(&self) -> bool {
		self.tabs.is_empty() && self.windows.is_empty()
	}

	pub fn len(&self) -> usize {
		self.tabs.len() + self.windows.len()
	}
}

/// Index `window` has after every window in `closed` below it is gone.
fn shifted(window: u32, closed: &[u32]) -> u32 {
	window - closed.iter().filter(|&&gone| gone < window).count() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CloseTarget {
	Tab(TabPosition),
	Window { window_index: u32 },
}

impl fmt::Display for CloseTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CloseTarget::Tab(position) => fmt::Display::fmt(position, f),
			CloseTarget::Window { window_index } => write!(f, "window {window_index}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseFailure {
	pub target: CloseTarget,
	pub error: String,
}

/// Outcome of an executed plan.
///
/// `attempted` counts tab closes issued, not confirmed; `failures` lists only
/// the calls the provider reported as failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseReport {
	pub attempted: usize,
	pub windows_attempted: usize,
	pub failures: Vec<CloseFailure>,
}

/// Progress counters shared with whoever is waiting on a closure.
///
/// `planned` is known once the fresh snapshot is resolved; `issued` counts
/// commands sent, which the provider does not confirm individually.
#[derive(Debug, Default)]
pub struct CloseProgress {
	planned: AtomicUsize,
	issued: AtomicUsize,
}

impl CloseProgress {
	pub fn planned(&self) -> usize {
		self.planned.load(Ordering::Acquire)
	}

	pub fn issued(&self) -> usize {
		self.issued.load(Ordering::Acquire)
	}
}

/// Resolves a request against a fresh snapshot into an ordered plan.
///
/// Selected URLs match only tabs the pinned filter keeps in `fresh`, and a
/// requested window survives only if it is still pinned-only in `fresh`.
pub fn plan_closure(fresh: &[RawTab], request: &CloseRequest) -> ClosePlan {
	let live = filter_pinned(fresh.to_vec());

	let mut remaining: HashMap<&str, usize> = HashMap::new();
	for url in &request.urls {
		*remaining.entry(url.as_str()).or_default() += 1;
	}

	let mut tabs: Vec<TabPosition> = live
		.tabs
		.iter()
		.filter(|tab| match remaining.get_mut(tab.url.as_str()) {
			Some(count) if *count > 0 => {
				*count -= 1;
				true
			}
			_ => false,
		})
		.map(RawTab::position)
		.collect();
	tabs.sort_unstable_by(|a, b| b.cmp(a));
	tabs.dedup();

	// (total, planned) per live window
	let planned: HashSet<TabPosition> = tabs.iter().copied().collect();
	let mut counts: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
	for tab in fresh {
		let entry = counts.entry(tab.window_index).or_default();
		entry.0 += 1;
		if planned.contains(&tab.position()) {
			entry.1 += 1;
		}
	}
	let emptied_by_tabs: Vec<u32> = counts
		.into_iter()
		.filter(|(_, (total, planned))| total == planned)
		.map(|(window, _)| window)
		.collect();

	let mut pinned_windows: Vec<u32> = request
		.emptied_windows
		.iter()
		.copied()
		.filter(|window| live.emptied_windows.contains(window))
		.collect();
	pinned_windows.sort_unstable_by(|a, b| b.cmp(a));
	pinned_windows.dedup();

	let windows = pinned_windows.iter().map(|&window| shifted(window, &emptied_by_tabs)).collect();

	let unmatched: usize = remaining.values().sum();
	if unmatched > 0 {
		debug!(
			target = "tabsweep.reconcile",
			unmatched,
			"selected tabs no longer open; skipping"
		);
	}
	let dropped = request.emptied_windows.iter().filter(|window| !live.emptied_windows.contains(window)).count();
	if dropped > 0 {
		debug!(
			target = "tabsweep.reconcile",
			dropped,
			"requested windows no longer pinned-only; leaving open"
		);
	}

	ClosePlan {
		tabs,
		windows,
		pinned_windows,
		emptied_by_tabs,
	}
}

/// Issues every command of `plan` in order, continuing past failures.
pub fn execute_plan<B>(browser: &B, plan: &ClosePlan, progress: &CloseProgress) -> CloseReport
where
	B: BrowserAutomation + ?Sized,
{
	progress.planned.store(plan.len(), Ordering::Release);
	let mut report = CloseReport::default();

	let mut failed_windows = HashSet::new();
	for &position in &plan.tabs {
		report.attempted += 1;
		if let Err(err) = browser.close_tab(position) {
			warn!(target = "tabsweep.reconcile", %position, error = %err, "tab close failed");
			failed_windows.insert(position.window_index);
			report.failures.push(CloseFailure {
				target: CloseTarget::Tab(position),
				error: err.to_string(),
			});
		}
		progress.issued.fetch_add(1, Ordering::AcqRel);
	}

	// a window keeps its tabs, and so its slot, if any close in it failed
	let closed: Vec<u32> = plan
		.emptied_by_tabs
		.iter()
		.copied()
		.filter(|window| !failed_windows.contains(window))
		.collect();

	for &pinned in &plan.pinned_windows {
		let window_index = shifted(pinned, &closed);
		report.windows_attempted += 1;
		if let Err(err) = browser.close_window(window_index) {
			warn!(target = "tabsweep.reconcile", window_index, error = %err, "window close failed");
			report.failures.push(CloseFailure {
				target: CloseTarget::Window { window_index },
				error: err.to_string(),
			});
		}
		progress.issued.fetch_add(1, Ordering::AcqRel);
	}

	info!(
		target = "tabsweep.reconcile",
		attempted = report.attempted,
		windows = report.windows_attempted,
		failed = report.failures.len(),
		"close plan executed"
	);

	report
}

/// Re-enumerates the browser and plans the request without closing anything.
pub fn preview<B>(browser: &B, request: &CloseRequest) -> Result<ClosePlan>
where
	B: BrowserAutomation + ?Sized,
{
	let fresh = browser.enumerate()?;
	Ok(plan_closure(&fresh, request))
}

/// Re-enumerates, plans and executes. A failed enumeration aborts before any
/// close is issued.
pub fn close_selection<B>(browser: &B, request: &CloseRequest, progress: &CloseProgress) -> Result<CloseReport>
where
	B: BrowserAutomation + ?Sized,
{
	let fresh = browser.enumerate().inspect_err(|err| {
		warn!(target = "tabsweep.reconcile", error = %err, "fresh snapshot failed; nothing closed");
	})?;
	let plan = plan_closure(&fresh, request);
	debug!(
		target = "tabsweep.reconcile",
		snapshot = fresh.len(),
		tabs = plan.tabs.len(),
		windows = plan.windows.len(),
		"close plan resolved"
	);
	Ok(execute_plan(browser, &plan, progress))
}

#[cfg(test)]
mod tests {
	use chrono::Utc;

	use super::*;
	use crate::classify::classify_snapshot;
	use crate::error::Error;
	use crate::provider::NoHistory;
	use crate::selection::Selection;
	use crate::staleness::StaleThreshold;
	use crate::test_support::{Call, FakeBrowser};

	const PIN: &str = "https://start.example.com/";

	fn request(urls: &[&str], windows: &[u32]) -> CloseRequest {
		CloseRequest {
			urls: urls.iter().map(|url| url.to_string()).collect(),
			emptied_windows: windows.to_vec(),
		}
	}

	#[test]
	fn plan_orders_descending_window_then_tab() {
		let fresh = vec![
			RawTab::new(1, 2, "b", "https://b.com"),
			RawTab::new(1, 5, "e", "https://e.com"),
			RawTab::new(2, 1, "f", "https://f.com"),
			RawTab::new(2, 2, "g", "https://g.com"),
		];
		let plan = plan_closure(&fresh, &request(&["https://e.com", "https://b.com", "https://f.com"], &[]));
		assert_eq!(plan.tabs, vec![TabPosition::new(2, 1), TabPosition::new(1, 5), TabPosition::new(1, 2)]);
	}

	#[test]
	fn plan_keeps_only_windows_still_pinned_only() {
		let fresh = vec![
			RawTab::new(1, 1, "p", PIN),
			RawTab::new(2, 1, "p", PIN),
			RawTab::new(2, 2, "c", "https://c.com"),
			RawTab::new(3, 1, "p", PIN),
			RawTab::new(4, 1, "p", PIN),
		];
		let plan = plan_closure(&fresh, &request(&[], &[2, 4, 1, 4]));
		assert_eq!(plan.windows, vec![4, 1]);
		assert!(plan.tabs.is_empty());
	}

	#[test]
	fn pinned_tabs_are_never_matched_by_url() {
		let fresh = vec![
			RawTab::new(1, 1, "p", PIN),
			RawTab::new(2, 1, "p", PIN),
			RawTab::new(3, 1, "p", PIN),
			RawTab::new(3, 6, "p", PIN),
		];
		let plan = plan_closure(&fresh, &request(&[PIN], &[]));
		assert_eq!(plan.tabs, vec![TabPosition::new(3, 6)]);
	}

	#[test]
	fn one_selected_url_closes_one_live_tab() {
		let fresh = vec![
			RawTab::new(1, 1, "x", "https://x.com"),
			RawTab::new(1, 2, "x", "https://x.com"),
			RawTab::new(1, 3, "x", "https://x.com"),
		];
		let plan = plan_closure(&fresh, &request(&["https://x.com"], &[]));
		assert_eq!(plan.tabs, vec![TabPosition::new(1, 1)]);

		let plan = plan_closure(&fresh, &request(&["https://x.com", "https://x.com"], &[]));
		assert_eq!(plan.tabs, vec![TabPosition::new(1, 2), TabPosition::new(1, 1)]);
	}

	#[test]
	fn tabs_closed_since_selection_are_skipped() {
		let fresh = vec![RawTab::new(1, 1, "a", "https://a.com")];
		let plan = plan_closure(&fresh, &request(&["https://gone.com", "https://a.com"], &[]));
		assert_eq!(plan.tabs, vec![TabPosition::new(1, 1)]);
	}

	#[test]
	fn moved_tab_is_closed_at_its_new_position() {
		let browser = FakeBrowser::new(&[&["https://a.com", "https://dup.com"]]);
		// the user drags the tab into a new window after selecting it
		browser.replace(&[&["https://a.com"], &["https://z.com", "https://dup.com"]]);

		let report = close_selection(&browser, &request(&["https://dup.com"], &[]), &CloseProgress::default()).unwrap();

		assert_eq!(report.attempted, 1);
		assert_eq!(browser.close_calls(), vec![Call::CloseTab(TabPosition::new(2, 2))]);
		assert_eq!(browser.urls(), vec![vec!["https://a.com".to_string()], vec!["https://z.com".to_string()]]);
	}

	#[test]
	fn descending_order_keeps_positions_valid() {
		let browser = FakeBrowser::new(&[&["https://1.com", "https://2.com", "https://3.com", "https://4.com", "https://5.com"]]);
		let progress = CloseProgress::default();
		let report = close_selection(&browser, &request(&["https://2.com", "https://5.com", "https://3.com"], &[]), &progress).unwrap();

		assert_eq!(report.attempted, 3);
		assert!(report.failures.is_empty());
		assert_eq!(browser.urls(), vec![vec!["https://1.com".to_string(), "https://4.com".to_string()]]);
		assert_eq!(progress.planned(), 3);
		assert_eq!(progress.issued(), 3);
	}

	#[test]
	fn failed_snapshot_issues_nothing() {
		let browser = FakeBrowser::new(&[&["https://a.com"]]);
		browser.fail_enumeration();

		let result = close_selection(&browser, &request(&["https://a.com"], &[3]), &CloseProgress::default());

		assert!(matches!(result, Err(Error::Snapshot(_))));
		assert_eq!(browser.calls(), vec![Call::Enumerate]);
	}

	#[test]
	fn per_item_failures_do_not_stop_the_plan() {
		let browser = FakeBrowser::new(&[&["https://a.com", "https://locked.com", "https://c.com"]]).with_locked(&["https://locked.com"]);

		let report = close_selection(
			&browser,
			&request(&["https://a.com", "https://locked.com", "https://c.com"], &[]),
			&CloseProgress::default(),
		)
		.unwrap();

		assert_eq!(report.attempted, 3);
		assert_eq!(report.failures.len(), 1);
		assert_eq!(report.failures[0].target, CloseTarget::Tab(TabPosition::new(1, 2)));
		assert_eq!(browser.urls(), vec![vec!["https://locked.com".to_string()]]);
	}

	#[test]
	fn windows_close_after_tabs_in_descending_order() {
		let browser = FakeBrowser::new(&[&[PIN], &[PIN, "https://a.com", "https://b.com"], &[PIN]]);

		let report = close_selection(&browser, &request(&["https://b.com"], &[1, 3]), &CloseProgress::default()).unwrap();

		assert_eq!(report.attempted, 1);
		assert_eq!(report.windows_attempted, 2);
		assert_eq!(
			browser.close_calls(),
			vec![Call::CloseTab(TabPosition::new(2, 3)), Call::CloseWindow(3), Call::CloseWindow(1)]
		);
		assert_eq!(browser.urls(), vec![vec![PIN.to_string(), "https://a.com".to_string()]]);
	}

	#[test]
	fn window_emptied_by_tab_close_shifts_pinned_windows_above() {
		let browser = FakeBrowser::new(&[
			&[PIN, "https://a.com/x"],
			&["https://a.com/x/"],
			&[PIN],
			&[PIN, "https://unselected.com/keep-me"],
		]);
		let classification = classify_snapshot(
			browser.enumerate().unwrap(),
			StaleThreshold::default(),
			Utc::now(),
			&NoHistory,
		);
		assert_eq!(classification.emptied_windows(), &[3]);
		let request = Selection::defaults(&classification).to_request(&classification);

		let plan = preview(&browser, &request).unwrap();
		assert_eq!(plan.windows, vec![2]);

		let report = close_selection(&browser, &request, &CloseProgress::default()).unwrap();

		assert!(report.failures.is_empty());
		assert_eq!(
			browser.close_calls(),
			vec![Call::CloseTab(TabPosition::new(2, 1)), Call::CloseWindow(2)]
		);
		assert_eq!(
			browser.urls(),
			vec![
				vec![PIN.to_string(), "https://a.com/x".to_string()],
				vec![PIN.to_string(), "https://unselected.com/keep-me".to_string()],
			]
		);
	}

	#[test]
	fn failed_tab_close_keeps_window_slot() {
		let browser = FakeBrowser::new(&[&[PIN, "https://x.com"], &["https://locked.com"], &[PIN], &[PIN, "https://y.com"]])
			.with_locked(&["https://locked.com"]);

		let report = close_selection(&browser, &request(&["https://locked.com"], &[3]), &CloseProgress::default()).unwrap();

		assert_eq!(report.failures.len(), 1);
		assert_eq!(
			browser.close_calls(),
			vec![Call::CloseTab(TabPosition::new(2, 1)), Call::CloseWindow(3)]
		);
		assert_eq!(browser.urls().len(), 3);
		assert_eq!(browser.urls()[2], vec![PIN.to_string(), "https://y.com".to_string()]);
	}

	#[test]
	fn window_no_longer_pinned_only_is_left_open() {
		let browser = FakeBrowser::new(&[&[PIN], &[PIN], &[PIN]]);
		// the user opens a tab in window 2 after the scan
		browser.replace(&[&[PIN], &[PIN, "https://new.com"], &[PIN]]);

		let report = close_selection(&browser, &request(&[], &[2, 3]), &CloseProgress::default()).unwrap();

		assert_eq!(report.windows_attempted, 1);
		assert_eq!(browser.close_calls(), vec![Call::CloseWindow(3)]);
	}

	#[test]
	fn preview_does_not_close() {
		let browser = FakeBrowser::new(&[&["https://a.com", "https://a.com"]]);
		let plan = preview(&browser, &request(&["https://a.com"], &[])).unwrap();
		assert_eq!(plan.tabs, vec![TabPosition::new(1, 1)]);
		assert!(browser.close_calls().is_empty());
	}
}
