//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tabsweep_protocol::{RawTab, TabPosition};

use crate::error::{Error, Result};
use crate::provider::{BrowserAutomation, HistoryStore};
use crate::tab::Tab;

pub(crate) fn tabs_from_urls(urls: &[&str]) -> Vec<Tab> {
	urls.iter()
		.enumerate()
		.map(|(i, url)| Tab::from_raw(RawTab::new(1, i as u32 + 1, *url, *url)))
		.collect()
}

pub(crate) struct MapHistory(HashMap<String, DateTime<Utc>>);

impl MapHistory {
	pub(crate) fn new<'a>(entries: impl IntoIterator<Item = (&'a str, DateTime<Utc>)>) -> Self {
		Self(entries.into_iter().map(|(url, at)| (url.to_string(), at)).collect())
	}
}

impl HistoryStore for MapHistory {
	fn last_visit(&self, url: &str) -> Option<DateTime<Utc>> {
		self.0.get(url).copied()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
	Enumerate,
	CloseTab(TabPosition),
	CloseWindow(u32),
}

/// Browser double that shifts positions on close like a real browser.
pub(crate) struct FakeBrowser {
	windows: Mutex<Vec<Vec<String>>>,
	calls: Mutex<Vec<Call>>,
	locked: HashSet<String>,
	fail_enumerate: AtomicBool,
	gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl FakeBrowser {
	pub(crate) fn new(windows: &[&[&str]]) -> Self {
		Self {
			windows: Mutex::new(windows.iter().map(|tabs| tabs.iter().map(|url| url.to_string()).collect()).collect()),
			calls: Mutex::new(Vec::new()),
			locked: HashSet::new(),
			fail_enumerate: AtomicBool::new(false),
			gate: Mutex::new(None),
		}
	}

	pub(crate) fn with_locked(mut self, urls: &[&str]) -> Self {
		self.locked = urls.iter().map(|url| url.to_string()).collect();
		self
	}

	/// Makes the next enumeration block until the returned sender fires.
	pub(crate) fn with_gate(self) -> (Self, mpsc::Sender<()>) {
		let (tx, rx) = mpsc::channel();
		*self.gate.lock() = Some(rx);
		(self, tx)
	}

	pub(crate) fn fail_enumeration(&self) {
		self.fail_enumerate.store(true, Ordering::SeqCst);
	}

	/// Rearranges the live browser, as a user would between snapshots.
	pub(crate) fn replace(&self, windows: &[&[&str]]) {
		*self.windows.lock() = windows.iter().map(|tabs| tabs.iter().map(|url| url.to_string()).collect()).collect();
	}

	pub(crate) fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	pub(crate) fn close_calls(&self) -> Vec<Call> {
		self.calls().into_iter().filter(|call| *call != Call::Enumerate).collect()
	}

	pub(crate) fn urls(&self) -> Vec<Vec<String>> {
		self.windows.lock().clone()
	}
}

impl BrowserAutomation for FakeBrowser {
	fn enumerate(&self) -> Result<Vec<RawTab>> {
		if let Some(gate) = self.gate.lock().take() {
			let _ = gate.recv();
		}
		self.calls.lock().push(Call::Enumerate);
		if self.fail_enumerate.load(Ordering::SeqCst) {
			return Err(Error::snapshot("browser not running"));
		}
		let windows = self.windows.lock();
		Ok(windows
			.iter()
			.enumerate()
			.flat_map(|(w, tabs)| {
				tabs.iter()
					.enumerate()
					.map(move |(t, url)| RawTab::new(w as u32 + 1, t as u32 + 1, url.clone(), url.clone()))
			})
			.collect())
	}

	fn close_tab(&self, position: TabPosition) -> Result<()> {
		self.calls.lock().push(Call::CloseTab(position));
		let mut windows = self.windows.lock();
		let w = position.window_index as usize;
		let t = position.tab_index as usize;
		let Some(tabs) = windows.get_mut(w.wrapping_sub(1)) else {
			return Err(Error::close(position, "no such window"));
		};
		let Some(url) = tabs.get(t.wrapping_sub(1)) else {
			return Err(Error::close(position, "no such tab"));
		};
		if self.locked.contains(url) {
			return Err(Error::close(position, "tab is locked"));
		}
		tabs.remove(t - 1);
		if tabs.is_empty() {
			windows.remove(w - 1);
		}
		Ok(())
	}

	fn close_window(&self, window_index: u32) -> Result<()> {
		self.calls.lock().push(Call::CloseWindow(window_index));
		let mut windows = self.windows.lock();
		let w = window_index as usize;
		if w == 0 || w > windows.len() {
			return Err(Error::close(format!("window {window_index}"), "no such window"));
		}
		windows.remove(w - 1);
		Ok(())
	}
}
