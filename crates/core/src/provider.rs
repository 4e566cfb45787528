//! Seams to the browser and its history database.

use chrono::{DateTime, Utc};
use tabsweep_protocol::{RawTab, TabPosition};

use crate::error::Result;

/// Enumerates and closes tabs in a live browser.
///
/// Calls are synchronous and order-sensitive: positions returned by
/// [`enumerate`](Self::enumerate) are only valid until the next mutation, and
/// callers must not issue calls concurrently.
pub trait BrowserAutomation: Send + Sync {
	/// Returns every open tab in enumeration order.
	fn enumerate(&self) -> Result<Vec<RawTab>>;

	fn close_tab(&self, position: TabPosition) -> Result<()>;

	fn close_window(&self, window_index: u32) -> Result<()>;
}

/// Looks up the most recent visit of a URL.
///
/// Implementations swallow their own failures: an unreadable store answers
/// `None` for every URL.
pub trait HistoryStore: Send + Sync {
	fn last_visit(&self, url: &str) -> Option<DateTime<Utc>>;
}

/// History store with no records; every tab classifies as stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistoryStore for NoHistory {
	fn last_visit(&self, _url: &str) -> Option<DateTime<Utc>> {
		None
	}
}

impl<T: HistoryStore + ?Sized> HistoryStore for &T {
	fn last_visit(&self, url: &str) -> Option<DateTime<Utc>> {
		(**self).last_visit(url)
	}
}
