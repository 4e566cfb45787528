//! Last-visit annotation and staleness policy.

use chrono::{DateTime, Duration, Utc};
use tabsweep_protocol::RawTab;
use tracing::trace;

use crate::error::{Error, Result};
use crate::provider::HistoryStore;
use crate::tab::Tab;

/// Validated age window, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleThreshold(u32);

impl StaleThreshold {
	pub const DEFAULT_DAYS: u32 = 7;

	pub fn new(days: u32) -> Result<Self> {
		if days < 1 {
			return Err(Error::InvalidThreshold(days));
		}
		Ok(Self(days))
	}

	pub fn days(self) -> u32 {
		self.0
	}

	/// Visits strictly before this instant are stale.
	pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
		now - Duration::days(i64::from(self.0))
	}
}

impl Default for StaleThreshold {
	fn default() -> Self {
		Self(Self::DEFAULT_DAYS)
	}
}

/// Unknown history counts as stale so the tab is surfaced for review.
pub fn is_stale(last_visit: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
	match last_visit {
		Some(visit) => visit < cutoff,
		None => true,
	}
}

/// Annotates each tab with its last visit and staleness.
pub fn classify_staleness<H>(tabs: Vec<RawTab>, threshold: StaleThreshold, now: DateTime<Utc>, history: &H) -> Vec<Tab>
where
	H: HistoryStore + ?Sized,
{
	let cutoff = threshold.cutoff(now);
	tabs.into_iter()
		.map(|raw| {
			let mut tab = Tab::from_raw(raw);
			tab.last_visit = history.last_visit(&tab.url);
			tab.is_stale = is_stale(tab.last_visit, cutoff);
			trace!(
				target = "tabsweep.staleness",
				url = %tab.url,
				last_visit = ?tab.last_visit,
				stale = tab.is_stale,
				"classified tab"
			);
			tab
		})
		.collect()
}
