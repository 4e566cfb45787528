//! Last-visit lookups against Safari's `History.db`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tabsweep::HistoryStore;
use tracing::{debug, warn};

use crate::error::Result;
use crate::paths::SafariEdition;

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z, the reference
/// date of Safari's `visit_time` column.
pub const CORE_DATA_EPOCH_OFFSET: i64 = 978_307_200;

const LAST_VISIT_QUERY: &str = "SELECT MAX(history_visits.visit_time)
	FROM history_visits
	JOIN history_items ON history_items.id = history_visits.history_item
	WHERE history_items.url = ?1";

/// Converts a Core Foundation absolute time to UTC.
pub fn from_core_data_seconds(seconds: f64) -> Option<DateTime<Utc>> {
	if !seconds.is_finite() {
		return None;
	}
	let millis = (seconds * 1000.0).round() as i64;
	DateTime::from_timestamp_millis(CORE_DATA_EPOCH_OFFSET.checked_mul(1000)?.checked_add(millis)?)
}

/// Read-only view of a Safari history database.
///
/// A database that cannot be opened leaves the store empty, so every lookup
/// answers `None` and every tab classifies as stale.
pub struct SafariHistory {
	path: PathBuf,
	conn: Option<Mutex<Connection>>,
}

impl SafariHistory {
	/// Opens `path`, failing if the file is missing or lacks Safari's schema.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)?;
		conn.prepare_cached(LAST_VISIT_QUERY)?;
		debug!(target = "tabsweep.history", path = %path.display(), "opened history database");
		Ok(Self {
			path,
			conn: Some(Mutex::new(conn)),
		})
	}

	/// Opens `path`, or logs why not and returns an empty store.
	pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		match Self::open(&path) {
			Ok(store) => store,
			Err(err) => {
				warn!(
					target = "tabsweep.history",
					path = %path.display(),
					error = %err,
					"history unavailable; treating every tab as stale"
				);
				Self { path, conn: None }
			}
		}
	}

	/// Opens the default database of `edition`.
	pub fn for_edition(edition: SafariEdition) -> Self {
		match edition.history_db() {
			Some(path) => Self::open_or_empty(path),
			None => {
				warn!(target = "tabsweep.history", "no home directory; history unavailable");
				Self {
					path: PathBuf::new(),
					conn: None,
				}
			}
		}
	}

	pub fn is_available(&self) -> bool {
		self.conn.is_some()
	}

	pub fn lookup(&self, url: &str) -> Result<Option<DateTime<Utc>>> {
		let Some(conn) = &self.conn else {
			return Ok(None);
		};
		let conn = conn.lock();
		let mut stmt = conn.prepare_cached(LAST_VISIT_QUERY)?;
		let seconds: Option<f64> = stmt.query_row([url], |row| row.get(0)).optional()?.flatten();
		Ok(seconds.and_then(from_core_data_seconds))
	}
}

impl HistoryStore for SafariHistory {
	fn last_visit(&self, url: &str) -> Option<DateTime<Utc>> {
		self.lookup(url).unwrap_or_else(|err| {
			debug!(
				target = "tabsweep.history",
				path = %self.path.display(),
				url,
				error = %err,
				"history lookup failed"
			);
			None
		})
	}
}
