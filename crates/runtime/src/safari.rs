//! Safari tab enumeration and closing through AppleScript.

use tabsweep::{BrowserAutomation, Error, RawTab, TabPosition};
use tracing::{debug, info};

use crate::error::{Result, RuntimeError};
use crate::paths::SafariEdition;
use crate::process::{escape_for_applescript, run_osascript};

/// Separates tab records in the enumeration output (ASCII RS).
pub const RECORD_SEP: char = '\u{1e}';
/// Separates fields within a record (ASCII US).
pub const FIELD_SEP: char = '\u{1f}';

/// [`BrowserAutomation`] backed by `osascript`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafariAutomation {
	edition: SafariEdition,
}

impl SafariAutomation {
	pub fn new(edition: SafariEdition) -> Self {
		Self { edition }
	}

	fn app(&self) -> String {
		escape_for_applescript(self.edition.app_name())
	}

	fn enumerate_script(&self) -> String {
		let app = self.app();
		format!(
			r#"if application "{app}" is not running then error "{app} is not running" number 1001
tell application "{app}"
	set RS to character id 30
	set US to character id 31
	set output to ""
	repeat with w from 1 to (count of windows)
		set tabCount to 0
		try
			set tabCount to count of tabs of window w
		end try
		repeat with t from 1 to tabCount
			set theTab to tab t of window w
			set tabTitle to ""
			set tabURL to ""
			try
				set tabTitle to name of theTab
			end try
			try
				set tabURL to URL of theTab
			end try
			if tabTitle is missing value then set tabTitle to ""
			if tabURL is missing value then set tabURL to ""
			set output to output & (w as text) & US & (t as text) & US & tabTitle & US & tabURL & RS
		end repeat
	end repeat
	return output
end tell"#
		)
	}

	fn close_tab_script(&self, position: TabPosition) -> String {
		format!(
			r#"tell application "{}" to close tab {} of window {}"#,
			self.app(),
			position.tab_index,
			position.window_index
		)
	}

	fn close_window_script(&self, window_index: u32) -> String {
		format!(r#"tell application "{}" to close window {}"#, self.app(), window_index)
	}
}

impl BrowserAutomation for SafariAutomation {
	fn enumerate(&self) -> tabsweep::Result<Vec<RawTab>> {
		let output = run_osascript(&self.enumerate_script())?;
		let tabs = parse_enumeration(&output)?;
		info!(target = "tabsweep.safari", app = %self.edition, tabs = tabs.len(), "enumerated tabs");
		Ok(tabs)
	}

	fn close_tab(&self, position: TabPosition) -> tabsweep::Result<()> {
		debug!(target = "tabsweep.safari", %position, "closing tab");
		run_osascript(&self.close_tab_script(position))
			.map(drop)
			.map_err(|err| Error::close(position, err.to_string()))
	}

	fn close_window(&self, window_index: u32) -> tabsweep::Result<()> {
		debug!(target = "tabsweep.safari", window_index, "closing window");
		run_osascript(&self.close_window_script(window_index))
			.map(drop)
			.map_err(|err| Error::close(format!("window {window_index}"), err.to_string()))
	}
}

/// Parses the RS/US-delimited output of the enumeration script.
pub fn parse_enumeration(output: &str) -> Result<Vec<RawTab>> {
	output
		.split(RECORD_SEP)
		.map(|record| record.trim_matches(['\r', '\n']))
		.filter(|record| !record.is_empty())
		.map(parse_record)
		.collect()
}

fn parse_record(record: &str) -> Result<RawTab> {
	let malformed = || RuntimeError::Record(record.to_string());

	let mut head = record.splitn(3, FIELD_SEP);
	let window_index = parse_index(head.next()).ok_or_else(malformed)?;
	let tab_index = parse_index(head.next()).ok_or_else(malformed)?;
	// titles are free text; the URL is always the last field
	let (title, url) = head.next().and_then(|rest| rest.rsplit_once(FIELD_SEP)).ok_or_else(malformed)?;

	Ok(RawTab::new(window_index, tab_index, title, url))
}

fn parse_index(field: Option<&str>) -> Option<u32> {
	field?.trim().parse().ok().filter(|&index| index >= 1)
}
