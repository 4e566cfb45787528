use std::fmt;

use serde::{Deserialize, Serialize};

/// One tab as reported by a single browser enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTab {
	/// 1-based window position.
	pub window_index: u32,
	/// 1-based tab position within the window.
	pub tab_index: u32,
	pub title: String,
	pub url: String,
}

impl RawTab {
	pub fn new(window_index: u32, tab_index: u32, title: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			window_index,
			tab_index,
			title: title.into(),
			url: url.into(),
		}
	}

	pub fn position(&self) -> TabPosition {
		TabPosition::new(self.window_index, self.tab_index)
	}
}

/// Address of a tab for close-by-position commands.
///
/// Ordered by window then tab, so sorting in reverse yields the order in which
/// closes can be issued without shifting the positions still to be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabPosition {
	pub window_index: u32,
	pub tab_index: u32,
}

impl TabPosition {
	pub const fn new(window_index: u32, tab_index: u32) -> Self {
		Self { window_index, tab_index }
	}
}

impl fmt::Display for TabPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "window {} tab {}", self.window_index, self.tab_index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positions_order_by_window_then_tab() {
		let mut positions = vec![TabPosition::new(1, 5), TabPosition::new(2, 1), TabPosition::new(1, 2)];
		positions.sort_by(|a, b| b.cmp(a));
		assert_eq!(positions, vec![TabPosition::new(2, 1), TabPosition::new(1, 5), TabPosition::new(1, 2)]);
	}

	#[test]
	fn raw_tab_serializes_camel_case() {
		let tab = RawTab::new(1, 3, "Docs", "https://docs.rs");
		let json = serde_json::to_value(&tab).unwrap();
		assert_eq!(json["windowIndex"], 1);
		assert_eq!(json["tabIndex"], 3);
		assert_eq!(tab.position(), TabPosition::new(1, 3));
	}

	#[test]
	fn position_display_is_human_readable() {
		assert_eq!(TabPosition::new(2, 7).to_string(), "window 2 tab 7");
	}
}
