//! Safari edition names and on-disk locations.

use std::fmt;
use std::path::PathBuf;

/// Which Safari build to drive. Both share one scripting dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SafariEdition {
	#[default]
	Standard,
	TechnologyPreview,
}

impl SafariEdition {
	pub fn from_preview(preview: bool) -> Self {
		if preview { Self::TechnologyPreview } else { Self::Standard }
	}

	/// Application name as AppleScript addresses it.
	pub fn app_name(self) -> &'static str {
		match self {
			Self::Standard => "Safari",
			Self::TechnologyPreview => "Safari Technology Preview",
		}
	}

	fn library_dir(self) -> &'static str {
		match self {
			Self::Standard => "Safari",
			Self::TechnologyPreview => "SafariTechnologyPreview",
		}
	}

	/// Default `History.db` location under the user's `~/Library`.
	pub fn history_db(self) -> Option<PathBuf> {
		dirs::home_dir().map(|home| home.join("Library").join(self.library_dir()).join("History.db"))
	}
}

impl fmt::Display for SafariEdition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.app_name())
	}
}
