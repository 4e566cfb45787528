use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("history database error: {0}")]
	Sqlite(#[from] rusqlite::Error),

	/// `osascript` ran but the script failed.
	#[error("AppleScript failed (exit {status}): {stderr}")]
	Script { status: i32, stderr: String },

	#[error("malformed enumeration record: {0:?}")]
	Record(String),

	#[error("fixture {path}: {message}")]
	Fixture { path: PathBuf, message: String },
}

impl From<RuntimeError> for tabsweep::Error {
	fn from(err: RuntimeError) -> Self {
		tabsweep::Error::snapshot(err.to_string())
	}
}
