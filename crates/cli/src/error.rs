use thiserror::Error;

use crate::output::ErrorCode;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Engine(#[from] tabsweep::Error),

	#[error(transparent)]
	Runtime(#[from] tabsweep_runtime::RuntimeError),

	#[error("configuration error: {0}")]
	Config(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("invalid pattern: {0}")]
	Pattern(#[from] regex_lite::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Stable code reported in the output envelope.
	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Engine(tabsweep::Error::Snapshot(_)) | CliError::Runtime(_) => ErrorCode::SnapshotFailed,
			CliError::Engine(tabsweep::Error::Busy) => ErrorCode::Busy,
			CliError::Engine(tabsweep::Error::InvalidThreshold(_)) | CliError::Config(_) => ErrorCode::ConfigError,
			CliError::InvalidInput(_) | CliError::Pattern(_) => ErrorCode::InvalidInput,
			CliError::Io(_) => ErrorCode::IoError,
			CliError::Engine(_) | CliError::Anyhow(_) => ErrorCode::InternalError,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn engine_errors_map_to_codes() {
		assert_eq!(CliError::from(tabsweep::Error::snapshot("down")).code(), ErrorCode::SnapshotFailed);
		assert_eq!(CliError::from(tabsweep::Error::Busy).code(), ErrorCode::Busy);
		assert_eq!(CliError::from(tabsweep::Error::InvalidThreshold(0)).code(), ErrorCode::ConfigError);
		assert_eq!(CliError::from(tabsweep::Error::TaskFailed("panic".into())).code(), ErrorCode::InternalError);
	}

	#[test]
	fn bad_regex_is_invalid_input() {
		let err = regex_lite::Regex::new("(").unwrap_err();
		assert_eq!(CliError::from(err).code(), ErrorCode::InvalidInput);
	}
}
