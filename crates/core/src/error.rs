use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The browser could not be enumerated.
	#[error("snapshot failed: {0}")]
	Snapshot(String),

	/// A single close command was refused or failed.
	#[error("failed to close {target}: {message}")]
	Close { target: String, message: String },

	#[error("stale threshold must be at least 1 day, got {0}")]
	InvalidThreshold(u32),

	/// Another snapshot or closure is still running.
	#[error("another tab operation is already in progress")]
	Busy,

	#[error("background task failed: {0}")]
	TaskFailed(String),
}

impl Error {
	pub fn snapshot(message: impl Into<String>) -> Self {
		Error::Snapshot(message.into())
	}

	pub fn close(target: impl ToString, message: impl Into<String>) -> Self {
		Error::Close {
			target: target.to_string(),
			message: message.into(),
		}
	}
}
