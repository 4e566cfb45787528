//! `osascript` invocation helpers.

use std::process::Command;

use tracing::trace;

use crate::error::{Result, RuntimeError};

const OSASCRIPT: &str = "osascript";

/// Escapes a string for embedding inside an AppleScript double-quoted literal.
///
/// Backslashes go first so the later replacements are not escaped twice.
pub fn escape_for_applescript(s: &str) -> String {
	s.replace('\\', "\\\\")
		.replace('"', "\\\"")
		.replace('\n', "\\n")
		.replace('\r', "\\r")
}

/// Runs `script` and returns its stdout with the trailing newline removed.
pub fn run_osascript(script: &str) -> Result<String> {
	trace!(target = "tabsweep.process", script, "running osascript");
	let output = Command::new(OSASCRIPT).arg("-e").arg(script).output()?;

	if !output.status.success() {
		return Err(RuntimeError::Script {
			status: output.status.code().unwrap_or(-1),
			stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
		});
	}

	let stdout = String::from_utf8_lossy(&output.stdout);
	Ok(stdout.strip_suffix('\n').unwrap_or(&stdout).to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escapes_quotes_and_backslashes() {
		assert_eq!(escape_for_applescript(r#"say "hi""#), r#"say \"hi\""#);
		assert_eq!(escape_for_applescript(r"C:\path"), r"C:\\path");
		assert_eq!(escape_for_applescript("a\nb"), "a\\nb");
	}

	#[test]
	fn escaping_backslash_before_quote_is_not_doubled() {
		assert_eq!(escape_for_applescript(r#"\""#), r#"\\\""#);
	}

	#[cfg(not(target_os = "macos"))]
	#[test]
	fn missing_osascript_is_an_io_error() {
		assert!(matches!(run_osascript("return 1"), Err(RuntimeError::Io(_))));
	}
}
