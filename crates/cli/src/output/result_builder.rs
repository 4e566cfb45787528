use std::io::{self, Write};
use std::time::Instant;

use serde::Serialize;

use crate::output::format::OutputFormat;
use crate::output::model::{CommandError, CommandResult, Diagnostic, DiagnosticLevel, ErrorCode, SCHEMA_VERSION};

/// Builder for constructing command results.
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
	diagnostics: Vec<Diagnostic>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Instant::now(),
			diagnostics: Vec::new(),
		}
	}

	/// Measures duration from `start` instead of from construction.
	pub fn started_at(mut self, start: Instant) -> Self {
		self.start_time = start;
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
		});
		self
	}

	pub fn diagnostic(mut self, level: DiagnosticLevel, message: impl Into<String>) -> Self {
		self.diagnostics.push(Diagnostic {
			level,
			message: message.into(),
		});
		self
	}

	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();

		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok,
			command: self.command,
			data: self.data,
			error: self.error,
			duration_ms: Some(self.start_time.elapsed().as_millis() as u64),
			diagnostics: self.diagnostics,
		}
	}
}

/// Print a command result to stdout in the specified format.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Toon => {
			if let Ok(json_value) = serde_json::to_value(result) {
				println!("{}", toon::encode(&json_value, None));
			}
		}
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => {
			print_result_text(result);
		}
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if let Some(ref data) = result.data {
		if let Ok(json) = serde_json::to_string_pretty(data) {
			let _ = writeln!(stdout, "{json}");
		}
	}
	if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
	}

	for diag in &result.diagnostics {
		let prefix = match diag.level {
			DiagnosticLevel::Info => "info",
			DiagnosticLevel::Warning => "warning",
			DiagnosticLevel::Error => "error",
		};
		let _ = writeln!(stdout, "[{prefix}] {}", diag.message);
	}

	if let Some(duration_ms) = result.duration_ms {
		let _ = writeln!(stdout, "Completed in {duration_ms}ms");
	}
}
