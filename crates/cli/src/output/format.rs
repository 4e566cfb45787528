use std::fmt;

use clap::ValueEnum;

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// TOON, compact and line-oriented
	#[default]
	Toon,
	/// Pretty-printed JSON document
	Json,
	/// One JSON object per line
	Ndjson,
	/// Human-readable text
	Text,
}

impl OutputFormat {
	pub fn as_str(self) -> &'static str {
		match self {
			OutputFormat::Toon => "toon",
			OutputFormat::Json => "json",
			OutputFormat::Ndjson => "ndjson",
			OutputFormat::Text => "text",
		}
	}
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
