use std::time::Instant;

use chrono::Utc;
use tabsweep::Engine;

use crate::cli::ScanArgs;
use crate::error::Result;
use crate::output::{ClassificationSummary, DiagnosticLevel, OutputFormat, ResultBuilder, ScanData, TabRow, print_result};

pub async fn execute(engine: &Engine, args: &ScanArgs, format: OutputFormat) -> Result<()> {
	let start = Instant::now();
	let classification = engine.classify().await?;

	let tabs: Vec<TabRow<'_>> = classification
		.tabs()
		.iter()
		.enumerate()
		.filter(|(_, tab)| (!args.duplicates || tab.is_duplicate()) && (!args.stale || tab.is_stale))
		.map(|(ordinal, tab)| TabRow { ordinal, tab })
		.collect();

	let data = ScanData {
		threshold_days: engine.threshold().days(),
		scanned_at: Utc::now(),
		summary: ClassificationSummary::new(&classification),
		pinned_urls: classification.pinned_urls().iter().map(String::as_str).collect(),
		tabs,
	};

	let mut builder = ResultBuilder::new("scan").started_at(start).data(data);
	if classification.is_empty() {
		builder = builder.diagnostic(DiagnosticLevel::Info, "no open tabs outside pinned slots");
	}
	print_result(&builder.build(), format);
	Ok(())
}
