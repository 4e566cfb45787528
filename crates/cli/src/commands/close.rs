use std::time::Instant;

use regex_lite::Regex;
use tabsweep::{Classification, Engine, Selection, Tab};
use tracing::{info, warn};

use crate::cli::CloseArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::{ClassificationSummary, CloseData, DiagnosticLevel, OutputFormat, ResultBuilder, SelectedTab, print_result};

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
	patterns.iter().map(|pattern| Regex::new(pattern).map_err(CliError::from)).collect()
}

fn matches_any(patterns: &[Regex], tab: &Tab) -> bool {
	patterns.iter().any(|re| re.is_match(&tab.url) || re.is_match(&tab.title))
}

/// Builds the selection for `args` on top of the default duplicate selection.
///
/// Returns the selection and how many tabs protection removed from it.
pub fn build_selection(classification: &Classification, args: &CloseArgs, protected: &[String]) -> Result<(Selection, usize)> {
	let matches = compile(&args.matches)?;
	let skips = compile(&args.skip)?;

	let mut selection = if args.no_duplicates {
		Selection::new()
	} else {
		Selection::defaults(classification)
	};

	if args.stale {
		selection.select_where(classification, |tab| tab.is_stale);
	}
	if !matches.is_empty() {
		selection.select_where(classification, |tab| matches_any(&matches, tab));
	}
	for &ordinal in &args.ordinal {
		if ordinal >= classification.len() {
			return Err(CliError::InvalidInput(format!(
				"ordinal {ordinal} is out of range ({} tabs listed)",
				classification.len()
			)));
		}
		selection.select(ordinal);
	}
	if !skips.is_empty() {
		selection.deselect_where(classification, |tab| matches_any(&skips, tab));
	}

	let protected_skipped = selection.exclude_protected(classification, protected);
	Ok((selection, protected_skipped))
}

pub async fn execute(engine: &Engine, settings: &Settings, args: &CloseArgs, format: OutputFormat) -> Result<()> {
	let start = Instant::now();
	let classification = engine.classify().await?;
	let (selection, protected_skipped) = build_selection(&classification, args, &settings.protected_urls)?;

	let mut request = selection.to_request(&classification);
	if args.keep_windows {
		request.emptied_windows.clear();
	}

	let mut data = CloseData {
		dry_run: args.dry_run,
		selected: SelectedTab::collect(&selection, &classification),
		protected_skipped,
		plan: None,
		report: None,
		remaining: None,
	};
	let mut builder = ResultBuilder::new("close").started_at(start);
	if protected_skipped > 0 {
		builder = builder.diagnostic(
			DiagnosticLevel::Info,
			format!("{protected_skipped} protected tab(s) left open"),
		);
	}

	if request.is_empty() {
		info!(target = "tabsweep", "nothing selected");
		builder = builder.diagnostic(DiagnosticLevel::Info, "nothing to close");
	} else if args.dry_run {
		data.plan = Some(engine.preview_close(request).await?);
	} else {
		let ticket = engine.submit_close(request)?;
		let report = ticket.wait().await?;
		for failure in &report.failures {
			warn!(target = "tabsweep", item = %failure.target, error = %failure.error, "close failed");
			builder = builder.diagnostic(
				DiagnosticLevel::Warning,
				format!("failed to close {}: {}", failure.target, failure.error),
			);
		}
		data.report = Some(report);

		match engine.classify().await {
			Ok(after) => data.remaining = Some(ClassificationSummary::new(&after)),
			Err(err) => {
				builder = builder.diagnostic(DiagnosticLevel::Warning, format!("could not re-scan after closing: {err}"));
			}
		}
	}

	print_result(&builder.data(data).build(), format);
	Ok(())
}
