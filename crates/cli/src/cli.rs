use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tabsweep")]
#[command(about = "Find and close duplicate, pinned and stale Safari tabs")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Toon)]
	pub format: OutputFormat,

	/// Config file (defaults to the platform config dir)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Target Safari Technology Preview instead of Safari
	#[arg(long, global = true)]
	pub preview: bool,

	/// Days without a visit before a tab counts as stale
	#[arg(long, global = true, value_name = "DAYS")]
	pub stale_days: Option<u32>,

	/// Safari History.db to read visit times from
	#[arg(long, global = true, value_name = "FILE")]
	pub history_db: Option<PathBuf>,

	/// Drive a JSON fixture file instead of a live browser
	#[arg(long, global = true, value_name = "FILE", hide = true)]
	pub fixture: Option<PathBuf>,

	/// Never close tabs whose URL contains this text (repeatable)
	#[arg(long, global = true, value_name = "PATTERN")]
	pub protect: Vec<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Classify open tabs without closing anything
	#[command(alias = "ls")]
	Scan(ScanArgs),

	/// Close duplicates (and optionally stale or matching tabs)
	Close(CloseArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct ScanArgs {
	/// Only list duplicate tabs
	#[arg(long)]
	pub duplicates: bool,

	/// Only list stale tabs
	#[arg(long)]
	pub stale: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct CloseArgs {
	/// Also close stale tabs
	#[arg(long)]
	pub stale: bool,

	/// Do not select duplicates by default
	#[arg(long)]
	pub no_duplicates: bool,

	/// Also close tabs whose URL or title matches REGEX (repeatable)
	#[arg(long = "match", value_name = "REGEX")]
	pub matches: Vec<String>,

	/// Also close the tab at this ordinal from the scan listing (repeatable)
	#[arg(long, value_name = "N")]
	pub ordinal: Vec<usize>,

	/// Keep tabs whose URL or title matches REGEX (repeatable)
	#[arg(long, value_name = "REGEX")]
	pub skip: Vec<String>,

	/// Leave windows emptied by pinned filtering open
	#[arg(long)]
	pub keep_windows: bool,

	/// Show the close plan without closing anything
	#[arg(long, short = 'n')]
	pub dry_run: bool,
}
