//! Command dispatch and engine wiring.

mod close;
mod scan;

use std::sync::Arc;

use tabsweep::{BrowserAutomation, Engine, HistoryStore};
use tabsweep_runtime::{FixtureBrowser, FixtureHistory, SafariAutomation, SafariHistory};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;

pub fn command_name(command: &Commands) -> &'static str {
	match command {
		Commands::Scan(_) => "scan",
		Commands::Close(_) => "close",
	}
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let settings = Settings::from_cli(&cli)?;
	let engine = build_engine(&settings)?;

	match cli.command {
		Commands::Scan(args) => scan::execute(&engine, &args, cli.format).await,
		Commands::Close(args) => close::execute(&engine, &settings, &args, cli.format).await,
	}
}

/// Picks the browser and history providers for `settings`.
pub fn build_engine(settings: &Settings) -> Result<Engine> {
	let (browser, history): (Arc<dyn BrowserAutomation>, Arc<dyn HistoryStore>) = match &settings.fixture {
		Some(path) => {
			debug!(target = "tabsweep", path = %path.display(), "using fixture browser");
			(Arc::new(FixtureBrowser::new(path)), Arc::new(FixtureHistory::load(path)?))
		}
		None => (
			Arc::new(SafariAutomation::new(settings.edition)),
			Arc::new(open_history(settings)),
		),
	};

	Ok(Engine::new(browser, history, settings.threshold))
}

fn open_history(settings: &Settings) -> SafariHistory {
	match settings.history_db.clone() {
		Some(path) => SafariHistory::open_or_empty(path),
		None => SafariHistory::for_edition(settings.edition),
	}
}
