//! tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that overrides `-v`.
pub const LOG_ENV: &str = "TABSWEEP_LOG";

fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

/// Installs a stderr fmt subscriber; stdout stays reserved for results.
pub fn init_logging(verbosity: u8) {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}
