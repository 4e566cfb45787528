use clap::Parser;
use tabsweep_cli::cli::Cli;
use tabsweep_cli::output::{ResultBuilder, print_result};
use tabsweep_cli::{commands, logging};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = commands::command_name(&cli.command);

	if let Err(err) = commands::dispatch(cli).await {
		error!(target = "tabsweep", error = %err, "command failed");
		let result = ResultBuilder::<()>::new(command).error(err.code(), err.to_string()).build();
		print_result(&result, format);
		std::process::exit(1);
	}
}
