mod cli;
mod frontend;

use clap::Parser;
use scout_logging::LogDestination;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // Keep the console clean for the interactive loop; verbose mirrors
    // the log to the terminal as well.
    let destination = if args.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    };
    scout_logging::initialize(destination, args.verbose);

    frontend::run(args)
}
