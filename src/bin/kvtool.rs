//! kvtool command line entry point.
//!
//! Every failure is funnelled to [`fail`], which prints the diagnostic and
//! exits with the error's code. Nothing below `main` terminates the process.

use std::io;
use std::process;

use kvtool::commands::help;
use kvtool::{cli, commands, logging, Error, LineConfirm};

fn main() {
    let invocation = match cli::parse(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => fail(e),
    };
    logging::init_logging(invocation.globals.log_level);

    let mut out = io::stdout().lock();
    let mut confirm = LineConfirm::stdin();
    if let Err(e) = commands::execute(&invocation, &mut out, &mut confirm) {
        fail(e);
    }
}

fn fail(err: Error) -> ! {
    if let Error::Cli(e) = err {
        // clap renders help, version and usage errors itself
        e.exit();
    }
    tracing::debug!(category = err.category(), code = err.exit_code(), "fatal");
    eprintln!("Error: {}", err);
    if err.wants_usage() {
        eprintln!("{}", help::USAGE);
    }
    process::exit(err.exit_code());
}
