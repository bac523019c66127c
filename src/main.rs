//! stdio-harness - compile a program and check its stdin/stdout behavior
//!
//! With no arguments, builds `genemdp.cpp` with g++ and runs the built-in
//! suite against the result.

use clap::Parser;
use harness::{cli, commands::RunArgs, common::logging};

#[derive(Parser)]
#[command(name = "harness", about = "Black-box stdin/stdout test harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_guard = logging::init_cli(cli.args.log_file.as_deref());

    let code = match cli::run(cli.args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    // Flush buffered file logs before exiting
    drop(log_guard);
    std::process::exit(code);
}
