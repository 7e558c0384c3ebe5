use aton_notation::cli::args::Args;
use aton_notation::cli::commands::{self, CommandStatus};
use clap::Parser;
use std::process;

/// Exit code when `--strict` finds notations that need review
const EXIT_NEEDS_REVIEW: i32 = 2;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(commands::run(args)) {
        Ok(CommandStatus::Success) => process::exit(0),
        Ok(CommandStatus::NeedsReview) => process::exit(EXIT_NEEDS_REVIEW),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
