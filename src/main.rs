//! swiftlint-step binary entry point.
//! Parses inputs and runs the step phases; any failure maps to one exit status.

use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use swiftlint_step::cli::Cli;
use swiftlint_step::git::GitShellProvider;
use swiftlint_step::logging;
use swiftlint_step::resolver::SystemToolchain;
use swiftlint_step::step::SwiftLintStep;

fn main() -> ExitCode {
    logging::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if err.print().is_err() {
                        eprintln!("{err}");
                    }
                    ExitCode::SUCCESS
                }
                _ => {
                    log::error!("Failed to process Step inputs: {err}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    let step = SwiftLintStep::new(SystemToolchain, GitShellProvider);
    match step.execute(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
