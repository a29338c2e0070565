//! hashdex - File content indexer and duplicate finder
//!
//! Entry point for the hashdex CLI application.

use clap::Parser;
use hashdex::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    size::SizeError,
};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    // Run the application logic
    match hashdex::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            // Bad user input (an unparseable size threshold) gets its own code
            let exit_code = if err.downcast_ref::<SizeError>().is_some() {
                ExitCode::InvalidInput
            } else {
                ExitCode::GeneralError
            };

            // Report the error
            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
