//! # Checkout Entry Point
//!
//! Prices a JSON array of selections and prints the order summary.
//!
//! ```text
//! tickets-checkout order.json          # read selections from a file
//! cat order.json | tickets-checkout    # ... or from stdin
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load `checkout.toml` (`TICKETS_CONFIG` overrides the location)
//! 3. Build the order summary
//! 4. Print it as JSON, or the `ApiError` on stderr with exit code 1

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use tickets_checkout::commands::build_order_summary;
use tickets_checkout::{init_tracing, ApiError, CheckoutConfig, ConfigState, Selection};

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("tracing disabled: {}", e);
    }

    match run() {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, ApiError> {
    let config_path = std::env::var_os("TICKETS_CONFIG").map(PathBuf::from);
    let config = ConfigState::new(CheckoutConfig::load_or_default(config_path))?;

    let input = read_input(std::env::args().nth(1))
        .map_err(|e| ApiError::validation(format!("Failed to read selections: {}", e)))?;
    let selections: Vec<Selection> = serde_json::from_str(&input)
        .map_err(|e| ApiError::validation(format!("Invalid selections: {}", e)))?;

    let summary = build_order_summary(&config, selections)?;
    serde_json::to_string_pretty(&summary).map_err(|e| ApiError::internal(e.to_string()))
}

fn read_input(path: Option<String>) -> std::io::Result<String> {
    match path.as_deref() {
        None | Some("-") => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}
