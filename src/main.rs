pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hooks;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Diagnostics stay off unless asked for: stderr belongs to the hook protocol.
const LOG_ENV: &str = "FTRY_HOOKS_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut stdin = io::stdin().lock();

    match cli::router::run_cli(&args, &cwd, &mut stdin) {
        Ok(output) => {
            let _ = io::stdout().write_all(output.stdout.as_bytes());
            let _ = io::stderr().write_all(output.stderr.as_bytes());
            ExitCode::from(u8::try_from(output.exit_code).unwrap_or(1))
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(1)
        }
    }
}
