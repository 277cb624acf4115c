use std::env;
use std::process::ExitCode;

use youloader::{AppConfig, Error, cli};

/// Exit status after the user aborts, as for SIGINT.
const ABORTED: i32 = 130;

fn print_usage() {
    eprintln!("Usage: youloader");
    eprintln!();
    eprintln!("Prompts for a YouTube video or playlist URL and downloads it.");
    eprintln!("Videos are saved to ./videos, playlists to ./playlists/<title>.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help          Show this help");
    eprintln!("  -V, --version       Show version");
    eprintln!();
    eprintln!("Settings are read from {}", config_location());
}

fn config_location() -> String {
    AppConfig::default_path().map_or_else(
        || "<no config directory>".to_string(),
        |p| p.display().to_string(),
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-V" | "--version" => {
                println!("youloader {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Error: unexpected argument '{other}'");
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            cli::report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(config, tokio::signal::ctrl_c()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Cancelled) => {
            cli::aborting();
            // stdin may still be blocked in a read; do not wait for it.
            std::process::exit(ABORTED);
        }
        Err(e) => {
            log::debug!("session ended with error: {e}");
            ExitCode::FAILURE
        }
    }
}
