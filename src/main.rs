//! lazydav - command-line client for WebDAV servers.

use clap::Parser;
use lazydav::cli::{self, Args};
use lazydav::launcher;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if cli::is_display_request(&e) => e.exit(),
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting lazydav");

    match launcher::start(args).await {
        Ok(report) => print!("{report}"),
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    }
}
