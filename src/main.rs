use std::env;
use std::process;

use clap::Parser;
use deploy_notify::Cli;

#[tokio::main]
async fn main() {
    // Local runs pick up inputs from .env when present
    dotenv::dotenv().ok();

    // Write to stderr so logs don't interfere with classify output on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {e}");

        // Print the full error chain if available
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        // Surface the failure as a workflow annotation on GitHub Actions
        if env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
            println!("::error::{e:#}");
        }

        process::exit(1);
    }
}
