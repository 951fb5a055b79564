use clap::Parser;
use practice_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Load .env before anything reads the environment
    dotenv::dotenv().ok();

    let args = Args::parse();
    commands::setup_logging(&args.log_level);

    // Create async runtime and run the command with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {e}");
        process::exit(2);
    });

    let exit_code = runtime.block_on(async {
        // Cancellation token for coordinating graceful shutdown; the
        // pipeline observes it between files and between batches, so no
        // commit is ever left half-applied.
        let cancellation_token = CancellationToken::new();

        let shutdown_token = cancellation_token.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
            eprintln!("\nReceived CTRL+C, finishing the current batch before stopping...");
            shutdown_token.cancel();
        });

        match commands::run(args, cancellation_token).await {
            Ok(code) => code,
            Err(error) => {
                eprintln!("Error: {error:#}");
                2
            }
        }
    });

    process::exit(exit_code);
}
