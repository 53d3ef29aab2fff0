//! Retrace CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retrace::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_ref();

    let result = match cli.command {
        Commands::Serve(args) => retrace::cli::commands::serve(args, config_path).await,
        Commands::Memorize(args) => retrace::cli::commands::memorize(args, config_path, cli.json).await,
        Commands::Pages(args) => retrace::cli::commands::pages(args, config_path, cli.json).await,
        Commands::Chat(args) => retrace::cli::commands::chat(args, config_path, cli.json).await,
        Commands::Forget(args) => retrace::cli::commands::forget(args, config_path, cli.json).await,
    };

    if let Err(err) = result {
        retrace::cli::handle_error(err, cli.json);
    }
}
