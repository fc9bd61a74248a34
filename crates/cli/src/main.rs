use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Book catalog service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API until interrupted
    Serve,
    /// Load the sample catalog into the configured storage
    Seed {
        /// Delete every existing book first
        #[arg(long)]
        reset: bool,
    },
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    if let Command::Config = cli.command {
        let rendered =
            serde_json::to_string_pretty(&settings).context("failed to render settings")?;
        println!("{rendered}");
        return Ok(());
    }

    shelf_telemetry::init(&settings.telemetry)?;
    tracing::info!(env = ?settings.environment, command = ?cli.command, "shelf CLI starting");

    match cli.command {
        Command::Serve => shelf_app::bootstrap::serve(&settings).await,
        Command::Seed { reset } => {
            let count = shelf_app::bootstrap::load_sample_catalog(&settings, reset).await?;
            println!("Seeded {count} sample books");
            Ok(())
        }
        Command::Config => Ok(()),
    }
}
