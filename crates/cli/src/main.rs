use anyhow::Context;
use clap::{Parser, Subcommand};

use venuehub_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "venuehub", about = "Venue-rental marketplace service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server with every marketplace module.
    Serve,
    /// Print the effective layered configuration and exit.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load venuehub settings")?;

    match cli.command {
        Command::Serve => {
            venuehub_telemetry::init(&settings.telemetry);
            tracing::info!(env = ?settings.environment, "venuehub serve starting");
            venuehub_app::run(settings).await
        }
        Command::Config => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}
