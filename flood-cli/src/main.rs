//! Flood watch CLI - regional flood risk scoring and forecasts.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "flood-cli",
    version,
    about = "Regional flood risk and forecast toolkit"
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: flood_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    flood_cmd::run(cli.command, cli.config.as_deref()).await
}
