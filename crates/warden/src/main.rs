//! Warden CLI binary.

use clap::Parser;
use warden::{check_config, dump, init_logging, run, Cli, Commands, LoggingConfig, WardenConfig};
use warden_error::WardenResult;

#[tokio::main]
async fn main() -> WardenResult<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let logging = LoggingConfig::default()
        .with_log_level(if cli.verbose { "debug" } else { "info" })
        .with_json_logs(cli.json_logs);
    init_logging(&logging)?;

    let config = WardenConfig::load(cli.config.clone())?;

    match cli.command {
        Commands::Run => run(config).await?,
        Commands::Dump { from_file } => println!("{}", dump(&config, from_file.as_deref()).await?),
        Commands::CheckConfig => println!("{}", check_config(&config)?),
    }

    Ok(())
}
