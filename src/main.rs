use clap::Parser;
use log::*;
use std::process;

use gh_pages_trigger::{Result, cli};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("gh_pages_trigger")
        .set_time_level(simplelog::LevelFilter::Off)
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    info!(
        "Starting {} version {}...",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = match cli_args.get_config() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration. {err}");
            process::exit(1);
        }
    };

    if let Err(err) = gh_pages_trigger::run(&config).await {
        error!("Requesting page build failed. {err}");
        process::exit(1);
    }

    info!("Finished {}...", env!("CARGO_PKG_NAME"));

    Ok(())
}
