use clap::Parser;
use persona_view::cli::dispatcher::Dispatcher;
use persona_view::cli::main_types::Cli;
use persona_view::storage::config::Config;
use persona_view::utils::logging::init_logging;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err.display_friendly());
            std::process::exit(1);
        }
    };

    if let Some(config_dir) = &cli.config_dir {
        log::debug!("Using config directory: {}", config_dir);
    }

    let mut dispatcher = Dispatcher::new(config, config_path, cli.profile)
        .with_gateway_url(cli.gateway_url)
        .with_escape_html(cli.escape_html);

    if let Err(err) = dispatcher.dispatch(cli.command).await {
        log::debug!("Command failed ({}): {:?}", err.severity().label(), err);
        eprintln!("Error: {}", err.display_friendly());
        if let Some(hint) = err.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}
