use clap::Parser;
use tracing::{debug, info};

use linkstash::cli::{Cli, Commands};
use linkstash::config::{Config, init_config};
use linkstash::runtime::modes::{run_cli, run_server};
use linkstash::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = init_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging).map_err(|e| {
                eprintln!("{}", e.format_colored());
                anyhow::anyhow!(e.format_simple())
            })?;
            info!("linkstash v{} starting", env!("CARGO_PKG_VERSION"));
            debug!("Configuration: {:?}", config);
            run_server(config).await
        }
        Some(command) => {
            // Command output goes to stdout; keep logs to warnings unless RUST_LOG asks otherwise
            let logging = cli_logging(config);
            let _guard = init_logging(&logging).map_err(|e| anyhow::anyhow!(e.format_simple()))?;

            if let Err(e) = run_cli(command, config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn cli_logging(config: &Config) -> linkstash::config::LoggingConfig {
    let mut logging = config.logging.clone();
    if std::env::var("RUST_LOG").is_err() {
        logging.level = "warn".to_string();
    }
    logging
}
