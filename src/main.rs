use clap::Parser;

use geolocator::cli::{Cli, Commands};
use geolocator::config::{get_config, init_config_from};
use geolocator::runtime::modes::{run_cli, run_server};
use geolocator::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(&cli.config);
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging).map_err(|e| {
                eprintln!("{}", e.format_colored());
                anyhow::anyhow!(e.format_simple())
            })?;
            run_server(&config).await
        }
        Some(command) => {
            // CLI 输出走 stdout，日志只保留警告以上
            let mut logging = config.logging.clone();
            logging.level = "warn".to_string();
            let guard = init_logging(&logging).ok();

            let result = run_cli(command, &config).await;
            drop(guard);

            if let Err(e) = result {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
