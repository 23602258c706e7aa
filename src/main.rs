mod app;
mod architecture;
mod cli;
mod diagram;
mod dot;
mod render;

use cli::Cli;
use log::{debug, LevelFilter};
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::from_args();

    let env = env_logger::Env::default().default_filter_or("warn");
    let mut logger = env_logger::Builder::from_env(env);
    if let Some(level) = &cli.log_level {
        let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level: {}. Using 'warn' instead.", level);
            LevelFilter::Warn
        });
        logger.filter_level(level);
    }
    logger.init();
    debug!(args:? = cli; "Parsed arguments");

    let config = cli.into_config();
    app::run(config).await?;

    Ok(())
}
