use clap::Parser;

use microapis::cli::{Cli, Commands, generate_config};
use microapis::config::init_config;
use microapis::runtime::run_server;
use microapis::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output, force }) = &cli.command {
        if let Err(e) = generate_config(output, *force) {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
        println!("Sample configuration written to {}", output);
        return Ok(());
    }

    let config = match init_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    // 必须保持 guard 存活，否则非阻塞日志不会被刷新
    let _log_guard = init_logging(&config.logging)?;

    run_server().await
}
