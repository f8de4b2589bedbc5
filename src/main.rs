use clap::Parser;
use seek_snapshot::app::{self, RunOptions};
use seek_snapshot::utils::{logger, validation::Validate};
use seek_snapshot::{CliConfig, ScraperSettings};
use std::io::Write;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 離線模式：未設定的環境變數用假憑證補上
    let settings = ScraperSettings::offline_from_env();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let exit_code = app::run(&RunOptions::from(&config), settings, &mut out);
    if let Err(e) = out.flush() {
        tracing::warn!("⚠️ Failed to flush stdout: {}", e);
    }

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
