use clap::Parser;
use fruitshop::config::cli::ListFormat;
use fruitshop::config::LogFormat;
use fruitshop::core::format::{write_inventory_json, write_inventory_listing};
use fruitshop::utils::logger;
use fruitshop::{CliConfig, Shop, ShopError};
use std::io::{self, Write};

fn main() {
    let cli = CliConfig::parse();

    // 先合併設定，日誌格式取決於設定結果
    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    match settings.log_format {
        LogFormat::Compact => logger::init_cli_logger(settings.verbose),
        LogFormat::Json => logger::init_json_logger(settings.verbose),
    }
    tracing::debug!("Effective settings: {:?}", settings);

    let shop = Shop::new(settings);

    let result = if cli.list {
        list_inventory(&shop, cli.format)
    } else {
        let stdin = io::stdin();
        let stdout = io::stdout();
        shop.run(stdin.lock(), stdout.lock()).map(|report| {
            tracing::debug!("Session ended with {:?}", report.outcome);
        })
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ fruitshop failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        // 載入失敗時只印出錯誤，不進入購物流程
        println!("{}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn list_inventory<C: fruitshop::core::InventoryConfig>(
    shop: &Shop<C>,
    format: ListFormat,
) -> Result<(), ShopError> {
    let inventory = shop.load()?;
    let mut out = io::stdout().lock();
    match format {
        ListFormat::Text => write_inventory_listing(&mut out, &inventory)?,
        ListFormat::Json => write_inventory_json(&mut out, &inventory)?,
    }
    out.flush()?;
    Ok(())
}
