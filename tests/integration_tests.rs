use anyhow::Result;
use fruitshop::config::{SettingsOverrides, ShopSettings};
use fruitshop::{MalformedLinePolicy, SessionOutcome, Shop, ShopError};
use std::path::Path;
use tempfile::TempDir;

fn write_inventory(dir: &TempDir, content: &str) -> Result<String> {
    let path = dir.path().join("values.txt");
    std::fs::write(&path, content)?;
    Ok(path.to_str().unwrap().to_string())
}

fn settings_for(path: &str, policy: MalformedLinePolicy) -> Result<ShopSettings> {
    let overrides = SettingsOverrides {
        inventory_path: Some(path.to_string()),
        on_malformed_line: Some(policy),
        ..Default::default()
    };
    Ok(ShopSettings::resolve(overrides, None)?)
}

/// 完整流程：選一項、拒絕再加、付款
#[test]
fn test_end_to_end_purchase_and_pay() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_inventory(&temp_dir, "Apple,£0.50\nBanana,£0.30")?;
    let shop = Shop::new(settings_for(&path, MalformedLinePolicy::Abort)?);

    let mut out = Vec::new();
    let report = shop.run("1\n2\nn\ny\n".as_bytes(), &mut out)?;
    let text = String::from_utf8(out)?;

    assert_eq!(report.outcome, SessionOutcome::Paid { total: 1.0 });
    assert!(text.starts_with("Fruitshop started\n"));
    assert!(text.contains("1) Apple - £0.50"));
    assert!(text.contains("2) Banana - £0.30"));
    assert!(text.contains("- 2 x Apple = £1.00"));
    assert!(text.contains("Total: £1.00"));
    assert!(text.contains("Would you like to pay? (yes/no): "));
    assert!(text.contains("Payment accepted. Final total is £1.00"));
    assert!(!text.contains("Banana = "));
    Ok(())
}

#[test]
fn test_malformed_line_aborts_before_session() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_inventory(&temp_dir, "Apple\nBanana,£0.30\n")?;
    let shop = Shop::new(settings_for(&path, MalformedLinePolicy::Abort)?);

    let mut out = Vec::new();
    let err = shop.run("1\n1\nn\ny\n".as_bytes(), &mut out).unwrap_err();
    let text = String::from_utf8(out)?;

    assert!(matches!(err, ShopError::MalformedRecord { line: 1, .. }));
    assert_eq!(
        err.to_string(),
        "Please check the data source is correct: line 1: expected format name,£price"
    );
    assert_eq!(err.exit_code(), 1);
    assert!(!text.contains("Inventory:"));
    Ok(())
}

#[test]
fn test_skip_policy_serves_remaining_products() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_inventory(&temp_dir, "Apple\nBanana,£0.30\nCherry,3.00\n")?;
    let shop = Shop::new(settings_for(&path, MalformedLinePolicy::Skip)?);

    let inventory = shop.load()?;
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory.products()[0].name, "Banana");

    let mut out = Vec::new();
    let report = shop.run("1\n4\nno\nno\n".as_bytes(), &mut out)?;
    let text = String::from_utf8(out)?;

    assert!(text.contains("1) Banana - £0.30"));
    assert!(!text.contains("2) "));
    assert!(text.contains("- 4 x Banana = £1.20"));
    assert!(text.contains("No problem, goodbye."));
    match report.outcome {
        SessionOutcome::Declined { total } => assert!((total - 1.2).abs() < 1e-9),
        other => panic!("unexpected outcome {other:?}"),
    }
    Ok(())
}

#[test]
fn test_missing_inventory_is_source_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("nope.txt");
    let shop = Shop::new(settings_for(
        missing.to_str().unwrap(),
        MalformedLinePolicy::Abort,
    )?);

    let err = shop.run("q\n".as_bytes(), Vec::new()).unwrap_err();
    assert!(matches!(err, ShopError::SourceUnavailable { .. }));
    assert!(err
        .to_string()
        .starts_with("Please check the data source is correct: "));
    assert_eq!(err.exit_code(), 3);
    Ok(())
}

#[test]
fn test_quit_immediately_with_empty_cart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_inventory(&temp_dir, "Apple,£0.50\nBanana,£0.30\n")?;
    let shop = Shop::new(settings_for(&path, MalformedLinePolicy::Abort)?);

    let mut out = Vec::new();
    let report = shop.run("q\n".as_bytes(), &mut out)?;
    let text = String::from_utf8(out)?;

    assert_eq!(report.outcome, SessionOutcome::EmptyCart);
    assert!(report.cart.is_empty());
    assert!(text.contains("Your cart is empty. Goodbye!"));
    assert!(!text.contains("Cart summary:"));
    assert!(!text.contains("Would you like to pay?"));
    Ok(())
}

#[test]
fn test_settings_from_toml_file_drive_loader() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let inventory_path = write_inventory(&temp_dir, "Apple,£0.50\nbroken line\n")?;
    let config_path = temp_dir.path().join("shop.toml");
    std::fs::write(
        &config_path,
        format!(
            "[inventory]\npath = \"{}\"\non_malformed_line = \"skip\"\n",
            inventory_path.replace('\\', "/")
        ),
    )?;

    let file = fruitshop::TomlConfig::from_file(Path::new(&config_path))?;
    let settings = ShopSettings::resolve(SettingsOverrides::default(), Some(&file))?;
    assert_eq!(settings.on_malformed_line, MalformedLinePolicy::Skip);

    let inventory = Shop::new(settings).load()?;
    assert_eq!(inventory.len(), 1);
    Ok(())
}
