use splitfx::core::{
    AppConfig, ConversionError, ConversionRequest, ConversionService, format_display,
    parse_amount,
};
use std::fs;
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, contents).expect("write config");
        path
    }
}

const RATES_CONFIG: &str = r#"
base_currency: "USD"
currencies:
  - code: "USD"
    name: "US Dollar"
    symbol: "$"
    exchange_rate: 1.0
  - code: "EUR"
    name: "Euro"
    symbol: "€"
    exchange_rate: 0.85
  - code: "GBP"
    name: "British Pound"
    symbol: "£"
    exchange_rate: 0.75
  - code: "JPY"
    name: "Japanese Yen"
    symbol: "¥"
    exchange_rate: 110
"#;

#[test_log::test]
fn test_convert_flow_from_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = test_utils::write_config(&temp_dir, RATES_CONFIG);

    let config = splitfx::load_config(path.to_str()).unwrap();
    let service = ConversionService::new(Arc::new(config.rate_table().unwrap()));

    let amount = parse_amount("100");
    let result = service
        .convert(&ConversionRequest::new(amount, "GBP"))
        .unwrap();
    info!(?result, "Converted amount");

    assert_eq!(result.value, 75.0);
    assert_eq!(format_display(result.value, &result.currency), "75.00 GBP");
}

#[test_log::test]
fn test_unknown_currency_is_not_converted_at_par() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = test_utils::write_config(&temp_dir, RATES_CONFIG);
    let config = AppConfig::load_from_path(&path).unwrap();
    let service = ConversionService::new(Arc::new(config.rate_table().unwrap()));

    // INR is in the built-in catalog but not in this file
    let err = service
        .convert(&ConversionRequest::new(100.0, "INR"))
        .unwrap_err();
    assert_eq!(err, ConversionError::UnknownCurrency("INR".to_string()));
}

#[test_log::test]
fn test_invalid_amount_converts_to_zero() {
    let service = ConversionService::new(Arc::new(AppConfig::default().rate_table().unwrap()));
    let result = service
        .convert(&ConversionRequest::new(parse_amount("12,50"), "EUR"))
        .unwrap();
    assert_eq!(result.to_string(), "0.00 EUR");
}

#[test_log::test]
fn test_run_command_reports_unknown_currency() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = test_utils::write_config(&temp_dir, RATES_CONFIG);

    let result = splitfx::run_command(
        splitfx::AppCommand::Convert {
            amount: "10".to_string(),
            currency: "CHF".to_string(),
            from: None,
        },
        path.to_str(),
    );
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Unknown currency: CHF");
}

#[test_log::test]
fn test_run_command_with_valid_currency() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = test_utils::write_config(&temp_dir, RATES_CONFIG);

    splitfx::run_command(
        splitfx::AppCommand::Convert {
            amount: "100".to_string(),
            currency: "jpy".to_string(),
            from: None,
        },
        path.to_str(),
    )
    .unwrap();
    splitfx::run_command(splitfx::AppCommand::Currencies, path.to_str()).unwrap();
}

#[test_log::test]
fn test_setup_then_load() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("splitfx").join("config.yaml");

    splitfx::cli::setup::setup_at_path(&path).unwrap();
    let config = AppConfig::load_from_path(&path).unwrap();
    assert_eq!(config, AppConfig::default());

    assert!(splitfx::cli::setup::setup_at_path(&path).is_err());
}

#[test_log::test]
fn test_malformed_config_reports_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = test_utils::write_config(&temp_dir, "currencies: [not: [valid");

    let err = AppConfig::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    let missing = temp_dir.path().join("missing.yaml");
    let err = AppConfig::load_from_path(&missing).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
    assert!(!fs::exists(&missing).unwrap());
}

#[test_log::test]
fn test_settle_example_expenses() {
    use splitfx::core::split::{balances, settle};

    let sheet = splitfx::core::ExpenseSheet::load_from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/docs/example_expenses.yaml"
    ))
    .unwrap();
    let service = ConversionService::new(Arc::new(AppConfig::default().rate_table().unwrap()));

    let mut balances = balances(&service, &sheet.expenses).unwrap();
    // Dinner 90 USD, museum 51 EUR = 60 USD, hotel 225 GBP = 300 USD
    assert!((balances["alice"] - (90.0 - 30.0 - 20.0 - 100.0)).abs() < 1e-9);
    assert!((balances["bob"] - (60.0 - 30.0 - 20.0 - 133.0 - 1.0 / 3.0)).abs() < 1e-6);

    let settlements = settle(&balances);
    info!(?settlements, "Suggested settlements");
    assert!(!settlements.is_empty());
    for s in &settlements {
        *balances.get_mut(&s.payer).unwrap() += s.amount;
        *balances.get_mut(&s.receiver).unwrap() -= s.amount;
    }
    assert!(balances.values().all(|b| b.abs() <= 0.01));
}

#[test_log::test]
fn test_run_command_settle() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(&temp_dir, RATES_CONFIG);
    let expenses_path = temp_dir.path().join("expenses.yaml");
    fs::write(
        &expenses_path,
        r#"
expenses:
  - description: "Ramen"
    amount: 3300
    currency: "JPY"
    payer: "alice"
    participants: ["alice", "bob"]
"#,
    )
    .unwrap();

    splitfx::run_command(
        splitfx::AppCommand::Settle {
            expenses_path: expenses_path.to_string_lossy().into_owned(),
        },
        config_path.to_str(),
    )
    .unwrap();

    let missing = splitfx::run_command(
        splitfx::AppCommand::Settle {
            expenses_path: temp_dir.path().join("nope.yaml").to_string_lossy().into_owned(),
        },
        config_path.to_str(),
    );
    assert!(
        missing
            .unwrap_err()
            .to_string()
            .contains("Failed to read expenses file")
    );
}
