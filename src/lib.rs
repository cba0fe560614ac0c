pub mod cli;
pub mod core;

use crate::core::{AppConfig, ConversionService, ExpenseSheet};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        currency: String,
        from: Option<String>,
    },
    Currencies,
    Settle {
        expenses_path: String,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("splitfx starting...");
    let config = load_config(config_path)?;

    match command {
        AppCommand::Convert {
            amount,
            currency,
            from,
        } => {
            let service = ConversionService::new(Arc::new(config.rate_table()?));
            let display =
                cli::convert::convert_display(&service, &amount, &currency, from.as_deref())?;
            println!("{display}");
        }
        AppCommand::Currencies => {
            println!("{}", cli::currencies::currencies_table(&config)?);
        }
        AppCommand::Settle { expenses_path } => {
            let service = ConversionService::new(Arc::new(config.rate_table()?));
            let sheet = ExpenseSheet::load_from_path(&expenses_path)?;
            println!(
                "{}",
                cli::settle::settlement_report(&config, &service, &sheet)?
            );
        }
    }
    Ok(())
}
