//! Core conversion logic and its ambient setup

pub mod config;
pub mod currency;
pub mod log;
pub mod split;

// Re-export main types for cleaner imports
pub use config::{AppConfig, Currency};
pub use currency::{
    ConversionError, ConversionRequest, ConversionResult, ConversionService,
    CurrencyRateProvider, ExchangeRateTable, convert, format_display, parse_amount,
};
pub use split::{Expense, ExpenseSheet, Settlement, SplitError, SplitType};
