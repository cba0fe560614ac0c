//! Currency conversion over a static exchange-rate table

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Invalid exchange rate {rate} for {code}: rates must be positive and finite")]
    InvalidRate { code: String, rate: f64 },
    #[error("Base currency {code} must have a rate of exactly 1.0, got {rate}")]
    InvalidBaseRate { code: String, rate: f64 },
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),
    #[error("Duplicate currency: {0}")]
    DuplicateCurrency(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Looks up the factor converting one unit of `from` into `to`.
pub trait CurrencyRateProvider: Send + Sync {
    fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Immutable mapping from currency code to its rate against the base currency.
///
/// A rate `r` for code `C` means one unit of the base currency equals `r`
/// units of `C`. The base currency always maps to exactly `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl ExchangeRateTable {
    /// Builds a validated table. Codes are trimmed and upper-cased. The base
    /// currency is added with rate `1.0` when the input does not list it.
    pub fn new<I, S>(base: &str, rates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let base = normalize_code(base)?;
        let mut table = BTreeMap::new();

        for (code, rate) in rates {
            let code = normalize_code(code.as_ref())?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConversionError::InvalidRate { code, rate });
            }
            if code == base && rate != 1.0 {
                return Err(ConversionError::InvalidBaseRate { code, rate });
            }
            if table.contains_key(&code) {
                return Err(ConversionError::DuplicateCurrency(code));
            }
            table.insert(code, rate);
        }

        table.entry(base.clone()).or_insert(1.0);
        debug!(base = %base, currencies = table.len(), "Built exchange rate table");

        Ok(Self { base, rates: table })
    }

    pub fn base_currency(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    fn lookup(&self, code: &str) -> Result<f64> {
        self.rate(code)
            .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))
    }
}

impl CurrencyRateProvider for ExchangeRateTable {
    fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let from_rate = self.lookup(from)?;
        let to_rate = self.lookup(to)?;
        if from == to {
            return Ok(1.0);
        }
        Ok(to_rate / from_rate)
    }
}

fn normalize_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConversionError::InvalidCurrencyCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub target_currency: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, target_currency: impl Into<String>) -> Self {
        Self {
            amount,
            target_currency: target_currency.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub value: f64,
    pub currency: String,
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_display(self.value, &self.currency))
    }
}

/// Converts a base-currency `amount` into `target_currency`.
///
/// The result is unrounded. `target_currency` is matched exactly, so it must
/// already be normalized (trimmed, upper case) like the table's codes. A code
/// missing from `table` is an error, never an implicit 1:1 rate.
pub fn convert(amount: f64, target_currency: &str, table: &ExchangeRateTable) -> Result<f64> {
    let rate = table.lookup(target_currency)?;
    Ok(amount * rate)
}

/// Formats `value` with two decimals followed by the currency code.
///
/// Rounds half away from zero on the value scaled by 100. Values that round to
/// zero print as `0.00`. Whole values and values too large to scale are
/// printed as they are.
pub fn format_display(value: f64, currency_code: &str) -> String {
    let scaled = value * 100.0;
    let mut rounded = if scaled.is_finite() && value.fract() != 0.0 {
        scaled.round() / 100.0
    } else {
        value
    };
    if rounded == 0.0 {
        // drops the sign of -0.0
        rounded = 0.0;
    }
    format!("{rounded:.2} {currency_code}")
}

/// Parses user-entered amount text. Anything that is not a finite number
/// yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            debug!(input = raw, "Amount is not a finite number, using 0");
            0.0
        }
    }
}

/// Converts amounts against a shared, immutable rate table.
#[derive(Debug, Clone)]
pub struct ConversionService {
    table: Arc<ExchangeRateTable>,
}

impl ConversionService {
    pub fn new(table: Arc<ExchangeRateTable>) -> Self {
        Self { table }
    }

    pub fn base_currency(&self) -> &str {
        self.table.base_currency()
    }

    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let value = convert(request.amount, &request.target_currency, &self.table)?;
        Ok(ConversionResult {
            value,
            currency: request.target_currency.clone(),
        })
    }

    /// Converts between two catalog currencies through their base rates.
    pub fn convert_between(&self, amount: f64, from: &str, to: &str) -> Result<ConversionResult> {
        let rate = self.table.get_rate(from, to)?;
        Ok(ConversionResult {
            value: amount * rate,
            currency: to.to_string(),
        })
    }
}
