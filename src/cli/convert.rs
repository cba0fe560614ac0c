use crate::core::{ConversionRequest, ConversionService, parse_amount};
use anyhow::Result;
use tracing::debug;

/// Converts raw amount text into `currency` and returns the display string.
///
/// Amount text that does not parse is treated as zero. `from` selects a source
/// currency other than the base.
pub fn convert_display(
    service: &ConversionService,
    raw_amount: &str,
    currency: &str,
    from: Option<&str>,
) -> Result<String> {
    let amount = parse_amount(raw_amount);
    let target = currency.trim().to_ascii_uppercase();
    debug!(amount, target = %target, ?from, "Converting amount");

    let result = match from {
        Some(source) => {
            service.convert_between(amount, &source.trim().to_ascii_uppercase(), &target)?
        }
        None => service.convert(&ConversionRequest::new(amount, target))?,
    };
    Ok(result.to_string())
}
