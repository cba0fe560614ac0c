use super::ui;
use crate::core::split::{self, ExpenseSheet};
use crate::core::{AppConfig, ConversionService, format_display};
use anyhow::Result;
use comfy_table::Cell;

/// Renders member balances and the suggested settlements, in the base currency.
pub fn settlement_report(
    config: &AppConfig,
    service: &ConversionService,
    sheet: &ExpenseSheet,
) -> Result<String> {
    let base = service.base_currency();
    let base_label = match config.find_currency(base) {
        Some(currency) => format!("{} ({})", currency.name, currency.symbol),
        None => base.to_string(),
    };

    let balances = split::balances(service, &sheet.expenses)?;
    let settlements = split::settle(&balances);

    let mut balance_table = ui::new_styled_table();
    balance_table.set_header(vec![ui::header_cell("Member"), ui::header_cell("Balance")]);
    for (member, balance) in &balances {
        balance_table.add_row(vec![
            Cell::new(member),
            ui::number_cell(format_display(*balance, base)),
        ]);
    }

    let mut settlement_table = ui::new_styled_table();
    settlement_table.set_header(vec![
        ui::header_cell("Payer"),
        ui::header_cell("Receiver"),
        ui::header_cell("Amount"),
    ]);
    for settlement in &settlements {
        settlement_table.add_row(vec![
            Cell::new(&settlement.payer),
            Cell::new(&settlement.receiver),
            ui::number_cell(format_display(settlement.amount, base)),
        ]);
    }

    Ok(format!(
        "{}\n{balance_table}\n{}\n{settlement_table}",
        ui::title(&format!("Balances in {base_label}")),
        ui::title("Settlements"),
    ))
}
