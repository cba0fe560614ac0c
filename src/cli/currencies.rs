use super::ui;
use crate::core::AppConfig;
use anyhow::Result;
use comfy_table::Cell;

/// Renders the configured catalog as a table.
pub fn currencies_table(config: &AppConfig) -> Result<String> {
    let rates = config.rate_table()?;
    let base = rates.base_currency();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell(&format!("Rate (1 {base})")),
    ]);

    for currency in &config.currencies {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(&currency.symbol),
            ui::number_cell(format!("{:.4}", currency.exchange_rate)),
        ]);
    }

    let title = ui::title(&format!("Currencies (base {base})"));
    Ok(format!("{title}\n{table}"))
}
