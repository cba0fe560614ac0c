use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use splitfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount from the base currency
    Convert {
        /// Amount as entered; non-numeric text counts as zero
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Target currency code
        currency: String,
        /// Source currency code, defaults to the base currency
        #[arg(short, long)]
        from: Option<String>,
    },
    /// List configured currencies and rates
    Currencies,
    /// Show member balances and suggested settlements for a group
    Settle {
        /// Path to a YAML file listing the group's expenses
        expenses: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => match config_path {
            Some(path) => splitfx::cli::setup::setup_at_path(path),
            None => splitfx::cli::setup::setup(),
        },
        Some(Commands::Convert {
            amount,
            currency,
            from,
        }) => splitfx::run_command(
            splitfx::AppCommand::Convert {
                amount,
                currency,
                from,
            },
            config_path,
        ),
        Some(Commands::Currencies) => {
            splitfx::run_command(splitfx::AppCommand::Currencies, config_path)
        }
        Some(Commands::Settle { expenses }) => splitfx::run_command(
            splitfx::AppCommand::Settle {
                expenses_path: expenses,
            },
            config_path,
        ),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
