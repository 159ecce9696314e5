use anyhow::Result;
use clap::{Parser, Subcommand};

use splitpenny::cli::{
    handle_balance_command, handle_budget_command, handle_category_command,
    handle_expense_command, handle_settle_command, handle_settlement_command, BudgetCommands,
    CategoryCommands, ExpenseCommands, PayerArg, SettlementCommands,
};
use splitpenny::config::{paths::SplitpennyPaths, settings::Settings};
use splitpenny::services::{CategoryService, CoupleService};
use splitpenny::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitpenny",
    version,
    about = "Terminal-based shared-expense tracker for couples",
    long_about = "Splitpenny keeps a couple's shared expenses in one ledger: \
                  both partners log expenses, split costs by percentage, track \
                  category budgets, and settle up the running balance from the \
                  command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the couple profile and seed the category catalog
    Init {
        /// Your display name
        #[arg(long)]
        you: String,
        /// Your partner's display name
        #[arg(long)]
        partner: String,
        /// Primary currency code
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Show who owes whom
    Balance {
        /// Fold settled expenses and settlement history in as well
        #[arg(long)]
        lifetime: bool,
    },

    /// Settle the current balance and close out unsettled expenses
    Settle {
        /// Which partner pays (defaults to whoever owes)
        #[arg(long, value_enum)]
        by: Option<PayerArg>,
        /// Note stored on the settlement
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Settlement history commands
    #[command(subcommand)]
    Settlement(SettlementCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Category commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SplitpennyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut storage = Storage::new(paths)?;
    storage.load_all()?;

    match cli.command {
        Commands::Init {
            you,
            partner,
            currency,
        } => {
            let couple = CoupleService::new(&storage).create(you, partner, currency)?;
            CategoryService::new(&storage).ensure_initialized()?;
            println!("Created couple {} ({})", couple, couple.primary_currency);
        }
        Commands::Expense(command) => handle_expense_command(&storage, &settings, command)?,
        Commands::Balance { lifetime } => handle_balance_command(&storage, &settings, lifetime)?,
        Commands::Settle { by, note } => handle_settle_command(&storage, &settings, by, note)?,
        Commands::Settlement(command) => handle_settlement_command(&storage, &settings, command)?,
        Commands::Budget(command) => handle_budget_command(&storage, &settings, command)?,
        Commands::Category(command) => handle_category_command(&storage, command)?,
        Commands::Config => {
            println!("Data directory: {}", storage.paths().base_dir().display());
            println!("Settings file:  {}", storage.paths().settings_file().display());
            println!("Audit log:      {}", storage.paths().audit_log().display());
            println!("Currency symbol: {}", settings.currency_symbol);
            println!("Top categories:  {}", settings.top_categories_limit);
        }
    }

    Ok(())
}
