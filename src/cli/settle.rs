//! Settle-up and settlement history CLI commands

use clap::Subcommand;

use super::PayerArg;
use crate::config::Settings;
use crate::display::{format_settlement_history, format_settlement_summary};
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::SettlementId;
use crate::services::{CoupleService, SettlementService};
use crate::storage::Storage;

/// Settlement history commands
#[derive(Debug, Subcommand)]
pub enum SettlementCommands {
    /// List past settlements
    List,
    /// Show one settlement's stored summary
    Show {
        /// Settlement ID, as printed by `settlement list`
        id: String,
    },
}

/// Settle the current balance and close out the unsettled batch
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    by: Option<PayerArg>,
    note: Option<String>,
) -> SplitpennyResult<()> {
    let couple = CoupleService::new(storage).require_current()?;
    let service = SettlementService::new(storage);

    let settlement = service.settle_up(
        couple.id,
        by.map(|arg| arg.user_id(&couple)),
        note.unwrap_or_default(),
        settings.top_categories_limit,
    )?;

    print!(
        "{}",
        format_settlement_summary(&settlement, &couple, &settings.currency_symbol)
    );

    Ok(())
}

/// Handle a settlement history subcommand
pub fn handle_settlement_command(
    storage: &Storage,
    settings: &Settings,
    command: SettlementCommands,
) -> SplitpennyResult<()> {
    let couple = CoupleService::new(storage).require_current()?;

    match command {
        SettlementCommands::List => {
            let settlements = storage.settlements.get_by_couple(couple.id)?;
            print!(
                "{}",
                format_settlement_history(&settlements, &couple, &settings.currency_symbol)
            );
        }
        SettlementCommands::Show { id } => {
            // Accept the full UUID or the short "stl-xxxxxxxx" form the
            // listing prints
            let settlement = match id.parse::<SettlementId>() {
                Ok(settlement_id) => storage.settlements.get(settlement_id)?,
                Err(_) => storage
                    .settlements
                    .get_by_couple(couple.id)?
                    .into_iter()
                    .find(|s| s.id.to_string() == id),
            }
            .ok_or_else(|| SplitpennyError::settlement_not_found(id))?;
            print!(
                "{}",
                format_settlement_summary(&settlement, &couple, &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
