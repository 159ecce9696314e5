//! Balance CLI command

use crate::config::Settings;
use crate::display::format_balance_line;
use crate::error::SplitpennyResult;
use crate::services::{format_balance, BalanceService, CoupleService};
use crate::storage::Storage;

/// Show the couple's balance
///
/// The default view covers unsettled expenses only; `lifetime` folds the
/// full expense and settlement history together, which nets to zero for a
/// consistent ledger.
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    lifetime: bool,
) -> SplitpennyResult<()> {
    let couple = CoupleService::new(storage).require_current()?;
    let service = BalanceService::new(storage);
    let balance = if lifetime {
        service.lifetime_balance(couple.id)?
    } else {
        service.current_balance(couple.id)?
    };

    let display = format_balance(balance, &couple.user1_name, &couple.user2_name);
    println!(
        "{}",
        format_balance_line(&display, &settings.currency_symbol)
    );

    Ok(())
}
