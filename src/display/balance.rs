//! Balance display formatting

use crate::models::money::format_amount;
use crate::services::balance::{BalanceDisplay, BalanceStatus};

/// Format a balance for terminal display
pub fn format_balance_line(display: &BalanceDisplay, symbol: &str) -> String {
    match display.status {
        BalanceStatus::Settled => format!("\u{2696} {}", display.text),
        _ => format!(
            "{} {} {}",
            status_icon(display.status),
            display.text,
            format_amount(display.amount, symbol)
        ),
    }
}

fn status_icon(status: BalanceStatus) -> &'static str {
    match status {
        BalanceStatus::Positive => "\u{2B06}",
        BalanceStatus::Negative => "\u{2B07}",
        BalanceStatus::Settled => "\u{2696}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::balance::format_balance;

    #[test]
    fn test_owing_line_includes_amount() {
        let display = format_balance(12.5, "Alice", "Bob");
        let line = format_balance_line(&display, "$");
        assert!(line.contains("Bob owes Alice"));
        assert!(line.contains("$12.50"));
    }

    #[test]
    fn test_settled_line_has_no_amount() {
        let display = format_balance(0.0, "Alice", "Bob");
        let line = format_balance_line(&display, "$");
        assert!(line.contains("all settled up"));
        assert!(!line.contains('$'));
    }
}
