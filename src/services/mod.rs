//! Service layer for Splitpenny
//!
//! The service layer provides business logic on top of the storage layer.
//! The split calculator and the balance functions are pure; the settlement
//! service owns the one stateful workflow, the atomic settle-up commit.

pub mod balance;
pub mod budget;
pub mod category;
pub mod couple;
pub mod expense;
pub mod settlement;
pub mod split;

pub use balance::{
    calculate_balance, calculate_balance_with_settlements, format_balance, BalanceDisplay,
    BalanceService, BalanceStatus,
};
pub use budget::BudgetService;
pub use category::CategoryService;
pub use couple::CoupleService;
pub use expense::{AddExpense, ExpenseService, PayerRole};
pub use settlement::{CreateSettlement, SettlementService, DEFAULT_TOP_CATEGORIES_LIMIT};
pub use split::{calculate_equal_split, calculate_split, SplitResult};
