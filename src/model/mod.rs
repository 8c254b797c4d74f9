//! Types that represent the core data model, such as `Expense` and `Amount`.
mod amount;
mod category;
mod expense;

pub use amount::{Amount, AmountError};
pub use category::{Category, DEFAULT_CATEGORY};
pub use expense::Expense;
use serde::Serialize;

/// The sum of all expenses that share a category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Amount,
}
