//! Read-only views over the store.

use crate::commands::Out;
use crate::model::{CategoryTotal, Expense};
use crate::{report, Store};

/// Renders every expense as a table with the grand total.
pub fn list(store: &Store) -> Out<Vec<Expense>> {
    Out::new(report::list(store.expenses()), store.expenses().to_vec())
}

/// Renders the total of each category, in order of first appearance.
pub fn categories(store: &Store) -> Out<Vec<CategoryTotal>> {
    let totals = store.totals_by_category();
    Out::new(report::by_category(&totals), totals)
}
