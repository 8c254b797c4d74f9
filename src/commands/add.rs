//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Expense;
use crate::{Result, Store};

/// Records a new expense and saves the store.
///
/// The ID is assigned by the store and the date is set to now. A blank category is stored as
/// `Other`.
///
/// # Errors
///
/// - Returns a `ValidationError` if the description is blank or the amount is not positive.
/// - Returns an error if the data file cannot be written. Nothing is recorded in that case.
pub fn add(store: &mut Store, args: AddArgs) -> Result<Out<Expense>> {
    let expense = store.add(args.description(), args.amount(), args.category())?;
    let message = format!(
        "Added expense: {} for {}",
        expense.amount(),
        expense.description()
    );
    Ok(Out::new(message, expense))
}
