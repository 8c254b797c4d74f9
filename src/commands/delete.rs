//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::model::Expense;
use crate::{Result, Store};

/// Deletes one expense by ID and saves the store.
///
/// An unknown ID is not an error: the returned `Out` says so and carries no structure, and the
/// data file is left alone. Negative IDs are accepted and never match.
pub fn delete(store: &mut Store, args: DeleteArgs) -> Result<Out<Expense>> {
    let id = args.id();
    let removed = match u64::try_from(id) {
        Ok(id) => store.delete(id)?,
        Err(_) => None,
    };
    Ok(match removed {
        Some(removed) => {
            let message = format!("Deleted expense: {}", removed.description());
            Out::new(message, removed)
        }
        None => Out::new_message(format!("Expense with ID {id} not found")),
    })
}
