use crate::model::Amount;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an expense is refused before it reaches the store.
///
/// These travel inside `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Amount),
    #[error("Amount must be at most {max}, got {amount}")]
    AmountTooLarge { amount: Amount, max: Amount },
    #[error("Adding {0} would take the total past the largest amount that can be recorded")]
    TotalTooLarge(Amount),
}
