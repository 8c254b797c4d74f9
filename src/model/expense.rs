use crate::model::{Amount, Category};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One recorded expense.
///
/// Expenses are only created by the store, which assigns the `id` and stamps the `date`. The
/// serialized field names are the ones used by existing `expenses.json` files.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Amount")]
    amount: Amount,
    #[serde(rename = "Category", default)]
    category: Category,
    #[serde(rename = "Date")]
    date: DateTime<Local>,
}

impl Expense {
    pub(crate) fn new(
        id: u64,
        description: impl Into<String>,
        amount: Amount,
        category: Category,
        date: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
            category,
            date,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn date(&self) -> DateTime<Local> {
        self.date
    }
}
