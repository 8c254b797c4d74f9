//! The expense store.
//!
//! A `Store` is the ordered list of expenses together with the counter used to assign ids. It is
//! loaded once from its backing JSON file and the whole file is replaced after every mutation.
//!
//! The file layout is:
//! ```json
//! {
//!   "Expenses": [
//!     { "ID": 1, "Description": "Coffee", "Amount": 4.5, "Category": "Food", "Date": "..." }
//!   ],
//!   "NextID": 2
//! }
//! ```

use crate::error::ValidationError;
use crate::model::{Amount, Category, CategoryTotal, Expense};
use crate::{utils, Result};
use anyhow::{ensure, Context};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FIRST_ID: u64 = 1;

/// In-memory expenses and id counter, bound to a backing file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    expenses: Vec<Expense>,
    next_id: u64,
}

/// The on-disk shape as read. `Expenses` may be `null` and `NextID` may be absent.
#[derive(Deserialize)]
struct StoreFile {
    #[serde(rename = "Expenses", default)]
    expenses: Option<Vec<Expense>>,
    #[serde(rename = "NextID", default = "first_id")]
    next_id: u64,
}

/// The on-disk shape as written.
#[derive(Serialize)]
struct StoreFileRef<'a> {
    #[serde(rename = "Expenses")]
    expenses: &'a [Expense],
    #[serde(rename = "NextID")]
    next_id: u64,
}

fn first_id() -> u64 {
    FIRST_ID
}

impl Store {
    /// Creates an empty store bound to `path` without reading it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expenses: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    /// Loads the store from `path`.
    ///
    /// A missing file is not an error and gives an empty store. A file that cannot be read or
    /// parsed, or that holds duplicate ids, is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let Some(file) = utils::deserialize_if_exists::<StoreFile>(&path)? else {
            debug!("No data file at {}, starting empty", path.display());
            return Ok(Self::new(path));
        };

        let expenses = file.expenses.unwrap_or_default();
        let mut seen = HashSet::with_capacity(expenses.len());
        for expense in &expenses {
            ensure!(
                seen.insert(expense.id()),
                "Data file {} contains expense ID {} more than once",
                path.display(),
                expense.id()
            );
        }

        // A hand-edited NextID must never cause an id to be issued twice
        let max_id = expenses.iter().map(Expense::id).max().unwrap_or(0);
        let next_id = file.next_id.max(max_id + 1).max(FIRST_ID);
        if next_id != file.next_id {
            warn!(
                "NextID {} in {} is behind the highest expense ID {max_id}, using {next_id}",
                file.next_id,
                path.display()
            );
        }

        debug!("Loaded {} expenses from {}", expenses.len(), path.display());
        Ok(Self {
            path,
            expenses,
            next_id,
        })
    }

    /// Loads the store from `path`, falling back to an empty store if the file is unusable.
    ///
    /// An unusable file is moved aside to `<file>.corrupt-<timestamp>` so that the next save does
    /// not overwrite whatever it held.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Unable to load expenses, starting empty: {e:#}");
                if path.is_file() {
                    let stamp = Local::now().format("%Y%m%d-%H%M%S");
                    let aside = utils::sibling(&path, &format!("corrupt-{stamp}"));
                    match utils::rename(&path, &aside) {
                        Ok(()) => warn!("The unreadable data file was moved to {}", aside.display()),
                        Err(e) => warn!("{e:#}"),
                    }
                }
                Self::new(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All expenses in insertion order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    #[cfg(test)]
    pub fn get(&self, id: u64) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id() == id)
    }

    /// The sum of every expense amount. A hand-edited file can hold amounts whose sum is out of
    /// range, in which case the total saturates.
    pub fn total(&self) -> Amount {
        self.expenses.iter().map(Expense::amount).sum()
    }

    fn checked_total(&self) -> Option<Amount> {
        self.expenses
            .iter()
            .try_fold(Amount::ZERO, |sum, e| sum.checked_add(e.amount()))
    }

    /// Writes the full store to its backing file, replacing the previous contents.
    pub fn save(&self) -> Result<()> {
        let file = StoreFileRef {
            expenses: &self.expenses,
            next_id: self.next_id,
        };
        let data = serde_json::to_string_pretty(&file).context("Unable to serialize expenses")?;
        utils::write_atomic(&self.path, data)
            .with_context(|| format!("Unable to save expenses to {}", self.path.display()))?;
        debug!(
            "Saved {} expenses to {}",
            self.expenses.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Records a new expense dated now and saves the store.
    ///
    /// # Errors
    /// - `ValidationError::EmptyDescription` if `description` is blank.
    /// - `ValidationError::NonPositiveAmount` if `amount` is zero or negative.
    /// - `ValidationError::AmountTooLarge` if `amount` is above `Amount::MAX`.
    /// - `ValidationError::TotalTooLarge` if the grand total would go out of range.
    /// - Any error from `save`. In that case the store is left exactly as it was.
    pub fn add(&mut self, description: &str, amount: Amount, category: Category) -> Result<Expense> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }
        if amount > Amount::MAX {
            return Err(ValidationError::AmountTooLarge {
                amount,
                max: Amount::MAX,
            }
            .into());
        }
        // Keep only what the file can hold so a reload gives back the same record
        let amount = amount
            .to_stored()
            .with_context(|| format!("Unable to store amount {amount}"))?;
        if self
            .checked_total()
            .and_then(|total| total.checked_add(amount))
            .is_none()
        {
            return Err(ValidationError::TotalTooLarge(amount).into());
        }

        let expense = Expense::new(self.next_id, description, amount, category, Local::now());
        self.expenses.push(expense.clone());
        self.next_id += 1;

        if let Err(e) = self.save() {
            self.expenses.pop();
            self.next_id -= 1;
            return Err(e);
        }
        debug!("Added expense {}", expense.id());
        Ok(expense)
    }

    /// Removes the expense with `id` and saves the store.
    ///
    /// Returns `Ok(None)` without touching the file when no expense has that id.
    pub fn delete(&mut self, id: u64) -> Result<Option<Expense>> {
        let Some(ix) = self.expenses.iter().position(|e| e.id() == id) else {
            return Ok(None);
        };
        let removed = self.expenses.remove(ix);

        if let Err(e) = self.save() {
            self.expenses.insert(ix, removed);
            return Err(e);
        }
        debug!("Deleted expense {id}");
        Ok(Some(removed))
    }

    /// Per-category totals in order of each category's first appearance.
    pub fn totals_by_category(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        let mut index: HashMap<&Category, usize> = HashMap::new();
        for expense in &self.expenses {
            match index.get(expense.category()) {
                Some(&ix) => totals[ix].total = totals[ix].total + expense.amount(),
                None => {
                    index.insert(expense.category(), totals.len());
                    totals.push(CategoryTotal {
                        category: expense.category().clone(),
                        total: expense.amount(),
                    });
                }
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{amount, TestEnv};

    #[test]
    fn test_load_missing_file_is_empty() {
        let env = TestEnv::new();
        let store = Store::load(env.path()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(!env.path().exists());
    }

    #[test]
    fn test_ids_increase_across_deletes() {
        let env = TestEnv::new();
        let mut store = env.store();
        let a = store.add("A", amount("1"), Category::default()).unwrap();
        let b = store.add("B", amount("1"), Category::default()).unwrap();
        store.delete(b.id()).unwrap();
        store.delete(a.id()).unwrap();
        let c = store.add("C", amount("1"), Category::default()).unwrap();
        assert_eq!((a.id(), b.id(), c.id()), (1, 2, 3));
        assert_eq!(store.next_id(), 4);
    }

    #[test]
    fn test_add_then_reload_round_trips() {
        let env = TestEnv::new();
        let mut store = env.seeded();
        for (name, value) in [
            ("Fine print", "0.1234567890123456789"),
            ("Tiny", "0.0001"),
            ("Yacht", "999999999999.99"),
            ("Everything", "1000000000000"),
            ("Thirds", "33.333333333333333333"),
        ] {
            store.add(name, amount(value), Category::default()).unwrap();
        }
        let reloaded = Store::load(env.path()).unwrap();
        assert_eq!(reloaded.expenses(), store.expenses());
        assert_eq!(reloaded.next_id(), store.next_id());
        assert_eq!(reloaded.total(), store.total());
    }

    #[test]
    fn test_add_keeps_amount_as_stored() {
        let env = TestEnv::new();
        let mut store = env.store();
        let added = store
            .add("Fine print", amount("0.1234567890123456789"), Category::default())
            .unwrap();
        assert_eq!(added.amount(), amount("0.12345678901234568"));
        assert_eq!(store.expenses()[0].amount(), added.amount());
    }

    #[test]
    fn test_add_rejects_amount_above_max() {
        let env = TestEnv::new();
        let mut store = env.store();
        store
            .add("Coffee", amount("4.50"), Category::new("Food"))
            .unwrap();

        let huge = Amount::new(rust_decimal::Decimal::MAX);
        let err = store.add("Everything", huge, Category::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::AmountTooLarge {
                amount: huge,
                max: Amount::MAX
            })
        );
        let over = amount("1000000000000.01");
        assert!(store.add("Over", over, Category::default()).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), 2);
        let reloaded = Store::open(env.path());
        assert_eq!(reloaded.expenses(), store.expenses());
    }

    #[test]
    fn test_out_of_range_total_from_file() {
        let env = TestEnv::new();
        env.write_data(
            r#"{
              "Expenses": [
                {"ID": 1, "Description": "a", "Amount": 5e28, "Category": "x", "Date": "2024-03-01T09:00:00Z"},
                {"ID": 2, "Description": "b", "Amount": 5e28, "Category": "x", "Date": "2024-03-01T09:00:00Z"}
              ],
              "NextID": 3
            }"#,
        );
        let mut store = Store::load(env.path()).unwrap();
        assert_eq!(store.total().value(), rust_decimal::Decimal::MAX);
        assert_eq!(store.totals_by_category()[0].total, store.total());
        assert!(crate::report::list(store.expenses()).contains("Total: $"));

        let err = store.add("Coffee", amount("4.50"), Category::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::TotalTooLarge(amount("4.50")))
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 3);
    }

    #[test]
    fn test_scenario_coffee_and_bus() {
        let env = TestEnv::new();
        let mut store = env.seeded();
        let ids: Vec<u64> = store.expenses().iter().map(Expense::id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.total().to_string(), "$6.50");

        let deleted = store.delete(1).unwrap().unwrap();
        assert_eq!(deleted.description(), "Coffee");
        assert_eq!(store.len(), 1);
        assert_eq!(store.expenses()[0].id(), 2);
        assert_eq!(store.expenses()[0].description(), "Bus");

        let next = store.add("Lunch", amount("12"), Category::new("Food")).unwrap();
        assert_eq!(next.id(), 3);
    }

    #[test]
    fn test_delete_absent_id_changes_nothing() {
        let env = TestEnv::new();
        let mut store = env.seeded();
        let before = std::fs::read_to_string(env.path()).unwrap();
        assert!(store.delete(99).unwrap().is_none());
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 3);
        assert_eq!(std::fs::read_to_string(env.path()).unwrap(), before);
    }

    #[test]
    fn test_delete_preserves_order() {
        let env = TestEnv::new();
        let mut store = env.store();
        for name in ["a", "b", "c", "d"] {
            store.add(name, amount("1"), Category::default()).unwrap();
        }
        store.delete(2).unwrap();
        let names: Vec<&str> = store.expenses().iter().map(Expense::description).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let env = TestEnv::new();
        let mut store = env.seeded();

        for bad in ["0", "-3", "0.00"] {
            let err = store.add("Refund", amount(bad), Category::default()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ValidationError>(),
                Some(ValidationError::NonPositiveAmount(_))
            ));
        }
        let err = store.add("   ", amount("5"), Category::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyDescription)
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 3);
        assert_eq!(Store::load(env.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_add_trims_description() {
        let env = TestEnv::new();
        let mut store = env.store();
        let added = store.add("  Tea  ", amount("3"), Category::default()).unwrap();
        assert_eq!(added.description(), "Tea");
        assert_eq!(added.category().as_str(), "Other");
    }

    #[test]
    fn test_failed_save_rolls_back_add_and_delete() {
        let env = TestEnv::new();
        // a directory where the data file should be makes every save fail
        let blocked = env.dir().join("blocked");
        std::fs::create_dir_all(&blocked).unwrap();
        let mut store = Store::new(&blocked);

        assert!(store.add("Coffee", amount("4.50"), Category::default()).is_err());
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);

        let mut good = env.seeded();
        let good_path = good.path().to_path_buf();
        std::fs::remove_file(&good_path).unwrap();
        std::fs::create_dir_all(&good_path).unwrap();
        assert!(good.delete(1).is_err());
        let ids: Vec<u64> = good.expenses().iter().map(Expense::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_totals_by_category_first_appearance_order() {
        let env = TestEnv::new();
        let mut store = env.store();
        store.add("Bus", amount("2"), Category::new("Transport")).unwrap();
        store.add("Coffee", amount("4.50"), Category::new("Food")).unwrap();
        store.add("Train", amount("10.25"), Category::new("Transport")).unwrap();
        store.add("Misc", amount("1"), Category::new("")).unwrap();

        let totals = store.totals_by_category();
        let flat: Vec<(&str, String)> = totals
            .iter()
            .map(|t| (t.category.as_str(), t.total.to_string()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("Transport", "$12.25".to_string()),
                ("Food", "$4.50".to_string()),
                ("Other", "$1.00".to_string()),
            ]
        );

        let sum: Amount = totals.iter().map(|t| t.total).sum();
        assert_eq!(sum, store.total());
    }

    #[test]
    fn test_totals_by_category_empty() {
        let env = TestEnv::new();
        assert!(env.store().totals_by_category().is_empty());
    }

    #[test]
    fn test_load_null_expenses_and_missing_next_id() {
        let env = TestEnv::new();
        env.write_data(r#"{"Expenses": null}"#);
        let store = Store::load(env.path()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_load_corrects_stale_next_id() {
        let env = TestEnv::new();
        env.write_data(
            r#"{
              "Expenses": [
                {"ID": 5, "Description": "Rent", "Amount": 900, "Category": "Housing",
                 "Date": "2024-03-01T09:00:00Z"}
              ],
              "NextID": 2
            }"#,
        );
        let store = Store::load(env.path()).unwrap();
        assert_eq!(store.next_id(), 6);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let env = TestEnv::new();
        env.write_data(
            r#"{
              "Expenses": [
                {"ID": 1, "Description": "a", "Amount": 1, "Category": "x", "Date": "2024-03-01T09:00:00Z"},
                {"ID": 1, "Description": "b", "Amount": 1, "Category": "x", "Date": "2024-03-01T09:00:00Z"}
              ],
              "NextID": 2
            }"#,
        );
        let err = Store::load(env.path()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_load_malformed_is_error() {
        let env = TestEnv::new();
        env.write_data("{ this is not json");
        let err = Store::load(env.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON file"));
    }

    #[test]
    fn test_open_moves_corrupt_file_aside() {
        let env = TestEnv::new();
        env.write_data("{ this is not json");
        let store = Store::open(env.path());
        assert!(store.is_empty());
        assert!(!env.path().exists());

        let moved: Vec<String> = std::fs::read_dir(env.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("expenses.json.corrupt-"))
            .collect();
        assert_eq!(moved.len(), 1);
    }

    #[test]
    fn test_saved_file_is_pretty_json() {
        let env = TestEnv::new();
        env.seeded();
        let content = std::fs::read_to_string(env.path()).unwrap();
        assert!(content.contains("\n  \"Expenses\": ["));
        assert!(content.contains("\"NextID\": 3"));
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["Expenses"][0]["Amount"], 4.5);
    }
}
