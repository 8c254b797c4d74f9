use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The label given to expenses that were entered without a category.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A free-form category label such as `Food` or `Transport`.
///
/// Blank labels are never stored: they become [`DEFAULT_CATEGORY`] on construction, including
/// when they come from the data file.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(label: impl AsRef<str>) -> Self {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self(DEFAULT_CATEGORY.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::new(value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::new(s))
    }
}

#[test]
fn blank_category_is_other() {
    assert_eq!(Category::new("").as_str(), DEFAULT_CATEGORY);
    assert_eq!(Category::new("   \t").as_str(), DEFAULT_CATEGORY);
    assert_eq!(Category::default(), Category::new("Other"));
}

#[test]
fn category_is_trimmed() {
    assert_eq!(Category::new("  Food ").as_str(), "Food");
}

#[test]
fn category_deserialize_blank_is_other() {
    let category: Category = serde_json::from_str("\"\"").unwrap();
    assert_eq!(category.as_str(), DEFAULT_CATEGORY);
    assert_eq!(serde_json::to_string(&category).unwrap(), "\"Other\"");
}

#[test]
fn category_display_pads() {
    assert_eq!(format!("[{:<6}]", Category::new("Food")), "[Food  ]");
}
