//! These structs provide the CLI interface for the expense CLI.

use crate::model::{Amount, Category};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// The file used when neither --file nor EXPENSE_FILE is given.
pub const DEFAULT_DATA_FILE: &str = "expenses.json";

/// expense: a personal expense tracker.
///
/// Expenses are kept in a JSON file (expenses.json in the current directory unless told
/// otherwise). Run without a subcommand to get the interactive menu, or use one of the
/// subcommands to do a single thing and exit.
#[derive(Debug, Parser, Clone)]
#[command(name = "expense", version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    pub fn new(common: Common, command: Option<Command>) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    /// The requested subcommand, `shell` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the interactive menu. This is what runs when no subcommand is given.
    Shell,
    /// Record a new expense dated today.
    Add(AddArgs),
    /// Show every expense and the grand total.
    List,
    /// Delete an expense by its ID.
    Delete(DeleteArgs),
    /// Show the total spent in each category.
    Categories,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// The JSON file where expenses are kept.
    #[arg(long, env = "EXPENSE_FILE", default_value = DEFAULT_DATA_FILE)]
    file: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, file: PathBuf) -> Self {
        Self {
            log_level,
            file: file.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn file(&self) -> &DisplayPath {
        &self.file
    }
}

/// Args for the `expense add` command.
#[derive(Debug, Parser, Clone, PartialEq)]
pub struct AddArgs {
    /// What the money was spent on.
    description: String,

    /// How much was spent, e.g. 4.50 or $1,200.
    #[arg(allow_negative_numbers = true)]
    amount: Amount,

    /// The category of the expense. Defaults to "Other".
    #[arg(long, short)]
    category: Option<Category>,
}

impl AddArgs {
    pub fn new(description: impl Into<String>, amount: Amount, category: Option<Category>) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category.clone().unwrap_or_default()
    }
}

/// Args for the `expense delete` command.
#[derive(Debug, Parser, Clone, PartialEq)]
pub struct DeleteArgs {
    /// The ID shown in the first column of `expense list`.
    #[arg(allow_negative_numbers = true)]
    id: i64,
}

impl DeleteArgs {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
