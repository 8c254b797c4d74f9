//! Runtime configuration.
//!
//! There is no configuration file. The only setting is where the expenses are kept, which comes
//! from `--file`, then `$EXPENSE_FILE`, then `expenses.json` in the current directory.

use crate::args::Common;
use crate::{Result, Store};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// The `Config` object holds the resolved settings for one run of the program.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    data_file: PathBuf,
}

impl Config {
    /// Resolves the data file against the current directory so that log messages and errors name
    /// an absolute path.
    pub fn from_common(common: &Common) -> Result<Self> {
        let file = common.file().path();
        if file.is_absolute() {
            return Ok(Self::new(file));
        }
        let cwd = std::env::current_dir().context("Unable to determine the current directory")?;
        Ok(Self::new(cwd.join(file)))
    }

    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Opens the store, recovering from an unreadable data file.
    pub fn open_store(&self) -> Store {
        Store::open(&self.data_file)
    }

    /// Loads the store, failing if the data file is unreadable.
    pub fn load_store(&self) -> Result<Store> {
        Store::load(&self.data_file)
    }
}
