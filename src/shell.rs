//! The interactive numbered menu.
//!
//! The shell reads one line at a time from any `BufRead` and writes prompts and results to any
//! `Write`, so it can be driven by a terminal or by a test. Nothing typed at the menu ends the
//! program except choosing Exit or closing the input.

use crate::args::{AddArgs, DeleteArgs};
use crate::error::ValidationError;
use crate::model::{Amount, Category};
use crate::{commands, Error, Result, Store};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// One entry of the main menu, keyed by the number the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuChoice {
    #[serde(rename = "1")]
    Add,
    #[serde(rename = "2")]
    List,
    #[serde(rename = "3")]
    Delete,
    #[serde(rename = "4")]
    Categories,
    #[serde(rename = "5")]
    Exit,
}

serde_plain::derive_display_from_serialize!(MenuChoice);
serde_plain::derive_fromstr_from_deserialize!(MenuChoice);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, R, W> {
    store: &'a mut Store,
    input: R,
    output: W,
}

impl<'a, R, W> Shell<'a, R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(store: &'a mut Store, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Runs the menu loop until the user exits or the input ends.
    ///
    /// Only failures to read the input or write the output are returned. Everything else is
    /// reported to the user and the loop carries on.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to your Personal Expense Tracker!")?;
        loop {
            self.menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            let flow = match line.parse::<MenuChoice>() {
                Ok(choice) => {
                    debug!("Menu choice {choice:?}");
                    self.dispatch(choice)?
                }
                Err(_) => {
                    writeln!(self.output, "Invalid choice. Please select 1-5.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        writeln!(self.output, "Thanks for using Expense Tracker!")?;
        self.output.flush()?;
        Ok(())
    }

    fn menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Expense Tracker")?;
        writeln!(self.output, "==================")?;
        writeln!(self.output, "{}. Add expense", MenuChoice::Add)?;
        writeln!(self.output, "{}. List all expenses", MenuChoice::List)?;
        writeln!(self.output, "{}. Delete expense", MenuChoice::Delete)?;
        writeln!(self.output, "{}. View by category", MenuChoice::Categories)?;
        writeln!(self.output, "{}. Exit", MenuChoice::Exit)?;
        write!(self.output, "Choose an option (1-5): ")?;
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        match choice {
            MenuChoice::Add => self.add(),
            MenuChoice::List => {
                self.show_list()?;
                Ok(Flow::Continue)
            }
            MenuChoice::Delete => self.delete(),
            MenuChoice::Categories => {
                let out = commands::categories(self.store);
                write!(self.output, "\n{}", out.message())?;
                Ok(Flow::Continue)
            }
            MenuChoice::Exit => Ok(Flow::Exit),
        }
    }

    fn add(&mut self) -> Result<Flow> {
        let Some(description) = self.prompt("Enter description: ")? else {
            return Ok(Flow::Exit);
        };
        if description.is_empty() {
            writeln!(self.output, "{}", ValidationError::EmptyDescription)?;
            return Ok(Flow::Continue);
        }

        let Some(amount) = self.prompt("Enter amount: $")? else {
            return Ok(Flow::Exit);
        };
        let amount = match amount.parse::<Amount>() {
            Ok(amount) if amount.is_positive() => amount,
            _ => {
                writeln!(self.output, "Please enter a valid amount")?;
                return Ok(Flow::Continue);
            }
        };

        let Some(category) =
            self.prompt("Enter category (e.g., Food, Transport, Entertainment): ")?
        else {
            return Ok(Flow::Exit);
        };

        let args = AddArgs::new(description, amount, Some(Category::new(category)));
        match commands::add(self.store, args) {
            Ok(out) => writeln!(self.output, "{}", out.message())?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        self.show_list()?;
        if self.store.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(id) = self.prompt("Enter expense ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(id) = id.parse::<i64>() else {
            writeln!(self.output, "Please enter a valid ID")?;
            return Ok(Flow::Continue);
        };

        match commands::delete(self.store, DeleteArgs::new(id)) {
            Ok(out) => writeln!(self.output, "{}", out.message())?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn show_list(&mut self) -> Result<()> {
        let out = commands::list(self.store);
        write!(self.output, "\n{}", out.message())?;
        Ok(())
    }

    /// Tells the user about a failed operation without leaving the loop.
    fn report(&mut self, e: Error) -> Result<()> {
        if let Some(invalid) = e.downcast_ref::<ValidationError>() {
            writeln!(self.output, "{invalid}")?;
        } else {
            warn!("{e:#}");
            writeln!(self.output, "Error: {e:#}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.read_line()
    }

    /// Reads one trimmed line, or `None` once the input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Unable to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
