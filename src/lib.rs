pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod report;
pub mod shell;
mod store;
mod utils;


pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use shell::Shell;
pub use store::Store;
