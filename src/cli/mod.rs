//! CLI module
//!
//! Command-line interface over the resource client.
//!
//! # Commands
//!
//! - `get` - GET a resource and print its body
//! - `head` - Print status and headers
//! - `count` - Print the number of records in a collection
//! - `exists` - Print whether a resource exists
//! - `first` - Print the first record of a collection
//! - `each` - Print every record, walking all pages
//! - `pages` - Print every page
//! - `drain` - Fetch a queue-like resource until it is empty

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, TargetArgs};
pub use runner::Runner;
