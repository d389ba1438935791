//! Command-line interface.
//!
//! Running the binary without a command serves the portal; the other
//! commands inspect what the portal would do on this machine.

mod commands;

use clap::Parser;

pub use commands::{Cli, Commands};

use crate::core::Result;

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn run() -> Result<()> { Cli::parse().execute() }
