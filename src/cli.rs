//! `mimo-toolbox` CLI application
//!
//! The CLI application is organized in subcommands. The supported subcommands
//! can be seen by running `mimo-toolbox`. See the modules below for examples
//! and more information about how to use each subcommand.

use clap::Parser;
use std::error::Error;

pub mod mse;

/// Trait to run a CLI subcommand
pub trait Run {
    /// Run the CLI subcommand
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(author, version, name = "mimo-toolbox", about = "MIMO toolbox")]
pub enum Args {
    /// mse subcommand
    MSE(mse::Args),
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Args::MSE(x) => x.run(),
        }
    }
}
