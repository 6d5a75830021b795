//! # MIMO toolbox
//!
//! `mimo_toolbox` is a collection of Rust utilities for linear MIMO channel
//! equalization. It implements the MMSE and ZF equalizers used in the upper
//! physical layer of a 5G NR receiver, working independently on each resource
//! element, together with a Monte Carlo simulation harness to measure the
//! post-equalization error over random fading channels.
//!
//! It can be used as a Rust library or as a CLI tool that allows access from
//! the command line to the simulation harness. See [`cli`] for documentation
//! about the usage of the CLI tool.

#![warn(missing_docs)]

pub mod cli;
pub mod equalizer;
pub mod rand;
pub mod simulation;

mod c_api;
