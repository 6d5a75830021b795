//! Simulation.
//!
//! This module contains utilities to measure the post-equalization MSE over
//! a random fading channel.

pub mod channel;
pub mod modulation;
pub mod mse;
