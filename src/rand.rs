//! # Reproducible random functions
//!
//! This module uses the [`ChaCha8Rng`] RNG from the [rand_chacha] crate to
//! achieve reproducible random number generation. Independent work items in
//! the simulation draw from their own stream of the same seeded generator,
//! so a run is reproducible regardless of how the work is scheduled.
//!
//! # Examples
//! ```
//! # use mimo_toolbox::rand::Rng;
//! # use mimo_toolbox::rand::*;
//! let seed = 42;
//! let mut rng = Rng::seed_from_u64(seed);
//! let first = rng.next_u64();
//! let mut rng = Rng::seed_from_u64(seed);
//! assert_eq!(rng.next_u64(), first);
//! ```

use rand_chacha::ChaCha8Rng;
pub use rand_chacha::rand_core::SeedableRng;
pub use rand_core::RngCore;

/// The RNG used throughout this crate for algorithms using pseudorandom
/// generation.
pub type Rng = ChaCha8Rng;
