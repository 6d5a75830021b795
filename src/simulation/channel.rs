//! Channel simulation.
//!
//! This module contains the random channel models used by the Monte Carlo
//! simulation: an AWGN source and a Rayleigh block-fading MIMO channel.

use ndarray::Array2;
use num_complex::Complex;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// AWGN channel simulation.
///
/// This struct is used to add circularly-symmetric complex AWGN to symbols.
#[derive(Debug, Clone)]
pub struct AwgnChannel {
    distr: Normal<f64>,
}

impl AwgnChannel {
    /// Creates a new AWGN channel.
    ///
    /// The channel noise follows a circularly-symmetric complex normal
    /// distribution with mean zero and total variance `noise_var`, split
    /// evenly between the real and imaginary parts.
    ///
    /// # Panics
    ///
    /// This function panics if `noise_var` is not a non-negative finite
    /// number.
    pub fn new(noise_var: f64) -> AwgnChannel {
        assert!(noise_var.is_finite() && noise_var >= 0.0);
        AwgnChannel {
            distr: Normal::new(0.0, (0.5 * noise_var).sqrt()).unwrap(),
        }
    }

    /// Adds noise to a sequence of symbols.
    ///
    /// The noise is added in-place to the slice `symbols`. An [Rng] is used
    /// as source of randomness.
    pub fn add_noise<R: Rng>(&self, rng: &mut R, symbols: &mut [Complex<f32>]) {
        for x in symbols.iter_mut() {
            *x += Complex::new(
                self.distr.sample(rng) as f32,
                self.distr.sample(rng) as f32,
            );
        }
    }
}

/// Rayleigh block-fading channel.
///
/// This struct is used to draw MIMO channel matrix realizations with
/// independent CN(0, 1) entries. Rows correspond to receive antenna ports and
/// columns to transmit layers.
#[derive(Debug, Clone)]
pub struct RayleighChannel {
    rx_ports: usize,
    tx_layers: usize,
    distr: Normal<f64>,
}

impl RayleighChannel {
    /// Creates a new Rayleigh fading channel with the given dimensions.
    ///
    /// # Panics
    ///
    /// This function panics if either dimension is zero.
    pub fn new(rx_ports: usize, tx_layers: usize) -> RayleighChannel {
        assert!(rx_ports >= 1 && tx_layers >= 1);
        RayleighChannel {
            rx_ports,
            tx_layers,
            distr: Normal::new(0.0, (0.5_f64).sqrt()).unwrap(),
        }
    }

    /// Draws a new channel matrix realization.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Array2<Complex<f32>> {
        Array2::from_shape_fn((self.rx_ports, self.tx_layers), |_| {
            Complex::new(
                self.distr.sample(rng) as f32,
                self.distr.sample(rng) as f32,
            )
        })
    }
}
