//! Modulation.
//!
//! This module implements the QPSK constellation used by the Monte Carlo
//! simulation to generate unit-power transmit symbols and to count symbol
//! errors on the equalized output.

use num_complex::Complex;
use rand::Rng;

/// QPSK modulator.
///
/// Maps bit pairs to the unit-power Gray-coded QPSK constellation
/// (±1 ± j)/√2.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct QpskModulator {}

impl QpskModulator {
    /// Creates a new QPSK modulator.
    pub fn new() -> QpskModulator {
        QpskModulator::default()
    }

    /// Modulates a bit pair into a symbol.
    ///
    /// The first bit selects the sign of the real part and the second bit the
    /// sign of the imaginary part; a one bit maps to a negative component.
    pub fn modulate_bits(b0: bool, b1: bool) -> Complex<f32> {
        let a = (0.5f32).sqrt();
        Complex::new(if b0 { -a } else { a }, if b1 { -a } else { a })
    }

    /// Draws a sequence of random QPSK symbols.
    pub fn random_symbols<R: Rng>(rng: &mut R, len: usize) -> Vec<Complex<f32>> {
        (0..len)
            .map(|_| Self::modulate_bits(rng.gen(), rng.gen()))
            .collect()
    }

    /// Hard decision on a received symbol.
    ///
    /// Returns the bit pair of the nearest constellation point.
    pub fn hard_decision(symbol: Complex<f32>) -> (bool, bool) {
        (symbol.re < 0.0, symbol.im < 0.0)
    }
}
