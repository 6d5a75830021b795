//! MIMO channel equalization.
//!
//! This module implements a linear MIMO channel equalizer working
//! independently on each resource element (RE). For every RE, the equalizer
//! takes the received symbols across the receive antenna ports and a channel
//! estimate matrix mapping transmit layers to receive ports, and produces an
//! estimate of the symbol transmitted in each layer together with the
//! effective noise variance seen by that layer after equalization. The noise
//! variances are meant to scale the LLRs in a soft demodulator downstream.
//!
//! Two equalizer kinds are supported. The MMSE equalizer regularizes the
//! channel inversion with the noise variance, trading noise enhancement for a
//! bias towards zero. The ZF equalizer inverts the channel exactly and
//! ignores the noise, so the two coincide as the noise variance tends to
//! zero. The estimated symbols are not corrected for the MMSE bias; the bias
//! is accounted for in the reported noise variances instead, which follow the
//! closed-form maximum-ratio-combining identities exactly in the single-layer
//! case.
//!
//! The channel estimate is assumed to be normalized to the reference signal
//! amplitude, while data symbols may be transmitted with a different
//! amplitude. The ratio between the two is the transmit scaling factor, which
//! the equalizer compensates for in both outputs.
//!
//! Symbols are single-precision complex numbers; all intermediate arithmetic
//! is carried out in double precision.
//!
//! # Examples
//!
//! Equalizing one RE received over two ports carrying a single layer:
//!
//! ```
//! # use mimo_toolbox::equalizer::{Equalizer, EqualizerKind};
//! # use ndarray::arr2;
//! # use num_complex::Complex;
//! let equalizer = Equalizer::new(EqualizerKind::Mmse, 0.1, 1.0).unwrap();
//! let channel = arr2(&[[Complex::new(1.0f32, 0.0)], [Complex::new(0.0, 1.0)]]);
//! let rx_symbols = [Complex::new(2.0f32, 0.0), Complex::new(0.0, 2.0)];
//! let out = equalizer.equalize(&rx_symbols, &channel).unwrap();
//! assert_eq!(out.symbols.len(), 1);
//! assert_eq!(out.noise_vars.len(), 1);
//! ```

use clap::ValueEnum;
use enum_iterator::Sequence;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix2};
use num_complex::Complex;
use thiserror::Error;

mod cholesky;

use cholesky::Cholesky;

// An MMSE layer whose combined gain Re(W_tt) falls at or below this value is
// unobservable and gets reported as singular instead of producing an
// unbounded noise variance.
const MIN_LAYER_GAIN: f64 = 1e-9;

/// Channel equalizer error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The noise variance is negative, not finite, or zero for an MMSE
    /// equalizer.
    #[error("the noise variance is not a valid positive finite number")]
    InvalidNoiseVariance,
    /// The transmit scaling factor is not a positive finite number.
    #[error("the transmit scaling factor is not a positive finite number")]
    InvalidScaling,
    /// The received symbols and the channel matrix have inconsistent
    /// dimensions, or one of the dimensions is zero.
    #[error("the received symbols and the channel matrix have inconsistent dimensions")]
    DimensionMismatch,
    /// The equalizer system matrix is singular or near-singular, so the
    /// resource element cannot be equalized.
    #[error("the equalizer system matrix is singular or near-singular")]
    SingularMatrix,
}

/// Equalizer kind.
///
/// Selects the regularization term used to build the equalizer from the
/// channel estimate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Sequence, ValueEnum)]
#[clap(rename_all = "UPPER")]
pub enum EqualizerKind {
    /// Minimum mean square error equalizer.
    Mmse,
    /// Zero forcing equalizer.
    Zf,
}

impl std::str::FromStr for EqualizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<EqualizerKind, String> {
        Ok(match s {
            "MMSE" => EqualizerKind::Mmse,
            "ZF" => EqualizerKind::Zf,
            _ => Err(format!("invalid equalizer kind {s}"))?,
        })
    }
}

impl std::fmt::Display for EqualizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                EqualizerKind::Mmse => "MMSE",
                EqualizerKind::Zf => "ZF",
            }
        )
    }
}

/// MIMO channel equalizer.
///
/// Holds a validated equalizer configuration: the equalizer kind, the noise
/// variance and the transmit scaling factor. The equalizer itself is
/// stateless; every call is a pure function of its inputs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equalizer {
    kind: EqualizerKind,
    noise_var: f64,
    tx_scaling: f64,
}

/// Input data for one resource element of a batch.
///
/// The buffers are borrowed from the caller. An RE can override the noise
/// variance configured in the equalizer, which is useful when the channel
/// estimator reports a different noise estimate in different parts of the
/// resource grid.
#[derive(Debug, Clone, Copy)]
pub struct ResourceElement<'a> {
    /// Received symbols, one per receive antenna port.
    pub rx_symbols: &'a [Complex<f32>],
    /// Channel estimate. Rows correspond to receive ports and columns to
    /// transmit layers.
    pub channel: ArrayView2<'a, Complex<f32>>,
    /// Noise variance for this RE. `None` uses the variance configured in the
    /// equalizer.
    pub noise_var: Option<f64>,
}

/// Equalizer output for one resource element.
#[derive(Debug, Clone, PartialEq)]
pub struct Equalized {
    /// Estimated transmit symbols, one per transmit layer.
    pub symbols: Vec<Complex<f32>>,
    /// Post-equalization noise variance of each transmit layer, in the same
    /// units as the squared magnitude of the estimated symbols.
    pub noise_vars: Vec<f32>,
}

impl Equalizer {
    /// Creates a new equalizer.
    ///
    /// The noise variance must be a positive finite number for an MMSE
    /// equalizer. A ZF equalizer only uses the noise variance to report the
    /// output noise power, so it also admits exactly zero (a noiseless
    /// channel). The transmit scaling factor is the amplitude of the data
    /// symbols relative to the reference signal the channel estimate is
    /// normalized to, and must be a positive finite number.
    pub fn new(kind: EqualizerKind, noise_var: f64, tx_scaling: f64) -> Result<Equalizer, Error> {
        check_noise_var(kind, noise_var)?;
        if !(tx_scaling.is_finite() && tx_scaling > 0.0) {
            return Err(Error::InvalidScaling);
        }
        Ok(Equalizer {
            kind,
            noise_var,
            tx_scaling,
        })
    }

    /// Returns the equalizer kind.
    pub fn kind(&self) -> EqualizerKind {
        self.kind
    }

    /// Returns the configured noise variance.
    pub fn noise_var(&self) -> f64 {
        self.noise_var
    }

    /// Returns the transmit scaling factor.
    pub fn tx_scaling(&self) -> f64 {
        self.tx_scaling
    }

    /// Equalizes a single resource element.
    ///
    /// The received symbols must have one entry per receive port, matching
    /// the number of rows of the channel matrix. The output contains one
    /// estimated symbol and one noise variance per transmit layer (channel
    /// matrix column).
    pub fn equalize<S>(
        &self,
        rx_symbols: &[Complex<f32>],
        channel: &ArrayBase<S, Ix2>,
    ) -> Result<Equalized, Error>
    where
        S: Data<Elem = Complex<f32>>,
    {
        self.equalize_re(rx_symbols, &channel.view(), self.noise_var)
    }

    /// Equalizes a single resource element with its own noise variance.
    ///
    /// Like [`Equalizer::equalize`], but overriding the configured noise
    /// variance for this RE. The override is validated with the same rules as
    /// in [`Equalizer::new`].
    pub fn equalize_with_noise_var<S>(
        &self,
        rx_symbols: &[Complex<f32>],
        channel: &ArrayBase<S, Ix2>,
        noise_var: f64,
    ) -> Result<Equalized, Error>
    where
        S: Data<Elem = Complex<f32>>,
    {
        check_noise_var(self.kind, noise_var)?;
        self.equalize_re(rx_symbols, &channel.view(), noise_var)
    }

    /// Equalizes a batch of resource elements, stopping at the first error.
    ///
    /// The REs are processed independently and in order: the output in
    /// position `i` corresponds to the RE in position `i` of the input. If
    /// any RE fails, the whole batch fails with that RE's error. Use
    /// [`Equalizer::equalize_batch_lenient`] to keep the results of the
    /// healthy REs instead.
    pub fn equalize_batch<'a, I>(&self, res: I) -> Result<Vec<Equalized>, Error>
    where
        I: IntoIterator<Item = ResourceElement<'a>>,
    {
        res.into_iter()
            .map(|re| self.equalize_resource_element(re))
            .collect()
    }

    /// Equalizes a batch of resource elements, collecting per-RE status.
    ///
    /// Like [`Equalizer::equalize_batch`], but a failing RE (for instance a
    /// rank-deficient channel estimate from a dead antenna) does not discard
    /// the rest of the batch: its slot carries the error and every other slot
    /// carries its result.
    pub fn equalize_batch_lenient<'a, I>(&self, res: I) -> Vec<Result<Equalized, Error>>
    where
        I: IntoIterator<Item = ResourceElement<'a>>,
    {
        res.into_iter()
            .map(|re| self.equalize_resource_element(re))
            .collect()
    }

    fn equalize_resource_element(&self, re: ResourceElement<'_>) -> Result<Equalized, Error> {
        match re.noise_var {
            Some(noise_var) => self.equalize_with_noise_var(re.rx_symbols, &re.channel, noise_var),
            None => self.equalize(re.rx_symbols, &re.channel),
        }
    }

    fn equalize_re(
        &self,
        rx_symbols: &[Complex<f32>],
        channel: &ArrayView2<Complex<f32>>,
        noise_var: f64,
    ) -> Result<Equalized, Error> {
        let (rx_ports, layers) = channel.dim();
        if rx_ports == 0 || layers == 0 || rx_symbols.len() != rx_ports {
            return Err(Error::DimensionMismatch);
        }

        let h = channel.mapv(promote);
        let y = Array1::from_iter(rx_symbols.iter().copied().map(promote));
        let hh = conj_transpose(&h);
        let g = hh.dot(&h);
        let hy = hh.dot(&y);

        let m = match self.kind {
            EqualizerKind::Zf => g.clone(),
            EqualizerKind::Mmse => {
                let mut m = g.clone();
                for t in 0..layers {
                    m[[t, t]] += noise_var;
                }
                m
            }
        };
        let factor = Cholesky::new(&m).map_err(|_| Error::SingularMatrix)?;
        let z = factor.solve(&hy);
        let minv_diag = factor.inverse_diagonal();

        let beta = self.tx_scaling;
        let beta2 = beta * beta;
        let noise_vars = match self.kind {
            EqualizerKind::Zf => {
                // W = I exactly, so only the thermal noise through M⁻¹ is left
                (0..layers)
                    .map(|t| (noise_var * minv_diag[t] / beta2) as f32)
                    .collect()
            }
            EqualizerKind::Mmse => {
                let w = factor.solve_matrix(&g);
                let mut noise_vars = Vec::with_capacity(layers);
                for t in 0..layers {
                    // 1 - Re(W_tt) = σ²·(M⁻¹)_tt; the identity sidesteps the
                    // cancellation of the direct difference at high SNR
                    let residual = noise_var * minv_diag[t];
                    let gain = 1.0 - residual;
                    if gain <= MIN_LAYER_GAIN {
                        return Err(Error::SingularMatrix);
                    }
                    let leakage: f64 = (0..layers)
                        .filter(|&k| k != t)
                        .map(|k| w[[t, k]].norm_sqr())
                        .sum();
                    noise_vars.push(((residual + leakage) / (beta2 * gain)) as f32);
                }
                noise_vars
            }
        };
        let symbols = z
            .iter()
            .map(|x| Complex::new((x.re / beta) as f32, (x.im / beta) as f32))
            .collect();
        Ok(Equalized {
            symbols,
            noise_vars,
        })
    }
}

/// Equalizes a single resource element.
///
/// Free-function form of [`Equalizer::equalize`]: builds a validated
/// equalizer and runs it on one RE.
pub fn equalize<S>(
    rx_symbols: &[Complex<f32>],
    channel: &ArrayBase<S, Ix2>,
    kind: EqualizerKind,
    noise_var: f64,
    tx_scaling: f64,
) -> Result<Equalized, Error>
where
    S: Data<Elem = Complex<f32>>,
{
    Equalizer::new(kind, noise_var, tx_scaling)?.equalize(rx_symbols, channel)
}

fn check_noise_var(kind: EqualizerKind, noise_var: f64) -> Result<(), Error> {
    let valid = match kind {
        EqualizerKind::Mmse => noise_var.is_finite() && noise_var > 0.0,
        // ZF only uses the noise variance to report the output noise power
        EqualizerKind::Zf => noise_var.is_finite() && noise_var >= 0.0,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidNoiseVariance)
    }
}

fn promote(x: Complex<f32>) -> Complex<f64> {
    Complex::new(f64::from(x.re), f64::from(x.im))
}

fn conj_transpose(a: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    a.t().mapv(|x| x.conj())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rand::{Rng, SeedableRng};
    use ndarray::arr2;
    use rand_distr::{Distribution, StandardNormal};

    fn c(re: f32, im: f32) -> Complex<f32> {
        Complex::new(re, im)
    }

    fn assert_symbol_close(a: Complex<f32>, b: Complex<f32>, tol: f32) {
        assert!((a - b).norm() < tol, "{a} is not within {tol} of {b}");
    }

    // A fixed full-column-rank 3x2 channel
    fn channel_3x2() -> Array2<Complex<f32>> {
        arr2(&[
            [c(1.0, 0.5), c(0.2, 0.0)],
            [c(0.0, 0.3), c(1.0, -0.2)],
            [c(0.5, 0.0), c(0.0, 0.7)],
        ])
    }

    fn transmit(
        channel: &Array2<Complex<f32>>,
        tx_symbols: &[Complex<f32>],
        tx_scaling: f32,
    ) -> Vec<Complex<f32>> {
        (0..channel.nrows())
            .map(|i| {
                tx_symbols
                    .iter()
                    .enumerate()
                    .map(|(t, &x)| channel[[i, t]] * x * tx_scaling)
                    .sum()
            })
            .collect()
    }

    fn random_channel(rng: &mut Rng, rx_ports: usize, tx_layers: usize) -> Array2<Complex<f32>> {
        Array2::from_shape_fn((rx_ports, tx_layers), |_| {
            Complex::new(StandardNormal.sample(rng), StandardNormal.sample(rng))
        })
    }

    #[test]
    fn zf_recovers_noiseless_symbols() {
        let channel = channel_3x2();
        let tx_symbols = [c(0.7, -0.3), c(-0.4, 0.9)];
        let tx_scaling = 1.25;
        let rx_symbols = transmit(&channel, &tx_symbols, tx_scaling);
        let equalizer = Equalizer::new(EqualizerKind::Zf, 0.0, tx_scaling.into()).unwrap();
        let out = equalizer.equalize(&rx_symbols, &channel).unwrap();
        let tol = 1e-4;
        for (est, tx) in out.symbols.iter().zip(tx_symbols.iter()) {
            assert_symbol_close(*est, *tx, tol);
        }
        // Noiseless channel: the reported noise variances are zero
        for &nu in out.noise_vars.iter() {
            assert_eq!(nu, 0.0);
        }
    }

    #[test]
    fn mmse_converges_to_zf() {
        let channel = channel_3x2();
        let rx_symbols = [c(0.9, 0.1), c(-0.2, 0.4), c(0.3, -0.8)];
        let noise_var = 1e-9;
        let mmse = Equalizer::new(EqualizerKind::Mmse, noise_var, 1.0).unwrap();
        let zf = Equalizer::new(EqualizerKind::Zf, noise_var, 1.0).unwrap();
        let out_mmse = mmse.equalize(&rx_symbols, &channel).unwrap();
        let out_zf = zf.equalize(&rx_symbols, &channel).unwrap();
        let tol = 1e-6;
        for (a, b) in out_mmse.symbols.iter().zip(out_zf.symbols.iter()) {
            assert_symbol_close(*a, *b, tol);
        }
    }

    #[test]
    fn zf_identity_channel() {
        let channel = arr2(&[[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]);
        let rx_symbols = [c(1.2, -0.4), c(-0.6, 2.0)];
        let equalizer = Equalizer::new(EqualizerKind::Zf, 0.3, 2.0).unwrap();
        let out = equalizer.equalize(&rx_symbols, &channel).unwrap();
        let tol = 1e-6;
        for (est, rx) in out.symbols.iter().zip(rx_symbols.iter()) {
            assert_symbol_close(*est, rx / 2.0, tol);
        }
        // ν = σ²/β²
        for &nu in out.noise_vars.iter() {
            assert!((nu - 0.075).abs() < tol);
        }
    }

    #[test]
    fn mmse_identity_channel() {
        let channel = arr2(&[[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]);
        let rx_symbols = [c(1.2, -0.4), c(-0.6, 2.0)];
        let noise_var = 0.3;
        let equalizer = Equalizer::new(EqualizerKind::Mmse, noise_var, 2.0).unwrap();
        let out = equalizer.equalize(&rx_symbols, &channel).unwrap();
        let tol = 1e-6;
        // MMSE shrinkage: x̂ = y/(β·(1 + σ²))
        let scale = 2.0 * (1.0 + noise_var as f32);
        for (est, rx) in out.symbols.iter().zip(rx_symbols.iter()) {
            assert_symbol_close(*est, rx / scale, tol);
        }
        // The bias-compensated noise variance matches ZF on this channel
        for &nu in out.noise_vars.iter() {
            assert!((nu - 0.075).abs() < tol);
        }
    }

    #[test]
    fn noise_variance_is_nonnegative() {
        let mut rng = Rng::seed_from_u64(7);
        for kind in enum_iterator::all::<EqualizerKind>() {
            let equalizer = Equalizer::new(kind, 0.05, 0.8).unwrap();
            for trial in 0..50 {
                let layers = trial % 4 + 1;
                let channel = random_channel(&mut rng, 4, layers);
                let rx_symbols = vec![c(1.0, -1.0); 4];
                let out = equalizer.equalize(&rx_symbols, &channel).unwrap();
                for &nu in out.noise_vars.iter() {
                    assert!(nu.is_finite());
                    assert!(nu >= 0.0);
                }
            }
        }
    }

    #[test]
    fn simo_matched_filter() {
        // R=2, T=1, H = [1; i], y = [2; 2i]: Hᴴy = 4, HᴴH = 2
        let channel = arr2(&[[c(1.0, 0.0)], [c(0.0, 1.0)]]);
        let rx_symbols = [c(2.0, 0.0), c(0.0, 2.0)];
        let noise_var = 0.1;

        let zf = Equalizer::new(EqualizerKind::Zf, noise_var, 1.0).unwrap();
        let out = zf.equalize(&rx_symbols, &channel).unwrap();
        assert_symbol_close(out.symbols[0], c(2.0, 0.0), 1e-6);
        assert!((f64::from(out.noise_vars[0]) / 0.05 - 1.0).abs() < 1e-6);

        let mmse = Equalizer::new(EqualizerKind::Mmse, noise_var, 1.0).unwrap();
        let out = mmse.equalize(&rx_symbols, &channel).unwrap();
        // MMSE shrinkage pulls the estimate slightly below 2
        assert_symbol_close(out.symbols[0], c(4.0 / 2.1, 0.0), 1e-6);
        // Maximum ratio combining: ν = σ²/(β²·HᴴH)
        assert!((f64::from(out.noise_vars[0]) / 0.05 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zf_singular_channel() {
        // Two identical layers cannot be separated by a ZF equalizer
        let channel = arr2(&[[c(1.0, 0.0), c(1.0, 0.0)], [c(0.0, 1.0), c(0.0, 1.0)]]);
        let rx_symbols = [c(1.0, 0.0), c(0.0, 1.0)];
        let zf = Equalizer::new(EqualizerKind::Zf, 0.1, 1.0).unwrap();
        assert_eq!(
            zf.equalize(&rx_symbols, &channel),
            Err(Error::SingularMatrix)
        );
        // The MMSE regularization keeps the same channel solvable
        let mmse = Equalizer::new(EqualizerKind::Mmse, 0.1, 1.0).unwrap();
        assert!(mmse.equalize(&rx_symbols, &channel).is_ok());
    }

    #[test]
    fn zf_more_layers_than_ports() {
        let channel = arr2(&[[c(1.0, 0.0), c(0.5, 0.5)]]);
        let rx_symbols = [c(1.0, 0.0)];
        let zf = Equalizer::new(EqualizerKind::Zf, 0.1, 1.0).unwrap();
        assert_eq!(
            zf.equalize(&rx_symbols, &channel),
            Err(Error::SingularMatrix)
        );
    }

    #[test]
    fn batch_matches_single_re_calls() {
        let equalizer = Equalizer::new(EqualizerKind::Mmse, 0.2, 1.5).unwrap();
        let channel_a = channel_3x2();
        let channel_b = arr2(&[[c(0.3, -0.1)], [c(1.1, 0.4)], [c(-0.2, 0.9)]]);
        let rx_a = [c(0.9, 0.1), c(-0.2, 0.4), c(0.3, -0.8)];
        let rx_b = [c(-1.0, 0.5), c(0.7, 0.7), c(0.1, -0.3)];
        let res = [
            ResourceElement {
                rx_symbols: &rx_a,
                channel: channel_a.view(),
                noise_var: None,
            },
            ResourceElement {
                rx_symbols: &rx_b,
                channel: channel_b.view(),
                noise_var: Some(0.05),
            },
            ResourceElement {
                rx_symbols: &rx_a,
                channel: channel_a.view(),
                noise_var: Some(0.4),
            },
        ];
        let batch = equalizer.equalize_batch(res).unwrap();
        let single = vec![
            equalizer.equalize(&rx_a, &channel_a).unwrap(),
            equalizer
                .equalize_with_noise_var(&rx_b, &channel_b, 0.05)
                .unwrap(),
            equalizer
                .equalize_with_noise_var(&rx_a, &channel_a, 0.4)
                .unwrap(),
        ];
        assert_eq!(batch, single);
    }

    #[test]
    fn lenient_batch_flags_only_bad_res() {
        let equalizer = Equalizer::new(EqualizerKind::Zf, 0.1, 1.0).unwrap();
        let good = channel_3x2();
        let bad = arr2(&[
            [c(1.0, 0.0), c(1.0, 0.0)],
            [c(0.0, 1.0), c(0.0, 1.0)],
            [c(0.5, 0.5), c(0.5, 0.5)],
        ]);
        let rx = [c(0.9, 0.1), c(-0.2, 0.4), c(0.3, -0.8)];
        let res = [
            ResourceElement {
                rx_symbols: &rx,
                channel: good.view(),
                noise_var: None,
            },
            ResourceElement {
                rx_symbols: &rx,
                channel: bad.view(),
                noise_var: None,
            },
            ResourceElement {
                rx_symbols: &rx,
                channel: good.view(),
                noise_var: None,
            },
        ];
        assert_eq!(
            equalizer.equalize_batch(res),
            Err(Error::SingularMatrix)
        );
        let lenient = equalizer.equalize_batch_lenient(res);
        assert_eq!(lenient.len(), 3);
        assert!(lenient[0].is_ok());
        assert_eq!(lenient[1], Err(Error::SingularMatrix));
        assert!(lenient[2].is_ok());
        assert_eq!(
            lenient[0].as_ref().unwrap(),
            &equalizer.equalize(&rx, &good).unwrap()
        );
    }

    #[test]
    fn invalid_noise_variance() {
        assert_eq!(
            Equalizer::new(EqualizerKind::Mmse, 0.0, 1.0),
            Err(Error::InvalidNoiseVariance)
        );
        assert_eq!(
            Equalizer::new(EqualizerKind::Mmse, -0.1, 1.0),
            Err(Error::InvalidNoiseVariance)
        );
        assert_eq!(
            Equalizer::new(EqualizerKind::Mmse, f64::NAN, 1.0),
            Err(Error::InvalidNoiseVariance)
        );
        assert_eq!(
            Equalizer::new(EqualizerKind::Zf, -0.1, 1.0),
            Err(Error::InvalidNoiseVariance)
        );
        assert!(Equalizer::new(EqualizerKind::Zf, 0.0, 1.0).is_ok());
    }

    #[test]
    fn invalid_scaling() {
        assert_eq!(
            Equalizer::new(EqualizerKind::Mmse, 0.1, 0.0),
            Err(Error::InvalidScaling)
        );
        assert_eq!(
            Equalizer::new(EqualizerKind::Mmse, 0.1, -2.0),
            Err(Error::InvalidScaling)
        );
        assert_eq!(
            Equalizer::new(EqualizerKind::Mmse, 0.1, f64::INFINITY),
            Err(Error::InvalidScaling)
        );
    }

    #[test]
    fn dimension_mismatch() {
        let equalizer = Equalizer::new(EqualizerKind::Mmse, 0.1, 1.0).unwrap();
        let channel = channel_3x2();
        let rx_short = [c(1.0, 0.0), c(0.0, 1.0)];
        assert_eq!(
            equalizer.equalize(&rx_short, &channel),
            Err(Error::DimensionMismatch)
        );
        let empty: Array2<Complex<f32>> = Array2::zeros((0, 0));
        assert_eq!(
            equalizer.equalize(&[], &empty),
            Err(Error::DimensionMismatch)
        );
    }

    #[test]
    fn per_re_noise_variance_override() {
        let channel = channel_3x2();
        let rx = [c(0.9, 0.1), c(-0.2, 0.4), c(0.3, -0.8)];
        let a = Equalizer::new(EqualizerKind::Mmse, 0.5, 1.0).unwrap();
        let b = Equalizer::new(EqualizerKind::Mmse, 0.05, 1.0).unwrap();
        assert_eq!(
            a.equalize_with_noise_var(&rx, &channel, 0.05).unwrap(),
            b.equalize(&rx, &channel).unwrap()
        );
        assert_eq!(
            a.equalize_with_noise_var(&rx, &channel, -1.0),
            Err(Error::InvalidNoiseVariance)
        );
    }

    #[test]
    fn free_function_form() {
        let channel = channel_3x2();
        let rx = [c(0.9, 0.1), c(-0.2, 0.4), c(0.3, -0.8)];
        let equalizer = Equalizer::new(EqualizerKind::Zf, 0.1, 1.0).unwrap();
        assert_eq!(
            equalize(&rx, &channel, EqualizerKind::Zf, 0.1, 1.0).unwrap(),
            equalizer.equalize(&rx, &channel).unwrap()
        );
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("MMSE".parse::<EqualizerKind>(), Ok(EqualizerKind::Mmse));
        assert_eq!("ZF".parse::<EqualizerKind>(), Ok(EqualizerKind::Zf));
        assert!("DFE".parse::<EqualizerKind>().is_err());
        assert_eq!(EqualizerKind::Mmse.to_string(), "MMSE");
        assert_eq!(EqualizerKind::Zf.to_string(), "ZF");
    }
}
