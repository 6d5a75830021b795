//! MSE simulation.
//!
//! This module contains utilities to measure the post-equalization error of
//! the MIMO equalizer over a random fading channel. For each SNR point of a
//! dB grid, a number of independent resource elements are simulated: a
//! Rayleigh channel realization, one unit-power QPSK symbol per transmit
//! layer, and AWGN of the variance corresponding to the SNR point. Each RE is
//! equalized and the measured symbol error is accumulated together with the
//! noise variance predicted by the equalizer, which makes it easy to check
//! that the prediction tracks the measurement.
//!
//! The SNR is defined per transmit layer and receive port: the ratio between
//! the received power of one layer through a unit-gain channel coefficient
//! and the total noise variance.
//!
//! The resource elements of an SNR point are processed in parallel with
//! rayon. Every RE draws its randomness from its own ChaCha stream of the
//! seeded generator, so the results do not depend on the number of worker
//! threads.

use super::{
    channel::{AwgnChannel, RayleighChannel},
    modulation::QpskModulator,
};
use crate::{
    equalizer::{Equalizer, EqualizerKind, Error},
    rand::{Rng, SeedableRng},
};
use num_complex::Complex;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// MSE test.
///
/// This struct is used to configure and run an MSE sweep.
#[derive(Debug, Clone)]
pub struct MseTest {
    kind: EqualizerKind,
    rx_ports: usize,
    tx_layers: usize,
    tx_scaling: f64,
    snrs_db: Vec<f32>,
    res_per_snr: u64,
    seed: u64,
}

/// MSE test parameters.
///
/// This struct contains the parameters needed to define an MSE test.
#[derive(Debug, Clone)]
pub struct MseTestParameters<'a> {
    /// Equalizer kind.
    pub kind: EqualizerKind,
    /// Number of receive antenna ports.
    pub rx_ports: usize,
    /// Number of transmit layers.
    pub tx_layers: usize,
    /// Transmit scaling factor (data amplitude relative to the reference the
    /// channel estimate is normalized to).
    pub tx_scaling: f64,
    /// SNR points in dB units.
    pub snrs_db: &'a [f32],
    /// Number of resource elements simulated per SNR point.
    pub res_per_snr: u64,
    /// Seed of the random generator.
    pub seed: u64,
}

/// MSE test statistics.
///
/// This structure contains the statistics for a single SNR point in an MSE
/// test.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// SNR in dB units.
    pub snr_db: f32,
    /// Number of resource elements simulated.
    pub num_res: u64,
    /// Number of resource elements skipped because equalization failed.
    pub skipped: u64,
    /// Measured mean square error of the equalized symbols.
    ///
    /// Zero if every resource element was skipped.
    pub mse: f64,
    /// Mean post-equalization noise variance predicted by the equalizer.
    ///
    /// Zero if every resource element was skipped.
    pub predicted_mse: f64,
    /// Number of symbol errors after hard decision.
    pub symbol_errors: u64,
    /// Symbol error rate.
    ///
    /// Zero if every resource element was skipped.
    pub ser: f64,
    /// Elapsed time for this SNR point.
    pub elapsed: Duration,
    /// Throughput in millions of resource elements per second.
    pub throughput_mres: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct PointAccumulator {
    equalized_res: u64,
    skipped: u64,
    error_power: f64,
    predicted: f64,
    symbol_errors: u64,
}

impl PointAccumulator {
    fn merge(self, other: PointAccumulator) -> PointAccumulator {
        PointAccumulator {
            equalized_res: self.equalized_res + other.equalized_res,
            skipped: self.skipped + other.skipped,
            error_power: self.error_power + other.error_power,
            predicted: self.predicted + other.predicted,
            symbol_errors: self.symbol_errors + other.symbol_errors,
        }
    }
}

impl MseTest {
    /// Creates a new MSE test.
    ///
    /// This function only defines the test. To run it it is necessary to call
    /// the [`run`](MseTest::run) method.
    pub fn new(parameters: &MseTestParameters) -> Result<MseTest, Error> {
        if parameters.rx_ports == 0 || parameters.tx_layers == 0 {
            return Err(Error::DimensionMismatch);
        }
        if !(parameters.tx_scaling.is_finite() && parameters.tx_scaling > 0.0) {
            return Err(Error::InvalidScaling);
        }
        Ok(MseTest {
            kind: parameters.kind,
            rx_ports: parameters.rx_ports,
            tx_layers: parameters.tx_layers,
            tx_scaling: parameters.tx_scaling,
            snrs_db: parameters.snrs_db.to_owned(),
            res_per_snr: parameters.res_per_snr,
            seed: parameters.seed,
        })
    }

    /// Returns the SNR points of the test in dB units.
    pub fn snrs_db(&self) -> &[f32] {
        &self.snrs_db
    }

    /// Runs the MSE test until completion.
    ///
    /// Returns a list of statistics for each SNR point.
    pub fn run(&self) -> Vec<Statistics> {
        (0..self.snrs_db.len()).map(|j| self.run_point(j)).collect()
    }

    /// Runs a single SNR point of the test.
    ///
    /// The index refers to the list of SNR points the test was defined with.
    /// Points are independent of each other; this entry point can be used to
    /// report results as they complete.
    ///
    /// # Panics
    ///
    /// This function panics if `index` is out of range.
    pub fn run_point(&self, index: usize) -> Statistics {
        let snr_db = self.snrs_db[index];
        let start = Instant::now();
        let snr = 10.0_f64.powf(0.1 * f64::from(snr_db));
        let noise_var = self.tx_scaling * self.tx_scaling / snr;
        let equalizer = Equalizer::new(self.kind, noise_var, self.tx_scaling).unwrap();
        let awgn = AwgnChannel::new(noise_var);
        let rayleigh = RayleighChannel::new(self.rx_ports, self.tx_layers);
        let acc = (0..self.res_per_snr)
            .into_par_iter()
            .map(|re_index| {
                let mut rng = Rng::seed_from_u64(self.seed);
                rng.set_stream((index as u64) << 32 | re_index);
                self.simulate_re(&mut rng, &equalizer, &awgn, &rayleigh)
            })
            .reduce(PointAccumulator::default, PointAccumulator::merge);
        Statistics::from_accumulator(&acc, snr_db, self.res_per_snr, self.tx_layers, start)
    }

    fn simulate_re(
        &self,
        rng: &mut Rng,
        equalizer: &Equalizer,
        awgn: &AwgnChannel,
        rayleigh: &RayleighChannel,
    ) -> PointAccumulator {
        let mut acc = PointAccumulator::default();
        let channel = rayleigh.sample(rng);
        let tx_symbols = QpskModulator::random_symbols(rng, self.tx_layers);
        let tx_scaling = self.tx_scaling as f32;
        let mut rx_symbols: Vec<Complex<f32>> = (0..self.rx_ports)
            .map(|i| {
                tx_symbols
                    .iter()
                    .enumerate()
                    .map(|(t, &x)| channel[[i, t]] * x * tx_scaling)
                    .sum()
            })
            .collect();
        awgn.add_noise(rng, &mut rx_symbols);
        match equalizer.equalize(&rx_symbols, &channel) {
            Err(_) => acc.skipped = 1,
            Ok(out) => {
                acc.equalized_res = 1;
                for t in 0..self.tx_layers {
                    let error = out.symbols[t] - tx_symbols[t];
                    acc.error_power += f64::from(error.norm_sqr());
                    acc.predicted += f64::from(out.noise_vars[t]);
                    if QpskModulator::hard_decision(out.symbols[t])
                        != QpskModulator::hard_decision(tx_symbols[t])
                    {
                        acc.symbol_errors += 1;
                    }
                }
            }
        }
        acc
    }
}

impl Statistics {
    fn from_accumulator(
        acc: &PointAccumulator,
        snr_db: f32,
        num_res: u64,
        tx_layers: usize,
        start: Instant,
    ) -> Statistics {
        let elapsed = Instant::now() - start;
        let layers_measured = acc.equalized_res * tx_layers as u64;
        let normalize = |x: f64| {
            if layers_measured == 0 {
                0.0
            } else {
                x / layers_measured as f64
            }
        };
        Statistics {
            snr_db,
            num_res,
            skipped: acc.skipped,
            mse: normalize(acc.error_power),
            predicted_mse: normalize(acc.predicted),
            symbol_errors: acc.symbol_errors,
            ser: normalize(acc.symbol_errors as f64),
            elapsed,
            throughput_mres: 1e-6 * num_res as f64 / elapsed.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parameters<'a>(snrs_db: &'a [f32], res_per_snr: u64) -> MseTestParameters<'a> {
        MseTestParameters {
            kind: EqualizerKind::Mmse,
            rx_ports: 4,
            tx_layers: 2,
            tx_scaling: 1.0,
            snrs_db,
            res_per_snr,
            seed: 0,
        }
    }

    #[test]
    fn prediction_tracks_measurement() {
        let snrs = [10.0];
        let test = MseTest::new(&parameters(&snrs, 5000)).unwrap();
        let stats = test.run_point(0);
        assert_eq!(stats.num_res, 5000);
        assert_eq!(stats.skipped, 0);
        assert!(stats.mse > 0.0);
        // Predicted and measured MSE agree within Monte Carlo noise
        assert!((stats.mse / stats.predicted_mse - 1.0).abs() < 0.4);
        // At 10 dB with 4 ports and 2 layers most symbols are correct
        assert!(stats.ser < 0.1);
    }

    #[test]
    fn reproducible_given_seed() {
        let snrs = [5.0, 15.0];
        let test = MseTest::new(&parameters(&snrs, 500)).unwrap();
        let a = test.run();
        let b = test.run();
        assert_eq!(a.len(), 2);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.symbol_errors, y.symbol_errors);
            assert_eq!(x.skipped, y.skipped);
            // Floating point sums may be reduced in a different order
            assert!((x.mse - y.mse).abs() <= 1e-9 * x.mse.abs());
            assert!((x.predicted_mse - y.predicted_mse).abs() <= 1e-9 * x.predicted_mse.abs());
        }
    }

    #[test]
    fn invalid_parameters() {
        let snrs = [0.0];
        let mut bad = parameters(&snrs, 10);
        bad.tx_layers = 0;
        assert!(matches!(MseTest::new(&bad), Err(Error::DimensionMismatch)));
        let mut bad = parameters(&snrs, 10);
        bad.tx_scaling = 0.0;
        assert!(matches!(MseTest::new(&bad), Err(Error::InvalidScaling)));
    }
}
