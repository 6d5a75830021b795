//! MSE test CLI subcommand.
//!
//! This subcommand measures the mean square error and the symbol error rate
//! at the output of the MIMO equalizer over random Rayleigh channels,
//! sweeping a range of SNRs. The measured MSE is reported next to the mean
//! noise variance predicted by the equalizer.
//!
//! # Examples
//!
//! A 2x2 MMSE sweep between 0 and 20 dB can be run with
//! ```shell
//! $ mimo-toolbox mse --rx-ports 2 --tx-layers 2 \
//!       --min-snr 0 --max-snr 20 --step-snr 2
//! ```

use crate::{
    cli::*,
    equalizer::EqualizerKind,
    simulation::mse::{MseTest, MseTestParameters, Statistics},
};
use clap::Parser;
use console::Term;
use std::{error::Error, io::Write, time::Duration};

/// MSE test CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Measures post-equalization MSE over random channels")]
pub struct Args {
    /// Equalizer kind
    #[arg(long, default_value_t = EqualizerKind::Mmse)]
    equalizer: EqualizerKind,
    /// Number of receive antenna ports
    #[arg(long, default_value = "2")]
    rx_ports: usize,
    /// Number of transmit layers
    #[arg(long, default_value = "2")]
    tx_layers: usize,
    /// Transmit scaling factor
    #[arg(long, default_value = "1.0")]
    tx_scaling: f64,
    /// Minimum SNR (dB)
    #[arg(long)]
    min_snr: f64,
    /// Maximum SNR (dB)
    #[arg(long)]
    max_snr: f64,
    /// SNR step (dB)
    #[arg(long, default_value = "1.0")]
    step_snr: f64,
    /// Number of resource elements per SNR point
    #[arg(long, default_value = "100000")]
    num_res: u64,
    /// Seed of the random generator
    #[arg(long, default_value = "0")]
    seed: u64,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let num_snrs = ((self.max_snr - self.min_snr) / self.step_snr).floor() as usize + 1;
        let snrs = (0..num_snrs)
            .map(|k| (self.min_snr + k as f64 * self.step_snr) as f32)
            .collect::<Vec<_>>();
        let test = MseTest::new(&MseTestParameters {
            kind: self.equalizer,
            rx_ports: self.rx_ports,
            tx_layers: self.tx_layers,
            tx_scaling: self.tx_scaling,
            snrs_db: &snrs,
            res_per_snr: self.num_res,
            seed: self.seed,
        })?;
        self.write_details(std::io::stdout())?;

        let term = Term::stdout();
        ctrlc::set_handler({
            let term = term.clone();
            move || {
                let _ = term.write_line("");
                let _ = term.show_cursor();
                std::process::exit(0);
            }
        })?;
        term.set_title("mimo-toolbox mse");
        term.hide_cursor()?;
        term.write_line(Self::format_header())?;
        for index in 0..num_snrs {
            let stats = test.run_point(index);
            term.write_line(&Self::format_row(&stats))?;
        }
        term.show_cursor()?;
        Ok(())
    }
}

impl Args {
    fn write_details<W: Write>(&self, mut f: W) -> std::io::Result<()> {
        writeln!(f, "MSE TEST PARAMETERS")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Equalizer:")?;
        writeln!(f, " - Kind: {}", self.equalizer)?;
        writeln!(f, " - Tx scaling: {:.3}", self.tx_scaling)?;
        writeln!(f, "Channel:")?;
        writeln!(f, " - Rx ports: {}", self.rx_ports)?;
        writeln!(f, " - Tx layers: {}", self.tx_layers)?;
        writeln!(f, "Simulation:")?;
        writeln!(f, " - Minimum SNR: {:.2} dB", self.min_snr)?;
        writeln!(f, " - Maximum SNR: {:.2} dB", self.max_snr)?;
        writeln!(f, " - SNR step: {:.2} dB", self.step_snr)?;
        writeln!(f, " - Resource elements per SNR: {}", self.num_res)?;
        writeln!(f, " - Seed: {}", self.seed)?;
        writeln!(f)?;
        Ok(())
    }

    fn format_header() -> &'static str {
        "    SNR |      REs |  Skipped |     MSE | Predict |  Sym err |     SER | Throughp | Elapsed\n\
         --------|----------|----------|---------|---------|----------|---------|----------|----------"
    }

    fn format_row(stats: &Statistics) -> String {
        format!(
            "{:7.2} | {:8} | {:8} | {:7.2e} | {:7.2e} | {:8} | {:7.2e} | {:8.3} | {}",
            stats.snr_db,
            stats.num_res,
            stats.skipped,
            stats.mse,
            stats.predicted_mse,
            stats.symbol_errors,
            stats.ser,
            stats.throughput_mres,
            humantime::format_duration(Duration::from_secs(stats.elapsed.as_secs()))
        )
    }
}
