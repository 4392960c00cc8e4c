//! Command-line inspector for n-sigma PID cut configurations
//!
//! Thin shell around the library: load a TOML cut description, report what
//! it means. The actual per-track evaluation belongs to whatever analysis
//! framework embeds the library; this binary exists so a selection can be
//! reviewed without one.

mod cli;

use anyhow::Context;
use clap::Parser;
use pidcut::{Corrections, CutConfig, Detector, Float, SigmaCut, Species};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

/// We'll use anyhow's type-erased result type at the binary surface
type Result<T> = anyhow::Result<T>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Show { config } => {
            let config = CutConfig::load(&config)
                .with_context(|| format!("Failed to load the cut configuration {:?}", config))?;
            let (cut, corrections) = config.build().context("Invalid cut configuration")?;
            show(&cut, &corrections);
        }
        Command::Band {
            config,
            run,
            eta,
            p_min,
            p_max,
            steps,
        } => {
            let config = CutConfig::load(&config)
                .with_context(|| format!("Failed to load the cut configuration {:?}", config))?;
            let (cut, mut corrections) = config.build().context("Invalid cut configuration")?;
            corrections.set_run(run);
            band(&cut, &corrections, run, eta as Float, p_min as Float, p_max as Float, steps)?;
        }
    }

    Ok(())
}

/// Print the rule table and the configured corrections
fn show(cut: &SigmaCut, corrections: &Corrections) {
    println!("{} rule(s), capacity {}", cut.len(), cut.capacity());
    for (index, rule) in cut.rules().iter().enumerate() {
        println!("  #{:<2} {}", index, rule);
    }
    println!();
    println!(
        "band shift curve : {}",
        if corrections.band_shift().is_some() { "set" } else { "unset" }
    );
    println!(
        "eta shift curve  : {}",
        if corrections.eta_shift().is_some() { "set" } else { "unset" }
    );
    println!(
        "dE/dx run curve  : {}",
        if corrections.dedx_run().is_some() { "set" } else { "unset" }
    );
}

/// Tabulate the effective TPC electron band limits against momentum
///
/// A raw deviation n passes a corrected band [low, high] when
/// low <= n - shift <= high, so the acceptance window on the raw value is
/// [low + shift, high + shift]; that window is what gets printed.
fn band(
    cut: &SigmaCut,
    corrections: &Corrections,
    run: u32,
    eta: Float,
    p_min: Float,
    p_max: Float,
    steps: usize,
) -> Result<()> {
    anyhow::ensure!(steps >= 2, "Please tabulate at least two momentum points");
    anyhow::ensure!(p_min < p_max, "Empty momentum range");

    let electron_rules: Vec<_> = cut
        .rules()
        .iter()
        .filter(|rule| rule.detector == Detector::Tpc && rule.species == Species::Electron)
        .collect();
    if electron_rules.is_empty() {
        println!("No TPC electron rule in this table");
        return Ok(());
    }

    println!(
        "run {}, eta {}, per-run correction {:+.4}",
        run,
        eta,
        corrections.run_corr()
    );
    print!("{:>8}", "p");
    for index in 0..electron_rules.len() {
        print!("{:>12}", format!("low#{}", index));
        print!("{:>12}", format!("high#{}", index));
    }
    println!();

    for step in 0..steps {
        let p = p_min + (p_max - p_min) * (step as Float) / ((steps - 1) as Float);
        let shift = corrections.electron_shift(p, eta);
        print!("{:>8.3}", p);
        for rule in &electron_rules {
            match (rule.lower.eval(p), rule.upper.eval(p)) {
                (Some(low), Some(high)) => {
                    print!("{:>12.3}{:>12.3}", low + shift, high + shift);
                }
                // A curve limit with nothing to say here fails the rule
                _ => print!("{:>12}{:>12}", "-", "-"),
            }
        }
        println!();
    }

    Ok(())
}
