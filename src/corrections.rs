//! Run- and eta-dependent corrections to the TPC electron band
//!
//! The historical implementation kept these as process-wide statics mutated
//! at run boundaries. Here the registry is an explicit value: the caller owns
//! it, refreshes it once per run transition with [`Corrections::set_run`],
//! and hands a shared reference to every evaluation.

use crate::{curve::Curve, numeric::Float};

use serde::{Deserialize, Serialize};

/// Calibration corrections consulted while evaluating TPC electron rules
///
/// All entries are optional; an unset entry contributes nothing. The two
/// per-run scalars are caches, valid for the run last passed to `set_run`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Corrections {
    /// Shift of the TPC electron n-sigma band. Doubles as the run-by-run
    /// lookup table: `set_run` evaluates it at the run id, the evaluator at
    /// the track momentum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    band_shift: Option<Curve>,

    /// Pseudorapidity-dependent shift of the electron n-sigma
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eta_shift: Option<Curve>,

    /// Run-by-run correction of the raw TPC dE/dx signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dedx_run: Option<Curve>,

    /// Cached per-run band correction, refreshed by `set_run`
    #[serde(skip)]
    run_corr: Float,

    /// Cached per-run dE/dx correction, refreshed by `set_run`
    #[serde(skip)]
    run_corr_dedx: Float,
}
//
impl Corrections {
    /// Registry with no corrections configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the TPC electron band-shift curve
    pub fn set_band_shift(&mut self, curve: Curve) {
        self.band_shift = Some(curve);
    }

    /// Currently installed band-shift curve, if any
    pub fn band_shift(&self) -> Option<&Curve> {
        self.band_shift.as_ref()
    }

    /// Install the eta-dependent electron shift
    pub fn set_eta_shift(&mut self, curve: Curve) {
        self.eta_shift = Some(curve);
    }

    /// Currently installed eta shift, if any
    pub fn eta_shift(&self) -> Option<&Curve> {
        self.eta_shift.as_ref()
    }

    /// Install the run-by-run dE/dx correction table
    pub fn set_dedx_run(&mut self, curve: Curve) {
        self.dedx_run = Some(curve);
    }

    /// Currently installed dE/dx correction table, if any
    pub fn dedx_run(&self) -> Option<&Curve> {
        self.dedx_run.as_ref()
    }

    /// Refresh the per-run scalar caches for `run`
    ///
    /// Must be called once per run transition, before evaluating tracks of
    /// that run; the evaluator never calls it itself. A cache whose curve is
    /// unset is reset to zero, so a value from a previous run can never leak
    /// into the next one.
    pub fn set_run(&mut self, run: u32) {
        self.run_corr = self
            .band_shift
            .as_ref()
            .and_then(|curve| curve.eval_clamped(run as Float))
            .unwrap_or(0.0);
        self.run_corr_dedx = self
            .dedx_run
            .as_ref()
            .and_then(|curve| curve.eval_clamped(run as Float))
            .unwrap_or(0.0);
    }

    /// Cached per-run band correction
    pub fn run_corr(&self) -> Float {
        self.run_corr
    }

    /// Cached per-run dE/dx correction, for the caller's dE/dx-derived
    /// variables; the n-sigma evaluator does not consume it
    pub fn run_corr_dedx(&self) -> Float {
        self.run_corr_dedx
    }

    /// Total shift subtracted from a raw TPC electron n-sigma at momentum
    /// `p` and pseudorapidity `eta`
    ///
    /// Correction curves are clamped at the edge of their sampled domain; a
    /// global calibration should degrade gracefully there rather than veto
    /// every track at the ends of the spectrum.
    pub fn electron_shift(&self, p: Float, eta: Float) -> Float {
        let mut shift = self.run_corr;
        if let Some(curve) = &self.band_shift {
            shift += curve.eval_clamped(p).unwrap_or(0.0);
        }
        if let Some(curve) = &self.eta_shift {
            shift += curve.eval_clamped(eta).unwrap_or(0.0);
        }
        shift
    }
}
