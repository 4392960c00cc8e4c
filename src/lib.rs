//! pidcut: n-sigma particle-identification selection cuts
//!
//!
//! # Introduction (for the physicist)
//!
//! Detector PID turns a measured signal into a signed deviation from the
//! value expected for a particle hypothesis, in units of the detector
//! resolution ("n-sigma"). A selection is a handful of bands on those
//! deviations: keep what is compatible with the electron hypothesis in the
//! TPC, veto what is also compatible with a pion, confirm with the TOF, and
//! so on. In real data the electron band drifts with running conditions and
//! pseudorapidity, so the comparison happens after run-by-run and eta
//! corrections.
//!
//!
//! # Introduction (for the computer guy)
//!
//! This crate is the rule engine only. The host analysis framework owns the
//! event loop, the track model and the calibration store; it talks to us
//! through three seams:
//!
//! * a [`Track`](track::Track) capability exposing momentum, eta, n-sigma
//!   values and per-detector PID-status flags,
//! * [`Curve`](curve::Curve)s, the portable form of fitted calibrations,
//! * a [`Corrections`](corrections::Corrections) registry the caller
//!   refreshes at every run transition.
//!
//! Configuration happens first (build a [`SigmaCut`](cut::SigmaCut) by hand,
//! from a [`Preset`](preset::Preset), or from a TOML
//! [`CutConfig`](config::CutConfig)); evaluation is then a pure, re-entrant
//! function of the table, the registry and the track.

#![warn(missing_docs)]

pub mod config;
pub mod corrections;
pub mod curve;
pub mod cut;
pub mod detector;
pub mod error;
pub mod numeric;
pub mod preset;
pub mod stats;
pub mod track;

pub use crate::{
    config::CutConfig,
    corrections::Corrections,
    curve::Curve,
    cut::{Bound, Rule, SigmaCut, DEFAULT_CAPACITY},
    detector::{AuxVar, Detector, PidPolicy, Species},
    error::{Error, Result},
    numeric::Float,
    preset::Preset,
    stats::SelectionStats,
    track::{Track, TrackRecord},
};
