//! Detector subsystems, particle hypotheses and per-rule policies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of detector subsystems that can carry an n-sigma rule
pub const NUM_DETECTORS: usize = 6;

/// Number of supported particle hypotheses
pub const NUM_SPECIES: usize = 5;

/// Detector subsystem whose PID signal a rule tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Detector {
    /// Inner Tracking System dE/dx
    Its,
    /// Time Projection Chamber dE/dx
    Tpc,
    /// Transition Radiation Detector likelihood
    Trd,
    /// TRD electron efficiency working point
    TrdEleEff,
    /// Time Of Flight
    Tof,
    /// Electromagnetic calorimeter E/p
    Emcal,
}
//
impl Detector {
    /// All subsystems, in storage order
    pub const ALL: [Detector; NUM_DETECTORS] = [
        Detector::Its,
        Detector::Tpc,
        Detector::Trd,
        Detector::TrdEleEff,
        Detector::Tof,
        Detector::Emcal,
    ];
}

impl fmt::Display for Detector {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Detector::Its => "ITS",
            Detector::Tpc => "TPC",
            Detector::Trd => "TRD",
            Detector::TrdEleEff => "TRDeleEff",
            Detector::Tof => "TOF",
            Detector::Emcal => "EMCAL",
        };
        write!(fmt, "{}", name)
    }
}

/// Particle hypothesis whose expected signal the deviation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Species {
    Electron,
    Muon,
    Pion,
    Kaon,
    Proton,
}
//
impl Species {
    /// All hypotheses, in storage order
    pub const ALL: [Species; NUM_SPECIES] = [
        Species::Electron,
        Species::Muon,
        Species::Pion,
        Species::Kaon,
        Species::Proton,
    ];
}

impl fmt::Display for Species {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Electron => "electron",
            Species::Muon => "muon",
            Species::Pion => "pion",
            Species::Kaon => "kaon",
            Species::Proton => "proton",
        };
        write!(fmt, "{}", name)
    }
}

/// How a rule consults the track's per-detector PID-status flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PidPolicy {
    /// Never look at the flag
    Ignore,
    /// The rule fails outright when no usable signal exists
    #[default]
    Require,
    /// The rule is skipped (counts as passed) when no usable signal exists
    IfAvailable,
}

/// General track variable usable as the gated quantity of a rule's
/// applicability window, in place of the momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuxVar {
    /// Total momentum
    P,
    /// Transverse momentum
    Pt,
    /// Pseudorapidity
    Eta,
    /// Azimuthal angle
    Phi,
    /// Raw TPC dE/dx signal
    TpcSignal,
}

impl fmt::Display for AuxVar {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuxVar::P => "p",
            AuxVar::Pt => "pt",
            AuxVar::Eta => "eta",
            AuxVar::Phi => "phi",
            AuxVar::TpcSignal => "tpc-signal",
        };
        write!(fmt, "{}", name)
    }
}
