//! Track-side collaborator interface
//!
//! The host framework owns the event model; the cut machinery only ever sees
//! tracks through the small capability below. `TrackRecord` is a plain owned
//! snapshot of the same quantities, enough for tests and offline inspection.

use crate::{
    detector::{AuxVar, Detector, Species, NUM_DETECTORS, NUM_SPECIES},
    numeric::Float,
};

/// Read-only view of one reconstructed track
pub trait Track {
    /// Reconstructed total momentum (GeV/c), at whatever reference point the
    /// framework chose; curve-shaped bounds are evaluated at this value
    fn momentum(&self) -> Float;

    /// Track pseudorapidity
    fn eta(&self) -> Float;

    /// Signed deviation of the measured `detector` response from the value
    /// expected for `species`, in units of the detector resolution
    fn n_sigma(&self, detector: Detector, species: Species) -> Float;

    /// Whether `detector` recorded a usable PID signal for this track
    fn has_pid_signal(&self, detector: Detector) -> bool;

    /// General track variable, `None` when this source does not provide it
    fn aux_value(&self, var: AuxVar) -> Option<Float>;
}

/// Owned snapshot of the track quantities the cut machinery consumes
#[derive(Debug, Clone)]
pub struct TrackRecord {
    /// Total momentum (GeV/c)
    pub p: Float,
    /// Transverse momentum (GeV/c)
    pub pt: Float,
    /// Pseudorapidity
    pub eta: Float,
    /// Azimuthal angle
    pub phi: Float,
    /// Raw TPC dE/dx signal
    pub tpc_signal: Float,
    n_sigma: [[Float; NUM_SPECIES]; NUM_DETECTORS],
    pid_status: [bool; NUM_DETECTORS],
}
//
impl TrackRecord {
    /// Track with the given kinematics, no PID signal anywhere yet
    pub fn new(p: Float, eta: Float) -> Self {
        TrackRecord {
            p,
            pt: p,
            eta,
            phi: 0.0,
            tpc_signal: 0.0,
            n_sigma: [[0.0; NUM_SPECIES]; NUM_DETECTORS],
            pid_status: [false; NUM_DETECTORS],
        }
    }

    /// Store one detector's deviation for one hypothesis and mark the
    /// detector's signal as usable
    pub fn set_n_sigma(&mut self, detector: Detector, species: Species, value: Float) {
        self.n_sigma[detector as usize][species as usize] = value;
        self.pid_status[detector as usize] = true;
    }

    /// Override the availability flag of one detector's PID signal
    pub fn set_pid_signal(&mut self, detector: Detector, available: bool) {
        self.pid_status[detector as usize] = available;
    }
}

impl Track for TrackRecord {
    fn momentum(&self) -> Float {
        self.p
    }

    fn eta(&self) -> Float {
        self.eta
    }

    fn n_sigma(&self, detector: Detector, species: Species) -> Float {
        self.n_sigma[detector as usize][species as usize]
    }

    fn has_pid_signal(&self, detector: Detector) -> bool {
        self.pid_status[detector as usize]
    }

    fn aux_value(&self, var: AuxVar) -> Option<Float> {
        let value = match var {
            AuxVar::P => self.p,
            AuxVar::Pt => self.pt,
            AuxVar::Eta => self.eta,
            AuxVar::Phi => self.phi,
            AuxVar::TpcSignal => self.tpc_signal,
        };
        Some(value)
    }
}
