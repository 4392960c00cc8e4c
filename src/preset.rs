//! Named default cut configurations
//!
//! Presets are analysis policy, not algorithm: they live here as plain data
//! tables and are compiled into [`Rule`]s on demand. Numeric ids mirror the
//! historical `SetDefaults` convention so steering macros keep working.

use crate::{
    cut::Rule,
    detector::{Detector, Species},
    error::{Error, Result},
    numeric::Float,
};

/// Identifier of a canned cut configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// TPC electron band with pion and proton rejection
    TpcElectron,
    /// TOF-confirmed electron with a TPC band and pion rejection
    TpcTofElectron,
}
//
impl Preset {
    /// Resolve a numeric preset id
    pub fn from_id(id: i32) -> Result<Self> {
        match id {
            0 => Ok(Preset::TpcElectron),
            1 => Ok(Preset::TpcTofElectron),
            other => Err(Error::UnknownPreset(other)),
        }
    }

    /// Build the preset's rules, in evaluation order
    pub fn rules(self) -> Vec<Rule> {
        self.table().iter().map(PresetRule::to_rule).collect()
    }

    fn table(self) -> &'static [PresetRule] {
        match self {
            Preset::TpcElectron => TPC_ELECTRON,
            Preset::TpcTofElectron => TPC_TOF_ELECTRON,
        }
    }
}

/// One line of a preset table
struct PresetRule {
    detector: Detector,
    species: Species,
    lower: Float,
    upper: Float,
    exclude: bool,
}
//
impl PresetRule {
    fn to_rule(&self) -> Rule {
        let rule = Rule::band(self.detector, self.species, self.lower, self.upper);
        if self.exclude {
            rule.excluding()
        } else {
            rule
        }
    }
}

const TPC_ELECTRON: &[PresetRule] = &[
    PresetRule {
        detector: Detector::Tpc,
        species: Species::Electron,
        lower: -3.0,
        upper: 3.0,
        exclude: false,
    },
    PresetRule {
        detector: Detector::Tpc,
        species: Species::Pion,
        lower: -3.0,
        upper: 3.0,
        exclude: true,
    },
    PresetRule {
        detector: Detector::Tpc,
        species: Species::Proton,
        lower: -3.0,
        upper: 3.0,
        exclude: true,
    },
];

const TPC_TOF_ELECTRON: &[PresetRule] = &[
    PresetRule {
        detector: Detector::Tof,
        species: Species::Electron,
        lower: -3.0,
        upper: 3.0,
        exclude: false,
    },
    PresetRule {
        detector: Detector::Tpc,
        species: Species::Electron,
        lower: -0.5,
        upper: 3.0,
        exclude: false,
    },
    PresetRule {
        detector: Detector::Tpc,
        species: Species::Pion,
        lower: Float::NEG_INFINITY,
        upper: 3.5,
        exclude: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{corrections::Corrections, cut::SigmaCut, track::TrackRecord};

    #[test]
    fn numeric_ids_resolve_like_the_historical_defaults() {
        assert_eq!(Preset::from_id(0).unwrap(), Preset::TpcElectron);
        assert_eq!(Preset::from_id(1).unwrap(), Preset::TpcTofElectron);
        assert!(matches!(Preset::from_id(7), Err(Error::UnknownPreset(7))));
    }

    #[test]
    fn tpc_electron_preset_keeps_electrons_and_drops_pions() {
        let mut cut = SigmaCut::new();
        cut.set_defaults(Preset::TpcElectron).unwrap();
        assert_eq!(cut.len(), 3);
        let corr = Corrections::new();

        // A clean electron: on the electron band, far from pions and protons
        let mut electron = TrackRecord::new(1.0, 0.0);
        electron.set_n_sigma(Detector::Tpc, Species::Electron, 0.2);
        electron.set_n_sigma(Detector::Tpc, Species::Pion, 6.5);
        electron.set_n_sigma(Detector::Tpc, Species::Proton, 8.0);
        assert!(cut.is_selected(&electron, &corr).unwrap());

        // A pion: compatible with both hypotheses, the veto wins
        let mut pion = TrackRecord::new(1.0, 0.0);
        pion.set_n_sigma(Detector::Tpc, Species::Electron, -2.0);
        pion.set_n_sigma(Detector::Tpc, Species::Pion, 0.1);
        pion.set_n_sigma(Detector::Tpc, Species::Proton, 9.0);
        assert!(!cut.is_selected(&pion, &corr).unwrap());
    }

    #[test]
    fn set_defaults_replaces_previous_rules() {
        let mut cut = SigmaCut::new();
        cut.add_cut(Rule::band(Detector::Emcal, Species::Electron, -1.0, 1.0))
            .unwrap();
        cut.set_defaults(Preset::TpcTofElectron).unwrap();
        assert_eq!(cut.len(), 3);
        assert!(cut.rules().iter().all(|rule| rule.detector != Detector::Emcal));
    }
}
