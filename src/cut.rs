//! Mechanism to apply n-sigma selection rules to reconstructed tracks
//!
//! A [`SigmaCut`] is an ordered table of [`Rule`]s. Every rule binds one
//! detector subsystem and one particle hypothesis to a sigma band; a track is
//! selected when it passes all of them. Band limits are either fixed sigma
//! values or momentum-dependent curves, and the TPC electron band picks up
//! the corrections of an externally owned [`Corrections`] registry.

use crate::{
    corrections::Corrections,
    curve::Curve,
    detector::{AuxVar, Detector, PidPolicy, Species},
    error::{Error, Result},
    numeric::{Float, NO_UPPER_BOUND},
    preset::Preset,
    stats::SelectionStats,
    track::Track,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Default soft limit on the number of rules in one table
///
/// Historical analyses never needed more than this many simultaneous bands;
/// tables that do can be built with [`SigmaCut::with_capacity`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Lower or upper limit of a sigma band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// Fixed number of sigmas
    Value(Float),
    /// Momentum-dependent limit
    Curve(Curve),
}
//
impl Bound {
    /// Effective limit for a track of momentum `p`
    ///
    /// `None` when a curve-shaped limit has nothing to say at this momentum;
    /// the evaluator turns that into a failed rule.
    pub fn eval(&self, p: Float) -> Option<Float> {
        match self {
            Bound::Value(value) => Some(*value),
            Bound::Curve(curve) => curve.eval(p),
        }
    }
}

impl From<Float> for Bound {
    fn from(value: Float) -> Self {
        Bound::Value(value)
    }
}

impl From<Curve> for Bound {
    fn from(curve: Curve) -> Self {
        Bound::Curve(curve)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Value(value) => write!(fmt, "{}", value),
            Bound::Curve(_) => write!(fmt, "f(p)"),
        }
    }
}

/// One selection rule: a sigma band for one detector and one hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Detector subsystem whose signal is tested
    pub detector: Detector,
    /// Particle hypothesis the deviation refers to
    pub species: Species,
    /// Lower band limit
    pub lower: Bound,
    /// Upper band limit; defaults to the open upper end
    #[serde(default = "Rule::open_upper")]
    pub upper: Bound,
    /// Applicability window: the rule only applies to tracks whose momentum
    /// (or `aux` variable, when set) lies inside it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(Float, Float)>,
    /// Reject tracks inside the band instead of keeping them
    #[serde(default)]
    pub exclude: bool,
    /// How the detector's PID-status flag is consulted
    #[serde(default)]
    pub policy: PidPolicy,
    /// Variable gated by `range` in place of the momentum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<AuxVar>,
}
//
impl Rule {
    /// Band keeping tracks with `lower <= nsigma <= upper`
    pub fn band(
        detector: Detector,
        species: Species,
        lower: impl Into<Bound>,
        upper: impl Into<Bound>,
    ) -> Self {
        Rule {
            detector,
            species,
            lower: lower.into(),
            upper: upper.into(),
            range: None,
            exclude: false,
            policy: PidPolicy::default(),
            aux: None,
        }
    }

    /// One-sided cut keeping tracks with `lower <= nsigma`
    pub fn above(detector: Detector, species: Species, lower: impl Into<Bound>) -> Self {
        Self::band(detector, species, lower, NO_UPPER_BOUND)
    }

    /// Restrict the rule to tracks whose gated variable lies in `[min, max]`
    pub fn in_range(mut self, min: Float, max: Float) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Gate the applicability window on `var` instead of the momentum
    pub fn gated_by(mut self, var: AuxVar) -> Self {
        self.aux = Some(var);
        self
    }

    /// Turn the band into an exclusion band
    pub fn excluding(mut self) -> Self {
        self.exclude = true;
        self
    }

    /// Override the PID-status policy
    pub fn with_policy(mut self, policy: PidPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn open_upper() -> Bound {
        Bound::Value(NO_UPPER_BOUND)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclude {
            write!(fmt, "{} {} veto ({}, {})", self.detector, self.species, self.lower, self.upper)?;
        } else {
            write!(fmt, "{} {} band [{}, {}]", self.detector, self.species, self.lower, self.upper)?;
        }
        if let Some((min, max)) = self.range {
            let gated = match self.aux {
                Some(var) => var.to_string(),
                None => "p".to_string(),
            };
            write!(fmt, " for {} in [{}, {}]", gated, min, max)?;
        }
        match self.policy {
            PidPolicy::Require => {}
            PidPolicy::Ignore => write!(fmt, " (status ignored)")?,
            PidPolicy::IfAvailable => write!(fmt, " (if available)")?,
        }
        Ok(())
    }
}

/// Ordered table of n-sigma selection rules, combined with a logical AND
///
/// Rules are evaluated in insertion order. There is no OR-combination across
/// detectors here; callers wanting one assemble several tables themselves.
#[derive(Debug, Clone, Default)]
pub struct SigmaCut {
    rules: Vec<Rule>,
    capacity: usize,
}
//
impl SigmaCut {
    /// Empty table with the default rule-count limit
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty table with a custom rule-count limit
    pub fn with_capacity(capacity: usize) -> Self {
        SigmaCut {
            rules: Vec::new(),
            capacity,
        }
    }

    /// Append a rule at the end of the evaluation order
    ///
    /// Fails with [`Error::CapacityExceeded`] on a full table, leaving the
    /// stored rules untouched.
    pub fn add_cut(&mut self, rule: Rule) -> Result<()> {
        if self.rules.len() >= self.capacity {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Replace the table contents with a named preset configuration
    pub fn set_defaults(&mut self, preset: Preset) -> Result<()> {
        self.rules.clear();
        for rule in preset.rules() {
            self.add_cut(rule)?;
        }
        Ok(())
    }

    /// Stored rules, in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of stored rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table holds no rule at all (and thus selects everything)
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule-count limit of this table
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Decide whether a track passes every rule of the table
    ///
    /// Pure function of the table, the correction registry and the track;
    /// the registry must have been refreshed for the track's run via
    /// [`Corrections::set_run`] by the caller driving the event loop.
    pub fn is_selected(&self, track: &impl Track, corrections: &Corrections) -> Result<bool> {
        for rule in &self.rules {
            if !self.passes(rule, track, corrections)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like [`SigmaCut::is_selected`], additionally updating acceptance
    /// counters; evaluates every rule instead of stopping at the first
    /// failure so that per-rule efficiencies stay unbiased
    pub fn is_selected_counted(
        &self,
        track: &impl Track,
        corrections: &Corrections,
        stats: &mut SelectionStats,
    ) -> Result<bool> {
        let mut selected = true;
        let mut passed = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let pass = self.passes(rule, track, corrections)?;
            passed.push(pass);
            selected &= pass;
        }
        stats.record(&passed, selected);
        Ok(selected)
    }

    /// Evaluate a single rule for one track
    fn passes(&self, rule: &Rule, track: &impl Track, corrections: &Corrections) -> Result<bool> {
        // Applicability window: a rule outside its window never blocks
        if let Some((min, max)) = rule.range {
            let gated = match rule.aux {
                Some(var) => track.aux_value(var).ok_or_else(|| {
                    Error::MissingCollaborator(format!("track variable {}", var))
                })?,
                None => track.momentum(),
            };
            if gated < min || gated > max {
                return Ok(true);
            }
        }

        // PID-status flag
        match rule.policy {
            PidPolicy::Ignore => {}
            PidPolicy::Require => {
                if !track.has_pid_signal(rule.detector) {
                    // No usable signal: the inclusion rule fails outright,
                    // the exclusion band counts as "outside the band"
                    return Ok(rule.exclude);
                }
            }
            PidPolicy::IfAvailable => {
                if !track.has_pid_signal(rule.detector) {
                    return Ok(true);
                }
            }
        }

        let p = track.momentum();
        let mut n_sigma = track.n_sigma(rule.detector, rule.species);

        // Only the TPC electron band carries the calibration corrections
        if rule.detector == Detector::Tpc && rule.species == Species::Electron {
            n_sigma -= corrections.electron_shift(p, track.eta());
        }

        let lower = match rule.lower.eval(p) {
            Some(limit) => limit,
            None => {
                warn!(rule = %rule, momentum = p, "lower limit undefined at this momentum, rule fails");
                return Ok(false);
            }
        };
        let upper = match rule.upper.eval(p) {
            Some(limit) => limit,
            None => {
                warn!(rule = %rule, momentum = p, "upper limit undefined at this momentum, rule fails");
                return Ok(false);
            }
        };

        if rule.exclude {
            // Boundary values belong to the outside of an exclusion band
            Ok(!(lower < n_sigma && n_sigma < upper))
        } else {
            Ok(lower <= n_sigma && n_sigma <= upper)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackRecord;

    fn electron_track(n_sigma: Float) -> TrackRecord {
        let mut track = TrackRecord::new(1.0, 0.0);
        track.set_n_sigma(Detector::Tpc, Species::Electron, n_sigma);
        track
    }

    fn tpc_electron_band() -> SigmaCut {
        let mut cut = SigmaCut::new();
        cut.add_cut(Rule::band(Detector::Tpc, Species::Electron, -3.0, 3.0))
            .unwrap();
        cut
    }

    #[test]
    fn inclusion_band_is_inclusive_at_both_limits() {
        let cut = tpc_electron_band();
        let corr = Corrections::new();
        for n_sigma in [-3.0, 0.0, 3.0] {
            assert!(cut.is_selected(&electron_track(n_sigma), &corr).unwrap());
        }
        for n_sigma in [-3.0001, 3.0001] {
            assert!(!cut.is_selected(&electron_track(n_sigma), &corr).unwrap());
        }
    }

    #[test]
    fn exclusion_band_keeps_its_boundary() {
        let mut cut = SigmaCut::new();
        cut.add_cut(
            Rule::band(Detector::Tpc, Species::Pion, -3.0, 3.0)
                .excluding()
                .with_policy(PidPolicy::Ignore),
        )
        .unwrap();
        let corr = Corrections::new();

        let mut inside = TrackRecord::new(1.0, 0.0);
        inside.set_n_sigma(Detector::Tpc, Species::Pion, 0.5);
        assert!(!cut.is_selected(&inside, &corr).unwrap());

        // Exactly at the limit counts as outside the band
        let mut edge = TrackRecord::new(1.0, 0.0);
        edge.set_n_sigma(Detector::Tpc, Species::Pion, 3.0);
        assert!(cut.is_selected(&edge, &corr).unwrap());

        let mut outside = TrackRecord::new(1.0, 0.0);
        outside.set_n_sigma(Detector::Tpc, Species::Pion, 4.2);
        assert!(cut.is_selected(&outside, &corr).unwrap());
    }

    #[test]
    fn missing_signal_follows_the_rule_policy() {
        let corr = Corrections::new();
        let mut no_signal = electron_track(0.0);
        no_signal.set_pid_signal(Detector::Tpc, false);

        // Require: fails outright
        let cut = tpc_electron_band();
        assert!(!cut.is_selected(&no_signal, &corr).unwrap());

        // IfAvailable: passes whatever the deviation would have been
        let mut lenient = SigmaCut::new();
        lenient
            .add_cut(
                Rule::band(Detector::Tpc, Species::Electron, -3.0, 3.0)
                    .with_policy(PidPolicy::IfAvailable),
            )
            .unwrap();
        assert!(lenient.is_selected(&no_signal, &corr).unwrap());

        // Require on an exclusion band: no signal cannot trigger the veto
        let mut veto = SigmaCut::new();
        veto.add_cut(Rule::band(Detector::Tpc, Species::Pion, -3.0, 3.0).excluding())
            .unwrap();
        assert!(veto.is_selected(&no_signal, &corr).unwrap());
    }

    #[test]
    fn applicability_window_skips_rules_outside_it() {
        let mut cut = SigmaCut::new();
        cut.add_cut(Rule::band(Detector::Tpc, Species::Electron, -3.0, 3.0).in_range(0.5, 2.0))
            .unwrap();
        let corr = Corrections::new();

        // Deviation far outside the band, but the rule only applies between
        // 0.5 and 2.0 GeV/c
        let mut slow = TrackRecord::new(0.2, 0.0);
        slow.set_n_sigma(Detector::Tpc, Species::Electron, 9.0);
        assert!(cut.is_selected(&slow, &corr).unwrap());

        let mut in_window = TrackRecord::new(1.0, 0.0);
        in_window.set_n_sigma(Detector::Tpc, Species::Electron, 9.0);
        assert!(!cut.is_selected(&in_window, &corr).unwrap());
    }

    #[test]
    fn aux_gated_window_reads_the_requested_variable() {
        let mut cut = SigmaCut::new();
        cut.add_cut(
            Rule::band(Detector::Tpc, Species::Electron, -3.0, 3.0)
                .in_range(1.0, 4.0)
                .gated_by(AuxVar::Pt),
        )
        .unwrap();
        let corr = Corrections::new();

        // High momentum but low pt: the window gates on pt, rule is skipped
        let mut track = electron_track(7.5);
        track.p = 6.0;
        track.pt = 0.4;
        assert!(cut.is_selected(&track, &corr).unwrap());

        track.pt = 2.0;
        assert!(!cut.is_selected(&track, &corr).unwrap());
    }

    #[test]
    fn missing_aux_accessor_is_a_loud_error() {
        struct NoAux;
        impl Track for NoAux {
            fn momentum(&self) -> Float {
                1.0
            }
            fn eta(&self) -> Float {
                0.0
            }
            fn n_sigma(&self, _: Detector, _: Species) -> Float {
                0.0
            }
            fn has_pid_signal(&self, _: Detector) -> bool {
                true
            }
            fn aux_value(&self, _: AuxVar) -> Option<Float> {
                None
            }
        }

        let mut cut = SigmaCut::new();
        cut.add_cut(
            Rule::band(Detector::Tpc, Species::Electron, -3.0, 3.0)
                .in_range(0.0, 10.0)
                .gated_by(AuxVar::TpcSignal),
        )
        .unwrap();
        let err = cut.is_selected(&NoAux, &Corrections::new()).unwrap_err();
        assert!(matches!(err, Error::MissingCollaborator(_)));
    }

    #[test]
    fn curve_limit_moves_the_band_only_where_the_curve_changes() {
        let corr = Corrections::new();
        let flat = Curve::graph(vec![(0.0, 3.0), (10.0, 3.0)]).unwrap();
        let raised = Curve::graph(vec![(0.0, 3.0), (4.0, 3.0), (5.0, 5.0), (10.0, 5.0)]).unwrap();

        let build = |upper: Curve| {
            let mut cut = SigmaCut::new();
            cut.add_cut(Rule::band(Detector::Tpc, Species::Electron, -3.0, upper))
                .unwrap();
            cut
        };

        // The two curves only differ above 4 GeV/c
        let mut low_p = electron_track(4.0);
        low_p.p = 2.0;
        assert!(!build(flat.clone()).is_selected(&low_p, &corr).unwrap());
        assert!(!build(raised.clone()).is_selected(&low_p, &corr).unwrap());

        let mut high_p = electron_track(4.0);
        high_p.p = 8.0;
        assert!(!build(flat).is_selected(&high_p, &corr).unwrap());
        assert!(build(raised).is_selected(&high_p, &corr).unwrap());
    }

    #[test]
    fn curve_limit_without_domain_fails_the_rule() {
        let mut cut = SigmaCut::new();
        let narrow = Curve::graph(vec![(0.5, 3.0), (2.0, 3.0)]).unwrap();
        cut.add_cut(Rule::band(Detector::Tpc, Species::Electron, -3.0, narrow))
            .unwrap();
        // Momentum beyond the curve's support: sentinel is "rule fails"
        let mut fast = electron_track(0.0);
        fast.p = 5.0;
        assert!(!cut.is_selected(&fast, &Corrections::new()).unwrap());
    }

    #[test]
    fn capacity_overflow_is_loud_and_leaves_the_table_intact() {
        let mut cut = SigmaCut::new();
        for _ in 0..DEFAULT_CAPACITY {
            cut.add_cut(Rule::band(Detector::Tpc, Species::Electron, -3.0, 3.0))
                .unwrap();
        }
        let err = cut
            .add_cut(Rule::band(Detector::Tof, Species::Electron, -2.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { capacity: 10 }));
        assert_eq!(cut.len(), DEFAULT_CAPACITY);
        // First ten rules intact, the eleventh never stored
        assert!(cut.rules().iter().all(|rule| rule.detector == Detector::Tpc));
    }

    #[test]
    fn empty_table_selects_everything() {
        let cut = SigmaCut::new();
        assert!(cut
            .is_selected(&TrackRecord::new(1.0, 0.0), &Corrections::new())
            .unwrap());
    }

    #[test]
    fn one_sided_rule_has_no_upper_limit() {
        let mut cut = SigmaCut::new();
        cut.add_cut(Rule::above(Detector::Tpc, Species::Electron, -1.0)).unwrap();
        let corr = Corrections::new();
        assert!(cut.is_selected(&electron_track(250.0), &corr).unwrap());
        assert!(!cut.is_selected(&electron_track(-1.5), &corr).unwrap());
    }

    #[test]
    fn rules_display_compactly() {
        let rule = Rule::band(Detector::Tpc, Species::Pion, -3.0, 3.0)
            .excluding()
            .in_range(0.4, 5.0);
        assert_eq!(rule.to_string(), "TPC pion veto (-3, 3) for p in [0.4, 5]");
        let gated = Rule::above(Detector::Tof, Species::Electron, -2.0)
            .with_policy(PidPolicy::IfAvailable);
        assert_eq!(gated.to_string(), "TOF electron band [-2, inf] (if available)");
    }
}
