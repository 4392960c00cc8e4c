//! Mechanism for loading and sharing cut configurations
//!
//! Selections are policy, so they travel as data: a TOML document declaring
//! the rule table and the optional correction registry. Loading checks the
//! same invariants `add_cut` enforces at run time, plus a few sanity checks
//! on the declared numbers.

use crate::{
    corrections::Corrections,
    cut::{Bound, Rule, SigmaCut, DEFAULT_CAPACITY},
    error::{Error, Result},
};

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// On-disk description of a PID selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CutConfig {
    /// Rule-count limit of the resulting table
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Selection rules, in evaluation order
    #[serde(default, rename = "cut")]
    pub cuts: Vec<Rule>,

    /// Correction registry to evaluate the rules with
    #[serde(default)]
    pub corrections: Corrections,
}
//
impl CutConfig {
    /// Decode a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load and decode a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Encode the configuration back to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the rule table and the correction registry
    ///
    /// Checks the declared numbers and the capacity invariant; a document
    /// with more rules than `capacity` is rejected the same way an over-full
    /// `add_cut` sequence would be.
    pub fn build(&self) -> Result<(SigmaCut, Corrections)> {
        for rule in &self.cuts {
            check_rule(rule)?;
        }
        let mut cut = SigmaCut::with_capacity(self.capacity);
        for rule in &self.cuts {
            cut.add_cut(rule.clone())?;
        }
        Ok((cut, self.corrections.clone()))
    }
}

impl Default for CutConfig {
    fn default() -> Self {
        CutConfig {
            capacity: DEFAULT_CAPACITY,
            cuts: Vec::new(),
            corrections: Corrections::default(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Sanity checks on one declared rule
fn check_rule(rule: &Rule) -> Result<()> {
    if let (Bound::Value(lower), Bound::Value(upper)) = (&rule.lower, &rule.upper) {
        if lower.is_nan() || upper.is_nan() {
            return Err(Error::Config(format!("rule \"{}\" has a NaN limit", rule)));
        }
        if lower > upper {
            return Err(Error::Config(format!(
                "rule \"{}\" has its limits inverted ({} > {})",
                rule, lower, upper
            )));
        }
    }
    if let Some((min, max)) = rule.range {
        if min > max {
            return Err(Error::Config(format!(
                "rule \"{}\" has its window inverted ({} > {})",
                rule, min, max
            )));
        }
    }
    Ok(())
}
