//! Validity gate for decoded records.
//!
//! A record is valid only when its mandatory field was recognised: the phase
//! for lights, the category for fog signals and the GLA type for design
//! codes. Batch imports use this flag to decide whether a row proceeds or is
//! flagged for manual review.

use crate::models::{DecodedNotation, DesignCode, FogSignalCharacteristic, LightCharacteristic};
use serde::Serialize;
use std::fmt;

pub trait Validity {
    /// True iff the mandatory field is present
    fn is_valid(&self) -> bool;

    /// Number of fields that were recognised, mandatory or not
    fn populated_fields(&self) -> usize;

    fn outcome(&self) -> Outcome {
        Outcome::classify(self.is_valid(), self.populated_fields())
    }
}

/// Graded result of one decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Mandatory field recognised
    Full,
    /// Some fields recognised but the mandatory one is missing
    Partial,
    /// Nothing recognised
    NoMatch,
}

impl Outcome {
    pub fn classify(valid: bool, populated_fields: usize) -> Self {
        match (valid, populated_fields) {
            (true, _) => Outcome::Full,
            (false, 0) => Outcome::NoMatch,
            (false, _) => Outcome::Partial,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Full => write!(f, "full"),
            Outcome::Partial => write!(f, "partial"),
            Outcome::NoMatch => write!(f, "no match"),
        }
    }
}

impl Validity for LightCharacteristic {
    fn is_valid(&self) -> bool {
        self.phase.is_some()
    }

    fn populated_fields(&self) -> usize {
        [
            self.multiplicity.is_some(),
            self.phase.is_some(),
            self.group.is_some(),
            self.additional.is_some(),
            !self.colours.is_empty(),
            self.period_seconds.is_some(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }
}

impl Validity for FogSignalCharacteristic {
    fn is_valid(&self) -> bool {
        self.category.is_some()
    }

    fn populated_fields(&self) -> usize {
        [
            self.category.is_some(),
            self.morse.is_some(),
            self.group.is_some(),
            self.period_seconds.is_some(),
            self.timing_breakdown.is_some(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }
}

impl Validity for DesignCode {
    fn is_valid(&self) -> bool {
        self.gla_type.is_some()
    }

    fn populated_fields(&self) -> usize {
        [
            self.gla_type.is_some(),
            self.power.is_some(),
            self.range.is_some(),
            self.unlit,
            self.structure_type.is_some(),
            self.shape.is_some(),
            !self.aids.is_empty(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }
}

impl Validity for DecodedNotation {
    fn is_valid(&self) -> bool {
        match self {
            DecodedNotation::Light(light) => light.is_valid(),
            DecodedNotation::FogSignal(fog_signal) => fog_signal.is_valid(),
            DecodedNotation::DesignCode(design_code) => design_code.is_valid(),
        }
    }

    fn populated_fields(&self) -> usize {
        match self {
            DecodedNotation::Light(light) => light.populated_fields(),
            DecodedNotation::FogSignal(fog_signal) => fog_signal.populated_fields(),
            DecodedNotation::DesignCode(design_code) => design_code.populated_fields(),
        }
    }
}
