//! Versioned abbreviation tables for the notation decoders.
//!
//! A [`Vocabulary`] is built once (from the built-in tables or a JSON file)
//! and handed to each decoder at construction. Decoders never mutate it;
//! changing the vocabulary means loading a new version.

use crate::constants::BUILTIN_VOCABULARY_VERSION;
use crate::error::{NotationError, Result};
use crate::models::{FogSignalCategory, LightColour, LightPhase, PowerType, Shape, StructureType};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A source abbreviation and the code it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abbreviation<T> {
    pub abbreviation: String,
    pub value: T,
}

impl<T> Abbreviation<T> {
    pub fn new(abbreviation: impl Into<String>, value: T) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            value,
        }
    }
}

/// Sorts entries longest abbreviation first so prefixes never shadow
/// longer matches (`Al.Fl` before `Al`, `FFl` before `F`).
pub(crate) fn longest_first<T: Clone>(entries: &[Abbreviation<T>]) -> Vec<Abbreviation<T>> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.abbreviation.len().cmp(&a.abbreviation.len()));
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightVocabulary {
    /// Phase abbreviations; `.` inside an abbreviation also matches a space
    pub phases: Vec<Abbreviation<LightPhase>>,
    pub colours: Vec<Abbreviation<LightColour>>,
}

impl Default for LightVocabulary {
    fn default() -> Self {
        Self {
            phases: LightPhase::ALL
                .iter()
                .map(|phase| Abbreviation::new(phase.code(), *phase))
                .collect(),
            colours: LightColour::ALL
                .iter()
                .map(|colour| Abbreviation::new(colour.code(), *colour))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FogSignalVocabulary {
    /// Category words, matched case-insensitively
    pub categories: Vec<Abbreviation<FogSignalCategory>>,
    /// Qualifier introducing a Morse letter group, e.g. `MO` in `MO(U)`
    pub morse_qualifier: String,
}

impl Default for FogSignalVocabulary {
    fn default() -> Self {
        let mut categories: Vec<_> = FogSignalCategory::ALL
            .iter()
            .map(|category| Abbreviation::new(category.osm_name(), *category))
            .collect();
        categories.extend(FogSignalCategory::ALL.iter().filter_map(|category| {
            category
                .abbreviation()
                .map(|abbreviation| Abbreviation::new(abbreviation, *category))
        }));

        Self {
            categories,
            morse_qualifier: "MO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCodeVocabulary {
    /// Leading GLA class codes
    pub gla_types: Vec<String>,
    pub power_types: Vec<Abbreviation<PowerType>>,
    /// Power slot marker for unlit structures
    pub unlit_marker: String,
    pub structure_types: Vec<Abbreviation<StructureType>>,
    pub shapes: Vec<Abbreviation<Shape>>,
}

impl Default for DesignCodeVocabulary {
    fn default() -> Self {
        let mut gla_types: Vec<String> = (0..=9).map(|digit| digit.to_string()).collect();
        gla_types.push("N".to_string());

        Self {
            gla_types,
            power_types: PowerType::ALL
                .iter()
                .map(|power| Abbreviation::new(power.code(), *power))
                .collect(),
            unlit_marker: "UL".to_string(),
            structure_types: StructureType::ALL
                .iter()
                .map(|structure| Abbreviation::new(structure.code(), *structure))
                .collect(),
            shapes: Shape::ALL
                .iter()
                .map(|shape| Abbreviation::new(shape.code(), *shape))
                .collect(),
        }
    }
}

/// Complete, versioned vocabulary for all three decoders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub version: u32,
    pub light: LightVocabulary,
    pub fog_signal: FogSignalVocabulary,
    pub design_code: DesignCodeVocabulary,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            version: BUILTIN_VOCABULARY_VERSION,
            light: LightVocabulary::default(),
            fog_signal: FogSignalVocabulary::default(),
            design_code: DesignCodeVocabulary::default(),
        }
    }
}

impl Vocabulary {
    /// Load and validate a vocabulary from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let vocabulary: Vocabulary =
            serde_json::from_str(&content).map_err(|source| NotationError::VocabularyFormat {
                path: path.to_path_buf(),
                source,
            })?;
        vocabulary.validate()?;

        debug!(
            "Loaded vocabulary version {} from {}",
            vocabulary.version,
            path.display()
        );
        Ok(vocabulary)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables that would make a decoder match nothing or everything
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| Err(NotationError::invalid_vocabulary(self.version, reason));

        if self.light.phases.is_empty() {
            return fail("light phase table is empty");
        }
        if self.light.colours.is_empty() {
            return fail("light colour table is empty");
        }
        if self.fog_signal.categories.is_empty() {
            return fail("fog signal category table is empty");
        }
        if self.design_code.gla_types.is_empty() {
            return fail("GLA type table is empty");
        }
        if self.design_code.power_types.is_empty() {
            return fail("power type table is empty");
        }

        let blank = self
            .light
            .phases
            .iter()
            .map(|a| a.abbreviation.as_str())
            .chain(self.light.colours.iter().map(|a| a.abbreviation.as_str()))
            .chain(
                self.fog_signal
                    .categories
                    .iter()
                    .map(|a| a.abbreviation.as_str()),
            )
            .chain(self.design_code.gla_types.iter().map(String::as_str))
            .chain(
                self.design_code
                    .power_types
                    .iter()
                    .map(|a| a.abbreviation.as_str()),
            )
            .chain(
                self.design_code
                    .structure_types
                    .iter()
                    .map(|a| a.abbreviation.as_str()),
            )
            .chain(self.design_code.shapes.iter().map(|a| a.abbreviation.as_str()))
            .any(|abbreviation| abbreviation.trim().is_empty());
        if blank {
            return fail("blank abbreviation");
        }

        if self.fog_signal.morse_qualifier.trim().is_empty() {
            return fail("blank Morse qualifier");
        }
        if self.design_code.unlit_marker.trim().is_empty() {
            return fail("blank unlit marker");
        }

        Ok(())
    }
}
