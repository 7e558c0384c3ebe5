//! GLA design code decoding.
//!
//! Design codes describe a buoy or beacon in a single token, e.g. `"2S5NC/B"`:
//!
//! ```text
//! [+] <gla type> [<power><range> | UL] <type> [<shape>] [/suffix...]
//!  +      1          S     7              SC                /R
//! ```
//!
//! A leading `+` or a `UL` power slot marks an unlit structure. Suffix tokens
//! (`/B`, `-AIS/R/MH`) are collected as a set of fitted aids.

use crate::error::{NotationError, Result};
use crate::models::{DesignCode, PowerType, Shape, StructureType};
use crate::validity::Validity;
use crate::vocabulary::{Abbreviation, DesignCodeVocabulary};
use regex::{Captures, Regex};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DesignCodeDecoder {
    pattern: Regex,
    power_types: Vec<Abbreviation<PowerType>>,
    structure_types: Vec<Abbreviation<StructureType>>,
    shapes: Vec<Abbreviation<Shape>>,
}

/// Regex alternation over vocabulary codes, longest first
fn alternation<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    let mut codes: Vec<String> = codes.map(|code| regex::escape(&code.to_uppercase())).collect();
    codes.sort_by(|a, b| b.len().cmp(&a.len()));
    codes.join("|")
}

fn lookup<T: Copy>(entries: &[Abbreviation<T>], code: &str) -> Option<T> {
    entries
        .iter()
        .find(|entry| entry.abbreviation.eq_ignore_ascii_case(code))
        .map(|entry| entry.value)
}

/// The GLA type alone is not a design code: a power slot, `UL` or a known
/// structure type has to follow it.
fn has_structure_segment(captures: &Captures<'_>) -> bool {
    ["power", "unlit", "type"]
        .iter()
        .any(|name| captures.name(name).is_some())
}

fn is_suffix_separator(c: char) -> bool {
    c == '/' || c == '-' || c == ',' || c.is_whitespace()
}

impl DesignCodeDecoder {
    /// Compile the segmentation pattern for a vocabulary
    pub fn new(vocabulary: &DesignCodeVocabulary) -> Result<Self> {
        let gla_types = alternation(vocabulary.gla_types.iter().map(String::as_str));
        let power_types = alternation(
            vocabulary
                .power_types
                .iter()
                .map(|a| a.abbreviation.as_str()),
        );
        let structure_types = alternation(
            vocabulary
                .structure_types
                .iter()
                .map(|a| a.abbreviation.as_str()),
        );
        let shapes = alternation(vocabulary.shapes.iter().map(|a| a.abbreviation.as_str()));
        let unlit = regex::escape(&vocabulary.unlit_marker.to_uppercase());

        if gla_types.is_empty() || power_types.is_empty() || structure_types.is_empty() {
            return Err(NotationError::configuration(
                "design code vocabulary needs GLA types, power types and structure types",
            ));
        }
        let shape_group = if shapes.is_empty() {
            String::new()
        } else {
            format!("(?P<shape>{shapes})?")
        };

        let pattern = format!(
            r"(?s)^(?P<unlit_marker>\+)?\s*(?P<gla>{gla_types})(?:(?P<power>{power_types})(?P<range>\d+(?:[.,]\d+)?)|(?P<unlit>{unlit}))?(?:(?P<type>{structure_types}){shape_group})?(?P<rest>.*)$"
        );
        let pattern = Regex::new(&pattern).map_err(|e| {
            NotationError::configuration(format!("design code pattern failed to compile: {e}"))
        })?;

        Ok(Self {
            pattern,
            power_types: vocabulary.power_types.clone(),
            structure_types: vocabulary.structure_types.clone(),
            shapes: vocabulary.shapes.clone(),
        })
    }

    /// Decode a design code. Never fails; check [`Validity::is_valid`].
    pub fn decode(&self, raw: &str) -> DesignCode {
        let normalized = raw.trim().to_uppercase();
        let design_code = match self.pattern.captures(&normalized) {
            Some(captures) if has_structure_segment(&captures) => self.build_record(&captures),
            _ => DesignCode::default(),
        };

        debug!(
            "Decoded design code '{}': gla_type={:?} power={:?} range={:?} type={:?} aids={:?} valid={}",
            raw,
            design_code.gla_type,
            design_code.power,
            design_code.range,
            design_code.structure_type,
            design_code.aids,
            design_code.is_valid()
        );
        design_code
    }

    fn build_record(&self, captures: &Captures<'_>) -> DesignCode {
        let text = |name: &str| captures.name(name).map(|m| m.as_str());

        DesignCode {
            gla_type: text("gla").map(str::to_string),
            power: text("power").and_then(|code| lookup(&self.power_types, code)),
            range: text("range")
                .and_then(|range| range.replace(',', ".").parse::<f64>().ok())
                .filter(|range| range.is_finite()),
            unlit: text("unlit_marker").is_some() || text("unlit").is_some(),
            structure_type: text("type").and_then(|code| lookup(&self.structure_types, code)),
            shape: text("shape").and_then(|code| lookup(&self.shapes, code)),
            aids: text("rest")
                .map(|rest| {
                    rest.split(is_suffix_separator)
                        .map(str::trim)
                        .filter(|token| !token.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
