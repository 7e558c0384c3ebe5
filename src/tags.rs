//! Seamark tag emission for decoded records.
//!
//! Each record maps its populated fields onto OSM seamark keys in field
//! declaration order. Absent fields produce no tag and no tag ever carries an
//! empty value.

use crate::constants::{
    STATUS_PERMANENT, TAG_SEAMARK_STATUS, TAG_SEAMARK_TYPE, TYPE_PLACEHOLDER, VALUE_SEPARATOR, design_code_tags, fog_signal_tags,
    light_tags,
};
use crate::models::{
    DecodedNotation, DesignCode, FogSignalCharacteristic, LightCharacteristic, StructureClass,
};
use crate::validity::Validity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key/value pair of the AtoN tag model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtonTag {
    pub key: String,
    pub value: String,
}

impl AtonTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for AtonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<tag k='{}' v='{}'/>", self.key, self.value)
    }
}

pub trait ToAtonTags {
    fn to_tags(&self) -> Vec<AtonTag>;
}

/// Ordered tag builder that drops undefined values and fills in `{type}` keys
#[derive(Debug, Default)]
struct TagList {
    tags: Vec<AtonTag>,
    seamark_type: Option<String>,
}

impl TagList {
    fn seamark_type(&mut self, seamark_type: &str) {
        self.seamark_type = Some(seamark_type.to_string());
        self.add(TAG_SEAMARK_TYPE, Some(seamark_type));
        self.add(TAG_SEAMARK_STATUS, Some(STATUS_PERMANENT));
    }

    /// Adds the tag if the value is well-defined
    fn add<V: fmt::Display>(&mut self, key: &str, value: Option<V>) {
        let Some(value) = value.map(|v| v.to_string()) else {
            return;
        };
        if value.trim().is_empty() {
            return;
        }

        let key = if key.contains(TYPE_PLACEHOLDER) {
            match &self.seamark_type {
                Some(seamark_type) => key.replace(TYPE_PLACEHOLDER, seamark_type),
                None => return,
            }
        } else {
            key.to_string()
        };
        self.tags.push(AtonTag { key, value });
    }

    fn into_tags(self) -> Vec<AtonTag> {
        self.tags
    }
}

/// Updates `target` with `tags`: existing keys are overwritten in place,
/// new keys are appended.
pub fn merge_tags(target: &mut Vec<AtonTag>, tags: impl IntoIterator<Item = AtonTag>) {
    for tag in tags {
        match target.iter_mut().find(|existing| existing.key == tag.key) {
            Some(existing) => existing.value = tag.value,
            None => target.push(tag),
        }
    }
}

impl ToAtonTags for LightCharacteristic {
    fn to_tags(&self) -> Vec<AtonTag> {
        let mut tags = TagList::default();
        if self.is_valid() {
            tags.seamark_type(light_tags::SEAMARK_TYPE);
        }

        tags.add(light_tags::MULTIPLE, self.multiplicity);
        tags.add(light_tags::CHARACTER, self.character());
        tags.add(light_tags::GROUP, self.group.as_deref());

        let colours = self
            .colours
            .iter()
            .map(|colour| colour.osm_name())
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);
        tags.add(light_tags::COLOUR, Some(colours));
        tags.add(light_tags::PERIOD, self.period_seconds);

        tags.into_tags()
    }
}

impl ToAtonTags for FogSignalCharacteristic {
    fn to_tags(&self) -> Vec<AtonTag> {
        let mut tags = TagList::default();
        if self.is_valid() {
            tags.seamark_type(fog_signal_tags::SEAMARK_TYPE);
        }

        tags.add(
            fog_signal_tags::CATEGORY,
            self.category.map(|category| category.osm_name()),
        );
        tags.add(fog_signal_tags::MORSE, self.morse.as_deref());
        tags.add(fog_signal_tags::GROUP, self.group);
        tags.add(fog_signal_tags::PERIOD, self.period_seconds);
        tags.add(fog_signal_tags::SEQUENCE, self.timing_breakdown.as_deref());

        tags.into_tags()
    }
}

impl DesignCode {
    /// Tags for the design code emitted as the given structure class
    pub fn to_tags_as(&self, class: StructureClass) -> Vec<AtonTag> {
        let mut tags = TagList::default();

        tags.add(design_code_tags::GLA_TYPE, self.gla_type.as_deref());
        tags.add(design_code_tags::POWER, self.power.map(|power| power.name()));
        tags.add(design_code_tags::RANGE, self.range);
        tags.add(design_code_tags::UNLIT, self.unlit.then_some("yes"));

        if let Some(structure_type) = self.structure_type {
            tags.seamark_type(match class {
                StructureClass::Buoy => structure_type.buoy_type(),
                StructureClass::Beacon => structure_type.beacon_type(),
            });
            tags.add(design_code_tags::CATEGORY, structure_type.category());
            tags.add(design_code_tags::SYSTEM, Some(design_code_tags::IALA_SYSTEM));
            tags.add(design_code_tags::COLOUR, Some(structure_type.colour()));
            tags.add(
                design_code_tags::COLOUR_PATTERN,
                structure_type.colour_pattern(),
            );
        }
        tags.add(
            design_code_tags::SHAPE,
            self.effective_shape().map(|shape| shape.osm_name()),
        );

        let aids = self
            .aids
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);
        tags.add(design_code_tags::AIDS, Some(aids));

        tags.into_tags()
    }
}

impl ToAtonTags for DesignCode {
    fn to_tags(&self) -> Vec<AtonTag> {
        self.to_tags_as(StructureClass::default())
    }
}

impl ToAtonTags for DecodedNotation {
    fn to_tags(&self) -> Vec<AtonTag> {
        match self {
            DecodedNotation::Light(light) => light.to_tags(),
            DecodedNotation::FogSignal(fog_signal) => fog_signal.to_tags(),
            DecodedNotation::DesignCode(design_code) => design_code.to_tags(),
        }
    }
}
