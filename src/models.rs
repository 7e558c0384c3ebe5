//! Core data structures for decoded AtoN notations.
//!
//! Defines the three decoded record types, the closed code sets they draw
//! from, and the per-row structures used by batch imports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Light Characteristics
// =============================================================================

/// Light phase abbreviations, including the alternating compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightPhase {
    Fixed,
    Flashing,
    LongFlash,
    Quick,
    VeryQuick,
    UltraQuick,
    Isophase,
    Occulting,
    InterruptedQuick,
    InterruptedVeryQuick,
    InterruptedUltraQuick,
    Morse,
    FixedFlashing,
    FlashingLongFlash,
    OccultingFlashing,
    FixedLongFlash,
    Alternating,
    AlternatingFlashing,
    AlternatingOcculting,
    AlternatingLongFlash,
    AlternatingFixedFlashing,
    AlternatingIsophase,
    AlternatingQuick,
}

impl LightPhase {
    pub const ALL: [LightPhase; 23] = [
        LightPhase::Fixed,
        LightPhase::Flashing,
        LightPhase::LongFlash,
        LightPhase::Quick,
        LightPhase::VeryQuick,
        LightPhase::UltraQuick,
        LightPhase::Isophase,
        LightPhase::Occulting,
        LightPhase::InterruptedQuick,
        LightPhase::InterruptedVeryQuick,
        LightPhase::InterruptedUltraQuick,
        LightPhase::Morse,
        LightPhase::FixedFlashing,
        LightPhase::FlashingLongFlash,
        LightPhase::OccultingFlashing,
        LightPhase::FixedLongFlash,
        LightPhase::Alternating,
        LightPhase::AlternatingFlashing,
        LightPhase::AlternatingOcculting,
        LightPhase::AlternatingLongFlash,
        LightPhase::AlternatingFixedFlashing,
        LightPhase::AlternatingIsophase,
        LightPhase::AlternatingQuick,
    ];

    /// Canonical abbreviation, also the OSM `seamark:light:character` value
    pub fn code(&self) -> &'static str {
        match self {
            LightPhase::Fixed => "F",
            LightPhase::Flashing => "Fl",
            LightPhase::LongFlash => "LFl",
            LightPhase::Quick => "Q",
            LightPhase::VeryQuick => "VQ",
            LightPhase::UltraQuick => "UQ",
            LightPhase::Isophase => "Iso",
            LightPhase::Occulting => "Oc",
            LightPhase::InterruptedQuick => "IQ",
            LightPhase::InterruptedVeryQuick => "IVQ",
            LightPhase::InterruptedUltraQuick => "IUQ",
            LightPhase::Morse => "Mo",
            LightPhase::FixedFlashing => "FFl",
            LightPhase::FlashingLongFlash => "FlLFl",
            LightPhase::OccultingFlashing => "OcFl",
            LightPhase::FixedLongFlash => "FLFl",
            LightPhase::Alternating => "Al",
            LightPhase::AlternatingFlashing => "Al.Fl",
            LightPhase::AlternatingOcculting => "Al.Oc",
            LightPhase::AlternatingLongFlash => "Al.LFl",
            LightPhase::AlternatingFixedFlashing => "Al.FFl",
            LightPhase::AlternatingIsophase => "Al.Iso",
            LightPhase::AlternatingQuick => "Al.Q",
        }
    }

    pub fn is_alternating(&self) -> bool {
        self.code().starts_with("Al")
    }
}

impl fmt::Display for LightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Light colours in the order they appear on chart abbreviations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightColour {
    White,
    Red,
    Green,
    Yellow,
    Blue,
    Violet,
    Orange,
}

impl LightColour {
    pub const ALL: [LightColour; 7] = [
        LightColour::White,
        LightColour::Red,
        LightColour::Green,
        LightColour::Yellow,
        LightColour::Blue,
        LightColour::Violet,
        LightColour::Orange,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LightColour::White => "W",
            LightColour::Red => "R",
            LightColour::Green => "G",
            LightColour::Yellow => "Y",
            LightColour::Blue => "Bu",
            LightColour::Violet => "Vi",
            LightColour::Orange => "Or",
        }
    }

    /// OSM colour value
    pub fn osm_name(&self) -> &'static str {
        match self {
            LightColour::White => "white",
            LightColour::Red => "red",
            LightColour::Green => "green",
            LightColour::Yellow => "yellow",
            LightColour::Blue => "blue",
            LightColour::Violet => "violet",
            LightColour::Orange => "orange",
        }
    }
}

/// Decoded light characteristic, e.g. `"2 Oc.W.R G.1,5s"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCharacteristic {
    pub multiplicity: Option<u32>,
    pub phase: Option<LightPhase>,
    /// Parenthesised group, verbatim (`2+1`, `6`, `U`)
    pub group: Option<String>,
    pub additional: Option<LightPhase>,
    pub colours: Vec<LightColour>,
    pub period_seconds: Option<f64>,
}

impl LightCharacteristic {
    /// Phase and additional phase combined, e.g. `Q+LFl`
    pub fn character(&self) -> Option<String> {
        let phase = self.phase?;
        Some(match self.additional {
            Some(additional) => format!("{}+{}", phase.code(), additional.code()),
            None => phase.code().to_string(),
        })
    }
}

// =============================================================================
// Fog Signals
// =============================================================================

/// Fog signal categories as named by the OSM fog signal documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FogSignalCategory {
    Explosive,
    Diaphone,
    Siren,
    Nautophone,
    Reed,
    Tyfon,
    Bell,
    Whistle,
    Gong,
    Horn,
}

impl FogSignalCategory {
    pub const ALL: [FogSignalCategory; 10] = [
        FogSignalCategory::Explosive,
        FogSignalCategory::Diaphone,
        FogSignalCategory::Siren,
        FogSignalCategory::Nautophone,
        FogSignalCategory::Reed,
        FogSignalCategory::Tyfon,
        FogSignalCategory::Bell,
        FogSignalCategory::Whistle,
        FogSignalCategory::Gong,
        FogSignalCategory::Horn,
    ];

    pub fn osm_name(&self) -> &'static str {
        match self {
            FogSignalCategory::Explosive => "explosive",
            FogSignalCategory::Diaphone => "diaphone",
            FogSignalCategory::Siren => "siren",
            FogSignalCategory::Nautophone => "nautophone",
            FogSignalCategory::Reed => "reed",
            FogSignalCategory::Tyfon => "tyfon",
            FogSignalCategory::Bell => "bell",
            FogSignalCategory::Whistle => "whistle",
            FogSignalCategory::Gong => "gong",
            FogSignalCategory::Horn => "horn",
        }
    }

    /// Short light-list abbreviation, if one is in common use
    pub fn abbreviation(&self) -> Option<&'static str> {
        match self {
            FogSignalCategory::Explosive => Some("Explos"),
            FogSignalCategory::Diaphone => Some("Dia"),
            FogSignalCategory::Nautophone => Some("Nauto"),
            FogSignalCategory::Whistle => Some("Whis"),
            _ => None,
        }
    }
}

/// Decoded fog signal, e.g. `"HORN(3)30s (2+2+2+2+2+20)"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FogSignalCharacteristic {
    pub category: Option<FogSignalCategory>,
    pub morse: Option<String>,
    pub group: Option<u32>,
    pub period_seconds: Option<f64>,
    /// On/off timing sequence, verbatim and unevaluated
    pub timing_breakdown: Option<String>,
}

// =============================================================================
// GLA Design Codes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerType {
    Solar,
    Battery,
    Generator,
}

impl PowerType {
    pub const ALL: [PowerType; 3] = [PowerType::Solar, PowerType::Battery, PowerType::Generator];

    pub fn code(&self) -> &'static str {
        match self {
            PowerType::Solar => "S",
            PowerType::Battery => "B",
            PowerType::Generator => "G",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerType::Solar => "solar",
            PowerType::Battery => "battery",
            PowerType::Generator => "generator",
        }
    }
}

/// Buoy or beacon class encoded by the two-letter type segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    PortPillar,
    PortLateral,
    StarboardLateral,
    NorthCardinal,
    SouthCardinal,
    WestCardinal,
    EastCardinal,
    SafeWater,
    SpecialMark,
    IsolatedDanger,
    Installation,
}

impl StructureType {
    pub const ALL: [StructureType; 11] = [
        StructureType::PortPillar,
        StructureType::PortLateral,
        StructureType::StarboardLateral,
        StructureType::NorthCardinal,
        StructureType::SouthCardinal,
        StructureType::WestCardinal,
        StructureType::EastCardinal,
        StructureType::SafeWater,
        StructureType::SpecialMark,
        StructureType::IsolatedDanger,
        StructureType::Installation,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            StructureType::PortPillar => "PP",
            StructureType::PortLateral => "PL",
            StructureType::StarboardLateral => "SL",
            StructureType::NorthCardinal => "NC",
            StructureType::SouthCardinal => "SC",
            StructureType::WestCardinal => "WC",
            StructureType::EastCardinal => "EC",
            StructureType::SafeWater => "SW",
            StructureType::SpecialMark => "SM",
            StructureType::IsolatedDanger => "ID",
            StructureType::Installation => "IN",
        }
    }

    /// OSM category value; safe water and isolated danger marks have none
    pub fn category(&self) -> Option<&'static str> {
        match self {
            StructureType::PortPillar | StructureType::PortLateral => Some("port"),
            StructureType::StarboardLateral => Some("starboard"),
            StructureType::NorthCardinal => Some("north"),
            StructureType::SouthCardinal => Some("south"),
            StructureType::WestCardinal => Some("west"),
            StructureType::EastCardinal => Some("east"),
            StructureType::SpecialMark => Some("warning"),
            StructureType::Installation => Some("floating"),
            StructureType::SafeWater | StructureType::IsolatedDanger => None,
        }
    }

    pub fn buoy_type(&self) -> &'static str {
        match self {
            StructureType::PortPillar
            | StructureType::PortLateral
            | StructureType::StarboardLateral => "buoy_lateral",
            StructureType::NorthCardinal
            | StructureType::SouthCardinal
            | StructureType::WestCardinal
            | StructureType::EastCardinal => "buoy_cardinal",
            StructureType::SafeWater => "buoy_safe_water",
            StructureType::SpecialMark => "buoy_special_purpose",
            StructureType::Installation => "buoy_installation",
            StructureType::IsolatedDanger => "buoy_isolated_danger",
        }
    }

    pub fn beacon_type(&self) -> &'static str {
        match self {
            StructureType::PortPillar
            | StructureType::PortLateral
            | StructureType::StarboardLateral => "beacon_lateral",
            StructureType::NorthCardinal
            | StructureType::SouthCardinal
            | StructureType::WestCardinal
            | StructureType::EastCardinal => "beacon_cardinal",
            StructureType::SafeWater => "beacon_safe_water",
            StructureType::SpecialMark => "beacon_special_purpose",
            // No installation beacon exists in the seamark vocabulary
            StructureType::Installation | StructureType::IsolatedDanger => {
                "beacon_isolated_danger"
            }
        }
    }

    /// Body colours, top to bottom, `;`-separated as in OSM
    pub fn colour(&self) -> &'static str {
        match self {
            StructureType::PortPillar | StructureType::PortLateral => "red",
            StructureType::StarboardLateral => "green",
            StructureType::EastCardinal => "black;yellow;black",
            StructureType::WestCardinal => "yellow;black;yellow",
            StructureType::NorthCardinal => "black;yellow",
            StructureType::SouthCardinal => "yellow;black",
            StructureType::SafeWater => "red;white;red;white",
            StructureType::SpecialMark => "yellow",
            StructureType::Installation => "white",
            StructureType::IsolatedDanger => "black;red;black",
        }
    }

    /// Colour pattern, only meaningful for multi-coloured bodies
    pub fn colour_pattern(&self) -> Option<&'static str> {
        if !self.colour().contains(';') {
            return None;
        }
        match self {
            StructureType::SafeWater | StructureType::SpecialMark | StructureType::Installation => {
                Some("vertical")
            }
            _ => Some("stripes"),
        }
    }

    /// Shape implied by the mark class when the code omits one
    pub fn default_shape(&self) -> Shape {
        match self {
            StructureType::NorthCardinal
            | StructureType::SouthCardinal
            | StructureType::WestCardinal
            | StructureType::EastCardinal
            | StructureType::PortPillar => Shape::Pillar,
            StructureType::PortLateral | StructureType::StarboardLateral => Shape::Conical,
            _ => Shape::Can,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Spherical,
    Conical,
    Can,
    Pillar,
    Spar,
    Barrel,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Spherical,
        Shape::Conical,
        Shape::Can,
        Shape::Pillar,
        Shape::Spar,
        Shape::Barrel,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Shape::Spherical => "SP",
            Shape::Conical => "CO",
            Shape::Can => "CA",
            Shape::Pillar => "PP",
            Shape::Spar => "SR",
            Shape::Barrel => "BA",
        }
    }

    pub fn osm_name(&self) -> &'static str {
        match self {
            Shape::Spherical => "spherical",
            Shape::Conical => "conical",
            Shape::Can => "can",
            Shape::Pillar => "pillar",
            Shape::Spar => "spar",
            Shape::Barrel => "barrel",
        }
    }
}

/// Whether a design code describes a floating or a fixed structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureClass {
    #[default]
    Buoy,
    Beacon,
}

impl StructureClass {
    /// Structure class named by a sheet's AtoN type cell, e.g. `"Buoy"` or
    /// `"BEACON (lit)"`. Other AtoN types yield `None`.
    pub fn from_aton_type(aton_type: &str) -> Option<Self> {
        let without_note = match (aton_type.find('('), aton_type.rfind(')')) {
            (Some(open), Some(close)) if open < close => {
                format!("{}{}", &aton_type[..open], &aton_type[close + 1..])
            }
            _ => aton_type.to_string(),
        };
        match without_note.trim().to_uppercase().as_str() {
            "BUOY" => Some(StructureClass::Buoy),
            "BEACON" => Some(StructureClass::Beacon),
            _ => None,
        }
    }
}

/// Decoded GLA design code, e.g. `"2S5NC/B"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignCode {
    pub gla_type: Option<String>,
    pub power: Option<PowerType>,
    /// Nominal range in nautical miles
    pub range: Option<f64>,
    pub unlit: bool,
    pub structure_type: Option<StructureType>,
    pub shape: Option<Shape>,
    /// Fitted aid suffixes, upper-cased
    pub aids: BTreeSet<String>,
}

impl DesignCode {
    /// The explicit shape, or the one implied by the structure type
    pub fn effective_shape(&self) -> Option<Shape> {
        self.shape
            .or_else(|| self.structure_type.map(|t| t.default_shape()))
    }
}

// =============================================================================
// Batch Rows
// =============================================================================

/// Which decoder a notation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotationKind {
    Light,
    FogSignal,
    DesignCode,
}

impl NotationKind {
    pub fn name(&self) -> &'static str {
        match self {
            NotationKind::Light => "light",
            NotationKind::FogSignal => "fog_signal",
            NotationKind::DesignCode => "design_code",
        }
    }
}

impl fmt::Display for NotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded notation of any kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedNotation {
    Light(LightCharacteristic),
    FogSignal(FogSignalCharacteristic),
    DesignCode(DesignCode),
}

impl DecodedNotation {
    pub fn kind(&self) -> NotationKind {
        match self {
            DecodedNotation::Light(_) => NotationKind::Light,
            DecodedNotation::FogSignal(_) => NotationKind::FogSignal,
            DecodedNotation::DesignCode(_) => NotationKind::DesignCode,
        }
    }
}

/// Raw notation cells of one exported sheet row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotationRow {
    /// Zero-based row index within the sheet
    pub row: usize,
    pub name: Option<String>,
    pub aton_type: Option<String>,
    pub character: Option<String>,
    pub fog_signal: Option<String>,
    pub design_code: Option<String>,
}

impl NotationRow {
    /// Structure class given by the row's AtoN type, if it names one
    pub fn structure_class(&self) -> Option<StructureClass> {
        self.aton_type
            .as_deref()
            .and_then(StructureClass::from_aton_type)
    }

    /// Non-blank notation cells paired with their decoder
    pub fn notations(&self) -> impl Iterator<Item = (NotationKind, &str)> {
        [
            (NotationKind::Light, self.character.as_deref()),
            (NotationKind::FogSignal, self.fog_signal.as_deref()),
            (NotationKind::DesignCode, self.design_code.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, cell)| {
            cell.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| (kind, s))
        })
    }
}
