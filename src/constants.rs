//! Application constants for the AtoN notation decoders
//!
//! Canonical seamark tag keys, default column names for exported AtoN
//! sheets and batch defaults.

// =============================================================================
// Seamark Tag Keys
// =============================================================================

/// Generic seamark type key shared by all records
pub const TAG_SEAMARK_TYPE: &str = "seamark:type";

/// Status key emitted alongside every `seamark:type`
pub const TAG_SEAMARK_STATUS: &str = "seamark:status";

/// All imported AtoNs are permanent installations
pub const STATUS_PERMANENT: &str = "permanent";

/// Light characteristic keys
pub mod light_tags {
    pub const SEAMARK_TYPE: &str = "light";
    pub const CHARACTER: &str = "seamark:light:character";
    pub const MULTIPLE: &str = "seamark:light:multiple";
    pub const GROUP: &str = "seamark:light:group";
    pub const COLOUR: &str = "seamark:light:colour";
    pub const PERIOD: &str = "seamark:light:period";
}

/// Fog signal keys
///
/// The OSM wiki documents `seamark:light:<attribute>` for some of these, which
/// collides on combined light and fog-signal AtoNs, so the fog signal
/// namespace is used throughout.
pub mod fog_signal_tags {
    pub const SEAMARK_TYPE: &str = "fog_signal";
    pub const CATEGORY: &str = "seamark:fog_signal:category";
    pub const MORSE: &str = "seamark:fog_signal:morse";
    pub const GROUP: &str = "seamark:fog_signal:group";
    pub const PERIOD: &str = "seamark:fog_signal:period";
    pub const SEQUENCE: &str = "seamark:fog_signal:sequence";
}

/// Design code keys. `{type}` is substituted with the emitted `seamark:type`.
pub mod design_code_tags {
    pub const CATEGORY: &str = "seamark:{type}:category";
    pub const SHAPE: &str = "seamark:{type}:shape";
    pub const SYSTEM: &str = "seamark:{type}:system";
    pub const COLOUR: &str = "seamark:{type}:colour";
    pub const COLOUR_PATTERN: &str = "seamark:{type}:colour_pattern";
    pub const GLA_TYPE: &str = "seamark:gla:design_code:type";
    pub const POWER: &str = "seamark:gla:design_code:power";
    pub const RANGE: &str = "seamark:gla:design_code:range";
    pub const UNLIT: &str = "seamark:gla:design_code:unlit";
    pub const AIDS: &str = "seamark:gla:design_code:aids";

    /// Buoyage system of all UK design codes
    pub const IALA_SYSTEM: &str = "iala-a";
}

/// Placeholder substituted with the `seamark:type` value in tag keys
pub const TYPE_PLACEHOLDER: &str = "{type}";

/// Separator for multi-valued tag values
pub const VALUE_SEPARATOR: &str = ";";

// =============================================================================
// Import Defaults
// =============================================================================

/// Default column holding the AtoN name
pub const DEFAULT_NAME_COLUMN: &str = "name";

/// Default column holding the AtoN type (`Buoy`, `Beacon`, `Lighthouse`, ...)
pub const DEFAULT_TYPE_COLUMN: &str = "type";

/// Default column holding the light characteristic
pub const DEFAULT_CHARACTER_COLUMN: &str = "character";

/// Default column holding the fog signal notation
pub const DEFAULT_FOG_SIGNAL_COLUMN: &str = "fog_signal";

/// Default column holding the GLA design code
pub const DEFAULT_DESIGN_CODE_COLUMN: &str = "design_code";

/// Rows decoded per blocking task
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Version of the built-in vocabulary tables
pub const BUILTIN_VOCABULARY_VERSION: u32 = 1;
