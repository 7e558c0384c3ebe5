//! AtoN Notation Library
//!
//! Decoders for the abbreviation-heavy notation used to describe
//! Aids-to-Navigation in light lists and exported AtoN sheets, and an emitter
//! that turns the decoded records into OSM seamark tags.
//!
//! This library provides:
//! - A light characteristic decoder (`"Fl(2+1)W.10s"`, `"Q(6)+LFl W 15s"`)
//! - A fog signal decoder (`"HORN MO(U)30s (0,75+1+0,75+1+2,5+24)"`)
//! - A GLA design code decoder (`"1S9SC-AIS/R/MH"`)
//! - Seamark tag emission and a per-record validity gate
//! - Concurrent batch decoding of exported sheets with an import report
//!
//! Decoding is total: every input yields a record, and
//! [`Validity::is_valid`] tells whether its mandatory field was recognised.
//!
//! ```
//! use aton_notation::{LightDecoder, ToAtonTags, Validity, Vocabulary};
//!
//! let decoder = LightDecoder::new(&Vocabulary::default().light);
//! let light = decoder.decode("Mo(U)15s");
//! assert!(light.is_valid());
//! assert_eq!(light.group.as_deref(), Some("U"));
//! assert!(light.to_tags().iter().any(|tag| tag.key == "seamark:light:period"));
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod design_code;
pub mod error;
pub mod fog_signal;
pub mod io;
pub mod light;
pub mod models;
mod scanner;
pub mod tags;
pub mod validity;
pub mod vocabulary;

pub use batch::{BatchDecoder, ChangesetCounter, DecodedRow, ImportReport, NotationDecoders};
pub use config::ImportConfig;
pub use design_code::DesignCodeDecoder;
pub use error::{NotationError, Result};
pub use fog_signal::FogSignalDecoder;
pub use light::LightDecoder;
pub use models::{
    DecodedNotation, DesignCode, FogSignalCharacteristic, LightCharacteristic, NotationKind,
    NotationRow, StructureClass,
};
pub use tags::{AtonTag, ToAtonTags};
pub use validity::{Outcome, Validity};
pub use vocabulary::Vocabulary;
