//! Command-line argument definitions for the AtoN notation tool
//!
//! Defines the CLI with the clap derive API: a `decode` command for ad-hoc
//! notation strings, an `import` command for exported sheets and a
//! `vocabulary` command that dumps the active abbreviation tables.

use crate::config::{ColumnNames, CompressionAlgorithm, ImportConfig};
use crate::constants::{
    DEFAULT_CHARACTER_COLUMN, DEFAULT_CHUNK_SIZE, DEFAULT_DESIGN_CODE_COLUMN,
    DEFAULT_FOG_SIGNAL_COLUMN, DEFAULT_NAME_COLUMN, DEFAULT_TYPE_COLUMN,
};
use crate::error::{NotationError, Result};
use crate::io::TableFormat;
use crate::models::{NotationKind, StructureClass};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the AtoN notation tool
///
/// Decodes light characteristics, fog signals and GLA design codes from
/// light-list and sheet notation into OSM seamark tags.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "aton-notation",
    version,
    about = "Decode AtoN light, fog signal and design code notation into seamark tags",
    long_about = "Decodes Aids-to-Navigation notation as found in light lists and exported \
                  AtoN sheets (light characteristics such as \"Fl(2+1)W.10s\", fog signals \
                  such as \"HORN(3)30s\" and GLA design codes such as \"1S9SC-AIS/R/MH\") \
                  into OSM seamark tags. Rows that cannot be decoded are reported for \
                  manual review instead of failing the import."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON vocabulary file replacing the built-in abbreviation tables
    #[arg(long = "vocabulary", value_name = "FILE", global = true)]
    pub vocabulary: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode notation strings given on the command line
    Decode(DecodeArgs),
    /// Decode an exported AtoN sheet and write a tag table
    Import(ImportArgs),
    /// Print the active vocabulary as JSON
    Vocabulary(VocabularyArgs),
}

/// Arguments for the decode command
#[derive(Debug, Clone, Parser)]
pub struct DecodeArgs {
    /// Kind of notation to decode
    #[arg(value_enum)]
    pub kind: KindArg,

    /// One or more notation strings
    #[arg(required = true, value_name = "NOTATION")]
    pub notations: Vec<String>,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Emit design codes as beacons instead of buoys
    #[arg(long = "beacon")]
    pub beacon: bool,
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Exported AtoN sheet (CSV with a header row)
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output file for the tag table; format follows the extension unless
    /// --table-format is given
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Tag table format
    #[arg(long = "table-format", value_enum)]
    pub table_format: Option<TableFormatArg>,

    /// Parquet compression algorithm
    #[arg(long = "compression", value_enum, default_value_t = CompressionArg::Snappy)]
    pub compression: CompressionArg,

    /// Number of concurrent decoding tasks (defaults to the CPU count)
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Rows decoded per task
    #[arg(long = "chunk-size", value_name = "ROWS", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    #[arg(long = "name-column", value_name = "COLUMN", default_value = DEFAULT_NAME_COLUMN)]
    pub name_column: String,

    /// Column naming each AtoN's type; `Buoy` and `Beacon` rows override --beacon
    #[arg(long = "type-column", value_name = "COLUMN", default_value = DEFAULT_TYPE_COLUMN)]
    pub type_column: String,

    #[arg(long = "character-column", value_name = "COLUMN", default_value = DEFAULT_CHARACTER_COLUMN)]
    pub character_column: String,

    #[arg(long = "fog-signal-column", value_name = "COLUMN", default_value = DEFAULT_FOG_SIGNAL_COLUMN)]
    pub fog_signal_column: String,

    #[arg(long = "design-code-column", value_name = "COLUMN", default_value = DEFAULT_DESIGN_CODE_COLUMN)]
    pub design_code_column: String,

    /// Emit design codes as beacons when the row's type names neither buoy nor beacon
    #[arg(long = "beacon")]
    pub beacon: bool,

    /// Last changeset number already used; the import takes the next one
    #[arg(long = "changeset-after", value_name = "N", default_value_t = 0)]
    pub changeset_after: u64,

    /// Report format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Exit with an error status when any notation needs review
    #[arg(long = "strict")]
    pub strict: bool,
}

/// Arguments for the vocabulary command
#[derive(Debug, Clone, Parser)]
pub struct VocabularyArgs {
    /// Write to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Light characteristic, e.g. "Fl(2+1)W.10s"
    Light,
    /// Fog signal, e.g. "HORN(3)30s"
    Fog,
    /// GLA design code, e.g. "2S5NC/B"
    Design,
}

impl From<KindArg> for NotationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Light => NotationKind::Light,
            KindArg::Fog => NotationKind::FogSignal,
            KindArg::Design => NotationKind::DesignCode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormatArg {
    Csv,
    Parquet,
    Json,
}

impl From<TableFormatArg> for TableFormat {
    fn from(format: TableFormatArg) -> Self {
        match format {
            TableFormatArg::Csv => TableFormat::Csv,
            TableFormatArg::Parquet => TableFormat::Parquet,
            TableFormatArg::Json => TableFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    Snappy,
    Zstd,
    Lz4,
    None,
}

impl From<CompressionArg> for CompressionAlgorithm {
    fn from(compression: CompressionArg) -> Self {
        match compression {
            CompressionArg::Snappy => CompressionAlgorithm::Snappy,
            CompressionArg::Zstd => CompressionAlgorithm::Zstd,
            CompressionArg::Lz4 => CompressionAlgorithm::Lz4,
            CompressionArg::None => CompressionAlgorithm::Uncompressed,
        }
    }
}

fn structure_class(beacon: bool) -> StructureClass {
    if beacon {
        StructureClass::Beacon
    } else {
        StructureClass::Buoy
    }
}

impl Args {
    /// Get log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl DecodeArgs {
    pub fn structure_class(&self) -> StructureClass {
        structure_class(self.beacon)
    }
}

impl ImportArgs {
    /// Validate the import arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(NotationError::InputNotFound {
                path: self.input.clone(),
            });
        }
        if !self.input.is_file() {
            return Err(NotationError::configuration(format!(
                "Input path is not a file: {}",
                self.input.display()
            )));
        }
        if let Some(output) = &self.output {
            if self.table_format.is_none() && TableFormat::from_path(output).is_none() {
                return Err(NotationError::configuration(format!(
                    "Cannot infer table format from {}; use --table-format",
                    output.display()
                )));
            }
        }
        Ok(())
    }

    /// Table format from the flag, else from the output extension
    pub fn table_format(&self) -> Option<TableFormat> {
        self.table_format.map(TableFormat::from).or_else(|| {
            self.output
                .as_deref()
                .and_then(TableFormat::from_path)
        })
    }

    /// Build the import configuration from the command line
    pub fn to_config(&self, show_progress: bool) -> ImportConfig {
        let mut config = ImportConfig::default()
            .with_chunk_size(self.chunk_size)
            .with_columns(ColumnNames {
                name: self.name_column.clone(),
                aton_type: self.type_column.clone(),
                character: self.character_column.clone(),
                fog_signal: self.fog_signal_column.clone(),
                design_code: self.design_code_column.clone(),
            })
            .with_structure_class(structure_class(self.beacon))
            .with_compression(self.compression.into());

        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if show_progress {
            config = config.with_progress();
        }
        config
    }
}
