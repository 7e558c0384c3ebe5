//! Import configuration.
//!
//! Settings for batch imports of exported AtoN sheets: concurrency, the
//! column names holding each notation, how design codes are emitted and how
//! tag tables are compressed.

use crate::constants::{
    DEFAULT_CHARACTER_COLUMN, DEFAULT_CHUNK_SIZE, DEFAULT_DESIGN_CODE_COLUMN,
    DEFAULT_FOG_SIGNAL_COLUMN, DEFAULT_NAME_COLUMN, DEFAULT_TYPE_COLUMN,
};
use crate::error::{NotationError, Result};
use crate::models::{NotationKind, StructureClass};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};

/// Supported compression algorithms for parquet tag tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Sheet columns holding the name, the AtoN type and each notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub name: String,
    pub aton_type: String,
    pub character: String,
    pub fog_signal: String,
    pub design_code: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_COLUMN.to_string(),
            aton_type: DEFAULT_TYPE_COLUMN.to_string(),
            character: DEFAULT_CHARACTER_COLUMN.to_string(),
            fog_signal: DEFAULT_FOG_SIGNAL_COLUMN.to_string(),
            design_code: DEFAULT_DESIGN_CODE_COLUMN.to_string(),
        }
    }
}

impl ColumnNames {
    /// Column holding the given notation
    pub fn for_kind(&self, kind: NotationKind) -> &str {
        match kind {
            NotationKind::Light => &self.character,
            NotationKind::FogSignal => &self.fog_signal,
            NotationKind::DesignCode => &self.design_code,
        }
    }

    /// The three notation columns in decoder order
    pub fn notation_columns(&self) -> [&str; 3] {
        [&self.character, &self.fog_signal, &self.design_code]
    }
}

/// Configuration for batch imports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum number of chunks decoded concurrently
    pub workers: usize,

    /// Rows decoded per blocking task
    pub chunk_size: usize,

    pub columns: ColumnNames,

    /// Whether design codes are emitted as buoys or beacons when the row's
    /// AtoN type names neither
    pub structure_class: StructureClass,

    /// Parquet compression for tag tables
    pub compression: CompressionAlgorithm,

    /// Show a progress bar while decoding
    pub show_progress: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            columns: ColumnNames::default(),
            structure_class: StructureClass::default(),
            compression: CompressionAlgorithm::default(),
            show_progress: false,
        }
    }
}

impl ImportConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with custom chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Emit design codes as the given structure class unless the row says otherwise
    pub fn with_structure_class(mut self, structure_class: StructureClass) -> Self {
        self.structure_class = structure_class;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Enable the progress bar
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Reject settings the batch decoder cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(NotationError::configuration("workers must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(NotationError::configuration("chunk size must be at least 1"));
        }

        let columns = &self.columns;
        let all_columns = [
            &columns.name,
            &columns.aton_type,
            &columns.character,
            &columns.fog_signal,
            &columns.design_code,
        ];
        if all_columns.iter().any(|column| column.trim().is_empty()) {
            return Err(NotationError::configuration("column names must not be blank"));
        }
        Ok(())
    }
}
