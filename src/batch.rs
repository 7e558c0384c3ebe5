//! Concurrent batch decoding of exported sheet rows.
//!
//! Rows are split into chunks and each chunk is decoded on a blocking task.
//! Chunks are merged back in sheet order, so output row order never depends
//! on scheduling. Invalid notations are collected in an [`ImportReport`]
//! for manual review instead of failing the batch.

use crate::config::ImportConfig;
use crate::design_code::DesignCodeDecoder;
use crate::error::{NotationError, Result};
use crate::fog_signal::FogSignalDecoder;
use crate::light::LightDecoder;
use crate::models::{DecodedNotation, NotationKind, NotationRow, StructureClass};
use crate::tags::{AtonTag, ToAtonTags, merge_tags};
use crate::validity::{Outcome, Validity};
use crate::vocabulary::Vocabulary;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

/// The three decoders built from one vocabulary
#[derive(Debug, Clone)]
pub struct NotationDecoders {
    light: LightDecoder,
    fog_signal: FogSignalDecoder,
    design_code: DesignCodeDecoder,
}

impl NotationDecoders {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        vocabulary.validate()?;
        Ok(Self {
            light: LightDecoder::new(&vocabulary.light),
            fog_signal: FogSignalDecoder::new(&vocabulary.fog_signal),
            design_code: DesignCodeDecoder::new(&vocabulary.design_code)?,
        })
    }

    pub fn decode(&self, kind: NotationKind, raw: &str) -> DecodedNotation {
        match kind {
            NotationKind::Light => DecodedNotation::Light(self.light.decode(raw)),
            NotationKind::FogSignal => DecodedNotation::FogSignal(self.fog_signal.decode(raw)),
            NotationKind::DesignCode => {
                DecodedNotation::DesignCode(self.design_code.decode(raw))
            }
        }
    }

    pub fn light(&self) -> &LightDecoder {
        &self.light
    }

    pub fn fog_signal(&self) -> &FogSignalDecoder {
        &self.fog_signal
    }

    pub fn design_code(&self) -> &DesignCodeDecoder {
        &self.design_code
    }
}

/// Monotonic changeset sequence shared by all batches of a process
#[derive(Debug, Default)]
pub struct ChangesetCounter(AtomicU64);

impl ChangesetCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing sequence; the next changeset is `last + 1`
    pub fn starting_after(last: u64) -> Self {
        Self(AtomicU64::new(last))
    }

    /// Reserve the next changeset number
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last reserved changeset, 0 if none
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// One decoded notation cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedCell {
    pub kind: NotationKind,
    pub raw: String,
    pub notation: DecodedNotation,
    pub outcome: Outcome,
    /// Emitted tags, empty when the notation failed the validity gate
    pub tags: Vec<AtonTag>,
}

impl DecodedCell {
    pub fn is_valid(&self) -> bool {
        self.outcome == Outcome::Full
    }
}

/// All notations of one sheet row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRow {
    pub row: usize,
    pub name: Option<String>,
    pub changeset: u64,
    pub cells: Vec<DecodedCell>,
}

impl DecodedRow {
    /// Cells that must be reviewed by hand
    pub fn invalid_cells(&self) -> impl Iterator<Item = &DecodedCell> {
        self.cells.iter().filter(|cell| !cell.is_valid())
    }

    /// Tags of all valid cells combined into one AtoN.
    ///
    /// Design code tags are applied first, then fog signal, then light, so a
    /// light's `seamark:type` wins on combined structures.
    pub fn merged_tags(&self) -> Vec<AtonTag> {
        let mut tags = Vec::new();
        for kind in [
            NotationKind::DesignCode,
            NotationKind::FogSignal,
            NotationKind::Light,
        ] {
            for cell in self.cells.iter().filter(|cell| cell.kind == kind) {
                merge_tags(&mut tags, cell.tags.iter().cloned());
            }
        }
        tags
    }
}

/// A notation flagged for manual review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub name: Option<String>,
    pub kind: NotationKind,
    pub raw: String,
    pub outcome: Outcome,
}

/// Summary of one batch
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub changeset: u64,
    pub started_at: DateTime<Utc>,
    pub rows_read: usize,
    /// Rows without any notation cell
    pub rows_empty: usize,
    pub notations_decoded: usize,
    pub full: usize,
    pub partial: usize,
    pub no_match: usize,
    pub issues: Vec<RowIssue>,
    pub processing_time_ms: u128,
}

impl ImportReport {
    fn new(changeset: u64, started_at: DateTime<Utc>, rows: &[DecodedRow]) -> Self {
        let mut report = Self {
            changeset,
            started_at,
            rows_read: rows.len(),
            rows_empty: 0,
            notations_decoded: 0,
            full: 0,
            partial: 0,
            no_match: 0,
            issues: Vec::new(),
            processing_time_ms: 0,
        };

        for row in rows {
            if row.cells.is_empty() {
                report.rows_empty += 1;
            }
            for cell in &row.cells {
                report.notations_decoded += 1;
                match cell.outcome {
                    Outcome::Full => report.full += 1,
                    Outcome::Partial => report.partial += 1,
                    Outcome::NoMatch => report.no_match += 1,
                }
            }
            report.issues.extend(row.invalid_cells().map(|cell| RowIssue {
                row: row.row,
                name: row.name.clone(),
                kind: cell.kind,
                raw: cell.raw.clone(),
                outcome: cell.outcome,
            }));
        }
        report
    }

    /// Number of notations that failed the validity gate
    pub fn invalid_count(&self) -> usize {
        self.partial + self.no_match
    }

    /// Share of decoded notations that passed the validity gate
    pub fn success_rate(&self) -> f64 {
        if self.notations_decoded == 0 {
            0.0
        } else {
            (self.full as f64 / self.notations_decoded as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Changeset {}: {} rows, {} notations ({} full, {} partial, {} no match), {:.1}% valid in {}ms",
            self.changeset,
            self.rows_read,
            self.notations_decoded,
            self.full,
            self.partial,
            self.no_match,
            self.success_rate(),
            self.processing_time_ms
        )
    }
}

/// Decoded rows in sheet order plus the batch report
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub rows: Vec<DecodedRow>,
    pub report: ImportReport,
}

/// Decodes whole sheets concurrently
#[derive(Debug)]
pub struct BatchDecoder {
    decoders: Arc<NotationDecoders>,
    config: ImportConfig,
    changesets: Arc<ChangesetCounter>,
}

impl BatchDecoder {
    pub fn new(
        vocabulary: &Vocabulary,
        config: ImportConfig,
        changesets: Arc<ChangesetCounter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            decoders: Arc::new(NotationDecoders::new(vocabulary)?),
            config,
            changesets,
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Decode every row of a sheet under a freshly reserved changeset
    pub async fn decode_rows(&self, rows: Vec<NotationRow>) -> Result<BatchOutput> {
        let changeset = self.changesets.next();
        let started_at = Utc::now();
        let start = Instant::now();
        let structure_class = self.config.structure_class;

        info!(
            "Decoding {} rows as changeset {} ({} workers, chunks of {})",
            rows.len(),
            changeset,
            self.config.workers,
            self.config.chunk_size
        );

        let progress = self
            .config
            .show_progress
            .then(|| create_progress_bar(rows.len() as u64, "Decoding notations"));

        let chunks = into_chunks(rows, self.config.chunk_size);
        let chunk_count = chunks.len();
        debug!("Split batch into {} chunks", chunk_count);

        let results: Vec<Result<(usize, Vec<DecodedRow>)>> = stream::iter(chunks)
            .enumerate()
            .map(|(index, chunk)| {
                let decoders = Arc::clone(&self.decoders);
                let progress = progress.clone();
                async move {
                    let len = chunk.len() as u64;
                    let decoded = task::spawn_blocking(move || {
                        chunk
                            .iter()
                            .map(|row| decode_row(&decoders, row, changeset, structure_class))
                            .collect::<Vec<_>>()
                    })
                    .await
                    .map_err(|e| NotationError::BatchFailed {
                        reason: format!("chunk {} of {} failed: {}", index + 1, chunk_count, e),
                    })?;

                    if let Some(progress) = &progress {
                        progress.inc(len);
                    }
                    Ok((index, decoded))
                }
            })
            .buffer_unordered(self.config.workers)
            .collect()
            .await;

        let mut chunks = results.into_iter().collect::<Result<Vec<_>>>()?;
        chunks.sort_by_key(|(index, _)| *index);
        let rows: Vec<DecodedRow> = chunks.into_iter().flat_map(|(_, rows)| rows).collect();

        if let Some(progress) = progress {
            progress.finish_with_message("Decoding complete");
        }

        let mut report = ImportReport::new(changeset, started_at, &rows);
        report.processing_time_ms = start.elapsed().as_millis();

        for issue in &report.issues {
            warn!(
                "Row {} ({}): {} '{}' needs review ({})",
                issue.row,
                issue.name.as_deref().unwrap_or("unnamed"),
                issue.kind,
                issue.raw,
                issue.outcome
            );
        }
        info!("{}", report.summary());

        Ok(BatchOutput { rows, report })
    }
}

fn into_chunks(rows: Vec<NotationRow>, chunk_size: usize) -> Vec<Vec<NotationRow>> {
    let mut chunks = Vec::with_capacity(rows.len().div_ceil(chunk_size.max(1)));
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        chunks.push(rows.by_ref().take(chunk_size.max(1)).collect());
    }
    chunks
}

/// Decode all notation cells of one row.
///
/// Design codes are emitted as the structure class named by the row's AtoN
/// type, or as `default_class` when it names none.
pub fn decode_row(
    decoders: &NotationDecoders,
    row: &NotationRow,
    changeset: u64,
    default_class: StructureClass,
) -> DecodedRow {
    let structure_class = row.structure_class().unwrap_or(default_class);
    let cells = row
        .notations()
        .map(|(kind, raw)| {
            let notation = decoders.decode(kind, raw);
            let outcome = notation.outcome();
            let tags = match (&notation, outcome) {
                (_, Outcome::Partial | Outcome::NoMatch) => Vec::new(),
                (DecodedNotation::DesignCode(design_code), _) => {
                    design_code.to_tags_as(structure_class)
                }
                (notation, _) => notation.to_tags(),
            };
            DecodedCell {
                kind,
                raw: raw.to_string(),
                notation,
                outcome,
                tags,
            }
        })
        .collect();

    DecodedRow {
        row: row.row,
        name: row.name.clone(),
        changeset,
        cells,
    }
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}]",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
