//! Sheet import from CSV through batch decoding to tag tables

use aton_notation::batch::{BatchDecoder, ChangesetCounter};
use aton_notation::config::{ColumnNames, CompressionAlgorithm, ImportConfig};
use aton_notation::io::{TableFormat, read_notation_rows, write_tag_table};
use aton_notation::{NotationKind, Outcome, StructureClass, Vocabulary};
use polars::prelude::{ParquetReader, SerReader};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const SHEET: &str = "\
name,character,fog_signal,design_code
Nab Tower,Fl(2)W.10s,HORN(2)30s,
East Bramble,VQ(3)W.5s,,1S7EC/RA
Unlit spar,,,+1S7SC/R
Mystery,Dir W 4s,Klaxon,
Empty,,,
Outer Spit,Q(6)+LFl W 15s,,2S5NC/B
";

const MIXED_SHEET: &str = "\
name,type,design_code
Ship Head,Buoy,1S7NC
Long Sand Head,Beacon,1S7NC
Bar Light,Light Vessel,1S7NC
";

fn write_sheet(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("atons.csv");
    std::fs::write(&path, SHEET).unwrap();
    path
}

fn batch_decoder(config: ImportConfig) -> BatchDecoder {
    BatchDecoder::new(
        &Vocabulary::default(),
        config,
        Arc::new(ChangesetCounter::starting_after(99)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_import_report_flags_invalid_rows() {
    let dir = TempDir::new().unwrap();
    let rows = read_notation_rows(&write_sheet(&dir), &ColumnNames::default()).unwrap();
    assert_eq!(rows.len(), 6);

    let output = batch_decoder(ImportConfig::default().with_chunk_size(2))
        .decode_rows(rows)
        .await
        .unwrap();
    let report = &output.report;

    assert_eq!(report.changeset, 100);
    assert_eq!(report.rows_read, 6);
    assert_eq!(report.rows_empty, 1);
    assert_eq!(report.notations_decoded, 9);
    assert_eq!(report.invalid_count(), 2);

    let flagged: Vec<_> = report
        .issues
        .iter()
        .map(|issue| (issue.row, issue.kind, issue.outcome))
        .collect();
    assert_eq!(
        flagged,
        vec![
            (3, NotationKind::Light, Outcome::Partial),
            (3, NotationKind::FogSignal, Outcome::NoMatch),
        ]
    );
    assert_eq!(report.issues[0].name.as_deref(), Some("Mystery"));
    assert!(output.rows.iter().all(|row| row.changeset == 100));
}

#[tokio::test]
async fn test_parquet_tag_table() {
    let dir = TempDir::new().unwrap();
    let rows = read_notation_rows(&write_sheet(&dir), &ColumnNames::default()).unwrap();
    let output = batch_decoder(ImportConfig::default().with_workers(2))
        .decode_rows(rows)
        .await
        .unwrap();

    let path = dir.path().join("tags.parquet");
    let written = write_tag_table(
        &output.rows,
        &path,
        TableFormat::Parquet,
        CompressionAlgorithm::Snappy,
    )
    .unwrap();

    let df = ParquetReader::new(File::open(&path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), written);

    let keys: Vec<String> = df
        .column("key")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    assert!(keys.contains(&"seamark:buoy_cardinal:category".to_string()));
    assert!(keys.contains(&"seamark:gla:design_code:unlit".to_string()));

    let sources: Vec<String> = df
        .column("source")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    assert!(sources.iter().all(|source| {
        ["light", "fog_signal", "design_code"].contains(&source.as_str())
    }));
}

#[tokio::test]
async fn test_beacon_import_to_json() {
    let dir = TempDir::new().unwrap();
    let rows = read_notation_rows(&write_sheet(&dir), &ColumnNames::default()).unwrap();
    let output = batch_decoder(
        ImportConfig::default().with_structure_class(StructureClass::Beacon),
    )
    .decode_rows(rows)
    .await
    .unwrap();

    let path = dir.path().join("atons.json");
    let written = write_tag_table(
        &output.rows,
        &path,
        TableFormat::Json,
        CompressionAlgorithm::default(),
    )
    .unwrap();
    // Mystery has no valid notation and Empty has none at all
    assert_eq!(written, 4);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let unlit_spar = &json[2];
    assert_eq!(unlit_spar["name"], "Unlit spar");
    let tags = unlit_spar["tags"].as_array().unwrap();
    assert!(tags.iter().any(|tag| {
        tag["key"] == "seamark:type" && tag["value"] == "beacon_cardinal"
    }));
}

#[tokio::test]
async fn test_row_type_decides_buoy_or_beacon() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.csv");
    std::fs::write(&path, MIXED_SHEET).unwrap();

    let rows = read_notation_rows(&path, &ColumnNames::default()).unwrap();
    assert_eq!(rows[1].aton_type.as_deref(), Some("Beacon"));

    let output = batch_decoder(
        ImportConfig::default().with_structure_class(StructureClass::Buoy),
    )
    .decode_rows(rows)
    .await
    .unwrap();

    let seamark_types: Vec<String> = output
        .rows
        .iter()
        .map(|row| {
            row.merged_tags()
                .into_iter()
                .find(|tag| tag.key == "seamark:type")
                .map(|tag| tag.value)
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(
        seamark_types,
        vec!["buoy_cardinal", "beacon_cardinal", "buoy_cardinal"]
    );
    assert!(output.rows.iter().all(|row| {
        row.merged_tags()
            .iter()
            .any(|tag| tag.key == "seamark:status" && tag.value == "permanent")
    }));
}
