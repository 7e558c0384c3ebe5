//! Reading exported AtoN sheets and writing tag tables.
//!
//! Sheets are CSV files with a header row; every column is read as text so
//! notations like `"1,5s"` survive untouched. Tag tables hold one row per
//! emitted tag (`row`, `name`, `changeset`, `source`, `key`, `value`) and are
//! written as CSV or Parquet. JSON output instead lists one merged tag set
//! per AtoN.

use crate::batch::DecodedRow;
use crate::config::{ColumnNames, CompressionAlgorithm};
use crate::error::{NotationError, Result};
use crate::models::NotationRow;
use crate::tags::AtonTag;
use polars::prelude::{
    Column, CsvReadOptions, CsvWriter, DataFrame, DataType, ParquetWriter, SerReader, SerWriter,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

/// Output format of a tag table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    Csv,
    Parquet,
    Json,
}

impl TableFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(TableFormat::Csv),
            "parquet" | "pq" => Some(TableFormat::Parquet),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

/// Read notation rows from an exported CSV sheet.
///
/// Missing notation columns are treated as empty; at least one of them must
/// exist. The name and AtoN type columns are optional.
pub fn read_notation_rows(path: &Path, columns: &ColumnNames) -> Result<Vec<NotationRow>> {
    if !path.exists() {
        return Err(NotationError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(
        "Read {} rows with columns {:?} from {}",
        df.height(),
        df.get_column_names(),
        path.display()
    );

    let character = text_column(&df, &columns.character)?;
    let fog_signal = text_column(&df, &columns.fog_signal)?;
    let design_code = text_column(&df, &columns.design_code)?;
    if character.is_none() && fog_signal.is_none() && design_code.is_none() {
        return Err(NotationError::MissingColumns {
            path: path.to_path_buf(),
            expected: columns
                .notation_columns()
                .iter()
                .map(|column| column.to_string())
                .collect(),
        });
    }
    let name = text_column(&df, &columns.name)?;
    let aton_type = text_column(&df, &columns.aton_type)?;

    let cell = |values: &Option<Vec<Option<String>>>, row: usize| {
        values
            .as_ref()
            .and_then(|values| values.get(row).cloned().flatten())
    };
    let rows = (0..df.height())
        .map(|row| NotationRow {
            row,
            name: cell(&name, row),
            aton_type: cell(&aton_type, row),
            character: cell(&character, row),
            fog_signal: cell(&fog_signal, row),
            design_code: cell(&design_code, row),
        })
        .collect();
    Ok(rows)
}

fn text_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    if df.get_column_index(name).is_none() {
        return Ok(None);
    }
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(Some(values))
}

/// One tag per table row, for every valid notation of every sheet row
pub fn tag_table(rows: &[DecodedRow]) -> Result<DataFrame> {
    let mut row_index = Vec::new();
    let mut names = Vec::new();
    let mut changesets = Vec::new();
    let mut sources = Vec::new();
    let mut keys = Vec::new();
    let mut values = Vec::new();

    for row in rows {
        for cell in &row.cells {
            for tag in &cell.tags {
                row_index.push(row.row as u64);
                names.push(row.name.clone());
                changesets.push(row.changeset);
                sources.push(cell.kind.name().to_string());
                keys.push(tag.key.clone());
                values.push(tag.value.clone());
            }
        }
    }

    let df = DataFrame::new(vec![
        Column::new("row".into(), row_index),
        Column::new("name".into(), names),
        Column::new("changeset".into(), changesets),
        Column::new("source".into(), sources),
        Column::new("key".into(), keys),
        Column::new("value".into(), values),
    ])?;
    Ok(df)
}

/// Merged tags of one AtoN, as written to JSON
#[derive(Debug, Clone, Serialize)]
pub struct AtonRecord {
    pub row: usize,
    pub name: Option<String>,
    pub changeset: u64,
    pub tags: Vec<AtonTag>,
}

/// AtoNs with at least one emitted tag
pub fn aton_records(rows: &[DecodedRow]) -> Vec<AtonRecord> {
    rows.iter()
        .map(|row| AtonRecord {
            row: row.row,
            name: row.name.clone(),
            changeset: row.changeset,
            tags: row.merged_tags(),
        })
        .filter(|record| !record.tags.is_empty())
        .collect()
}

/// Write decoded rows in the given format, returning the number of records
/// written (tags for tables, AtoNs for JSON)
pub fn write_tag_table(
    rows: &[DecodedRow],
    path: &Path,
    format: TableFormat,
    compression: CompressionAlgorithm,
) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = match format {
        TableFormat::Csv => {
            let mut df = tag_table(rows)?;
            let mut file = File::create(path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
            df.height()
        }
        TableFormat::Parquet => {
            let mut df = tag_table(rows)?;
            let file = File::create(path)?;
            ParquetWriter::new(file)
                .with_compression(compression.to_polars_compression())
                .finish(&mut df)?;
            df.height()
        }
        TableFormat::Json => {
            let records = aton_records(rows);
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &records)?;
            records.len()
        }
    };

    info!(
        "Wrote {} {} records to {}",
        written,
        match format {
            TableFormat::Csv => "CSV",
            TableFormat::Parquet => "Parquet",
            TableFormat::Json => "JSON",
        },
        path.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{NotationDecoders, decode_row};
    use crate::models::StructureClass;
    use crate::vocabulary::Vocabulary;
    use polars::prelude::ParquetReader;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_sheet(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("sheet.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        path
    }

    fn decoded_rows() -> Vec<DecodedRow> {
        let decoders = NotationDecoders::new(&Vocabulary::default()).unwrap();
        let rows = vec![
            NotationRow {
                row: 0,
                name: Some("Nab Tower".to_string()),
                character: Some("Fl.W.10s".to_string()),
                fog_signal: Some("HORN(2)30s".to_string()),
                ..Default::default()
            },
            NotationRow {
                row: 1,
                name: None,
                character: Some("???".to_string()),
                ..Default::default()
            },
        ];
        rows.iter()
            .map(|row| decode_row(&decoders, row, 5, StructureClass::Buoy))
            .collect()
    }

    #[test]
    fn test_read_rows_keeps_notations_as_text() {
        let dir = TempDir::new().unwrap();
        let path = write_sheet(
            &dir,
            "name,character,fog_signal,design_code\n\
             Nab Tower,\"2 Oc.W.R G.1,5s\",HORN(3)30s,\n\
             Buoy 7,Fl.G.5s,,2S5NC/B\n",
        );

        let rows = read_notation_rows(&path, &ColumnNames::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 0);
        assert_eq!(rows[0].name.as_deref(), Some("Nab Tower"));
        assert_eq!(rows[0].character.as_deref(), Some("2 Oc.W.R G.1,5s"));
        assert!(rows[0].design_code.as_deref().unwrap_or("").is_empty());
        assert_eq!(rows[1].design_code.as_deref(), Some("2S5NC/B"));
        assert_eq!(rows[1].notations().count(), 2);
    }

    #[test]
    fn test_read_rows_with_custom_and_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_sheet(&dir, "Light Character,id\nIso.WRG.4s,1\n");
        let columns = ColumnNames {
            character: "Light Character".to_string(),
            ..Default::default()
        };

        let rows = read_notation_rows(&path, &columns).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].character.as_deref(), Some("Iso.WRG.4s"));
        assert_eq!(rows[0].name, None);
        assert_eq!(rows[0].aton_type, None);
        assert_eq!(rows[0].fog_signal, None);
    }

    #[test]
    fn test_read_rows_without_notation_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_sheet(&dir, "id,label\n1,foo\n");
        let err = read_notation_rows(&path, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, NotationError::MissingColumns { .. }));
    }

    #[test]
    fn test_read_rows_missing_file() {
        let err =
            read_notation_rows(Path::new("/nonexistent/sheet.csv"), &ColumnNames::default())
                .unwrap_err();
        assert!(matches!(err, NotationError::InputNotFound { .. }));
    }

    #[test]
    fn test_tag_table_skips_invalid_cells() {
        let df = tag_table(&decoded_rows()).unwrap();
        let expected = decoded_rows()[0]
            .cells
            .iter()
            .map(|cell| cell.tags.len())
            .sum::<usize>();
        assert_eq!(df.height(), expected);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            vec!["row", "name", "changeset", "source", "key", "value"]
        );
    }

    #[test]
    fn test_write_csv_and_parquet() {
        let dir = TempDir::new().unwrap();
        let rows = decoded_rows();

        let csv_path = dir.path().join("out/tags.csv");
        let written =
            write_tag_table(&rows, &csv_path, TableFormat::Csv, CompressionAlgorithm::Snappy)
                .unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with("row,name,changeset,source,key,value"));
        assert!(content.contains("seamark:light:character,Fl"));
        assert_eq!(content.lines().count(), written + 1);

        let parquet_path = dir.path().join("tags.parquet");
        let written = write_tag_table(
            &rows,
            &parquet_path,
            TableFormat::Parquet,
            CompressionAlgorithm::Zstd,
        )
        .unwrap();
        let df = ParquetReader::new(File::open(&parquet_path).unwrap())
            .finish()
            .unwrap();
        assert_eq!(df.height(), written);
    }

    #[test]
    fn test_write_json_merges_per_aton() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("atons.json");
        let written = write_tag_table(
            &decoded_rows(),
            &path,
            TableFormat::Json,
            CompressionAlgorithm::default(),
        )
        .unwrap();
        assert_eq!(written, 1);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["name"], "Nab Tower");
        assert_eq!(json[0]["changeset"], 5);
        assert_eq!(json[0]["tags"][0]["key"], "seamark:type");
        assert_eq!(json[0]["tags"][0]["value"], "light");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("tags.PARQUET")),
            Some(TableFormat::Parquet)
        );
        assert_eq!(
            TableFormat::from_path(Path::new("tags.csv")),
            Some(TableFormat::Csv)
        );
        assert_eq!(TableFormat::from_path(Path::new("tags")), None);
    }
}
