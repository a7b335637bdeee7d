// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::constant;
use crate::error::SorrelError;
use crate::im::ClassEntry;

/// Read a delimited class definition table
///
/// The table must carry `name`, `r`, `g`, and `b` columns with channel
/// values between 0 and 255. Row order defines class indices.
///
/// # Arguments
///
/// * `path` - A path to a delimited table (e.g. the CamVid class_dict.csv)
/// * `separator` - Field separator byte (b',' for CSV, b'\t' for TSV)
///
/// # Examples
///
/// ```no_run
/// use sorrel_core::io::read_class_table;
///
/// let entries = read_class_table("class_dict.csv", b',').unwrap();
/// ```
pub fn read_class_table<P: AsRef<Path>>(
    path: P,
    separator: u8,
) -> Result<Vec<ClassEntry>, SorrelError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|options| options.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))
        .map_err(|err| SorrelError::TableError(err.to_string()))?
        .finish()
        .map_err(|err| SorrelError::TableError(err.to_string()))?;

    for column in constant::CLASS_TABLE_COLUMNS {
        if df.column(column).is_err() {
            return Err(SorrelError::TableError(format!(
                "Class tables require the columns: {}",
                constant::CLASS_TABLE_COLUMNS.join(", ")
            )));
        }
    }

    let names = df
        .column("name")
        .and_then(|column| column.as_materialized_series().str().map(|c| c.clone()))
        .map_err(|err| SorrelError::TableError(err.to_string()))?;

    let mut channels = Vec::with_capacity(3);

    for column in ["r", "g", "b"] {
        let values = df
            .column(column)
            .and_then(|column| column.as_materialized_series().cast(&DataType::Int64))
            .and_then(|series| series.i64().map(|c| c.clone()))
            .map_err(|err| SorrelError::TableError(err.to_string()))?;

        channels.push(values);
    }

    let mut entries = Vec::with_capacity(df.height());

    for (row, name) in names.into_iter().enumerate() {
        let name = name.ok_or_else(|| {
            SorrelError::TableError(format!("Class name missing at row {}", row))
        })?;

        let mut color = [0u8; 3];

        for (channel, values) in color.iter_mut().zip(&channels) {
            let value = values.get(row).ok_or_else(|| {
                SorrelError::TableError(format!("Channel value missing at row {}", row))
            })?;

            *channel = u8::try_from(value).map_err(|_| {
                SorrelError::TableError(format!(
                    "Channel value {} at row {} is outside the 0-255 range",
                    value, row
                ))
            })?;
        }

        entries.push(ClassEntry {
            name: name.to_string(),
            color,
        });
    }

    Ok(entries)
}

/// Read a JSON class definition table
///
/// The file must contain an array of `{"name": ..., "color": [r, g, b]}`
/// objects in class index order.
///
/// # Arguments
///
/// * `path` - A path to a JSON class table
pub fn read_class_table_json<P: AsRef<Path>>(path: P) -> Result<Vec<ClassEntry>, SorrelError> {
    let file = File::open(&path).map_err(|_| {
        SorrelError::NoFileError(path.as_ref().to_string_lossy().to_string())
    })?;

    serde_json::from_reader(file).map_err(|err| SorrelError::TableError(err.to_string()))
}

/// Write a DataFrame to disk, dispatching on the output extension
///
/// # Arguments
///
/// * `df` - A DataFrame
/// * `path` - Output path ending in .csv, .tsv, .txt, .parquet, or .pq
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use sorrel_core::io::write_table;
///
/// let column = vec![Column::new("pixels".into(), [104u32, 312, 87])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table(&mut df, "counts.csv").unwrap()
/// ```
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SorrelError> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    if let Some(ext) = extension {
        match ext.as_str() {
            "csv" => write_table_delimited(df, path, b','),
            "tsv" => write_table_delimited(df, path, b'\t'),
            "txt" => write_table_delimited(df, path, b'\t'),
            "parquet" => write_table_pq(df, path),
            "pq" => write_table_pq(df, path),
            _ => Err(SorrelError::TableError(
                "Failed to write table.".to_string(),
            )),
        }
    } else {
        Err(SorrelError::TableError(
            "Provided table path has an invalid extension. Must be one of: csv, tsv, txt, parquet, or pq.".to_string()
        ))
    }
}

/// Write a table to a delimited text file
fn write_table_delimited<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    separator: u8,
) -> Result<(), SorrelError> {
    let mut output: File = File::create(&path).map_err(|_| {
        SorrelError::TableError(format!(
            "Failed to create output file: {}",
            path.as_ref().to_string_lossy()
        ))
    })?;

    CsvWriter::new(&mut output)
        .include_header(true)
        .with_separator(separator)
        .finish(df)
        .map_err(|_| SorrelError::TableError("Failed to write delimited file.".to_string()))
}

/// Write a table to a parquet file
fn write_table_pq<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), SorrelError> {
    let mut output: File = File::create(&path).map_err(|_| {
        SorrelError::TableError(format!(
            "Failed to create output file: {}",
            path.as_ref().to_string_lossy()
        ))
    })?;

    ParquetWriter::new(&mut output)
        .finish(df)
        .map(|_| ())
        .map_err(|_| SorrelError::TableError("Failed to write parquet file.".to_string()))
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_read_class_table_csv() {
        const TEST_TABLE: &str = "TEST_READ_CLASS_TABLE.csv";

        std::fs::write(
            TEST_TABLE,
            "name,r,g,b\nVoid,0,0,0\nRoad,128,64,128\n",
        )
        .unwrap();

        let entries = read_class_table(TEST_TABLE, b',').unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Void");
        assert_eq!(entries[1].color, [128, 64, 128]);

        std::fs::remove_file(TEST_TABLE).unwrap();
    }

    #[test]
    fn test_read_class_table_missing_column() {
        const TEST_TABLE: &str = "TEST_READ_CLASS_TABLE_MISSING.csv";

        std::fs::write(TEST_TABLE, "name,r,g\nVoid,0,0\n").unwrap();

        assert!(read_class_table(TEST_TABLE, b',').is_err());

        std::fs::remove_file(TEST_TABLE).unwrap();
    }

    #[test]
    fn test_read_class_table_out_of_range() {
        const TEST_TABLE: &str = "TEST_READ_CLASS_TABLE_RANGE.csv";

        std::fs::write(TEST_TABLE, "name,r,g,b\nVoid,300,0,0\n").unwrap();

        assert!(read_class_table(TEST_TABLE, b',').is_err());

        std::fs::remove_file(TEST_TABLE).unwrap();
    }

    #[test]
    fn test_read_class_table_json() {
        const TEST_TABLE: &str = "TEST_READ_CLASS_TABLE.json";

        std::fs::write(
            TEST_TABLE,
            r#"[{"name": "Void", "color": [0, 0, 0]}, {"name": "Sky", "color": [128, 128, 128]}]"#,
        )
        .unwrap();

        let entries = read_class_table_json(TEST_TABLE).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Sky");
        assert_eq!(entries[1].color, [128, 128, 128]);

        std::fs::remove_file(TEST_TABLE).unwrap();
    }

    #[test]
    fn test_write_table_csv() {
        const TEST_TABLE: &str = "TEST_WRITE_TABLE.csv";

        let mut df =
            DataFrame::new(vec![Column::new("pixels".into(), [1u32, 2, 3])]).unwrap();

        write_table(&mut df, TEST_TABLE).unwrap();

        let written = std::fs::read_to_string(TEST_TABLE).unwrap();
        assert!(written.starts_with("pixels"));

        std::fs::remove_file(TEST_TABLE).unwrap();
    }

    #[test]
    fn test_write_table_invalid_extension() {
        let mut df =
            DataFrame::new(vec![Column::new("pixels".into(), [1u32, 2, 3])]).unwrap();

        assert!(write_table(&mut df, "counts.xyz").is_err());
    }
}
