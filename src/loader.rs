use crate::{
    CATEGORY, CITY, FileExtension, ORDER_DATE, PROFIT, QUANTITY, REGION, REQUIRED_COLUMNS, SALES,
    SEGMENT, SHIP_DATE, STATE, SUB_CATEGORY, SalesTable, SalesViewError, SalesViewResult,
    date_to_days, detect_date_format, excel_serial_to_date, parse_date,
};

use calamine::{Data, Reader, Xls, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;
use polars::prelude::*;
use std::{borrow::Cow, fs, io::Cursor, path::Path};

// --- Constants ---

/// Dataset loaded when the user supplies no file.
pub const DEFAULT_FALLBACK_FILE: &str = "Superstore.csv";

/// File name offered for the "Download Sample File" button.
pub const SAMPLE_FILE_NAME: &str = "Superstore_Sample.csv";

/// UTF-8 byte order mark, stripped from text input.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// --- Entry points ---

/// Loads a dataset from a file on disk, dispatching on its extension.
pub fn load_path(path: &Path) -> SalesViewResult<SalesTable> {
    if !path.is_file() {
        return Err(SalesViewError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let extension = FileExtension::from_path(path);

    tracing::info!(
        "Loading {} ({} bytes, {:?})",
        path.display(),
        bytes.len(),
        extension
    );

    load_bytes(&bytes, &extension)
}

/// Loads `path` when supplied, otherwise the designated fallback dataset.
///
/// A missing fallback is reported as `FallbackNotFound`; no empty table is substituted.
pub fn load_or_fallback(path: Option<&Path>, fallback: &Path) -> SalesViewResult<SalesTable> {
    match path {
        Some(path) => load_path(path),
        None => {
            if !fallback.is_file() {
                return Err(SalesViewError::FallbackNotFound(fallback.to_path_buf()));
            }
            tracing::info!("No input supplied, using fallback {}", fallback.display());
            load_path(fallback)
        }
    }
}

/// Raw bytes of the fallback dataset, served as the downloadable sample file.
pub fn sample_file_bytes(fallback: &Path) -> SalesViewResult<Vec<u8>> {
    if !fallback.is_file() {
        return Err(SalesViewError::FallbackNotFound(fallback.to_path_buf()));
    }
    Ok(fs::read(fallback)?)
}

/// Parses a byte stream in the declared format into a typed `SalesTable`.
///
/// ### Errors
/// * `UnsupportedFileType` for extensions other than csv/txt/xls/xlsx.
/// * `CsvParsing`, `Polars` or `Spreadsheet` when the bytes cannot be decoded.
/// * `MissingColumn` when a required column is absent.
/// * `InvalidDate` for the first empty or unparseable `Order Date`.
/// * `EmptyDataset` when there are no data rows.
pub fn load_bytes(bytes: &[u8], extension: &FileExtension) -> SalesViewResult<SalesTable> {
    let raw = match extension {
        FileExtension::Csv | FileExtension::Txt => {
            // separator() is Some for both delimited formats.
            let separator = extension.separator().unwrap_or(b',');
            read_delimited(bytes, separator)?
        }
        FileExtension::Xls => read_workbook::<Xls<_>>(bytes)?,
        FileExtension::Xlsx => read_workbook::<Xlsx<_>>(bytes)?,
        FileExtension::Unknown(ext) => {
            return Err(SalesViewError::UnsupportedFileType(format!(
                "`.{ext}` (expected csv, txt, xls or xlsx)"
            )));
        }
        FileExtension::Missing => {
            return Err(SalesViewError::UnsupportedFileType(
                "file has no extension".to_string(),
            ));
        }
    };

    tracing::debug!("Raw frame shape: {:?}", raw.shape());

    let df = normalize(raw)?;
    SalesTable::new(df)
}

// --- Readers ---

/// Decodes text as UTF-8 when valid, otherwise as ISO-8859-1.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::debug!("Input is not valid UTF-8, decoding as ISO-8859-1");
            // Every Latin-1 byte maps to the code point of the same value.
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

/// Reads delimited text with every column as String; typing happens in `normalize`.
fn read_delimited(bytes: &[u8], separator: u8) -> SalesViewResult<DataFrame> {
    let text = decode_text(bytes);

    if text.trim().is_empty() {
        return Err(SalesViewError::CsvParsing("input is empty".to_string()));
    }

    let parse_options = CsvParseOptions::default()
        .with_missing_is_null(true) // Treat empty fields as nulls
        .with_separator(separator);

    let df = CsvReadOptions::default()
        .with_parse_options(parse_options)
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // Header only: all columns read as String
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()?;

    Ok(df)
}

/// Reads the first worksheet of a workbook. The first row is the header.
fn read_workbook<R>(bytes: &[u8]) -> SalesViewResult<DataFrame>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: Into<calamine::Error>,
{
    let spreadsheet_error =
        |e: R::Error| SalesViewError::from(Into::<calamine::Error>::into(e));

    let mut workbook: R = open_workbook_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(spreadsheet_error)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SalesViewError::Spreadsheet("Workbook contains no sheets".to_string()))?
        .map_err(spreadsheet_error)?;

    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| SalesViewError::Spreadsheet("Worksheet is empty".to_string()))?
        .iter()
        .enumerate()
        .map(|(index, cell)| cell_to_string(cell).unwrap_or_else(|| format!("column_{index}")))
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
    for row in rows {
        for (index, column) in values.iter_mut().enumerate() {
            column.push(row.get(index).and_then(cell_to_string));
        }
    }

    let columns: Vec<Column> = header
        .iter()
        .zip(values)
        .map(|(name, column)| Series::new(name.as_str().into(), column).into_column())
        .collect();

    Ok(DataFrame::new_infer_height(columns)?)
}

/// Renders a worksheet cell as text. Empty and error cells become null.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => {
            excel_serial_to_date(dt.as_f64()).map(|d| d.format("%Y-%m-%d").to_string())
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => {
            tracing::warn!("Worksheet cell error {e:?} read as null");
            None
        }
    }
}

// --- Normalisation ---

/// Checks the required columns and coerces the typed ones.
///
/// `Order Date` is strict: any empty or unparseable value fails the load.
/// `Ship Date` is lenient: unparseable values become null.
fn normalize(mut df: DataFrame) -> SalesViewResult<DataFrame> {
    for name in REQUIRED_COLUMNS {
        if df.get_column_index(name).is_none() {
            return Err(SalesViewError::MissingColumn(name.to_string()));
        }
    }

    let order_date = parse_date_column(&df, ORDER_DATE, true)?;
    df.with_column(order_date.into())?;

    if df.get_column_index(SHIP_DATE).is_some() {
        let ship_date = parse_date_column(&df, SHIP_DATE, false)?;
        df.with_column(ship_date.into())?;
    }

    let text = |name: &str| col(name).cast(DataType::String).str().strip_chars(lit(NULL));

    let df = df
        .lazy()
        .with_columns([
            text(SALES).strict_cast(DataType::Float64),
            text(PROFIT).strict_cast(DataType::Float64),
            text(QUANTITY).strict_cast(DataType::Int64),
            text(REGION),
            text(STATE),
            text(CITY),
            text(CATEGORY),
            text(SUB_CATEGORY),
            text(SEGMENT),
        ])
        .collect()?;

    tracing::debug!("Normalized schema: {:?}", df.schema());

    Ok(df)
}

/// Parses a textual date column into a `DataType::Date` series.
fn parse_date_column(df: &DataFrame, name: &str, strict: bool) -> SalesViewResult<Series> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values: Vec<Option<&str>> = series.str()?.into_iter().collect();

    let format = detect_date_format(values.iter().flatten().copied());

    let invalid = |row: usize, value: &str| SalesViewError::InvalidDate {
        column: name.to_string(),
        row: row + 1,
        value: value.to_string(),
    };

    let mut days: Vec<Option<i32>> = Vec::with_capacity(values.len());
    let mut rejected = 0usize;

    for (row, value) in values.iter().enumerate() {
        let value = value.map(str::trim).unwrap_or_default();
        match parse_cell_date(value, format) {
            Some(date) => days.push(Some(date_to_days(date))),
            None if strict => return Err(invalid(row, value)),
            None => {
                rejected += 1;
                days.push(None);
            }
        }
    }

    if rejected > 0 {
        tracing::warn!("{rejected} value(s) in '{name}' could not be parsed and were set to null");
    }

    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}

/// Parses one date cell with the column's detected text format.
///
/// Only a column without a text date shape is read as Excel serial numbers, so a stray
/// number in a text date column is rejected rather than read as a 1900 date.
fn parse_cell_date(value: &str, format: Option<&str>) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    match format {
        Some(format) => parse_date(value, format),
        None => value.parse::<f64>().ok().and_then(excel_serial_to_date),
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
