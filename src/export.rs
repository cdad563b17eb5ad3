use crate::{DashboardView, SalesViewResult};

use polars::prelude::*;
use std::{
    fmt,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

/// The downloadable CSV artifacts of a dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Sales per category.
    Category,
    /// Sales per region.
    Region,
    /// Monthly sales series.
    TimeSeries,
    /// The date-filtered rows.
    Data,
}

impl ExportKind {
    pub const ALL: [ExportKind; 4] = [
        ExportKind::Category,
        ExportKind::Region,
        ExportKind::TimeSeries,
        ExportKind::Data,
    ];

    /// File name offered to the user and used in headless mode.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::Category => "Category.csv",
            ExportKind::Region => "Region.csv",
            ExportKind::TimeSeries => "TimeSeries.csv",
            ExportKind::Data => "Data.csv",
        }
    }

    /// Button caption in the dashboard.
    pub fn button_label(self) -> &'static str {
        match self {
            ExportKind::Category => "Download Category Data",
            ExportKind::Region => "Download Region Data",
            ExportKind::TimeSeries => "Download Time Series Data",
            ExportKind::Data => "Download Data",
        }
    }

    /// The table of `view` this artifact serialises.
    pub fn table(self, view: &DashboardView) -> &DataFrame {
        match self {
            ExportKind::Category => &view.category,
            ExportKind::Region => &view.region,
            ExportKind::TimeSeries => &view.monthly,
            ExportKind::Data => &view.date_filtered,
        }
    }

    /// CSV bytes of this artifact.
    pub fn bytes(self, view: &DashboardView) -> SalesViewResult<Vec<u8>> {
        to_csv_bytes(self.table(view))
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/**
Serialises a table as comma-separated UTF-8 text.

Header row first, no index column, dates rendered as `YYYY-MM-DD`.

### Arguments

* `df` - Any table produced by the filters or the aggregations.

### Returns

The CSV bytes, or a `SalesViewError::Polars` if the writer fails.
*/
pub fn to_csv_bytes(df: &DataFrame) -> SalesViewResult<Vec<u8>> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut df = df.clone();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_date_format(Some("%Y-%m-%d".into()))
        .finish(&mut df)?;

    Ok(buffer)
}

/// Writes every artifact of `view` into `dir`, returning the written paths.
pub fn write_exports(view: &DashboardView, dir: &Path) -> SalesViewResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ExportKind::ALL.len());
    for kind in ExportKind::ALL {
        let path = dir.join(kind.file_name());
        let bytes = kind.bytes(view)?;

        let mut file = File::create(&path)?;
        file.write_all(&bytes)?;

        tracing::info!(
            "Exported {} ({} rows, {} bytes) to {path:?}",
            kind,
            kind.table(view).height(),
            bytes.len()
        );
        written.push(path);
    }

    Ok(written)
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// `cargo test -- --show-output tests_export`
#[cfg(test)]
mod tests_export {
    use super::*;
    use crate::table::fixtures::*;
    use crate::{DashboardSession, FileExtension, REGION, SALES, load_bytes, region_sales, total_sales};
    use std::io::Cursor;

    /// Reads CSV bytes back with inferred types.
    fn reparse(bytes: &[u8]) -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
    }

    #[test]
    fn test_aggregate_export_reparses_equal() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table();
        let df_region = region_sales(table.df())?;

        let bytes = to_csv_bytes(&df_region)?;
        println!("{}", String::from_utf8_lossy(&bytes));

        let df_reparsed = reparse(&bytes)?
            .lazy()
            .with_column(col(SALES).cast(DataType::Float64))
            .collect()?;
        println!("df_reparsed: {df_reparsed}");

        assert!(df_reparsed.equals_missing(&df_region));
        assert!(bytes.starts_with(format!("{REGION},{SALES}\n").as_bytes()));
        Ok(())
    }

    #[test]
    fn test_data_export_reloads_with_same_totals() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table();
        let view = DashboardSession::new(table.clone()).refresh()?;

        let bytes = ExportKind::Data.bytes(&view)?;
        let text = String::from_utf8(bytes.clone())?;
        println!("{text}");
        assert!(text.contains("2015-01-05"));

        // The exported rows load again as a full dataset.
        let reloaded = load_bytes(&bytes, &FileExtension::Csv)?;
        assert_eq!(reloaded.height(), table.height());
        assert_eq!(reloaded.date_bounds(), table.date_bounds());
        assert_eq!(total_sales(reloaded.df())?, total_sales(table.df())?);
        Ok(())
    }

    #[test]
    fn test_empty_table_exports_header_only() -> Result<(), Box<dyn std::error::Error>> {
        let table = sample_table();
        let empty = region_sales(&table.df().clear())?;
        let bytes = to_csv_bytes(&empty)?;
        assert_eq!(String::from_utf8_lossy(&bytes).trim_end(), format!("{REGION},{SALES}"));
        Ok(())
    }

    #[test]
    fn test_write_exports_creates_four_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let view = DashboardSession::new(sample_table()).refresh()?;

        let written = write_exports(&view, dir.path())?;

        let names: Vec<String> = written
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Category.csv", "Region.csv", "TimeSeries.csv", "Data.csv"]);
        assert!(written.iter().all(|path| path.exists()));
        Ok(())
    }
}
