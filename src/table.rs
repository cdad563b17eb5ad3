use crate::{SalesViewError, SalesViewResult, days_to_date};

use chrono::NaiveDate;
use polars::prelude::*;
use std::sync::Arc;

// --- Column names ---

pub const ORDER_DATE: &str = "Order Date";
pub const SHIP_DATE: &str = "Ship Date";
pub const REGION: &str = "Region";
pub const STATE: &str = "State";
pub const CITY: &str = "City";
pub const CATEGORY: &str = "Category";
pub const SUB_CATEGORY: &str = "Sub-Category";
pub const SEGMENT: &str = "Segment";
pub const SALES: &str = "Sales";
pub const PROFIT: &str = "Profit";
pub const QUANTITY: &str = "Quantity";

/// Columns every dataset must carry. `Ship Date` and identifier columns are optional.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    ORDER_DATE,
    REGION,
    STATE,
    CITY,
    CATEGORY,
    SUB_CATEGORY,
    SEGMENT,
    SALES,
    PROFIT,
    QUANTITY,
];

/// The canonical, typed dataset of a session.
///
/// Built only by the loader (`loader.rs`), after `Order Date` has been parsed into
/// `DataType::Date` with no nulls. Filters and aggregations take `&SalesTable` or a
/// `&DataFrame` derived from it and always return new frames.
#[derive(Debug, Clone)]
pub struct SalesTable {
    /// The typed DataFrame; clones of the table share it.
    df: Arc<DataFrame>,
    /// Earliest `Order Date`, the default start of the date window.
    min_order_date: NaiveDate,
    /// Latest `Order Date`, the default end of the date window.
    max_order_date: NaiveDate,
}

impl SalesTable {
    /// Wraps a normalised DataFrame and computes the order-date bounds.
    ///
    /// Fails with `EmptyDataset` for a frame without rows, and with a Polars error if
    /// `Order Date` is missing or not a date column.
    pub fn new(df: DataFrame) -> SalesViewResult<Self> {
        let column = df.column(ORDER_DATE)?;
        if column.dtype() != &DataType::Date {
            return Err(SalesViewError::Other(format!(
                "'{ORDER_DATE}' must be a Date column, found {}",
                column.dtype()
            )));
        }

        let days = column.as_materialized_series().cast(&DataType::Int32)?;
        let days = days.i32()?;

        let (Some(min), Some(max)) = (days.min(), days.max()) else {
            return Err(SalesViewError::EmptyDataset);
        };

        let to_date = |d: i32| {
            days_to_date(d)
                .ok_or_else(|| SalesViewError::Other(format!("Day number {d} is out of range")))
        };

        let table = SalesTable {
            min_order_date: to_date(min)?,
            max_order_date: to_date(max)?,
            df: Arc::new(df),
        };

        tracing::debug!(
            "SalesTable: shape {:?}, order dates {} ..= {}",
            table.df.shape(),
            table.min_order_date,
            table.max_order_date
        );

        Ok(table)
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// `(min, max)` of `Order Date`, computed once when the table was built.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.min_order_date, self.max_order_date)
    }
}


//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// `cargo test -- --show-output tests_sales_table`
#[cfg(test)]
mod tests_sales_table {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_date_bounds() {
        let table = sample_table();
        println!("table: {}", table.df());
        assert_eq!(table.date_bounds(), (ymd(2015, 1, 5), ymd(2016, 6, 30)));
        assert_eq!(table.height(), 6);
    }

    #[test]
    fn test_empty_frame_is_rejected() -> PolarsResult<()> {
        let df = typed_df(&[], &[], &[], &[], &[])?;
        let result = SalesTable::new(df);
        assert!(matches!(result, Err(SalesViewError::EmptyDataset)));
        Ok(())
    }

    #[test]
    fn test_string_order_date_is_rejected() -> PolarsResult<()> {
        let df = df!(ORDER_DATE => &["2015-01-05"], SALES => &[1.0])?;
        assert!(SalesTable::new(df).is_err());
        Ok(())
    }
}
