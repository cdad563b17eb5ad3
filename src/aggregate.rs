//! Group-by summaries of the filtered sales frame.
//!
//! Every function takes the fully filtered frame and returns a new one. An empty input
//! yields an empty table, never an error.

use crate::{CATEGORY, CITY, ORDER_DATE, PROFIT, QUANTITY, REGION, SALES, SEGMENT, STATE, SUB_CATEGORY};

use chrono::Month;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Key column of the monthly series, e.g. `2015 : Jan`.
pub const MONTH_YEAR: &str = "month_year";

/// Percentage column added by `category_share`.
pub const SHARE: &str = "Share";

/// Format of the `month_year` labels.
pub const MONTH_YEAR_FORMAT: &str = "%Y : %b";

/// Rows shown in the summary table.
pub const SUMMARY_ROWS: usize = 5;

/// Rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 500;

/// Columns of the summary table, in display order.
pub const SUMMARY_COLUMNS: [&str; 7] = [REGION, STATE, CITY, CATEGORY, SALES, PROFIT, QUANTITY];

/// Sum of `Sales` per distinct value of `keys`, in order of first appearance.
fn sales_by(df: &DataFrame, keys: &[&str]) -> PolarsResult<DataFrame> {
    let keys: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();

    df.clone()
        .lazy()
        .group_by_stable(keys)
        .agg([col(SALES).sum()])
        .collect()
}

/// Sum of `Sales` per `Category`.
pub fn category_sales(df: &DataFrame) -> PolarsResult<DataFrame> {
    sales_by(df, &[CATEGORY])
}

/// Sum of `Sales` per `Region`.
pub fn region_sales(df: &DataFrame) -> PolarsResult<DataFrame> {
    sales_by(df, &[REGION])
}

/// Sum of `Sales` per `Segment`.
pub fn segment_sales(df: &DataFrame) -> PolarsResult<DataFrame> {
    sales_by(df, &[SEGMENT])
}

/// Sum of `Sales` per `Region` / `Category` / `Sub-Category` path.
pub fn hierarchy_sales(df: &DataFrame) -> PolarsResult<DataFrame> {
    sales_by(df, &[REGION, CATEGORY, SUB_CATEGORY])
}

/// `category_sales` plus a `Share` column: each category's percentage of the total.
pub fn category_share(df: &DataFrame) -> PolarsResult<DataFrame> {
    category_sales(df)?
        .lazy()
        .with_column((col(SALES) / col(SALES).sum() * lit(100.0)).alias(SHARE))
        .collect()
}

/**
Sum of `Sales` per calendar month, in chronological order.

The key column `month_year` is rendered as `"%Y : %b"` (`2015 : Jan`). Grouping is done
on `year * 12 + month`, so ordering is by time and not by label.

### Arguments

* `df` - The filtered sales frame, with `Order Date` as `DataType::Date`.

### Returns

A two-column frame: `month_year` (String) and `Sales` (Float64).
*/
pub fn monthly_sales(df: &DataFrame) -> PolarsResult<DataFrame> {
    let order_date = col(ORDER_DATE);
    let month_index = (order_date.clone().dt().year().cast(DataType::Int32) * lit(12)
        + order_date.clone().dt().month().cast(DataType::Int32))
    .alias("month_index");

    df.clone()
        .lazy()
        .group_by([month_index])
        .agg([
            order_date
                .dt()
                .to_string(MONTH_YEAR_FORMAT)
                .first()
                .alias(MONTH_YEAR),
            col(SALES).sum(),
        ])
        .sort(["month_index"], SortMultipleOptions::default())
        .select([col(MONTH_YEAR), col(SALES)])
        .collect()
}

/**
Pivot of `Sales` with one row per `Sub-Category` and one column per month name.

- Rows are sorted lexically by `Sub-Category`; null sub-categories are dropped.
- Columns are full month names (`January`, ...) in calendar order, only for months
  present in the input. Months of different years fall into the same column.
- Cells hold the sum of `Sales`; a sub-category with no sales in a month is null.
*/
pub fn sub_category_by_month(df: &DataFrame) -> PolarsResult<DataFrame> {
    // 1. Long format: (Sub-Category, month number, sum of Sales).
    let long = df
        .clone()
        .lazy()
        .filter(col(SUB_CATEGORY).is_not_null())
        .group_by([
            col(SUB_CATEGORY),
            col(ORDER_DATE).dt().month().cast(DataType::Int32).alias("month"),
        ])
        .agg([col(SALES).sum()])
        .collect()?;

    let sub_categories = long.column(SUB_CATEGORY)?.str()?;
    let months = long.column("month")?.i32()?;
    let sales = long.column(SALES)?.f64()?;

    // 2. Collect into sorted maps.
    let mut cells: BTreeMap<String, BTreeMap<i32, f64>> = BTreeMap::new();
    let mut present_months: BTreeSet<i32> = BTreeSet::new();

    for ((sub_category, month), value) in sub_categories.iter().zip(months).zip(sales) {
        let (Some(sub_category), Some(month)) = (sub_category, month) else {
            continue;
        };
        present_months.insert(month);
        cells
            .entry(sub_category.to_string())
            .or_default()
            .insert(month, value.unwrap_or(0.0));
    }

    // 3. Wide format.
    let row_keys: Vec<&str> = cells.keys().map(String::as_str).collect();
    let mut columns = vec![Column::new(SUB_CATEGORY.into(), row_keys)];

    for month in present_months {
        let values: Vec<Option<f64>> = cells
            .values()
            .map(|by_month| by_month.get(&month).copied())
            .collect();
        columns.push(Column::new(month_name(month).into(), values));
    }

    DataFrame::new_infer_height(columns)
}

/// Full English month name for a month number in `1..=12`.
fn month_name(month: i32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or_else(|| format!("Month {month}"), |m| m.name().to_string())
}

/// `Sales`, `Profit` and `Quantity` of every row, for the Sales vs. Profit scatter.
pub fn sales_profit_points(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.select([SALES, PROFIT, QUANTITY])
}

/// First rows of the main location / category / measure columns.
///
/// Applied to the date-filtered table, before the location filter.
pub fn summary_sample(df: &DataFrame) -> PolarsResult<DataFrame> {
    Ok(df.select(SUMMARY_COLUMNS)?.head(Some(SUMMARY_ROWS)))
}

/// First 500 rows of every second column starting at index 1, up to index 19.
pub fn data_preview(df: &DataFrame) -> PolarsResult<DataFrame> {
    let names: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .enumerate()
        .filter(|(index, _)| *index < 20 && index % 2 == 1)
        .map(|(_, name)| name.clone())
        .collect();

    Ok(df.select(names)?.head(Some(PREVIEW_ROWS)))
}

/// Sum of `Sales`; `0.0` for an empty frame.
pub fn total_sales(df: &DataFrame) -> PolarsResult<f64> {
    Ok(df.column(SALES)?.f64()?.sum().unwrap_or(0.0))
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
