//! Row filters applied on every interaction: the inclusive order-date window and the
//! Region / State / City multiselects.
//!
//! The categorical filter treats each axis as an optional predicate. An empty set is
//! the only no-op; every non-empty set must match. The cascading option lists are a
//! separate concern: they narrow what the widgets offer, never which rows survive.

use crate::{CITY, ORDER_DATE, REGION, STATE, SalesTable, UniqueElements, date_to_days};

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

/// One of the three cascading location dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationAxis {
    Region,
    State,
    City,
}

impl LocationAxis {
    /// Axes from the top of the hierarchy down.
    pub const ALL: [LocationAxis; 3] = [LocationAxis::Region, LocationAxis::State, LocationAxis::City];

    pub fn column(self) -> &'static str {
        match self {
            LocationAxis::Region => REGION,
            LocationAxis::State => STATE,
            LocationAxis::City => CITY,
        }
    }

    /// Widget label, as shown in the side panel.
    pub fn label(self) -> &'static str {
        match self {
            LocationAxis::Region => "Pick your Region",
            LocationAxis::State => "Pick the State",
            LocationAxis::City => "Pick the City",
        }
    }
}

/// The user's current constraints. Rebuilt on every interaction, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    /// Inclusive start of the order-date window.
    pub date_start: NaiveDate,
    /// Inclusive end of the order-date window.
    pub date_end: NaiveDate,
    /// Allowed regions; empty means unconstrained.
    pub regions: BTreeSet<String>,
    /// Allowed states; empty means unconstrained.
    pub states: BTreeSet<String>,
    /// Allowed cities; empty means unconstrained.
    pub cities: BTreeSet<String>,
}

impl FilterSelection {
    /// A selection covering the whole table: min..=max order date, no categorical constraint.
    pub fn for_table(table: &SalesTable) -> Self {
        let (date_start, date_end) = table.date_bounds();
        FilterSelection {
            date_start,
            date_end,
            regions: BTreeSet::new(),
            states: BTreeSet::new(),
            cities: BTreeSet::new(),
        }
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    pub fn with_values<I, S>(mut self, axis: LocationAxis, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.values_mut(axis) = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn values(&self, axis: LocationAxis) -> &BTreeSet<String> {
        match axis {
            LocationAxis::Region => &self.regions,
            LocationAxis::State => &self.states,
            LocationAxis::City => &self.cities,
        }
    }

    pub fn values_mut(&mut self, axis: LocationAxis) -> &mut BTreeSet<String> {
        match axis {
            LocationAxis::Region => &mut self.regions,
            LocationAxis::State => &mut self.states,
            LocationAxis::City => &mut self.cities,
        }
    }

    /// `true` when no location axis is constrained.
    pub fn is_unconstrained(&self) -> bool {
        LocationAxis::ALL
            .iter()
            .all(|axis| self.values(*axis).is_empty())
    }

    /// Conjunction of the membership tests of every non-empty axis.
    ///
    /// `None` when all three sets are empty, i.e. the identity filter.
    pub fn location_predicate(&self) -> Option<Expr> {
        LocationAxis::ALL
            .iter()
            .filter_map(|axis| membership(axis.column(), self.values(*axis)))
            .reduce(|acc, predicate| acc.and(predicate))
    }

    /// Drops selected values that the cascading options no longer offer.
    ///
    /// Returns `true` if anything was removed.
    pub fn retain_available(&mut self, options: &FilterOptions) -> bool {
        let mut changed = false;
        for axis in LocationAxis::ALL {
            let available = options.values(axis);
            let selected = self.values_mut(axis);
            let before = selected.len();
            selected.retain(|value| available.contains(value));
            if selected.len() != before {
                tracing::debug!(
                    "Dropped {} stale {:?} selection(s)",
                    before - selected.len(),
                    axis
                );
                changed = true;
            }
        }
        changed
    }
}

/// `column` is one of `values`; `None` for an empty set.
///
/// A null cell is never a member.
fn membership(column: &str, values: &BTreeSet<String>) -> Option<Expr> {
    if values.is_empty() {
        return None;
    }
    let members: Vec<&str> = values.iter().map(String::as_str).collect();
    let members = Series::new("members".into(), members);
    Some(col(column).is_in(lit(members), false))
}

/// Rows whose `Order Date` lies in `start..=end`, order preserved.
///
/// A reversed window (`start > end`) matches nothing and yields an empty frame.
pub fn filter_by_date(df: &DataFrame, start: NaiveDate, end: NaiveDate) -> PolarsResult<DataFrame> {
    let days = col(ORDER_DATE).cast(DataType::Int32);
    let in_window = days
        .clone()
        .gt_eq(lit(date_to_days(start)))
        .and(days.lt_eq(lit(date_to_days(end))));

    let filtered = df.clone().lazy().filter(in_window).collect()?;

    tracing::debug!(
        "Date filter {start} ..= {end}: {} of {} rows",
        filtered.height(),
        df.height()
    );

    Ok(filtered)
}

/// Applies the Region / State / City constraints of `selection`.
///
/// The result is always a subsequence of `df`; with all three sets empty it is `df` itself.
pub fn filter_by_location(df: &DataFrame, selection: &FilterSelection) -> PolarsResult<DataFrame> {
    let Some(predicate) = selection.location_predicate() else {
        return Ok(df.clone());
    };

    let filtered = df.clone().lazy().filter(predicate).collect()?;

    tracing::debug!(
        "Location filter (regions: {:?}, states: {:?}, cities: {:?}): {} of {} rows",
        selection.regions,
        selection.states,
        selection.cities,
        filtered.height(),
        df.height()
    );

    Ok(filtered)
}

// --- Cascading options ---

/// The values each multiselect offers, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
}

impl FilterOptions {
    pub fn values(&self, axis: LocationAxis) -> &[String] {
        match axis {
            LocationAxis::Region => &self.regions,
            LocationAxis::State => &self.states,
            LocationAxis::City => &self.cities,
        }
    }
}

/// Distinct non-null values of a string column, in order of first appearance.
pub fn unique_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
    let series = df.column(column)?.as_materialized_series();
    let mut values: Vec<String> = series
        .str()?
        .into_iter()
        .flatten()
        .map(ToString::to_string)
        .collect();
    values.unique();
    Ok(values)
}

/// Narrows `df` to rows in `values` on `column`; unchanged for an empty set.
fn narrow(df: &DataFrame, column: &str, values: &BTreeSet<String>) -> PolarsResult<DataFrame> {
    match membership(column, values) {
        Some(predicate) => df.clone().lazy().filter(predicate).collect(),
        None => Ok(df.clone()),
    }
}

/// Regions present in the (date-filtered) frame.
pub fn region_options(df: &DataFrame) -> PolarsResult<Vec<String>> {
    unique_values(df, REGION)
}

/// States present among rows matching `regions` (all rows when empty).
pub fn state_options(df: &DataFrame, regions: &BTreeSet<String>) -> PolarsResult<Vec<String>> {
    unique_values(&narrow(df, REGION, regions)?, STATE)
}

/// Cities present among rows matching `regions` and then `states`.
pub fn city_options(
    df: &DataFrame,
    regions: &BTreeSet<String>,
    states: &BTreeSet<String>,
) -> PolarsResult<Vec<String>> {
    let by_region = narrow(df, REGION, regions)?;
    unique_values(&narrow(&by_region, STATE, states)?, CITY)
}

/// All three cascading option lists for the current selection.
pub fn filter_options(df: &DataFrame, selection: &FilterSelection) -> PolarsResult<FilterOptions> {
    Ok(FilterOptions {
        regions: region_options(df)?,
        states: state_options(df, &selection.regions)?,
        cities: city_options(df, &selection.regions, &selection.states)?,
    })
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// `cargo test -- --show-output tests_filter_by_date`
#[cfg(test)]
mod tests_filter_by_date {
    use super::*;
    use crate::table::fixtures::*;

    #[test]
    fn test_full_range_is_identity() -> PolarsResult<()> {
        let table = sample_table();
        let (min, max) = table.date_bounds();
        let df_output = filter_by_date(table.df(), min, max)?;
        assert!(df_output.equals_missing(table.df()));
        Ok(())
    }

    #[test]
    fn test_reversed_range_is_empty() -> PolarsResult<()> {
        let table = sample_table();
        let (min, max) = table.date_bounds();
        let df_output = filter_by_date(table.df(), max, min)?;
        println!("df_output: {df_output}");
        assert_eq!(df_output.height(), 0);
        assert_eq!(df_output.schema(), table.df().schema());
        Ok(())
    }

    #[test]
    fn test_bounds_are_inclusive_and_order_preserved() -> PolarsResult<()> {
        let table = sample_table();
        let df_output = filter_by_date(table.df(), ymd(2015, 2, 10), ymd(2016, 1, 15))?;
        println!("df_output: {df_output}");
        let sales: Vec<f64> = df_output.column(crate::SALES)?.f64()?.into_no_null_iter().collect();
        assert_eq!(sales, vec![50.0, 30.0, 20.0]);
        Ok(())
    }

    #[test]
    fn test_single_day_window() -> PolarsResult<()> {
        let table = sample_table();
        let day = ymd(2016, 3, 1);
        let df_output = filter_by_date(table.df(), day, day)?;
        assert_eq!(df_output.height(), 1);
        Ok(())
    }
}

/// Run tests with:
/// `cargo test -- --show-output tests_filter_by_location`
#[cfg(test)]
mod tests_filter_by_location {
    use super::*;
    use crate::SALES;
    use crate::table::fixtures::*;

    fn sales(df: &DataFrame) -> PolarsResult<Vec<f64>> {
        Ok(df.column(SALES)?.f64()?.into_no_null_iter().collect())
    }

    fn run(regions: &[&str], states: &[&str], cities: &[&str]) -> PolarsResult<Vec<f64>> {
        let table = sample_table();
        let selection = FilterSelection::for_table(&table)
            .with_values(LocationAxis::Region, regions.iter().copied())
            .with_values(LocationAxis::State, states.iter().copied())
            .with_values(LocationAxis::City, cities.iter().copied());
        let df_output = filter_by_location(table.df(), &selection)?;
        println!("selection: {selection:?}\ndf_output: {df_output}");
        sales(&df_output)
    }

    // The eight set/empty combinations over (Region, State, City).

    #[test]
    fn test_none_set_is_identity() -> PolarsResult<()> {
        let table = sample_table();
        let selection = FilterSelection::for_table(&table);
        assert!(selection.is_unconstrained());
        assert!(selection.location_predicate().is_none());
        let df_output = filter_by_location(table.df(), &selection)?;
        assert!(df_output.equals_missing(table.df()));
        Ok(())
    }

    #[test]
    fn test_region_only() -> PolarsResult<()> {
        assert_eq!(run(&["East"], &[], &[])?, vec![100.0, 30.0, 5.5]);
        Ok(())
    }

    #[test]
    fn test_state_only() -> PolarsResult<()> {
        assert_eq!(run(&[], &["Ohio"], &[])?, vec![100.0, 5.5]);
        Ok(())
    }

    #[test]
    fn test_city_only() -> PolarsResult<()> {
        assert_eq!(run(&[], &[], &["Seattle"])?, vec![70.0]);
        Ok(())
    }

    #[test]
    fn test_region_and_state() -> PolarsResult<()> {
        assert_eq!(run(&["East"], &["Ohio"], &[])?, vec![100.0, 5.5]);
        // A state outside the region contributes nothing.
        assert_eq!(run(&["West"], &["Ohio"], &[])?, Vec::<f64>::new());
        Ok(())
    }

    #[test]
    fn test_region_and_city() -> PolarsResult<()> {
        assert_eq!(run(&["West"], &[], &["Seattle", "Columbus"])?, vec![70.0]);
        // Region must still hold when a city is chosen.
        assert_eq!(run(&["West"], &[], &["Columbus"])?, Vec::<f64>::new());
        Ok(())
    }

    #[test]
    fn test_state_and_city() -> PolarsResult<()> {
        assert_eq!(
            run(&[], &["Ohio", "Texas"], &["Houston", "Akron"])?,
            vec![20.0, 5.5]
        );
        Ok(())
    }

    #[test]
    fn test_all_three() -> PolarsResult<()> {
        assert_eq!(run(&["East"], &["Ohio"], &["Akron", "Seattle"])?, vec![5.5]);
        Ok(())
    }

    #[test]
    fn test_pairs_equal_intersection_of_single_axis_filters() -> PolarsResult<()> {
        let cases: [(&[&str], &[&str], &[&str]); 4] = [
            (&["East", "West"], &["Ohio", "California"], &[]),
            (&["East"], &[], &["Akron", "New York City", "Seattle"]),
            (&[], &["Ohio", "Washington"], &["Seattle", "Columbus"]),
            (&["East", "Central"], &["Ohio", "Texas"], &["Houston", "Columbus"]),
        ];

        for (regions, states, cities) in cases {
            let combined = run(regions, states, cities)?;

            let axis_filters = [
                (!regions.is_empty()).then(|| run(regions, &[], &[])),
                (!states.is_empty()).then(|| run(&[], states, &[])),
                (!cities.is_empty()).then(|| run(&[], &[], cities)),
            ];

            let mut expected = run(&[], &[], &[])?;
            for single in axis_filters.into_iter().flatten() {
                let single = single?;
                expected.retain(|s| single.contains(s));
            }

            assert_eq!(combined, expected, "{regions:?} {states:?} {cities:?}");
        }
        Ok(())
    }

    #[test]
    fn test_result_is_subset_of_input() -> PolarsResult<()> {
        let all = run(&[], &[], &[])?;
        for result in [
            run(&["Central"], &[], &[])?,
            run(&["Nowhere"], &[], &[])?,
            run(&["East", "West", "Central"], &[], &[])?,
        ] {
            assert!(result.len() <= all.len());
            assert!(result.iter().all(|s| all.contains(s)));
        }
        Ok(())
    }

    #[test]
    fn test_null_values_never_match() -> PolarsResult<()> {
        let df = df!(
            REGION => &[Some("East"), None],
            STATE => &[Some("Ohio"), Some("Ohio")],
            CITY => &[Some("Akron"), Some("Akron")],
        )?;
        let table = sample_table();
        let selection =
            FilterSelection::for_table(&table).with_values(LocationAxis::Region, ["East"]);
        let df_output = filter_by_location(&df, &selection)?;
        assert_eq!(df_output.height(), 1);
        Ok(())
    }

    #[test]
    fn test_large_city_selection() -> PolarsResult<()> {
        let table = sample_table();
        let mut cities: Vec<String> = (0..600).map(|i| format!("City {i}")).collect();
        cities.extend(["Columbus", "Akron"].map(String::from));

        let selection = FilterSelection::for_table(&table).with_values(LocationAxis::City, cities);
        let df_output = filter_by_location(table.df(), &selection)?;
        assert_eq!(sales(&df_output)?, vec![100.0, 5.5]);
        Ok(())
    }
}
