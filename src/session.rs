//! Per-session dashboard state and the single recomputation pass.

use crate::{
    FilterOptions, FilterSelection, LocationAxis, SalesTable, SalesViewResult, category_sales,
    category_share, data_preview, filter_by_date, filter_by_location, filter_options,
    hierarchy_sales, monthly_sales, region_sales, sales_profit_points, segment_sales,
    sub_category_by_month, summary_sample, total_sales,
};

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

/// Everything the dashboard shows for one `FilterSelection`.
///
/// All frames are independent values derived from the session's table.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// The selection these tables were computed for (after pruning stale values).
    pub selection: FilterSelection,
    /// Values offered by the three cascading multiselects.
    pub options: FilterOptions,
    /// Rows inside the date window; the `Data.csv` artifact.
    pub date_filtered: DataFrame,
    /// Rows inside the date window that also pass the location filter.
    pub filtered: DataFrame,
    pub category: DataFrame,
    pub category_share: DataFrame,
    pub region: DataFrame,
    pub segment: DataFrame,
    pub monthly: DataFrame,
    pub sub_category_by_month: DataFrame,
    pub hierarchy: DataFrame,
    pub sales_profit: DataFrame,
    pub summary: DataFrame,
    pub preview: DataFrame,
    /// Sum of `Sales` over `filtered`.
    pub total_sales: f64,
}

/// The loaded table and the user's current constraints.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    table: SalesTable,
    selection: FilterSelection,
}

impl DashboardSession {
    /// Starts a session over `table` with the full date range and no location constraint.
    pub fn new(table: SalesTable) -> Self {
        let selection = FilterSelection::for_table(&table);
        DashboardSession { table, selection }
    }

    /// Starts a session with an explicit initial selection (e.g. from the command line).
    pub fn with_selection(table: SalesTable, selection: FilterSelection) -> Self {
        DashboardSession { table, selection }
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.selection.date_start = start;
        self.selection.date_end = end;
    }

    pub fn set_regions(&mut self, regions: BTreeSet<String>) {
        self.selection.regions = regions;
    }

    pub fn set_states(&mut self, states: BTreeSet<String>) {
        self.selection.states = states;
    }

    pub fn set_cities(&mut self, cities: BTreeSet<String>) {
        self.selection.cities = cities;
    }

    /// Replaces the values of one location axis.
    pub fn set_values(&mut self, axis: LocationAxis, values: BTreeSet<String>) {
        *self.selection.values_mut(axis) = values;
    }

    /// Cascading options for the current selection, computed on the date-filtered rows.
    pub fn options(&self) -> SalesViewResult<FilterOptions> {
        let date_filtered = self.date_filtered()?;
        Ok(filter_options(&date_filtered, &self.selection)?)
    }

    fn date_filtered(&self) -> PolarsResult<DataFrame> {
        filter_by_date(
            self.table.df(),
            self.selection.date_start,
            self.selection.date_end,
        )
    }

    /**
    Runs one full pass: date filter, option cascade, location filter, every aggregation.

    Selected states and cities no longer offered by the cascade are dropped from the
    session's selection before the location filter runs, the way the widgets reset
    when a higher level changes.
    */
    pub fn refresh(&mut self) -> SalesViewResult<DashboardView> {
        // 1. Date window.
        let date_filtered = self.date_filtered()?;

        // 2. Cascading options; prune stale selections.
        let mut options = filter_options(&date_filtered, &self.selection)?;
        if self.selection.retain_available(&options) {
            options = filter_options(&date_filtered, &self.selection)?;
        }

        // 3. Location filter and aggregations.
        self.build_view(date_filtered, options)
    }

    /**
    Same pass as `refresh`, but the selection is applied exactly as given.

    Used for selections typed on the command line: a value outside the cascade is
    logged and still constrains its axis, so `Region = West, State = Ohio` is empty.
    */
    pub fn refresh_strict(&self) -> SalesViewResult<DashboardView> {
        let date_filtered = self.date_filtered()?;
        let options = filter_options(&date_filtered, &self.selection)?;

        for axis in LocationAxis::ALL {
            let available = options.values(axis);
            for value in self.selection.values(axis) {
                if !available.contains(value) {
                    tracing::warn!("{axis:?} '{value}' matches no rows under the other selections");
                }
            }
        }

        self.build_view(date_filtered, options)
    }

    fn build_view(
        &self,
        date_filtered: DataFrame,
        options: FilterOptions,
    ) -> SalesViewResult<DashboardView> {
        let filtered = filter_by_location(&date_filtered, &self.selection)?;

        let view = DashboardView {
            selection: self.selection.clone(),
            options,
            category: category_sales(&filtered)?,
            category_share: category_share(&filtered)?,
            region: region_sales(&filtered)?,
            segment: segment_sales(&filtered)?,
            monthly: monthly_sales(&filtered)?,
            sub_category_by_month: sub_category_by_month(&filtered)?,
            hierarchy: hierarchy_sales(&filtered)?,
            sales_profit: sales_profit_points(&filtered)?,
            summary: summary_sample(&date_filtered)?,
            preview: data_preview(&filtered)?,
            total_sales: total_sales(&filtered)?,
            date_filtered,
            filtered,
        };

        tracing::info!(
            "Refreshed dashboard: {} rows in window, {} rows after location filter, total sales {:.2}",
            view.date_filtered.height(),
            view.filtered.height(),
            view.total_sales
        );

        Ok(view)
    }
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// `cargo test -- --show-output tests_dashboard_session`
#[cfg(test)]
mod tests_dashboard_session {
    use super::*;
    use crate::table::fixtures::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_default_refresh_covers_whole_table() -> SalesViewResult<()> {
        let table = sample_table();
        let mut session = DashboardSession::new(table.clone());
        let view = session.refresh()?;

        assert_eq!(view.date_filtered.height(), table.height());
        assert!(view.filtered.equals_missing(table.df()));
        assert_eq!(view.options.regions, vec!["East", "West", "Central"]);
        assert!((view.total_sales - 275.5).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_refresh_applies_date_then_location() -> SalesViewResult<()> {
        let mut session = DashboardSession::new(sample_table());
        session.set_date_range(ymd(2016, 1, 1), ymd(2016, 12, 31));
        session.set_regions(set(&["East", "West"]));

        let view = session.refresh()?;
        println!("filtered: {}", view.filtered);

        assert_eq!(view.date_filtered.height(), 3);
        assert_eq!(view.filtered.height(), 2);
        assert!((view.total_sales - 75.5).abs() < 1e-9);
        // Data.csv keeps the date-filtered rows, not the location-filtered ones.
        assert_eq!(crate::ExportKind::Data.table(&view).height(), 3);
        Ok(())
    }

    #[test]
    fn test_region_change_prunes_stale_states() -> SalesViewResult<()> {
        let mut session = DashboardSession::new(sample_table());
        session.set_regions(set(&["East"]));
        session.set_states(set(&["Ohio"]));
        session.set_cities(set(&["Akron"]));
        assert_eq!(session.refresh()?.filtered.height(), 1);

        session.set_regions(set(&["West"]));
        let view = session.refresh()?;

        assert!(session.selection().states.is_empty());
        assert!(session.selection().cities.is_empty());
        assert_eq!(view.options.states, vec!["California", "Washington"]);
        assert_eq!(view.filtered.height(), 2);
        Ok(())
    }

    #[test]
    fn test_strict_refresh_keeps_explicit_values() -> SalesViewResult<()> {
        let table = sample_table();
        let selection = FilterSelection::for_table(&table)
            .with_values(LocationAxis::Region, ["West"])
            .with_values(LocationAxis::State, ["Ohio"]);
        let session = DashboardSession::with_selection(table, selection);

        let view = session.refresh_strict()?;
        println!("filtered: {}", view.filtered);

        assert_eq!(view.filtered.height(), 0);
        assert_eq!(view.total_sales, 0.0);
        assert_eq!(session.selection().states, set(&["Ohio"]));
        assert_eq!(view.selection.states, set(&["Ohio"]));
        // The cascade still reports what the widgets would offer.
        assert_eq!(view.options.states, vec!["California", "Washington"]);
        Ok(())
    }

    #[test]
    fn test_strict_refresh_matches_refresh_for_consistent_selection() -> SalesViewResult<()> {
        let mut session = DashboardSession::new(sample_table());
        session.set_regions(set(&["East"]));
        session.set_states(set(&["Ohio"]));

        let strict = session.refresh_strict()?;
        let pruning = session.refresh()?;
        assert!(strict.filtered.equals_missing(&pruning.filtered));
        assert_eq!(strict.total_sales, pruning.total_sales);
        Ok(())
    }

    #[test]
    fn test_reversed_window_gives_empty_view() -> SalesViewResult<()> {
        let mut session = DashboardSession::new(sample_table());
        session.set_date_range(ymd(2016, 1, 1), ymd(2015, 1, 1));

        let view = session.refresh()?;

        assert_eq!(view.filtered.height(), 0);
        assert_eq!(view.category.height(), 0);
        assert_eq!(view.monthly.height(), 0);
        assert!(view.options.regions.is_empty());
        assert_eq!(view.total_sales, 0.0);
        Ok(())
    }

    #[test]
    fn test_options_match_refresh() -> SalesViewResult<()> {
        let mut session = DashboardSession::new(sample_table());
        session.set_values(LocationAxis::Region, set(&["East"]));
        let options = session.options()?;
        assert_eq!(options.cities, vec!["Columbus", "New York City", "Akron"]);
        assert_eq!(session.refresh()?.options, options);
        Ok(())
    }
}
