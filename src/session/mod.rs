mod history;
mod state;

pub use history::{QueryHistory, QueryRecord};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::chart::{self, Chart, ChartKind, ChartSpec};
use crate::conf::{Config, SessionConfig};
use crate::core::QuarryError;
use crate::engine::{QueryEngine, QueryTemplate, templates};
use crate::filter::{self, FilterSpec};
use crate::governor::{ResultTable, cap};
use crate::loader::TableLoader;
use crate::stats::{self, CorrelationMatrix, DatasetProfile, NumericSummary};
use crate::table::Table;

use state::DatasetState;

/// Which table an operation reads from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Raw,
    Filtered,
    LastQuery,
}

/// State of one user's exploration: the uploaded table, its filtered view,
/// the last query result, query history and the preview page cursor.
///
/// Every interaction goes through `&mut self` and writes whole fields only
/// after all fallible work succeeded, so a failed upload, filter or query
/// leaves the session exactly as it was.
pub struct Session {
    config: SessionConfig,
    loader: TableLoader,
    engine: QueryEngine,
    dataset: Option<DatasetState>,
    last_result: Option<ResultTable>,
    history: QueryHistory,
    page: usize,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.session.clone(),
            loader: TableLoader::new(config.loader.clone()),
            engine: QueryEngine::new(),
            dataset: None,
            last_result: None,
            history: QueryHistory::new(config.session.history_capacity),
            page: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Loads a file, binds it as `data` and resets everything derived from the
    /// previous dataset. Query history survives uploads.
    pub fn upload(&mut self, bytes: &[u8], filename: &str) -> Result<&Table, QuarryError> {
        let table = self.loader.load(bytes, filename)?;
        self.engine.bind(&table)?;

        let filtered = cap(table.clone(), self.config.max_viz_rows);
        self.dataset = Some(DatasetState {
            name: filename.to_string(),
            table,
            filter: None,
            filtered,
        });
        self.last_result = None;
        self.page = 0;
        info!("Session dataset is now '{}'", filename);

        Ok(&self.dataset()?.table)
    }

    fn dataset(&self) -> Result<&DatasetState, QuarryError> {
        self.dataset.as_ref().ok_or(QuarryError::NoDataset)
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset.as_ref().map(|d| d.name.as_str())
    }

    pub fn table(&self) -> Option<&Table> {
        self.dataset.as_ref().map(|d| &d.table)
    }

    /// The filter behind the filtered view; `None` when nothing is loaded or
    /// the view is unfiltered.
    pub fn filter_spec(&self) -> Option<&FilterSpec> {
        self.dataset.as_ref().and_then(|d| d.filter.as_ref())
    }

    /// Starting point for editing: the applied filter, or the widest one for
    /// the loaded table.
    pub fn editable_filter(&self) -> Result<FilterSpec, QuarryError> {
        let dataset = self.dataset()?;
        match &dataset.filter {
            Some(spec) => Ok(spec.clone()),
            None => FilterSpec::for_table(&dataset.table),
        }
    }

    pub fn filtered(&self) -> Option<&ResultTable> {
        self.dataset.as_ref().map(|d| &d.filtered)
    }

    pub fn last_result(&self) -> Option<&ResultTable> {
        self.last_result.as_ref()
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Recomputes the filtered view from the loaded table and `spec`.
    ///
    /// Columns without a predicate in `spec` are not filtered.
    pub fn apply_filter(&mut self, spec: FilterSpec) -> Result<&ResultTable, QuarryError> {
        let dataset = self.dataset()?;
        let filtered = cap(filter::apply(&dataset.table, &spec)?, self.config.max_viz_rows);

        let dataset = self.dataset.as_mut().ok_or(QuarryError::NoDataset)?;
        dataset.filter = Some(spec);
        dataset.filtered = filtered;
        Ok(&dataset.filtered)
    }

    /// Drops the filter; the view is the whole table again.
    pub fn reset_filter(&mut self) -> Result<&ResultTable, QuarryError> {
        let filtered = cap(self.dataset()?.table.clone(), self.config.max_viz_rows);

        let dataset = self.dataset.as_mut().ok_or(QuarryError::NoDataset)?;
        dataset.filter = None;
        dataset.filtered = filtered;
        Ok(&dataset.filtered)
    }

    /// Runs `sql` against `data`. On success the capped result becomes the
    /// last result and is appended to the history; on failure neither changes.
    pub async fn run_query(&mut self, sql: &str) -> Result<&ResultTable, QuarryError> {
        self.dataset()?;
        let table = match self.engine.execute(sql).await {
            Ok(table) => table,
            Err(e) => {
                warn!("Query failed: {}", e);
                return Err(e);
            }
        };

        let result = cap(table, self.config.max_viz_rows);
        self.history.push(QueryRecord::new(sql, result.clone()));
        Ok(self.last_result.insert(result))
    }

    pub fn templates(&self) -> Vec<QueryTemplate> {
        templates(self.table())
    }

    /// Current preview page of the loaded table.
    pub fn page(&self) -> Result<Table, QuarryError> {
        let table = &self.dataset()?.table;
        Ok(table.slice(self.page * self.config.page_size, self.config.page_size))
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        match (self.table(), self.config.page_size) {
            (Some(table), size) if size > 0 => table.num_rows().div_ceil(size),
            _ => 0,
        }
    }

    /// Advances while the next page would still start inside the table.
    pub fn next_page(&mut self) -> bool {
        let rows = self.table().map_or(0, Table::num_rows);
        let end = (self.page + 1) * self.config.page_size;
        if end < rows {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn preview(&self) -> Result<Table, QuarryError> {
        Ok(self.dataset()?.table.head(self.config.preview_rows))
    }

    /// The chosen view, capped for display.
    pub fn view(&self, view: View) -> Result<ResultTable, QuarryError> {
        match view {
            View::Raw => Ok(cap(self.dataset()?.table.clone(), self.config.max_viz_rows)),
            View::Filtered => Ok(self.dataset()?.filtered.clone()),
            View::LastQuery => self.last_result.clone().ok_or(QuarryError::NoQueryResult),
        }
    }

    /// Column subset of a view, for the raw-data explorer.
    pub fn select_columns(&self, view: View, columns: &[&str]) -> Result<Table, QuarryError> {
        self.view(view)?.table.select(columns)
    }

    pub fn suggest_charts(&self, view: View) -> Result<Vec<ChartSpec>, QuarryError> {
        Ok(chart::suggest(&self.view(view)?.table)
            .into_iter()
            .map(|spec| spec.with_bins(self.config.histogram_bins))
            .collect())
    }

    pub fn render_chart(
        &self,
        view: View,
        kind: ChartKind,
        x: &str,
        y: Option<&str>,
        color: Option<&str>,
    ) -> Result<Chart, QuarryError> {
        let mut chart = chart::render(&self.view(view)?, kind, x, y, color)?;
        chart.spec = chart.spec.with_bins(self.config.histogram_bins);
        if chart.truncated {
            warn!(
                "Charting only the first {} rows",
                self.config.max_viz_rows
            );
        }
        Ok(chart)
    }

    /// CSV of a view without the display cap; the filtered view is re-derived
    /// from the table and the applied filter, if any.
    pub fn export_csv(&self, view: View) -> Result<Vec<u8>, QuarryError> {
        match view {
            View::Raw => self.dataset()?.table.to_csv_bytes(),
            View::Filtered => {
                let dataset = self.dataset()?;
                match &dataset.filter {
                    Some(spec) => filter::apply(&dataset.table, spec)?.to_csv_bytes(),
                    None => dataset.table.to_csv_bytes(),
                }
            }
            View::LastQuery => self.view(View::LastQuery)?.table.to_csv_bytes(),
        }
    }

    pub fn profile(&self, view: View) -> Result<DatasetProfile, QuarryError> {
        stats::profile(&self.view(view)?.table)
    }

    pub fn describe(&self, view: View) -> Result<Vec<NumericSummary>, QuarryError> {
        stats::describe(&self.view(view)?.table)
    }

    pub fn correlation(&self, view: View) -> Result<Option<CorrelationMatrix>, QuarryError> {
        stats::correlation(&self.view(view)?.table)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{PEOPLE_CSV, sequence_csv};

    fn small_pages() -> Config {
        let mut config = Config::default();
        config.session.page_size = 10;
        config.session.max_viz_rows = 25;
        config
    }

    #[tokio::test]
    async fn test_fresh_session_is_empty() {
        let mut session = Session::default();
        assert!(!session.is_loaded());
        assert_eq!(session.page(), Err(QuarryError::NoDataset));
        assert_eq!(session.view(View::Filtered), Err(QuarryError::NoDataset));
        assert!(matches!(
            session.run_query("SELECT 1").await,
            Err(QuarryError::NoDataset)
        ));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_upload_resets_derived_state() {
        let mut session = Session::new(&small_pages());
        session.upload(sequence_csv(40).as_bytes(), "seq.csv").unwrap();
        assert!(session.next_page());
        assert_eq!(session.page_index(), 1);

        let mut spec = session.editable_filter().unwrap();
        let table = session.table().unwrap().clone();
        spec.set_range(&table, "id", 0.0, 4.0).unwrap();
        session.apply_filter(spec).unwrap();
        assert_eq!(session.filtered().unwrap().num_rows(), 5);

        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();
        assert_eq!(session.page_index(), 0);
        assert_eq!(session.dataset_name(), Some("people.csv"));
        assert_eq!(session.filter_spec(), None);
        let filtered = session.filtered().unwrap();
        assert_eq!(&filtered.table, session.table().unwrap());
        assert!(!filtered.truncated);
    }

    #[test]
    fn test_failed_upload_keeps_previous_dataset() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();
        let before = session.table().unwrap().clone();

        assert!(matches!(
            session.upload(b"a,b\n1\n", "broken.csv"),
            Err(QuarryError::Parse(_))
        ));
        assert!(matches!(
            session.upload(b"{}", "data.json"),
            Err(QuarryError::UnsupportedFormat(_))
        ));
        assert_eq!(session.table(), Some(&before));
        assert_eq!(session.dataset_name(), Some("people.csv"));
    }

    #[test]
    fn test_pagination_bounds() {
        let mut session = Session::new(&small_pages());
        session.upload(sequence_csv(25).as_bytes(), "seq.csv").unwrap();
        assert_eq!(session.page_count(), 3);
        assert!(!session.prev_page());
        assert!(session.next_page());
        assert!(session.next_page());
        assert!(!session.next_page());
        assert_eq!(session.page_index(), 2);
        assert_eq!(session.page().unwrap().num_rows(), 5);
        assert!(session.prev_page());
        assert_eq!(session.page().unwrap().num_rows(), 10);
    }

    #[test]
    fn test_raw_view_is_capped_but_export_is_not() {
        let mut session = Session::new(&small_pages());
        session.upload(sequence_csv(40).as_bytes(), "seq.csv").unwrap();

        let raw = session.view(View::Raw).unwrap();
        assert_eq!(raw.num_rows(), 25);
        assert!(raw.truncated);
        assert!(session.filtered().unwrap().truncated);

        let csv = String::from_utf8(session.export_csv(View::Raw).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 41);
    }

    #[tokio::test]
    async fn test_query_success_updates_result_and_history() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();

        let result = session
            .run_query("SELECT city, COUNT(*) AS n FROM data GROUP BY city")
            .await
            .unwrap();
        assert_eq!(result.num_rows(), 3);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().latest().unwrap().rows, 3);
        assert!(session.last_result().is_some());
    }

    #[tokio::test]
    async fn test_query_failure_leaves_state_untouched() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();
        session.run_query("SELECT age FROM data").await.unwrap();

        let result_before = session.last_result().cloned();
        let history_before: Vec<String> =
            session.history().recent().map(|r| r.query.clone()).collect();

        let err = session.run_query("SELECT nope FROM data").await;
        assert!(matches!(err, Err(QuarryError::Query(_))));

        assert_eq!(session.last_result().cloned(), result_before);
        let history_after: Vec<String> =
            session.history().recent().map(|r| r.query.clone()).collect();
        assert_eq!(history_after, history_before);
    }

    #[tokio::test]
    async fn test_query_result_is_capped() {
        let mut session = Session::new(&small_pages());
        session.upload(sequence_csv(40).as_bytes(), "seq.csv").unwrap();
        let result = session.run_query("SELECT * FROM data").await.unwrap();
        assert_eq!(result.num_rows(), 25);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn test_charts_from_last_query() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();
        assert_eq!(
            session.suggest_charts(View::LastQuery),
            Err(QuarryError::NoQueryResult)
        );

        session.run_query("SELECT age FROM data").await.unwrap();
        let suggestions = session.suggest_charts(View::LastQuery).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, ChartKind::Histogram);
        assert_eq!(suggestions[0].bins, Some(session.config().histogram_bins));

        let chart = session
            .render_chart(View::LastQuery, ChartKind::Histogram, "age", Some("x"), None)
            .unwrap();
        assert_eq!(chart.spec.y, None);
    }

    #[test]
    fn test_select_columns_and_stats() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();

        let projected = session.select_columns(View::Raw, &["city"]).unwrap();
        assert_eq!(projected.column_names(), vec!["city"]);

        let overview = session.profile(View::Raw).unwrap();
        assert_eq!(overview.rows, 6);
        assert!(session.correlation(View::Filtered).unwrap().is_some());
        assert_eq!(session.describe(View::Raw).unwrap().len(), 2);
    }

    fn csv_rows(bytes: Vec<u8>) -> usize {
        String::from_utf8(bytes).unwrap().lines().count() - 1
    }

    #[test]
    fn test_unfiltered_export_keeps_rows_with_nulls() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();
        assert_eq!(session.filtered().unwrap().num_rows(), 6);
        assert_eq!(csv_rows(session.export_csv(View::Filtered).unwrap()), 6);

        let spec = session.editable_filter().unwrap();
        assert_eq!(session.apply_filter(spec).unwrap().num_rows(), 5);
        assert_eq!(csv_rows(session.export_csv(View::Filtered).unwrap()), 5);
        assert!(session.filter_spec().is_some());

        session.reset_filter().unwrap();
        assert_eq!(session.filter_spec(), None);
        assert_eq!(session.filtered().unwrap().num_rows(), 6);
        assert_eq!(csv_rows(session.export_csv(View::Filtered).unwrap()), 6);
    }

    #[test]
    fn test_partial_filter_leaves_other_columns_alone() {
        let mut session = Session::default();
        session.upload(PEOPLE_CSV.as_bytes(), "people.csv").unwrap();
        let table = session.table().unwrap().clone();

        let mut spec = FilterSpec::default();
        spec.set_allowed(&table, "city", ["Oslo"], false).unwrap();
        // the Oslo row with a missing income stays
        assert_eq!(session.apply_filter(spec).unwrap().num_rows(), 3);
        assert_eq!(csv_rows(session.export_csv(View::Filtered).unwrap()), 3);
    }
}
