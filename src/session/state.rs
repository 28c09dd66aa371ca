use crate::filter::FilterSpec;
use crate::governor::ResultTable;
use crate::table::Table;

/// Everything that hangs off one upload. Replaced as a whole on re-upload.
#[derive(Debug, Clone)]
pub(crate) struct DatasetState {
    pub name: String,
    pub table: Table,
    /// Applied filter; `None` while the view is the whole table.
    pub filter: Option<FilterSpec>,
    pub filtered: ResultTable,
}
