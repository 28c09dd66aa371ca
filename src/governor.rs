use log::warn;

use crate::table::Table;

/// A table surfaced to charts or exports, with whether rows were cut off.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub table: Table,
    pub truncated: bool,
}

impl ResultTable {
    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }
}

/// Keeps the first `max_rows` rows. Exceeding the cap is flagged, never an error.
pub fn cap(table: Table, max_rows: usize) -> ResultTable {
    let rows = table.num_rows();
    if rows > max_rows {
        warn!("result has {} rows, keeping the first {}", rows, max_rows);
        ResultTable {
            table: table.head(max_rows),
            truncated: true,
        }
    } else {
        ResultTable {
            table,
            truncated: false,
        }
    }
}
