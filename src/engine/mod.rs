mod templates;

pub use templates::{QueryTemplate, templates};

use std::sync::Arc;

use arrow::compute::concat_batches;
use datafusion::datasource::MemTable;
use datafusion::execution::context::SQLOptions;
use datafusion::prelude::{SessionConfig as EngineConfig, SessionContext};
use log::{debug, info};

use crate::core::QuarryError;
use crate::table::Table;

/// Name under which the active table is visible to SQL.
pub const TABLE_NAME: &str = "data";

/// One embedded SQL engine per session.
///
/// Methods take `&mut self`, so a session runs one query to completion before
/// the next starts, and `bind` cannot interleave with a running query.
pub struct QueryEngine {
    ctx: SessionContext,
}

impl QueryEngine {
    pub fn new() -> Self {
        // single partition keeps result rows in source order
        let config = EngineConfig::new()
            .with_target_partitions(1)
            .with_information_schema(true);
        Self {
            ctx: SessionContext::new_with_config(config),
        }
    }

    /// Registers `table` as `data`, replacing any earlier registration.
    pub fn bind(&mut self, table: &Table) -> Result<(), QuarryError> {
        let provider = MemTable::try_new(table.schema(), vec![vec![table.batch().clone()]])
            .map_err(|e| QuarryError::Query(format!("cannot register table: {e}")))?;
        self.unbind()?;
        self.ctx
            .register_table(TABLE_NAME, Arc::new(provider))
            .map_err(|e| QuarryError::Query(format!("cannot register table: {e}")))?;
        info!(
            "Bound {} rows x {} columns as '{}'",
            table.num_rows(),
            table.num_columns(),
            TABLE_NAME
        );
        Ok(())
    }

    /// Drops the `data` registration. Safe to call when nothing is bound.
    pub fn unbind(&mut self) -> Result<(), QuarryError> {
        let previous = self
            .ctx
            .deregister_table(TABLE_NAME)
            .map_err(|e| QuarryError::Query(format!("cannot unregister table: {e}")))?;
        if previous.is_some() {
            debug!("Unbound previous '{}' table", TABLE_NAME);
        }
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.ctx.table_exist(TABLE_NAME).unwrap_or(false)
    }

    /// Plans and runs `sql`, collecting the whole result into one table.
    ///
    /// Statements that would change the catalog or session (CREATE, DROP,
    /// INSERT, SET, ...) are refused.
    pub async fn execute(&mut self, sql: &str) -> Result<Table, QuarryError> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(QuarryError::Query("query is empty".to_string()));
        }

        let frame = self.ctx.sql_with_options(sql, read_only()).await?;
        let schema = Arc::new(frame.schema().as_arrow().clone());
        let batches = frame.collect().await?;
        let schema = batches.first().map(|b| b.schema()).unwrap_or(schema);
        let batch =
            concat_batches(&schema, &batches).map_err(|e| QuarryError::Query(e.to_string()))?;

        let table = Table::try_new(batch).map_err(|e| QuarryError::Query(e.to_string()))?;
        info!("Query returned {} rows", table.num_rows());
        Ok(table)
    }
}

fn read_only() -> SQLOptions {
    SQLOptions::new()
        .with_allow_ddl(false)
        .with_allow_dml(false)
        .with_allow_statements(false)
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
