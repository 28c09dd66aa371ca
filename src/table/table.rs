use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::core::{ColumnKind, QuarryError};

use super::format::format_column;

/// An immutable rectangular dataset: one Arrow batch plus the kind of every column.
///
/// Column names are unique and every column has the batch's row count. A table
/// is never patched in place; operations return a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
    kinds: Vec<ColumnKind>,
}

impl Table {
    pub fn try_new(batch: RecordBatch) -> Result<Self, QuarryError> {
        let schema = batch.schema();
        let mut seen = HashSet::with_capacity(schema.fields().len());
        for field in schema.fields() {
            if !seen.insert(field.name().as_str()) {
                return Err(QuarryError::Parse(format!(
                    "duplicate column name '{}'",
                    field.name()
                )));
            }
        }
        let kinds = schema
            .fields()
            .iter()
            .map(|f| ColumnKind::from(f.data_type()))
            .collect();
        Ok(Self { batch, kinds })
    }

    /// Builds a table from named arrays. Every array must have the same length.
    pub fn from_columns(columns: Vec<(String, ArrayRef)>) -> Result<Self, QuarryError> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
            .collect();
        let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
            .map_err(|e| QuarryError::Parse(e.to_string()))?;
        Self::try_new(batch)
    }

    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
            kinds: Vec::new(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Column names paired with their kinds, in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnKind)> + '_ {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .zip(self.kinds.iter())
            .map(|(f, k)| (f.name().as_str(), *k))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema_ref().index_of(name).is_ok()
    }

    pub fn index_of(&self, name: &str) -> Result<usize, QuarryError> {
        self.batch
            .schema_ref()
            .index_of(name)
            .map_err(|_| QuarryError::ColumnNotFound(name.to_string()))
    }

    pub fn kind_of(&self, name: &str) -> Result<ColumnKind, QuarryError> {
        Ok(self.kinds[self.index_of(name)?])
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef, QuarryError> {
        Ok(self.batch.column(self.index_of(name)?))
    }

    /// Rows `[offset, offset + len)`, clipped to the table bounds.
    pub fn slice(&self, offset: usize, len: usize) -> Table {
        let offset = offset.min(self.num_rows());
        let len = len.min(self.num_rows() - offset);
        Table {
            batch: self.batch.slice(offset, len),
            kinds: self.kinds.clone(),
        }
    }

    pub fn head(&self, n: usize) -> Table {
        self.slice(0, n)
    }

    /// Keeps only the named columns, in the order given.
    pub fn select(&self, columns: &[&str]) -> Result<Table, QuarryError> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|name| self.index_of(name))
            .collect::<Result<_, _>>()?;
        let batch = self.batch.project(&indices)?;
        let kinds = indices.iter().map(|&i| self.kinds[i]).collect();
        Ok(Table { batch, kinds })
    }

    /// Column values widened to f64; `None` for nulls.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>, QuarryError> {
        let kind = self.kind_of(name)?;
        if !kind.is_numeric() {
            return Err(QuarryError::InvalidFilter(format!(
                "column '{}' is {}, not numeric",
                name,
                kind.name()
            )));
        }
        let widened = cast(self.column(name)?, &DataType::Float64)?;
        Ok(widened.as_primitive::<Float64Type>().iter().collect())
    }

    /// Column values rendered as text; `None` for nulls.
    pub fn display_values(&self, name: &str) -> Result<Vec<Option<String>>, QuarryError> {
        format_column(self.column(name)?)
    }

    /// Distinct non-null values of a column, rendered as text.
    pub fn distinct_values(&self, name: &str) -> Result<BTreeSet<String>, QuarryError> {
        Ok(self.display_values(name)?.into_iter().flatten().collect())
    }

    pub fn null_count(&self, name: &str) -> Result<usize, QuarryError> {
        Ok(self.column(name)?.null_count())
    }
}
