use arrow::datatypes::{DataType, TimeUnit};
use serde::{Deserialize, Serialize};

/// Primitive type a column was inferred as, or derived from an Arrow type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Datetime,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Text columns are the ones charted as categories.
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnKind::Text)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Text => "text",
        }
    }
}

impl From<&DataType> for ColumnKind {
    fn from(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal32(_, _)
            | DataType::Decimal64(_, _)
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => ColumnKind::Float,
            DataType::Boolean => ColumnKind::Boolean,
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                ColumnKind::Datetime
            }
            DataType::Dictionary(_, value) => ColumnKind::from(value.as_ref()),
            _ => ColumnKind::Text,
        }
    }
}

impl From<ColumnKind> for DataType {
    fn from(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Boolean => DataType::Boolean,
            ColumnKind::Datetime => DataType::Timestamp(TimeUnit::Millisecond, None),
            ColumnKind::Text => DataType::Utf8,
        }
    }
}
