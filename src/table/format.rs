use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::core::QuarryError;

/// Renders every cell of `array` as text, `None` for nulls.
///
/// Floats keep a fractional part even when whole (`2.0`, not `2`) so a value
/// written out and read back is inferred as a float again.
pub(crate) fn format_column(array: &ArrayRef) -> Result<Vec<Option<String>>, QuarryError> {
    match array.data_type() {
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let widened = cast(array, &DataType::Float64)?;
            Ok(widened
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map(format_float))
                .collect())
        }
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            Ok((0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        None
                    } else {
                        Some(formatter.value(i).to_string())
                    }
                })
                .collect())
        }
    }
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
