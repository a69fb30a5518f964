// Copyright 2025 the tabstat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named, typed, nullable columns.

extern crate alloc;

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::table::TableError;
use crate::value::{DataType, Value};

/// Typed column storage. `None` marks a null cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Boolean cells.
    Bool(Vec<Option<bool>>),
    /// Integer cells.
    Int(Vec<Option<i64>>),
    /// Float cells.
    Float(Vec<Option<f64>>),
    /// String cells.
    Str(Vec<Option<Arc<str>>>),
}

impl ColumnData {
    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    /// Returns `true` if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the logical type of the storage.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::Str(_) => DataType::Str,
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        fn pick<T: Clone>(v: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
            rows.iter().map(|&r| v.get(r).cloned().flatten()).collect()
        }
        match self {
            Self::Bool(v) => Self::Bool(pick(v, rows)),
            Self::Int(v) => Self::Int(pick(v, rows)),
            Self::Float(v) => Self::Float(pick(v, rows)),
            Self::Str(v) => Self::Str(pick(v, rows)),
        }
    }
}

macro_rules! column_data_from {
    ($variant:ident, $ty:ty) => {
        impl From<Vec<$ty>> for ColumnData {
            fn from(values: Vec<$ty>) -> Self {
                Self::$variant(values.into_iter().map(Some).collect())
            }
        }

        impl From<Vec<Option<$ty>>> for ColumnData {
            fn from(values: Vec<Option<$ty>>) -> Self {
                Self::$variant(values)
            }
        }
    };
}

column_data_from!(Bool, bool);
column_data_from!(Int, i64);
column_data_from!(Float, f64);

impl From<Vec<&str>> for ColumnData {
    fn from(values: Vec<&str>) -> Self {
        Self::Str(values.into_iter().map(|s| Some(Arc::from(s))).collect())
    }
}

impl From<Vec<Option<&str>>> for ColumnData {
    fn from(values: Vec<Option<&str>>) -> Self {
        Self::Str(values.into_iter().map(|s| s.map(Arc::from)).collect())
    }
}

/// A named column of typed, nullable cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: Arc<str>,
    data: ColumnData,
}

impl Column {
    /// Creates a column from anything convertible into [`ColumnData`].
    ///
    /// ```
    /// use tabstat_core::{Column, DataType};
    ///
    /// let c = Column::new("x", vec![Some(1.0), None, Some(3.0)]);
    /// assert_eq!(c.data_type(), DataType::Float);
    /// assert_eq!(c.null_count(), 1);
    /// ```
    pub fn new(name: impl Into<Arc<str>>, data: impl Into<ColumnData>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Builds a column of type `data_type` from scalar values.
    ///
    /// `Value::Null` becomes a null cell. Any other value must match `data_type`.
    pub fn from_values(
        name: impl Into<Arc<str>>,
        data_type: DataType,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let mismatch = |name: &Arc<str>| TableError::TypeMismatch {
            column: name.to_string(),
            expected: data_type,
        };
        let values = values.into_iter();
        let data = match data_type {
            DataType::Bool => ColumnData::Bool(
                values
                    .map(|v| match v {
                        Value::Null => Ok(None),
                        Value::Bool(b) => Ok(Some(b)),
                        _ => Err(mismatch(&name)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            DataType::Int => ColumnData::Int(
                values
                    .map(|v| match v {
                        Value::Null => Ok(None),
                        Value::Int(i) => Ok(Some(i)),
                        _ => Err(mismatch(&name)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            DataType::Float => ColumnData::Float(
                values
                    .map(|v| match v {
                        Value::Null => Ok(None),
                        Value::Float(f) => Ok(Some(f)),
                        _ => Err(mismatch(&name)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            DataType::Str => ColumnData::Str(
                values
                    .map(|v| match v {
                        Value::Null => Ok(None),
                        Value::Str(s) => Ok(Some(s)),
                        _ => Err(mismatch(&name)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(Self { name, data })
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared column name.
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the underlying storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Returns the logical type.
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Returns `true` for integer and float columns.
    pub fn is_numeric(&self) -> bool {
        self.data_type().is_numeric()
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the cell at `row` as a [`Value`]; out-of-range rows read as null.
    pub fn get(&self, row: usize) -> Value {
        match &self.data {
            ColumnData::Bool(v) => v.get(row).copied().flatten().into(),
            ColumnData::Int(v) => v.get(row).copied().flatten().into(),
            ColumnData::Float(v) => v.get(row).copied().flatten().into(),
            ColumnData::Str(v) => v.get(row).cloned().flatten().into(),
        }
    }

    /// Returns `true` if the cell at `row` is null.
    pub fn is_null(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Bool(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Int(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Float(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Str(v) => v.get(row).is_none_or(Option::is_none),
        }
    }

    /// Reads a numeric cell as `f64`.
    ///
    /// Null cells, NaN floats and non-numeric columns all read as `None`, so a
    /// caller collecting a sample only ever sees usable observations.
    pub fn f64(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Int(v) => v.get(row).copied().flatten().map(|i| i as f64),
            ColumnData::Float(v) => v.get(row).copied().flatten().filter(|f| !f.is_nan()),
            ColumnData::Bool(_) | ColumnData::Str(_) => None,
        }
    }

    /// Returns the number of null cells.
    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&r| self.is_null(r)).count()
    }

    /// Returns a new column with only the given rows, in the given order.
    ///
    /// Indices may repeat. An index at or past [`Column::len`] reads as null,
    /// matching [`Column::get`].
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            data: self.data.take(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn f64_skips_nulls_and_nan() {
        let c = Column::new("x", vec![Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        let got: Vec<f64> = (0..c.len()).filter_map(|r| c.f64(r)).collect();
        assert_eq!(got, vec![1.0, 4.0]);
        assert_eq!(c.null_count(), 1);
    }

    #[test]
    fn int_columns_widen_to_f64() {
        let c = Column::new("n", vec![1_i64, 2, 3]);
        assert!(c.is_numeric(), "int columns are numeric");
        assert_eq!(c.f64(2), Some(3.0));
    }

    #[test]
    fn string_columns_are_not_numeric() {
        let c = Column::new("s", vec!["a", "b"]);
        assert!(!c.is_numeric(), "string columns are not numeric");
        assert_eq!(c.f64(0), None);
        assert_eq!(c.get(1), Value::from("b"));
    }

    #[test]
    fn from_values_rejects_wrong_type() {
        let err = Column::from_values("g", DataType::Int, vec![Value::Int(1), Value::from("x")])
            .unwrap_err();
        assert_eq!(
            err,
            TableError::TypeMismatch {
                column: "g".into(),
                expected: DataType::Int,
            }
        );
    }

    #[test]
    fn take_reorders_and_keeps_nulls() {
        let c = Column::new("s", vec![Some("a"), None, Some("c")]);
        let t = c.take(&[2, 1]);
        assert_eq!(t.get(0), Value::from("c"));
        assert!(t.is_null(1), "null cells survive a take");
    }

    #[test]
    fn take_past_the_end_reads_null() {
        let c = Column::new("x", vec![1_i64, 2]);
        let t = c.take(&[1, 5, 1]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(0), Value::Int(2));
        assert!(t.is_null(1), "out-of-range index becomes null");
        assert_eq!(t.get(2), Value::Int(2));
    }
}
