use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::DatasetError;

/// Values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
    Timestamp(Vec<NaiveDateTime>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Column-oriented table with named, equally sized columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column<S: Into<String>>(
        &mut self,
        name: S,
        data: ColumnData,
    ) -> Result<(), DatasetError> {
        let name = name.into();

        if self.column(&name).is_some() {
            return Err(DatasetError::DuplicateColumn { column: name });
        }

        if let Some(first) = self.columns.first() {
            let expected = first.data.len();
            if data.len() != expected {
                return Err(DatasetError::LengthMismatch {
                    column: name,
                    expected,
                    actual: data.len(),
                });
            }
        }

        self.columns.push(Column { name, data });
        Ok(())
    }

    pub fn with_column<S: Into<String>>(
        mut self,
        name: S,
        data: ColumnData,
    ) -> Result<Self, DatasetError> {
        self.push_column(name, data)?;
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// New table holding copies of `names`, in that order.
    ///
    /// Fails on the first name not present.
    pub fn select(&self, names: &[&str]) -> Result<Table, DatasetError> {
        let mut out = Table::new();
        for name in names {
            let data = self
                .column(name)
                .ok_or_else(|| DatasetError::missing_column(*name))?;
            out.push_column(*name, data.clone())?;
        }
        Ok(out)
    }
}
