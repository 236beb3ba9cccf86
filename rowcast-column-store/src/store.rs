//! The main ColumnStore API.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rowcast_result::{Error, Result};

use crate::column::ColumnData;
use crate::config::{ColumnStoreConfig, FillPolicy};
use crate::diagnostics::{Diagnostic, DiagnosticSink, default_sink};
use crate::types::{Scalar, ScalarKind, ScalarValue};

/// Name, kind, and current length of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub kind: ScalarKind,
    pub len: usize,
}

/// Named columns of differing scalar kinds sharing one committed-row counter.
///
/// Columns are keyed by name and iterate in lexicographic name order. The order in
/// which columns were added is tracked separately and exposed through
/// [`declaration_order`](Self::declaration_order).
///
/// # Row model
///
/// Writes go to the *current* row, whose index is the number of committed rows.
/// [`fill`](Self::fill) commits that row by advancing the counter by exactly one. Under
/// the default [`FillPolicy::Lenient`] no check is made that every column was written,
/// so a column skipped on some row ends up shorter than the others and stays that way.
pub struct ColumnStore {
    columns: BTreeMap<String, ColumnData>,
    declaration_order: Vec<String>,
    committed_rows: usize,
    config: ColumnStoreConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for ColumnStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ColumnStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnStore")
            .field("columns", &self.columns)
            .field("committed_rows", &self.committed_rows)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ColumnStore {
    pub fn new() -> Self {
        Self::with_config(ColumnStoreConfig::default())
    }

    pub fn with_config(config: ColumnStoreConfig) -> Self {
        Self {
            columns: BTreeMap::new(),
            declaration_order: Vec::new(),
            committed_rows: 0,
            config,
            sink: default_sink(),
        }
    }

    /// Route warnings to `sink` instead of the default tracing sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ColumnStoreConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Register an empty column holding `T` values.
    ///
    /// Returns `false` and reports [`Diagnostic::DuplicateColumn`] if `name` is taken;
    /// the existing column keeps its kind and contents.
    pub fn add_column<T: Scalar>(&mut self, name: impl Into<String>) -> bool {
        self.add_column_of_kind(name, T::KIND)
    }

    /// Runtime-typed counterpart of [`add_column`](Self::add_column).
    pub fn add_column_of_kind(&mut self, name: impl Into<String>, kind: ScalarKind) -> bool {
        let name = name.into();
        if let Some(existing) = self.columns.get(&name) {
            self.sink.report(Diagnostic::DuplicateColumn {
                existing: existing.kind(),
                requested: kind,
                name,
            });
            return false;
        }

        tracing::trace!(column = %name, %kind, "adding column");
        self.declaration_order.push(name.clone());
        self.columns.insert(name, ColumnData::new(kind));
        true
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Typed view of a column.
    pub fn column<T: Scalar>(&self, name: &str) -> Result<&[T]> {
        let data = self
            .columns
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        T::values(data)
            .map(Vec::as_slice)
            .ok_or_else(|| type_mismatch::<T>(name, data.kind()))
    }

    /// Mutable typed access to a column's backing vector.
    ///
    /// Fails with [`Error::NotFound`] for an unknown name and [`Error::TypeMismatch`]
    /// when `T` is not the column's kind. Edits made through this reference bypass the
    /// row bookkeeping of [`set_value`](Self::set_value).
    pub fn column_mut<T: Scalar>(&mut self, name: &str) -> Result<&mut Vec<T>> {
        let data = self
            .columns
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let actual = data.kind();
        T::values_mut(data).ok_or_else(|| type_mismatch::<T>(name, actual))
    }

    pub fn column_data(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    /// Write `value` into the current (uncommitted) row of column `name`.
    ///
    /// The first write for a row appends; a repeated write for the same row overwrites
    /// the pending value, so the column grows by at most one per committed row.
    pub fn set_value<T: Scalar>(&mut self, name: &str, value: T) -> Result<()> {
        let row = self.committed_rows;
        let values = self.column_mut::<T>(name)?;
        match values.len().cmp(&row) {
            Ordering::Equal => values.push(value),
            Ordering::Greater => values[row] = value,
            Ordering::Less => {
                return Err(Error::LaggingColumn {
                    column: name.to_string(),
                    len: values.len(),
                    row,
                });
            }
        }
        Ok(())
    }

    /// Runtime-typed counterpart of [`set_value`](Self::set_value).
    pub fn set_scalar(&mut self, name: &str, value: ScalarValue) -> Result<()> {
        match value {
            ScalarValue::Int32(v) => self.set_value(name, v),
            ScalarValue::UInt32(v) => self.set_value(name, v),
            ScalarValue::Float32(v) => self.set_value(name, v),
            ScalarValue::Float64(v) => self.set_value(name, v),
            ScalarValue::Bool(v) => self.set_value(name, v),
            ScalarValue::Text(v) => self.set_value(name, v),
        }
    }

    /// Commit the current row.
    ///
    /// Under [`FillPolicy::Strict`] the commit is refused with [`Error::RaggedRow`] (and
    /// the counter left untouched) unless every column holds a value for the pending row.
    pub fn fill(&mut self) -> Result<()> {
        if self.config.fill_policy == FillPolicy::Strict {
            let expected = self.committed_rows + 1;
            if let Some((name, data)) = self.columns.iter().find(|(_, d)| d.len() != expected) {
                return Err(Error::RaggedRow {
                    column: name.clone(),
                    len: data.len(),
                    expected,
                });
            }
        }
        self.committed_rows += 1;
        Ok(())
    }

    /// Drop values written for the current row, leaving every column at most
    /// [`num_entries`](Self::num_entries) long.
    pub fn discard_pending(&mut self) {
        let rows = self.committed_rows;
        for data in self.columns.values_mut() {
            data.truncate(rows);
        }
    }

    /// Number of committed rows.
    pub fn num_entries(&self) -> usize {
        self.committed_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Make sure every column can hold `rows` values without reallocating.
    pub fn reserve_rows(&mut self, rows: usize) {
        for data in self.columns.values_mut() {
            data.reserve(rows.saturating_sub(data.len()));
        }
    }

    /// Columns in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnData)> {
        self.columns.iter().map(|(name, data)| (name.as_str(), data))
    }

    /// Column names in the order they were added.
    pub fn declaration_order(&self) -> &[String] {
        &self.declaration_order
    }

    /// Every column with its kind and length, in lexicographic name order.
    pub fn describe(&self) -> Vec<ColumnDescription> {
        self.iter()
            .map(|(name, data)| ColumnDescription {
                name: name.to_string(),
                kind: data.kind(),
                len: data.len(),
            })
            .collect()
    }

    /// Columns whose length differs from the committed row count.
    pub fn ragged_columns(&self) -> Vec<ColumnDescription> {
        self.describe()
            .into_iter()
            .filter(|c| c.len != self.committed_rows)
            .collect()
    }
}

impl fmt::Display for ColumnStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Column Store Structure =====")?;
        writeln!(f, "Number of entries: {}", self.committed_rows)?;
        writeln!(f, "Columns:")?;
        for (name, data) in self.iter() {
            writeln!(f, " {name} ({})", data.kind())?;
        }
        write!(f, "==================================")
    }
}

fn type_mismatch<T: Scalar>(name: &str, actual: ScalarKind) -> Error {
    Error::TypeMismatch {
        column: name.to_string(),
        expected: T::KIND.name(),
        actual: actual.name(),
    }
}
