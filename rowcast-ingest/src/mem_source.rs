//! In-memory source tables.

use std::collections::BTreeMap;

use rowcast_column_store::ScalarValue;
use rowcast_result::{Error, Result};

use crate::field::FieldDecl;
use crate::source::{DataSource, SourceTable, StagingBuffers};

/// A table held entirely in memory, one `Vec<ScalarValue>` per row.
///
/// Every row carries one value per declared field, compound fields included (their
/// values are never read).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemTable {
    name: String,
    fields: Vec<FieldDecl>,
    rows: Vec<Vec<ScalarValue>>,
}

impl MemTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_row<I>(mut self, row: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ScalarValue>,
    {
        self.push_row(row);
        self
    }

    pub fn push_row<I>(&mut self, row: I)
    where
        I: IntoIterator,
        I::Item: Into<ScalarValue>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// A named collection of [`MemTable`]s.
#[derive(Debug, Clone, Default)]
pub struct MemSource {
    tables: BTreeMap<String, MemTable>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: MemTable) -> Self {
        self.insert_table(table);
        self
    }

    /// Add `table`, replacing any table of the same name.
    pub fn insert_table(&mut self, table: MemTable) -> Option<MemTable> {
        self.tables.insert(table.name.clone(), table)
    }

    pub fn table(&self, name: &str) -> Option<&MemTable> {
        self.tables.get(name)
    }
}

impl DataSource for MemSource {
    fn open_table(&self, name: &str) -> Result<Box<dyn SourceTable + '_>> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| Error::SourceOpen(format!("table '{name}' not found")))?;
        Ok(Box::new(MemTableReader { table }))
    }
}

struct MemTableReader<'a> {
    table: &'a MemTable,
}

impl SourceTable for MemTableReader<'_> {
    fn name(&self) -> &str {
        &self.table.name
    }

    fn fields(&self) -> &[FieldDecl] {
        &self.table.fields
    }

    fn num_rows(&self) -> u64 {
        self.table.rows.len() as u64
    }

    fn read_row(&mut self, row: u64, buffers: &mut StagingBuffers) -> Result<()> {
        let values = usize::try_from(row)
            .ok()
            .and_then(|row| self.table.rows.get(row))
            .ok_or_else(|| {
                Error::SourceRead(format!("table '{}' has no row {row}", self.table.name))
            })?;
        if values.len() != self.table.fields.len() {
            return Err(Error::SourceRead(format!(
                "table '{}' row {row} holds {} values for {} fields",
                self.table.name,
                values.len(),
                self.table.fields.len()
            )));
        }

        for (field_index, value) in values.iter().enumerate() {
            if buffers.is_bound(field_index) {
                buffers.put(field_index, value.clone())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_fails_to_open() {
        let source = MemSource::new().with_table(MemTable::new("events"));
        assert!(source.open_table("events").is_ok());
        let err = source.open_table("other").err().unwrap();
        assert!(matches!(err, Error::SourceOpen(msg) if msg.contains("other")));
    }

    #[test]
    fn short_row_is_a_read_error() {
        let table = MemTable::new("t")
            .with_field(FieldDecl::leaf("a", "a/I"))
            .with_field(FieldDecl::leaf("b", "b/I"))
            .with_row([1_i32]);
        let source = MemSource::new().with_table(table);
        let mut reader = source.open_table("t").unwrap();
        let mut buffers = StagingBuffers::default();
        assert!(matches!(
            reader.read_row(0, &mut buffers),
            Err(Error::SourceRead(_))
        ));
        assert!(matches!(
            reader.read_row(5, &mut buffers),
            Err(Error::SourceRead(_))
        ));
    }
}
