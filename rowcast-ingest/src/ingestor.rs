//! Drives a [`SourceTable`] into a [`ColumnStore`].

use std::sync::Arc;

use rowcast_column_store::{
    ColumnStore, ColumnStoreConfig, Diagnostic, DiagnosticSink, TracingSink,
};
use rowcast_result::{Error, Result};

use crate::field::{FieldDecl, ResolvedField};
use crate::inference::infer_scalar_kind;
use crate::source::{DataSource, SourceTable, StagingBuffers};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Reserve column capacity for the table's full row count before reading.
    pub preallocate: bool,
    /// Stop after this many rows.
    pub max_rows: Option<u64>,
    /// Configuration of stores created by [`SourceIngestor::ingest`].
    pub store_config: ColumnStoreConfig,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            preallocate: true,
            max_rows: None,
            store_config: ColumnStoreConfig::default(),
        }
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub table: String,
    /// Rows committed by this run.
    pub rows: u64,
    /// Fields materialized as columns, in declaration order.
    pub columns: Vec<ResolvedField>,
    /// Names of fields that were not materialized.
    pub skipped: Vec<String>,
}

pub struct SourceIngestor {
    options: IngestOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for SourceIngestor {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}

impl SourceIngestor {
    pub fn new(options: IngestOptions) -> Self {
        Self {
            options,
            sink: Arc::new(TracingSink),
        }
    }

    /// Route warnings (here and in stores created by [`ingest`](Self::ingest)) to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Resolve the scalar kind of every field, reporting and dropping unsupported ones.
    pub fn resolve_fields(&self, fields: &[FieldDecl]) -> Vec<ResolvedField> {
        fields
            .iter()
            .enumerate()
            .filter_map(|(source_index, field)| match infer_scalar_kind(field) {
                Ok(kind) => Some(ResolvedField {
                    name: field.name.clone(),
                    kind,
                    source_index,
                }),
                Err(Error::UnsupportedFieldType { field, reason }) => {
                    self.sink
                        .report(Diagnostic::UnsupportedField { name: field, reason });
                    None
                }
                Err(other) => {
                    self.sink.report(Diagnostic::UnsupportedField {
                        name: field.name.clone(),
                        reason: other.to_string(),
                    });
                    None
                }
            })
            .collect()
    }

    /// Ingest table `table` of `source` into a new store.
    pub fn ingest<S>(&self, source: &S, table: &str) -> Result<ColumnStore>
    where
        S: DataSource + ?Sized,
    {
        let mut store = ColumnStore::with_config(self.options.store_config.clone())
            .with_sink(Arc::clone(&self.sink));
        self.ingest_into(&mut store, source, table)?;
        Ok(store)
    }

    /// Ingest table `table` of `source`, appending rows to `store`.
    ///
    /// Columns already present in `store` are reused when their kind matches the
    /// field; a field whose name is taken by a column of another kind is skipped. New
    /// columns can only be added to a store without committed rows, since they would
    /// otherwise start out lagging.
    ///
    /// A field repeating the name of an earlier field with another kind is skipped
    /// as well.
    ///
    /// A source that fails to open leaves `store` untouched. A failure part way through
    /// keeps the rows committed so far and discards the values of the failed row.
    pub fn ingest_into<S>(
        &self,
        store: &mut ColumnStore,
        source: &S,
        table_name: &str,
    ) -> Result<IngestSummary>
    where
        S: DataSource + ?Sized,
    {
        let mut table = source.open_table(table_name)?;
        let decls = table.fields().to_vec();
        let resolved = self.resolve_fields(&decls);

        let mut skipped: Vec<String> = decls
            .iter()
            .enumerate()
            .filter(|(idx, _)| !resolved.iter().any(|f| f.source_index == *idx))
            .map(|(_, decl)| decl.name.clone())
            .collect();

        let mut columns = Vec::with_capacity(resolved.len());
        for field in resolved {
            let taken = store.column_data(&field.name).map(|data| data.kind()).or_else(|| {
                columns
                    .iter()
                    .find(|c: &&ResolvedField| c.name == field.name)
                    .map(|c| c.kind)
            });
            match taken {
                Some(kind) if kind == field.kind => columns.push(field),
                Some(kind) => {
                    self.sink.report(Diagnostic::UnsupportedField {
                        reason: format!("column already exists as {kind}"),
                        name: field.name.clone(),
                    });
                    skipped.push(field.name);
                }
                None => columns.push(field),
            }
        }

        let new_columns: Vec<&ResolvedField> = columns
            .iter()
            .filter(|f| !store.has_column(&f.name))
            .collect();
        if store.num_entries() > 0 {
            if let Some(field) = new_columns.first() {
                return Err(Error::InvalidArgumentError(format!(
                    "cannot add column '{}' to a store holding {} committed rows",
                    field.name,
                    store.num_entries()
                )));
            }
        }
        for field in new_columns {
            store.add_column_of_kind(field.name.clone(), field.kind);
        }

        let total_rows = table.num_rows();
        let rows = self
            .options
            .max_rows
            .map_or(total_rows, |max| max.min(total_rows));
        if self.options.preallocate {
            if let Ok(rows) = usize::try_from(rows) {
                store.reserve_rows(store.num_entries().saturating_add(rows));
            }
        }

        tracing::debug!(
            table = table.name(),
            rows,
            columns = columns.len(),
            skipped = skipped.len(),
            "ingesting table"
        );

        let mut buffers = StagingBuffers::bind(&columns, decls.len());
        for row in 0..rows {
            if let Err(err) = read_and_commit(table.as_mut(), row, &mut buffers, store) {
                store.discard_pending();
                return Err(err);
            }
        }
        drop(table);

        tracing::info!(table = table_name, rows, "loaded entries");

        Ok(IngestSummary {
            table: table_name.to_string(),
            rows,
            columns,
            skipped,
        })
    }
}

fn read_and_commit(
    table: &mut dyn SourceTable,
    row: u64,
    buffers: &mut StagingBuffers,
    store: &mut ColumnStore,
) -> Result<()> {
    table.read_row(row, buffers)?;
    buffers.write_row(store)?;
    store.fill()
}
