//! [`ColumnarExporter`] turns a column store into one Arrow record batch and writes it
//! with the IPC file writer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float32Builder, Float64Builder, Int32Builder, StringBuilder,
    UInt32Builder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use rowcast_column_store::{ColumnData, ColumnStore, Diagnostic, DiagnosticSink, ScalarKind};
use rowcast_result::{Error, Result};

use crate::options::{ColumnOrder, ExportOptions, RaggedPolicy};

/// Arrow type a column of `kind` is exported as, or `None` if it has no mapping.
pub fn output_type(kind: ScalarKind, include_text: bool) -> Option<DataType> {
    match kind {
        ScalarKind::Int32 => Some(DataType::Int32),
        ScalarKind::UInt32 => Some(DataType::UInt32),
        ScalarKind::Float32 => Some(DataType::Float32),
        ScalarKind::Float64 => Some(DataType::Float64),
        ScalarKind::Bool => Some(DataType::Boolean),
        ScalarKind::Text => include_text.then_some(DataType::Utf8),
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Exported columns with their Arrow types, in schema order.
    pub columns: Vec<(String, DataType)>,
    pub rows: usize,
}

struct PlannedColumn<'a> {
    name: &'a str,
    data: &'a ColumnData,
    data_type: DataType,
    /// Leading values taken from the column.
    take: usize,
    /// Nulls appended after the taken values.
    pad: usize,
}

/// One-shot writer of a [`ColumnStore`] to the Arrow IPC file format.
///
/// Every exported array holds exactly [`ColumnStore::num_entries`] values: values
/// staged after the last commit are left out, and columns that lag behind are padded
/// with nulls or rejected according to [`RaggedPolicy`].
pub struct ColumnarExporter<'a> {
    store: &'a ColumnStore,
    options: ExportOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a> ColumnarExporter<'a> {
    pub fn new(store: &'a ColumnStore) -> Self {
        Self::with_options(store, ExportOptions::default())
    }

    /// Warnings go to the store's diagnostic sink unless overridden with
    /// [`with_sink`](Self::with_sink).
    pub fn with_options(store: &'a ColumnStore, options: ExportOptions) -> Self {
        Self {
            store,
            options,
            sink: Arc::clone(store.sink()),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Schema of the file [`write_to_path`](Self::write_to_path) would produce.
    pub fn schema(&self) -> Result<SchemaRef> {
        let (planned, _) = self.plan()?;
        Ok(schema_of(&planned))
    }

    /// Convert every exportable column into an Arrow array.
    pub fn build_record_batch(&self) -> Result<RecordBatch> {
        let (planned, diagnostics) = self.plan()?;
        for diagnostic in diagnostics {
            self.sink.report(diagnostic);
        }

        let schema = schema_of(&planned);
        let arrays: Vec<ArrayRef> = planned.iter().map(build_array).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(self.store.num_entries()));
        RecordBatch::try_new_with_options(schema, arrays, &options)
            .map_err(|err| Error::Export(format!("failed to assemble record batch: {err}")))
    }

    /// Write the store to `writer` as an Arrow IPC file.
    pub fn write_to_writer<W: Write>(&self, writer: W) -> Result<ExportSummary> {
        let batch = self.build_record_batch()?;
        write_batch(writer, &batch)?;
        Ok(summarize(&batch))
    }

    /// Write the store to a new file at `path`, replacing any existing file.
    ///
    /// The whole batch is built before the file is created. If writing fails, the
    /// partially written file is removed.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<ExportSummary> {
        let path = path.as_ref();
        let batch = self.build_record_batch()?;

        let file = File::create(path).map_err(|err| {
            Error::Export(format!("failed to create '{}': {err}", path.display()))
        })?;
        if let Err(err) = write_batch(BufWriter::new(file), &batch) {
            if let Err(remove_err) = fs::remove_file(path) {
                tracing::debug!(path = %path.display(), "could not remove partial output: {remove_err}");
            }
            return Err(err);
        }

        let summary = summarize(&batch);
        tracing::info!(
            path = %path.display(),
            rows = summary.rows,
            columns = summary.columns.len(),
            "saved columnar file"
        );
        Ok(summary)
    }

    fn ordered_columns(&self) -> Vec<(&'a str, &'a ColumnData)> {
        let store = self.store;
        match self.options.column_order {
            ColumnOrder::Lexicographic => store.iter().collect(),
            ColumnOrder::Declaration => store
                .declaration_order()
                .iter()
                .filter_map(|name| store.column_data(name).map(|data| (name.as_str(), data)))
                .collect(),
        }
    }

    fn plan(&self) -> Result<(Vec<PlannedColumn<'a>>, Vec<Diagnostic>)> {
        let rows = self.store.num_entries();
        let mut planned = Vec::new();
        let mut diagnostics = Vec::new();

        for (name, data) in self.ordered_columns() {
            let kind = data.kind();
            let Some(data_type) = output_type(kind, self.options.include_text) else {
                diagnostics.push(Diagnostic::UnmappedExportType {
                    name: name.to_string(),
                    kind,
                });
                continue;
            };

            let len = data.len();
            if len > rows {
                diagnostics.push(Diagnostic::TruncatedColumn {
                    name: name.to_string(),
                    len,
                    rows,
                });
            }
            if len < rows {
                match self.options.ragged {
                    RaggedPolicy::Reject => {
                        return Err(Error::Export(format!(
                            "column '{name}' holds {len} values but {rows} rows are committed"
                        )));
                    }
                    RaggedPolicy::PadWithNulls => diagnostics.push(Diagnostic::PaddedColumn {
                        name: name.to_string(),
                        len,
                        rows,
                    }),
                }
            }

            planned.push(PlannedColumn {
                name,
                data,
                data_type,
                take: len.min(rows),
                pad: rows.saturating_sub(len),
            });
        }

        Ok((planned, diagnostics))
    }
}

fn schema_of(planned: &[PlannedColumn<'_>]) -> SchemaRef {
    let fields: Vec<Field> = planned
        .iter()
        .map(|column| Field::new(column.name, column.data_type.clone(), column.pad > 0))
        .collect();
    Arc::new(Schema::new(fields))
}

macro_rules! build_primitive {
    ($builder:ty, $values:expr, $take:expr, $pad:expr) => {{
        let mut builder = <$builder>::with_capacity($take + $pad);
        builder.append_slice(&$values[..$take]);
        builder.append_nulls($pad);
        Arc::new(builder.finish()) as ArrayRef
    }};
}

fn build_array(column: &PlannedColumn<'_>) -> ArrayRef {
    let (take, pad) = (column.take, column.pad);
    match column.data {
        ColumnData::Int32(values) => build_primitive!(Int32Builder, values, take, pad),
        ColumnData::UInt32(values) => build_primitive!(UInt32Builder, values, take, pad),
        ColumnData::Float32(values) => build_primitive!(Float32Builder, values, take, pad),
        ColumnData::Float64(values) => build_primitive!(Float64Builder, values, take, pad),
        ColumnData::Bool(values) => build_primitive!(BooleanBuilder, values, take, pad),
        ColumnData::Text(values) => {
            let bytes = values[..take].iter().map(String::len).sum();
            let mut builder = StringBuilder::with_capacity(take + pad, bytes);
            for value in &values[..take] {
                builder.append_value(value);
            }
            for _ in 0..pad {
                builder.append_null();
            }
            Arc::new(builder.finish()) as ArrayRef
        }
    }
}

fn write_batch<W: Write>(writer: W, batch: &RecordBatch) -> Result<()> {
    let schema = batch.schema();
    let mut ipc_writer = FileWriter::try_new(writer, schema.as_ref())
        .map_err(|err| Error::Export(format!("failed to create IPC writer: {err}")))?;
    ipc_writer
        .write(batch)
        .map_err(|err| Error::Export(format!("failed to write record batch: {err}")))?;
    ipc_writer
        .finish()
        .map_err(|err| Error::Export(format!("failed to finish IPC writer: {err}")))?;
    let mut inner = ipc_writer
        .into_inner()
        .map_err(|err| Error::Export(format!("failed to release IPC writer: {err}")))?;
    inner
        .flush()
        .map_err(|err| Error::Export(format!("failed to flush output: {err}")))
}

fn summarize(batch: &RecordBatch) -> ExportSummary {
    ExportSummary {
        columns: batch
            .schema()
            .fields()
            .iter()
            .map(|field| (field.name().clone(), field.data_type().clone()))
            .collect(),
        rows: batch.num_rows(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int32Array, StringArray};
    use rowcast_column_store::RecordingSink;

    #[test]
    fn output_types_follow_kinds() {
        assert_eq!(output_type(ScalarKind::Int32, false), Some(DataType::Int32));
        assert_eq!(output_type(ScalarKind::UInt32, false), Some(DataType::UInt32));
        assert_eq!(output_type(ScalarKind::Float32, false), Some(DataType::Float32));
        assert_eq!(output_type(ScalarKind::Float64, false), Some(DataType::Float64));
        assert_eq!(output_type(ScalarKind::Bool, false), Some(DataType::Boolean));
        assert_eq!(output_type(ScalarKind::Text, false), None);
        assert_eq!(output_type(ScalarKind::Text, true), Some(DataType::Utf8));
    }

    #[test]
    fn text_columns_are_skipped_with_a_warning() {
        let sink = RecordingSink::new();
        let mut store = ColumnStore::new().with_sink(sink.clone());
        store.add_column::<String>("label");
        store.add_column::<i32>("n");
        store.set_value("label", "a".to_string()).unwrap();
        store.set_value("n", 1_i32).unwrap();
        store.fill().unwrap();

        let batch = ColumnarExporter::new(&store).build_record_batch().unwrap();
        assert_eq!(batch.num_columns(), 1);
        assert_eq!(batch.schema().field(0).name(), "n");
        assert_eq!(
            sink.take(),
            vec![Diagnostic::UnmappedExportType {
                name: "label".into(),
                kind: ScalarKind::Text,
            }]
        );
    }

    #[test]
    fn text_columns_export_when_enabled() {
        let mut store = ColumnStore::new();
        store.add_column::<String>("label");
        for label in ["x", "y"] {
            store.set_value("label", label.to_string()).unwrap();
            store.fill().unwrap();
        }
        let options = ExportOptions {
            include_text: true,
            ..ExportOptions::default()
        };
        let batch = ColumnarExporter::with_options(&store, options)
            .build_record_batch()
            .unwrap();
        let labels = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(labels.value(1), "y");
    }

    #[test]
    fn pending_values_are_not_exported() {
        let sink = RecordingSink::new();
        let mut store = ColumnStore::new().with_sink(sink.clone());
        store.add_column::<i32>("n");
        store.set_value("n", 1_i32).unwrap();
        store.fill().unwrap();
        store.set_value("n", 2_i32).unwrap();

        let batch = ColumnarExporter::new(&store).build_record_batch().unwrap();
        let n = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        assert_eq!(n.len(), 1);
        assert_eq!(n.value(0), 1);
        assert!(matches!(
            sink.take().as_slice(),
            [Diagnostic::TruncatedColumn { len: 2, rows: 1, .. }]
        ));
    }

    #[test]
    fn empty_store_builds_empty_batch() {
        let store = ColumnStore::new();
        let batch = ColumnarExporter::new(&store).build_record_batch().unwrap();
        assert_eq!(batch.num_columns(), 0);
        assert_eq!(batch.num_rows(), 0);
    }
}
