//! rowcast: typed column stores built from row-oriented tables.
//!
//! This crate re-exports the `rowcast-*` crates behind one API surface.
//!
//! # Quick Start
//!
//! ```rust
//! use rowcast::{ColumnarExporter, FieldDecl, MemSource, MemTable, ScalarValue, SourceIngestor};
//!
//! let table = MemTable::new("events")
//!     .with_field(FieldDecl::leaf("a", "a/I"))
//!     .with_field(FieldDecl::leaf("b", "b/F"))
//!     .with_row([ScalarValue::Int32(1), ScalarValue::Float32(1.5)])
//!     .with_row([ScalarValue::Int32(2), ScalarValue::Float32(2.5)]);
//! let source = MemSource::new().with_table(table);
//!
//! let store = SourceIngestor::default().ingest(&source, "events").unwrap();
//! assert_eq!(store.num_entries(), 2);
//!
//! let mut bytes = Vec::new();
//! let summary = ColumnarExporter::new(&store).write_to_writer(&mut bytes).unwrap();
//! assert_eq!(summary.rows, 2);
//! ```
//!
//! # Architecture
//!
//! - **Column store** (`rowcast-column-store`): [`ColumnStore`], scalar kinds, diagnostics.
//! - **Ingestion** (`rowcast-ingest`): type-hint inference, source traits, [`SourceIngestor`].
//! - **Export** (`rowcast-export`): [`ColumnarExporter`] writing Arrow IPC files.
//! - **Errors** (`rowcast-result`): the shared [`Error`] enum.

pub use rowcast_column_store::{
    ColumnData, ColumnDescription, ColumnStore, ColumnStoreConfig, Diagnostic, DiagnosticSink,
    FillPolicy, RecordingSink, Scalar, ScalarKind, ScalarValue, TracingSink,
};
pub use rowcast_export::{
    ColumnOrder, ColumnarExporter, ExportOptions, ExportSummary, RaggedPolicy, output_type,
};
pub use rowcast_ingest::{
    DataSource, FieldDecl, IngestOptions, IngestSummary, MemSource, MemTable, ResolvedField,
    SourceIngestor, SourceTable, StagingBuffers, TextSource, TextSourceOptions,
    infer_scalar_kind, kind_from_type_hint,
};
pub use rowcast_result::{Error, Result};
