//! Arrow IPC export of a populated [`ColumnStore`](rowcast_column_store::ColumnStore).
//!
//! [`ColumnarExporter`] converts every column into an immutable Arrow array, assembles
//! the arrays into a single record batch, and writes that batch as an Arrow IPC file
//! (the Feather v2 format read by `pyarrow.ipc.open_file`).

pub mod exporter;
pub mod options;

pub use exporter::{ColumnarExporter, ExportSummary, output_type};
pub use options::{ColumnOrder, ExportOptions, RaggedPolicy};
pub use rowcast_result::{Error, Result};
