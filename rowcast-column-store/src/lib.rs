//! In-memory column store with a closed set of runtime-tagged scalar kinds.
//!
//! A [`ColumnStore`] maps column names to [`ColumnData`], one homogeneous vector per
//! column, and keeps a single committed-row counter shared by every column. Values are
//! staged for the current row with [`ColumnStore::set_value`] and committed with
//! [`ColumnStore::fill`].
//!
//! ```
//! use rowcast_column_store::ColumnStore;
//!
//! let mut store = ColumnStore::new();
//! store.add_column::<i32>("run");
//! store.add_column::<f32>("theta");
//!
//! store.set_value("run", 7_i32).unwrap();
//! store.set_value("theta", 0.25_f32).unwrap();
//! store.fill().unwrap();
//!
//! assert_eq!(store.num_entries(), 1);
//! assert_eq!(store.column::<i32>("run").unwrap(), &[7]);
//! ```
//!
//! The set of supported kinds lives in [`rowcast_for_each_scalar_kind!`]; every match
//! over [`ScalarKind`] in the workspace is exhaustive, so adding a kind is a compile-time
//! checked change.

pub mod column;
pub mod config;
pub mod diagnostics;
pub mod store;
pub mod types;

pub use column::ColumnData;
pub use config::{ColumnStoreConfig, FillPolicy};
pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use rowcast_result::{Error, Result};
pub use store::{ColumnDescription, ColumnStore};
pub use types::{Scalar, ScalarKind, ScalarValue};

/// Invokes `$macro` once per supported scalar kind.
///
/// The callback receives:
///
/// ```text
/// $macro!(
///     $variant,   // ScalarKind / ColumnData / ScalarValue variant (e.g. Int32)
///     $native,    // native Rust value type (e.g. i32)
///     $name       // lowercase kind name (e.g. "int32")
/// );
/// ```
#[macro_export]
macro_rules! rowcast_for_each_scalar_kind {
    ($macro:ident) => {
        $macro!(Int32, i32, "int32");
        $macro!(UInt32, u32, "uint32");
        $macro!(Float32, f32, "float32");
        $macro!(Float64, f64, "float64");
        $macro!(Bool, bool, "bool");
        $macro!(Text, String, "text");
    };
}
