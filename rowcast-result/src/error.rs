use std::io;
use thiserror::Error;

/// Unified error type for all rowcast operations.
///
/// Warnings (duplicate columns, skipped fields, unmapped export types) are *not*
/// errors; they are reported through the column store's diagnostic sink and the
/// operation carries on.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file access.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow library error while building arrays or encoding IPC data.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid API parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// The requested column is not registered in the store.
    #[error("column '{0}' not found")]
    NotFound(String),

    /// The requested scalar type disagrees with the column's stored kind.
    ///
    /// There is no implicit coercion between scalar kinds: asking for an `f64` view of
    /// a `float32` column fails the same way as asking for a `bool` view.
    #[error("column '{column}' holds {actual} values, not {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A write targeted a column that has fallen behind the store's row counter.
    ///
    /// Columns that skip a committed row lag behind the others. Writing to the current
    /// row of such a column would leave a gap, so the write is refused.
    #[error("column '{column}' holds {len} values and cannot be written at row {row}")]
    LaggingColumn {
        column: String,
        len: usize,
        row: usize,
    },

    /// A strict commit found a column that was not written for the pending row.
    #[error("cannot commit row: column '{column}' holds {len} values, expected {expected}")]
    RaggedRow {
        column: String,
        len: usize,
        expected: usize,
    },

    /// The source container or the requested table could not be opened.
    #[error("failed to open source: {0}")]
    SourceOpen(String),

    /// A row could not be read from an opened source table.
    #[error("failed to read source row: {0}")]
    SourceRead(String),

    /// A field declaration does not map onto a supported scalar kind.
    #[error("field '{field}' has unsupported type: {reason}")]
    UnsupportedFieldType { field: String, reason: String },

    /// The columnar output could not be produced or written.
    #[error("export failed: {0}")]
    Export(String),
}

impl Error {
    /// Create an export error from any displayable error.
    #[inline]
    pub fn export<E: std::fmt::Display>(err: E) -> Self {
        Error::Export(err.to_string())
    }

    /// Create a source read error from any displayable error.
    #[inline]
    pub fn source_read<E: std::fmt::Display>(err: E) -> Self {
        Error::SourceRead(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_both_kinds() {
        let err = Error::TypeMismatch {
            column: "pt".into(),
            expected: "float64",
            actual: "float32",
        };
        assert_eq!(
            err.to_string(),
            "column 'pt' holds float32 values, not float64"
        );
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn open_missing() -> crate::Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here/rowcast")?)
        }
        assert!(matches!(open_missing(), Err(Error::Io(_))));
    }
}
