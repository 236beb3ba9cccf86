//! Non-fatal warnings raised while building, filling, or exporting a store.
//!
//! Warnings never abort an operation. They are handed to a [`DiagnosticSink`] that the
//! caller injects; the default [`TracingSink`] forwards them to `tracing`, while
//! [`RecordingSink`] keeps them in memory so tests can assert on them.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::ScalarKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A column was added under a name that already exists. The original column is kept.
    DuplicateColumn {
        name: String,
        existing: ScalarKind,
        requested: ScalarKind,
    },
    /// A source field could not be mapped onto a scalar kind and was skipped.
    UnsupportedField { name: String, reason: String },
    /// A column kind has no output mapping and was left out of the export.
    UnmappedExportType { name: String, kind: ScalarKind },
    /// A lagging column was padded with nulls up to the committed row count.
    PaddedColumn { name: String, len: usize, rows: usize },
    /// Values written after the last commit were not exported.
    TruncatedColumn { name: String, len: usize, rows: usize },
}

impl Diagnostic {
    /// Short stable identifier, used as a structured logging field.
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::DuplicateColumn { .. } => "duplicate_column",
            Diagnostic::UnsupportedField { .. } => "unsupported_field",
            Diagnostic::UnmappedExportType { .. } => "unmapped_export_type",
            Diagnostic::PaddedColumn { .. } => "padded_column",
            Diagnostic::TruncatedColumn { .. } => "truncated_column",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateColumn {
                name,
                existing,
                requested,
            } => write!(
                f,
                "column '{name}' already exists as {existing}; ignoring request for {requested}"
            ),
            Diagnostic::UnsupportedField { name, reason } => {
                write!(f, "skipping field '{name}': {reason}")
            }
            Diagnostic::UnmappedExportType { name, kind } => {
                write!(f, "skipping column '{name}': no output mapping for {kind}")
            }
            Diagnostic::PaddedColumn { name, len, rows } => write!(
                f,
                "column '{name}' holds {len} of {rows} rows; padding with nulls"
            ),
            Diagnostic::TruncatedColumn { name, len, rows } => write!(
                f,
                "column '{name}' holds {len} values but only {rows} rows are committed"
            ),
        }
    }
}

/// Receiver for non-fatal [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(code = diagnostic.code(), "{diagnostic}");
    }
}

/// Keeps every reported diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!(code = diagnostic.code(), "recorded: {diagnostic}");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

pub(crate) fn default_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(TracingSink)
}
