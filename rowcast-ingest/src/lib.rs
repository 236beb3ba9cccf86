//! Ingestion of row-oriented sources into a [`ColumnStore`].
//!
//! A source exposes tables through [`DataSource`]. Each table declares its fields
//! ([`FieldDecl`]) with a free-text type hint and yields rows through [`SourceTable`].
//! [`SourceIngestor`] decodes the hints ([`infer_scalar_kind`]), registers one column per
//! supported field, and copies every row into the store, committing after each one.
//!
//! Two sources ship with the crate: [`MemSource`] for in-memory tables and
//! [`TextSource`] for delimited text files headed by a leaf-list descriptor.

pub mod field;
pub mod inference;
pub mod ingestor;
pub mod mem_source;
pub mod source;
pub mod text_source;

pub use field::{FieldDecl, ResolvedField};
pub use inference::{infer_scalar_kind, kind_from_type_hint};
pub use ingestor::{IngestOptions, IngestSummary, SourceIngestor};
pub use mem_source::{MemSource, MemTable};
pub use rowcast_column_store::ColumnStore;
pub use rowcast_result::{Error, Result};
pub use source::{DataSource, SourceTable, StagingBuffers};
pub use text_source::{TextSource, TextSourceOptions};
