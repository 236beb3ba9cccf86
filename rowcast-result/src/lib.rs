//! Error and result types shared by every rowcast crate.
//!
//! All fallible operations return [`Result<T>`], whose error variant is the single
//! [`Error`] enum. Crates do not define their own error types; they pick the variant
//! that matches the failure and propagate it with `?`.
//!
//! # Error Categories
//!
//! - **Column access** ([`Error::NotFound`], [`Error::TypeMismatch`],
//!   [`Error::LaggingColumn`], [`Error::RaggedRow`]): contract violations raised by the
//!   column store. They are reported immediately and never retried.
//! - **Source errors** ([`Error::SourceOpen`], [`Error::SourceRead`],
//!   [`Error::UnsupportedFieldType`]): failures while locating or reading the external
//!   row source.
//! - **Export errors** ([`Error::Export`]): the destination file could not be created or
//!   the columnar payload could not be written.
//! - **Wrapped library errors** ([`Error::Io`], [`Error::Arrow`]).

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
