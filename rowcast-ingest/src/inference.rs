//! Scalar kind inference from field type hints.
//!
//! Hints follow the leaf-list convention `name/T`, where the single-letter code after
//! the last `/` selects the type:
//!
//! | code | kind |
//! |------|------|
//! | `I` | int32 |
//! | `i` | uint32 |
//! | `F` | float32 |
//! | `D` | float64 |
//! | `O` | bool |
//!
//! Anything else, array-valued leaves (`v[3]/F`), and compound fields are unsupported.

use rowcast_column_store::ScalarKind;
use rowcast_result::{Error, Result};

use crate::field::FieldDecl;

/// Decode the scalar kind selected by the suffix of `hint`.
pub fn kind_from_type_hint(hint: &str) -> Option<ScalarKind> {
    let (_, code) = hint.trim_end().rsplit_once('/')?;
    match code {
        "I" => Some(ScalarKind::Int32),
        "i" => Some(ScalarKind::UInt32),
        "F" => Some(ScalarKind::Float32),
        "D" => Some(ScalarKind::Float64),
        "O" => Some(ScalarKind::Bool),
        _ => None,
    }
}

/// Resolve the scalar kind of a declared field.
///
/// Fails with [`Error::UnsupportedFieldType`] for compound fields, array-valued
/// leaves, and hints without a recognized suffix.
pub fn infer_scalar_kind(field: &FieldDecl) -> Result<ScalarKind> {
    if let Some(class_name) = &field.class_name {
        return Err(unsupported(field, format!("compound type '{class_name}'")));
    }
    if field.type_hint.contains('[') {
        return Err(unsupported(
            field,
            format!("array-valued leaf '{}'", field.type_hint),
        ));
    }
    kind_from_type_hint(&field.type_hint).ok_or_else(|| {
        unsupported(
            field,
            format!("unrecognized type hint '{}'", field.type_hint),
        )
    })
}

fn unsupported(field: &FieldDecl, reason: String) -> Error {
    Error::UnsupportedFieldType {
        field: field.name.clone(),
        reason,
    }
}
