//! Scalar kinds, dynamic scalar values, and the [`Scalar`] trait that ties native Rust
//! types to their column representation.

use std::fmt;

use crate::column::ColumnData;

/// Runtime tag identifying which scalar type a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Int32,
    UInt32,
    Float32,
    Float64,
    Bool,
    Text,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 6] = [
        ScalarKind::Int32,
        ScalarKind::UInt32,
        ScalarKind::Float32,
        ScalarKind::Float64,
        ScalarKind::Bool,
        ScalarKind::Text,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Int32 => "int32",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::Bool => "bool",
            ScalarKind::Text => "text",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single dynamically-typed scalar.
///
/// Sources that do not know their field types at compile time hand values to the
/// ingestion layer in this form.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Text(String),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Int32(_) => ScalarKind::Int32,
            ScalarValue::UInt32(_) => ScalarKind::UInt32,
            ScalarValue::Float32(_) => ScalarKind::Float32,
            ScalarValue::Float64(_) => ScalarKind::Float64,
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::Text(_) => ScalarKind::Text,
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A native Rust type that can be stored in a column.
///
/// Implemented for exactly one type per [`ScalarKind`]; the trait is sealed so the set
/// stays closed.
pub trait Scalar: Clone + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    const KIND: ScalarKind;

    /// Borrow the typed values of `data`, or `None` if it holds another kind.
    fn values(data: &ColumnData) -> Option<&Vec<Self>>;

    /// Mutably borrow the typed values of `data`, or `None` if it holds another kind.
    fn values_mut(data: &mut ColumnData) -> Option<&mut Vec<Self>>;

    fn into_value(self) -> ScalarValue;

    fn from_value(value: ScalarValue) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($variant:ident, $native:ty, $name:literal) => {
        impl sealed::Sealed for $native {}

        impl Scalar for $native {
            const KIND: ScalarKind = ScalarKind::$variant;

            #[inline]
            fn values(data: &ColumnData) -> Option<&Vec<Self>> {
                match data {
                    ColumnData::$variant(values) => Some(values),
                    _ => None,
                }
            }

            #[inline]
            fn values_mut(data: &mut ColumnData) -> Option<&mut Vec<Self>> {
                match data {
                    ColumnData::$variant(values) => Some(values),
                    _ => None,
                }
            }

            #[inline]
            fn into_value(self) -> ScalarValue {
                ScalarValue::$variant(self)
            }

            #[inline]
            fn from_value(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$native> for ScalarValue {
            fn from(value: $native) -> Self {
                ScalarValue::$variant(value)
            }
        }
    };
}

crate::rowcast_for_each_scalar_kind!(impl_scalar);
