use crate::types::{Scalar, ScalarKind, ScalarValue};

/// The values of one column: a homogeneous vector tagged with its scalar kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

/// Expands `$body` once per variant with `$values` bound to the inner vector.
macro_rules! with_values {
    ($data:expr, |$values:ident| $body:expr) => {
        match $data {
            ColumnData::Int32($values) => $body,
            ColumnData::UInt32($values) => $body,
            ColumnData::Float32($values) => $body,
            ColumnData::Float64($values) => $body,
            ColumnData::Bool($values) => $body,
            ColumnData::Text($values) => $body,
        }
    };
}

impl ColumnData {
    pub fn new(kind: ScalarKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    pub fn with_capacity(kind: ScalarKind, capacity: usize) -> Self {
        match kind {
            ScalarKind::Int32 => ColumnData::Int32(Vec::with_capacity(capacity)),
            ScalarKind::UInt32 => ColumnData::UInt32(Vec::with_capacity(capacity)),
            ScalarKind::Float32 => ColumnData::Float32(Vec::with_capacity(capacity)),
            ScalarKind::Float64 => ColumnData::Float64(Vec::with_capacity(capacity)),
            ScalarKind::Bool => ColumnData::Bool(Vec::with_capacity(capacity)),
            ScalarKind::Text => ColumnData::Text(Vec::with_capacity(capacity)),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            ColumnData::Int32(_) => ScalarKind::Int32,
            ColumnData::UInt32(_) => ScalarKind::UInt32,
            ColumnData::Float32(_) => ScalarKind::Float32,
            ColumnData::Float64(_) => ScalarKind::Float64,
            ColumnData::Bool(_) => ScalarKind::Bool,
            ColumnData::Text(_) => ScalarKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, |values| values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        with_values!(self, |values| values.capacity())
    }

    /// Reserve room for at least `additional` more values.
    pub fn reserve(&mut self, additional: usize) {
        with_values!(self, |values| values.reserve(additional))
    }

    /// Drop every value past the first `len`.
    pub fn truncate(&mut self, len: usize) {
        with_values!(self, |values| values.truncate(len))
    }

    /// Typed view of the values, or `None` if the column holds another kind.
    pub fn as_slice<T: Scalar>(&self) -> Option<&[T]> {
        T::values(self).map(Vec::as_slice)
    }

    /// Dynamically-typed copy of the value at `index`.
    pub fn get(&self, index: usize) -> Option<ScalarValue> {
        match self {
            ColumnData::Int32(values) => values.get(index).copied().map(ScalarValue::Int32),
            ColumnData::UInt32(values) => values.get(index).copied().map(ScalarValue::UInt32),
            ColumnData::Float32(values) => values.get(index).copied().map(ScalarValue::Float32),
            ColumnData::Float64(values) => values.get(index).copied().map(ScalarValue::Float64),
            ColumnData::Bool(values) => values.get(index).copied().map(ScalarValue::Bool),
            ColumnData::Text(values) => values.get(index).cloned().map(ScalarValue::Text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_capacity_preallocates_every_kind() {
        for kind in ScalarKind::ALL {
            let data = ColumnData::with_capacity(kind, 128);
            assert!(data.capacity() >= 128, "{kind} column under-allocated");
            assert!(data.is_empty());
        }
    }

    #[test]
    fn typed_view_requires_matching_kind() {
        let data = ColumnData::Float32(vec![1.5, 2.5]);
        assert_eq!(data.as_slice::<f32>(), Some(&[1.5_f32, 2.5][..]));
        assert!(data.as_slice::<f64>().is_none());
        assert_eq!(data.get(1), Some(ScalarValue::Float32(2.5)));
        assert_eq!(data.get(2), None);
    }
}
