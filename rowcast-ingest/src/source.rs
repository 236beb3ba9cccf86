//! Source-side traits and the per-row staging area shared with sources.

use rowcast_column_store::{ColumnStore, ScalarKind, ScalarValue};
use rowcast_result::{Error, Result};

use crate::field::{FieldDecl, ResolvedField};

/// A container of named tables, such as an opened file.
pub trait DataSource {
    /// Locate `name` and position a reader before its first row.
    ///
    /// Fails with [`Error::SourceOpen`] if the table does not exist or cannot be
    /// opened. The returned handle is closed when dropped.
    fn open_table(&self, name: &str) -> Result<Box<dyn SourceTable + '_>>;
}

/// An opened, row-oriented table.
pub trait SourceTable {
    fn name(&self) -> &str;

    fn fields(&self) -> &[FieldDecl];

    fn num_rows(&self) -> u64;

    /// Read row `row` and hand one value per bound field to `buffers`.
    ///
    /// Fields that are not bound in `buffers` may be skipped. Rows are requested in
    /// increasing order, starting at zero.
    fn read_row(&mut self, row: u64, buffers: &mut StagingBuffers) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    kind: ScalarKind,
    offset: usize,
}

/// Reusable per-kind buffers holding the current row of every bound field.
///
/// One vector exists per scalar kind; each bound field owns one slot in the vector of
/// its kind. Buffers start zeroed and are overwritten in place row after row, so a
/// field that a source does not refresh keeps the previous row's value.
#[derive(Debug, Clone, Default)]
pub struct StagingBuffers {
    slots: Vec<Option<Slot>>,
    order: Vec<usize>,
    int32: Vec<i32>,
    uint32: Vec<u32>,
    float32: Vec<f32>,
    float64: Vec<f64>,
    bool: Vec<bool>,
    text: Vec<String>,
}

impl StagingBuffers {
    /// Bind `fields` (in the given order) for a table declaring `num_source_fields` fields.
    pub fn bind(fields: &[ResolvedField], num_source_fields: usize) -> Self {
        let mut buffers = Self {
            slots: vec![None; num_source_fields],
            ..Self::default()
        };

        for field in fields {
            let offset = match field.kind {
                ScalarKind::Int32 => push_default(&mut buffers.int32),
                ScalarKind::UInt32 => push_default(&mut buffers.uint32),
                ScalarKind::Float32 => push_default(&mut buffers.float32),
                ScalarKind::Float64 => push_default(&mut buffers.float64),
                ScalarKind::Bool => push_default(&mut buffers.bool),
                ScalarKind::Text => push_default(&mut buffers.text),
            };
            if field.source_index >= buffers.slots.len() {
                buffers.slots.resize(field.source_index + 1, None);
            }
            buffers.slots[field.source_index] = Some(Slot {
                name: field.name.clone(),
                kind: field.kind,
                offset,
            });
            buffers.order.push(field.source_index);
        }

        buffers
    }

    pub fn is_bound(&self, field_index: usize) -> bool {
        self.bound_kind(field_index).is_some()
    }

    pub fn bound_kind(&self, field_index: usize) -> Option<ScalarKind> {
        self.slot(field_index).map(|slot| slot.kind)
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stage `value` for the field at `field_index`.
    ///
    /// Values for unbound fields are ignored. A value whose kind differs from the
    /// bound kind fails with [`Error::TypeMismatch`].
    pub fn put(&mut self, field_index: usize, value: ScalarValue) -> Result<()> {
        let Some(slot) = self.slots.get(field_index).and_then(Option::as_ref) else {
            return Ok(());
        };
        let offset = slot.offset;
        match (slot.kind, value) {
            (ScalarKind::Int32, ScalarValue::Int32(v)) => self.int32[offset] = v,
            (ScalarKind::UInt32, ScalarValue::UInt32(v)) => self.uint32[offset] = v,
            (ScalarKind::Float32, ScalarValue::Float32(v)) => self.float32[offset] = v,
            (ScalarKind::Float64, ScalarValue::Float64(v)) => self.float64[offset] = v,
            (ScalarKind::Bool, ScalarValue::Bool(v)) => self.bool[offset] = v,
            (ScalarKind::Text, ScalarValue::Text(v)) => self.text[offset] = v,
            (kind, value) => {
                return Err(Error::TypeMismatch {
                    column: slot.name.clone(),
                    expected: kind.name(),
                    actual: value.kind().name(),
                });
            }
        }
        Ok(())
    }

    /// Write every staged value into the current row of `store`, in bind order.
    pub fn write_row(&self, store: &mut ColumnStore) -> Result<()> {
        for &field_index in &self.order {
            let Some(slot) = self.slot(field_index) else {
                continue;
            };
            let name = slot.name.as_str();
            let offset = slot.offset;
            match slot.kind {
                ScalarKind::Int32 => store.set_value(name, self.int32[offset])?,
                ScalarKind::UInt32 => store.set_value(name, self.uint32[offset])?,
                ScalarKind::Float32 => store.set_value(name, self.float32[offset])?,
                ScalarKind::Float64 => store.set_value(name, self.float64[offset])?,
                ScalarKind::Bool => store.set_value(name, self.bool[offset])?,
                ScalarKind::Text => store.set_value(name, self.text[offset].clone())?,
            }
        }
        Ok(())
    }

    fn slot(&self, field_index: usize) -> Option<&Slot> {
        self.slots.get(field_index).and_then(Option::as_ref)
    }
}

fn push_default<T: Default>(values: &mut Vec<T>) -> usize {
    values.push(T::default());
    values.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(name: &str, kind: ScalarKind, source_index: usize) -> ResolvedField {
        ResolvedField {
            name: name.into(),
            kind,
            source_index,
        }
    }

    #[test]
    fn put_ignores_unbound_fields() {
        let mut buffers = StagingBuffers::bind(&[resolved("a", ScalarKind::Int32, 1)], 3);
        assert!(!buffers.is_bound(0));
        assert!(buffers.is_bound(1));
        buffers.put(0, ScalarValue::Float64(1.0)).unwrap();
        buffers.put(2, ScalarValue::Bool(true)).unwrap();
        buffers.put(1, ScalarValue::Int32(9)).unwrap();
        assert_eq!(buffers.int32, vec![9]);
    }

    #[test]
    fn put_rejects_wrong_kind() {
        let mut buffers = StagingBuffers::bind(&[resolved("pt", ScalarKind::Float32, 0)], 1);
        let err = buffers.put(0, ScalarValue::Float64(1.0)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "float32",
                actual: "float64",
                ..
            }
        ));
    }

    #[test]
    fn write_row_uses_bind_order() {
        let fields = [
            resolved("b", ScalarKind::Bool, 0),
            resolved("a", ScalarKind::UInt32, 1),
        ];
        let mut buffers = StagingBuffers::bind(&fields, 2);
        let mut store = ColumnStore::new();
        store.add_column::<bool>("b");
        store.add_column::<u32>("a");

        buffers.put(0, ScalarValue::Bool(true)).unwrap();
        buffers.put(1, ScalarValue::UInt32(5)).unwrap();
        buffers.write_row(&mut store).unwrap();
        store.fill().unwrap();
        // Not refreshed: previous values are written again.
        buffers.write_row(&mut store).unwrap();
        store.fill().unwrap();

        assert_eq!(store.column::<bool>("b").unwrap(), &[true, true]);
        assert_eq!(store.column::<u32>("a").unwrap(), &[5, 5]);
    }
}
