use std::fs::File;
use std::path::Path;

use arrow::array::{Array, BooleanArray, Float32Array, Int32Array, UInt32Array};
use arrow::datatypes::DataType;
use arrow::ipc::reader::FileReader;
use arrow::record_batch::RecordBatch;
use rowcast_column_store::{ColumnStore, Diagnostic, RecordingSink, ScalarValue};
use rowcast_export::{ColumnOrder, ColumnarExporter, Error, ExportOptions, RaggedPolicy};
use rowcast_ingest::{FieldDecl, MemSource, MemTable, SourceIngestor};
use tempfile::TempDir;

fn read_back(path: &Path) -> (Vec<(String, DataType)>, Vec<RecordBatch>) {
    let reader = FileReader::try_new(File::open(path).expect("open output"), None).expect("reader");
    let schema = reader
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), f.data_type().clone()))
        .collect();
    let batches = reader.map(|b| b.expect("batch")).collect();
    (schema, batches)
}

fn column<'b, T: 'static>(batch: &'b RecordBatch, name: &str) -> &'b T {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
        .as_any()
        .downcast_ref::<T>()
        .unwrap_or_else(|| panic!("column {name} has unexpected type"))
}

#[test]
fn ingest_export_reread_round_trip() {
    let table = MemTable::new("events")
        .with_field(FieldDecl::leaf("c", "c/O"))
        .with_field(FieldDecl::leaf("a", "a/I"))
        .with_field(FieldDecl::leaf("b", "b/F"))
        .with_row([
            ScalarValue::Bool(true),
            ScalarValue::Int32(1),
            ScalarValue::Float32(1.5),
        ])
        .with_row([
            ScalarValue::Bool(false),
            ScalarValue::Int32(2),
            ScalarValue::Float32(2.5),
        ])
        .with_row([
            ScalarValue::Bool(true),
            ScalarValue::Int32(3),
            ScalarValue::Float32(3.5),
        ]);
    let source = MemSource::new().with_table(table);
    let store = SourceIngestor::default()
        .ingest(&source, "events")
        .expect("ingest");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hep_data.arrow");
    let summary = ColumnarExporter::new(&store)
        .write_to_path(&path)
        .expect("export");
    assert_eq!(summary.rows, 3);

    let (schema, batches) = read_back(&path);
    assert_eq!(
        schema,
        vec![
            ("a".to_string(), DataType::Int32),
            ("b".to_string(), DataType::Float32),
            ("c".to_string(), DataType::Boolean),
        ]
    );
    assert_eq!(summary.columns, schema);
    assert_eq!(batches.len(), 1);

    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(column::<Int32Array>(batch, "a").values().to_vec(), vec![1, 2, 3]);
    assert_eq!(
        column::<Float32Array>(batch, "b").values().to_vec(),
        vec![1.5, 2.5, 3.5]
    );
    let c: Vec<bool> = column::<BooleanArray>(batch, "c")
        .iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(c, [true, false, true]);
}

#[test]
fn declaration_order_is_available() {
    let mut store = ColumnStore::new();
    store.add_column::<u32>("z");
    store.add_column::<u32>("a");
    store.set_value("z", 1_u32).unwrap();
    store.set_value("a", 2_u32).unwrap();
    store.fill().unwrap();

    let options = ExportOptions {
        column_order: ColumnOrder::Declaration,
        ..ExportOptions::default()
    };
    let schema = ColumnarExporter::with_options(&store, options)
        .schema()
        .unwrap();
    let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, ["z", "a"]);

    let default_schema = ColumnarExporter::new(&store).schema().unwrap();
    assert_eq!(default_schema.field(0).name(), "a");
}

fn ragged_store(sink: &std::sync::Arc<RecordingSink>) -> ColumnStore {
    let mut store = ColumnStore::new().with_sink(sink.clone());
    store.add_column::<i32>("full");
    store.add_column::<u32>("partial");
    store.set_value("full", 1_i32).unwrap();
    store.set_value("partial", 10_u32).unwrap();
    store.fill().unwrap();
    store.set_value("full", 2_i32).unwrap();
    store.fill().unwrap();
    store.set_value("full", 3_i32).unwrap();
    store.fill().unwrap();
    store
}

#[test]
fn ragged_columns_are_padded_with_nulls() {
    let sink = RecordingSink::new();
    let store = ragged_store(&sink);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ragged.arrow");

    ColumnarExporter::new(&store)
        .write_to_path(&path)
        .expect("ragged export succeeds");

    let (_, batches) = read_back(&path);
    let batch = &batches[0];
    let partial = column::<UInt32Array>(batch, "partial");
    assert_eq!(partial.len(), 3);
    assert_eq!(partial.value(0), 10);
    assert_eq!(partial.null_count(), 2);
    assert!(batch.schema().field_with_name("partial").unwrap().is_nullable());
    assert!(!batch.schema().field_with_name("full").unwrap().is_nullable());

    assert_eq!(
        sink.take(),
        vec![Diagnostic::PaddedColumn {
            name: "partial".into(),
            len: 1,
            rows: 3,
        }]
    );
}

#[test]
fn ragged_columns_can_be_rejected() {
    let sink = RecordingSink::new();
    let store = ragged_store(&sink);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rejected.arrow");

    let options = ExportOptions {
        ragged: RaggedPolicy::Reject,
        ..ExportOptions::default()
    };
    let err = ColumnarExporter::with_options(&store, options)
        .write_to_path(&path)
        .unwrap_err();
    assert!(matches!(err, Error::Export(msg) if msg.contains("partial")));
    assert!(!path.exists());
}

#[test]
fn unwritable_destination_is_an_export_failure() {
    let mut store = ColumnStore::new();
    store.add_column::<f64>("x");
    store.set_value("x", 1.0_f64).unwrap();
    store.fill().unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-dir").join("out.arrow");
    let err = ColumnarExporter::new(&store)
        .write_to_path(&path)
        .unwrap_err();
    assert!(matches!(err, Error::Export(msg) if msg.contains("failed to create")));
}

#[test]
fn writer_output_is_a_readable_ipc_file() {
    let mut store = ColumnStore::new();
    store.add_column::<f32>("th_x");
    for v in [0.1_f32, 0.2, 0.3, 0.4] {
        store.set_value("th_x", v).unwrap();
        store.fill().unwrap();
    }

    let mut bytes = Vec::new();
    let summary = ColumnarExporter::new(&store)
        .write_to_writer(&mut bytes)
        .unwrap();
    assert_eq!(summary.rows, 4);

    let reader = FileReader::try_new(std::io::Cursor::new(bytes), None).unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    assert_eq!(batches.iter().map(RecordBatch::num_rows).sum::<usize>(), 4);
    assert_eq!(
        column::<Float32Array>(&batches[0], "th_x").value(3),
        0.4
    );
}
