use std::fs::{self, File};
use std::process::Command;

use arrow::datatypes::DataType;
use arrow::ipc::reader::FileReader;
use tempfile::TempDir;

fn rowcast() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rowcast"))
}

#[test]
fn convert_writes_arrow_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prepared_data.txt");
    fs::write(
        &input,
        "th_x/F:th_y/F:run/i:note/X\n0.1 0.2 1 a\n0.3 0.4 1 b\n",
    )
    .unwrap();
    let output = dir.path().join("hep_data.arrow");

    let result = rowcast()
        .arg("convert")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run rowcast");
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Number of entries: 2"));
    assert!(stdout.contains(" th_x (float32)"));

    let reader = FileReader::try_new(File::open(&output).unwrap(), None).unwrap();
    let schema = reader.schema();
    let fields: Vec<_> = schema
        .fields()
        .iter()
        .map(|f| (f.name().as_str(), f.data_type().clone()))
        .collect();
    assert_eq!(
        fields,
        [
            ("run", DataType::UInt32),
            ("th_x", DataType::Float32),
            ("th_y", DataType::Float32),
        ]
    );
    let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(rows, 2);
}

#[test]
fn missing_input_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let result = rowcast()
        .arg("describe")
        .arg(dir.path().join("absent.txt"))
        .output()
        .expect("run rowcast");
    assert!(!result.status.success());
    assert_eq!(result.status.code(), Some(1));
}
