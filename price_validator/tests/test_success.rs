use std::{path::Path, process::Command};

fn data(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

#[test]
fn test_complete_price_table() {
    let output = Command::new(env!("CARGO_BIN_EXE_price_validator"))
        .arg("--prices-path")
        .arg(data("complete.prices.json"))
        .arg("--types-path")
        .arg(data("types.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_partial_price_table_lists_holes() {
    let output = Command::new(env!("CARGO_BIN_EXE_price_validator"))
        .arg("--prices-path")
        .arg(data("partial.prices.json"))
        .arg("--types-path")
        .arg(data("types.json"))
        .output()
        .unwrap();

    assert!(output.status.success());

    let report = String::from_utf8_lossy(&output.stdout);
    assert!(report.contains("trivialEncrypt: missing euint8\n"));
    assert!(report.contains("fheAdd.scalar: missing ebool\n"));
    assert!(report.contains("fheAdd.nonScalar: missing ebool, euint8\n"));
    assert!(report.contains("cast: missing ebool, euint8\n"));
}

#[test]
fn test_builtin_types_by_default() {
    let output = Command::new(env!("CARGO_BIN_EXE_price_validator"))
        .arg("--prices-path")
        .arg(data("complete.prices.json"))
        .output()
        .unwrap();

    assert!(output.status.success());

    // the complete table only prices ebool and euint8 for these two
    let report = String::from_utf8_lossy(&output.stdout);
    assert!(report.contains("trivialEncrypt: missing euint4, euint16"));
    assert!(report.contains("fheNot: missing euint4"));
    assert!(!report.contains("fheAdd"));
}
