use std::{
    io::Write,
    process::{Command, Stdio},
};

use hcu_meter::{HcuReport, TransactionTrace, TxOutcome, deserialize_report};


#[test]
fn test_chain_json() {
    let setup = setup::setup();
    let report_path = setup.test_dir.path().join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_hcu_meter"))
        .arg("--trace")
        .arg(&setup.trace_path)
        .arg("--prices")
        .arg(&setup.prices_path)
        .arg("--output")
        .arg(&report_path)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: HcuReport =
        serde_json::from_slice(&std::fs::read(&report_path).unwrap()).unwrap();
    assert_eq!(report.total_work, 12);
    assert_eq!(report.max_depth, 12);
    assert_eq!(report.per_handle_cost[&setup.a], 5);
    assert_eq!(report.per_handle_cost[&setup.b], 8);
    assert_eq!(report.per_handle_cost[&setup.c], 12);
}

#[test]
fn test_chain_binary_stdout() {
    let setup = setup::setup();

    let output = Command::new(env!("CARGO_BIN_EXE_hcu_meter"))
        .arg("--trace")
        .arg(&setup.trace_path)
        .arg("--prices")
        .arg(&setup.prices_path)
        .arg("--format")
        .arg("binary")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Output should be written to stdout
    let report = deserialize_report(&output.stdout).unwrap();
    assert_eq!(report.total_work, 12);
    assert_eq!(report.max_depth, 12);
    assert_eq!(report.per_handle_cost.len(), 3);
}

#[test]
fn test_trace_from_stdin() {
    let setup = setup::setup();
    let trace = std::fs::read(&setup.trace_path).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_hcu_meter"))
        .arg("--prices")
        .arg(&setup.prices_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&trace).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: HcuReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.max_depth, 12);
}

#[test]
fn test_executor_filter_drops_foreign_events() {
    let setup = setup::setup();
    let foreign_a = setup::random_handle(setup::EUINT8);
    let foreign_b = setup::random_handle(setup::EUINT8);
    let foreign_c = setup::random_handle(setup::EUINT8);

    let mut events = setup::chain_events(setup.a, setup.b, setup.c);
    for mut event in setup::chain_events(foreign_a, foreign_b, foreign_c) {
        event.address = Some("0x000000000000000000000000000000000000dead".parse().unwrap());
        events.push(event);
    }
    let trace_path = setup::write_trace(
        &setup.test_dir,
        "mixed.json",
        &TransactionTrace {
            status: TxOutcome::Success,
            events,
        },
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hcu_meter"))
        .arg("--trace")
        .arg(&trace_path)
        .arg("--prices")
        .arg(&setup.prices_path)
        .arg("--executor")
        .arg(setup::EXECUTOR)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: HcuReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.total_work, 12);
    assert_eq!(report.per_handle_cost.len(), 3);
    assert!(!report.per_handle_cost.contains_key(&foreign_c));
}

#[test]
fn test_executor_filter_accepts_unpadded_address() {
    let setup = setup::setup();

    let output = Command::new(env!("CARGO_BIN_EXE_hcu_meter"))
        .arg("--trace")
        .arg(&setup.trace_path)
        .arg("--prices")
        .arg(&setup.prices_path)
        .arg("--executor")
        .arg("0x0e0e0e")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: HcuReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.total_work, 12);
    assert_eq!(report.per_handle_cost.len(), 3);
}

#[test]
fn test_empty_trace() {
    let setup = setup::setup();
    let trace_path = setup::write_trace(
        &setup.test_dir,
        "empty.json",
        &TransactionTrace {
            status: TxOutcome::Success,
            events: Vec::new(),
        },
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hcu_meter"))
        .arg("--trace")
        .arg(&trace_path)
        .arg("--prices")
        .arg(&setup.prices_path)
        .output()
        .unwrap();

    assert!(output.status.success());

    let report: HcuReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report, HcuReport::default());
}
