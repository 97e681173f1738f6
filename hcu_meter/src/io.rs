//! Trace and report I/O operations.

use std::{
    fs::{File, write},
    io::{self, BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use hcu_meter::TransactionTrace;

/// Read and parse a transaction trace from a file.
fn read_trace_from_file(path: &Path) -> Result<TransactionTrace> {
    let file = File::open(path)
        .with_context(|| format!("failed to open trace file '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse trace file '{}'", path.display()))
}

/// Read and parse a transaction trace from stdin.
fn read_trace_from_stdin() -> Result<TransactionTrace> {
    let mut buffer = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut buffer)
        .context("failed to read trace from stdin")?;
    serde_json::from_slice(&buffer).context("failed to parse trace from stdin")
}

/// Read a trace from file or stdin, returning it with a source description.
pub(crate) fn read_trace(trace_path: Option<&Path>) -> Result<(TransactionTrace, String)> {
    match trace_path {
        Some(path) => Ok((read_trace_from_file(path)?, path.display().to_string())),
        None => Ok((read_trace_from_stdin()?, "stdin".to_string())),
    }
}

/// Write output bytes to a file or stdout.
pub(crate) fn write_output(output_path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output_path {
        Some(path) => {
            write(path, bytes)
                .with_context(|| format!("failed to write output file '{}'", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(bytes)
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}
