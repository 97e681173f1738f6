mod cli;
mod io;
mod loader;

use anyhow::{Context, Result};
use clap::Parser;
use hcu_meter::{compute_trace_cost, serialize_report};
use log::info;

use crate::cli::{Args, OutputFormat};
use crate::io::{read_trace, write_output};
use crate::loader::load_registry;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // load configuration
    let registry = load_registry(&args.prices, args.types.as_deref())?;
    info!(
        "Successfully loaded price table '{}' with {} FHE types",
        args.prices.display(),
        registry.types.len()
    );

    // read the trace
    let (mut trace, trace_source) = read_trace(args.trace.as_deref())?;
    if let Some(executor) = &args.executor {
        let total = trace.events.len();
        trace.retain_emitter(executor);
        info!(
            "Kept {} of {total} events emitted by executor {executor}",
            trace.events.len()
        );
    }

    // account
    let report = compute_trace_cost(&trace, &registry).with_context(|| {
        format!("failed to compute HCU of transaction from '{trace_source}'")
    })?;
    info!(
        "Transaction consumes {} HCU in total with a depth of {} HCU",
        report.total_work, report.max_depth
    );

    // encode and write the report
    let output_bytes = match args.format {
        OutputFormat::Json => {
            let mut bytes =
                serde_json::to_vec_pretty(&report).context("failed to serialize report")?;
            bytes.push(b'\n');
            bytes
        }
        OutputFormat::Binary => serialize_report(&report).context("failed to serialize report")?,
    };
    write_output(args.output.as_deref(), &output_bytes)
}
