use std::fs::read;

use anyhow::{Result, anyhow};
use clap::Parser;
use hcu_meter::operation::{PriceKind, price_keys};
use hcu_meter::{OperandShape, PriceKey, PriceTable, TypeRegistry};

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long)]
    prices_path: String,

    /// FHE type registry. Defaults to the built-in types.
    #[arg(short, long)]
    types_path: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let price_bytes = read(&args.prices_path)
        .map_err(|e| anyhow!("failed to read price table '{}': {e}", args.prices_path))?;
    let prices: PriceTable = serde_json::from_slice(&price_bytes)
        .map_err(|e| anyhow!("failed to parse price table '{}': {e}", args.prices_path))?;

    let types = match &args.types_path {
        Some(path) => {
            let type_bytes =
                read(path).map_err(|e| anyhow!("failed to read type registry '{path}': {e}"))?;
            serde_json::from_slice(&type_bytes)
                .map_err(|e| anyhow!("failed to parse type registry '{path}': {e}"))?
        }
        None => TypeRegistry::builtin(),
    };

    for (operation, kind) in price_keys() {
        let shapes = match kind {
            PriceKind::ByType => vec![None],
            PriceKind::ByShape => vec![Some(OperandShape::Scalar), Some(OperandShape::NonScalar)],
        };
        for shape in shapes {
            let missing: Vec<&str> = types
                .iter()
                .filter(|&fhe_type| {
                    let key = match shape {
                        Some(shape) => PriceKey::Shaped(shape, fhe_type),
                        None => PriceKey::Type(fhe_type),
                    };
                    prices.price(operation, key).is_err()
                })
                .map(|fhe_type| fhe_type.name.as_str())
                .collect();
            if missing.is_empty() {
                continue;
            }
            match shape {
                Some(shape) => println!(
                    "{operation}.{}: missing {}",
                    shape.as_str(),
                    missing.join(", ")
                ),
                None => println!("{operation}: missing {}", missing.join(", ")),
            }
        }
    }

    Ok(())
}
