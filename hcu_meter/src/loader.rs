//! Price table and type registry loading.

use std::{fs::read, path::Path};

use anyhow::{Context, Result};
use hcu_meter::{PriceTable, Registry, TypeRegistry};

/// Load and parse the operator price table.
pub(crate) fn load_price_table(prices_path: &Path) -> Result<PriceTable> {
    let bytes = read(prices_path)
        .with_context(|| format!("failed to read price table '{}'", prices_path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse price table '{}'", prices_path.display()))
}

/// Load the type registry, falling back to the built-in types.
pub(crate) fn load_type_registry(types_path: Option<&Path>) -> Result<TypeRegistry> {
    let Some(path) = types_path else {
        return Ok(TypeRegistry::builtin());
    };
    let bytes = read(path)
        .with_context(|| format!("failed to read type registry '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse type registry '{}'", path.display()))
}

/// Load the registry consumed by the accounting engine.
pub(crate) fn load_registry(prices_path: &Path, types_path: Option<&Path>) -> Result<Registry> {
    Ok(Registry::new(
        load_type_registry(types_path)?,
        load_price_table(prices_path)?,
    ))
}
