//! Static type registry and operator price table.
//!
//! Both tables are loaded once and only read afterwards. The price table
//! follows the JSON layout used by the coprocessor tooling:
//!
//! ```json
//! {
//!   "trivialEncrypt": { "types": { "ebool": 32, "euint8": 32 } },
//!   "fheAdd": {
//!     "scalar": { "euint8": 84, "default": 100 },
//!     "nonScalar": { "euint8": 88 }
//!   },
//!   "fheRand": 19000
//! }
//! ```

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DuplicateTypeIndex, HcuError};
use crate::types::{FheType, Handle};

/// Built-in FHE types, used when no registry is supplied.
const BUILTIN_TYPES: [(u8, &str); 12] = [
    (0, "ebool"),
    (1, "euint4"),
    (2, "euint8"),
    (3, "euint16"),
    (4, "euint32"),
    (5, "euint64"),
    (6, "euint128"),
    (7, "eaddress"),
    (8, "euint256"),
    (9, "ebytes64"),
    (10, "ebytes128"),
    (11, "ebytes256"),
];

/// Set of known FHE types, unique by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FheType>", into = "Vec<FheType>")]
pub struct TypeRegistry {
    types: BTreeMap<u8, FheType>,
}

impl TypeRegistry {
    /// Build a registry, rejecting two entries with the same index.
    pub fn new(types: impl IntoIterator<Item = FheType>) -> Result<Self, DuplicateTypeIndex> {
        let mut by_index: BTreeMap<u8, FheType> = BTreeMap::new();
        for fhe_type in types {
            if let Some(first) = by_index.get(&fhe_type.index) {
                return Err(DuplicateTypeIndex {
                    index: fhe_type.index,
                    first: first.name.clone(),
                    second: fhe_type.name,
                });
            }
            by_index.insert(fhe_type.index, fhe_type);
        }
        Ok(Self { types: by_index })
    }

    /// Registry of the types the coprocessor supports out of the box.
    pub fn builtin() -> Self {
        Self {
            types: BUILTIN_TYPES
                .iter()
                .map(|&(index, name)| (index, FheType::new(index, name)))
                .collect(),
        }
    }

    /// Look up a type by its index. Indices wider than a byte are never registered.
    pub fn lookup(&self, index: u32) -> Result<&FheType, HcuError> {
        u8::try_from(index)
            .ok()
            .and_then(|index| self.types.get(&index))
            .ok_or(HcuError::UnknownType(index))
    }

    /// Recover the declared type of a handle from its embedded type byte.
    pub fn resolve_handle(&self, handle: &Handle) -> Result<&FheType, HcuError> {
        self.lookup(u32::from(handle.type_index()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FheType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<FheType>> for TypeRegistry {
    type Error = DuplicateTypeIndex;

    fn try_from(types: Vec<FheType>) -> Result<Self, Self::Error> {
        Self::new(types)
    }
}

impl From<TypeRegistry> for Vec<FheType> {
    fn from(registry: TypeRegistry) -> Self {
        registry.types.into_values().collect()
    }
}

/// Shape of the right operand of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// The right operand is a plaintext literal.
    Scalar,
    /// The right operand is an encrypted handle.
    NonScalar,
}

impl OperandShape {
    pub fn as_str(self) -> &'static str {
        match self {
            OperandShape::Scalar => "scalar",
            OperandShape::NonScalar => "nonScalar",
        }
    }
}

/// Costs keyed by type name, with an optional fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePrices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u64>,
    #[serde(flatten)]
    pub types: BTreeMap<String, u64>,
}

impl TypePrices {
    /// Cost for `type_name`, falling back to the default entry.
    pub fn get(&self, type_name: &str) -> Option<u64> {
        self.types.get(type_name).copied().or(self.default)
    }
}

/// Per-type cost tables of one operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PriceTables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TypePrices>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<TypePrices>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_scalar: Option<TypePrices>,
}

/// Price configuration of one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceEntry {
    /// Same cost whatever the type or operand shape.
    Flat(u64),
    /// Costs keyed by type, optionally split by operand shape.
    Tables(PriceTables),
}

/// What a price is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceKey<'a> {
    /// Cost keyed by type only (trivial construction, cast, unary operators).
    Type(&'a FheType),
    /// Cost keyed by operand shape then type (binary operators).
    Shaped(OperandShape, &'a FheType),
}

impl std::fmt::Display for PriceKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceKey::Type(fhe_type) => write!(f, "{}", fhe_type.name),
            PriceKey::Shaped(shape, fhe_type) => {
                write!(f, "{}.{}", shape.as_str(), fhe_type.name)
            }
        }
    }
}

/// Operator price table keyed by operator price key, e.g. `fheAdd`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    entries: BTreeMap<String, PriceEntry>,
}

impl PriceTable {
    pub fn new(entries: BTreeMap<String, PriceEntry>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, operation: impl Into<String>, entry: PriceEntry) {
        self.entries.insert(operation.into(), entry);
    }

    pub fn entry(&self, operation: &str) -> Option<&PriceEntry> {
        self.entries.get(operation)
    }

    /// Resolve the cost of `operation` for `key`.
    pub fn price(&self, operation: &str, key: PriceKey<'_>) -> Result<u64, HcuError> {
        let missing = || HcuError::MissingPriceEntry {
            operation: operation.to_string(),
            key: key.to_string(),
        };
        let tables = match self.entries.get(operation).ok_or_else(missing)? {
            PriceEntry::Flat(cost) => return Ok(*cost),
            PriceEntry::Tables(tables) => tables,
        };
        let (prices, fhe_type) = match key {
            PriceKey::Type(fhe_type) => (tables.types.as_ref(), fhe_type),
            PriceKey::Shaped(OperandShape::Scalar, fhe_type) => (tables.scalar.as_ref(), fhe_type),
            PriceKey::Shaped(OperandShape::NonScalar, fhe_type) => {
                (tables.non_scalar.as_ref(), fhe_type)
            }
        };
        let cost = prices
            .and_then(|prices| prices.get(&fhe_type.name))
            .ok_or_else(missing)?;
        debug!("Resolved price of {operation} for {key} as {cost}");
        Ok(cost)
    }
}

/// Type registry and price table consumed by the accounting engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    pub types: TypeRegistry,
    pub prices: PriceTable,
}

impl Registry {
    pub fn new(types: TypeRegistry, prices: PriceTable) -> Self {
        Self { types, prices }
    }

    /// Recover the declared type of a handle.
    pub fn resolve_type(&self, handle: &Handle) -> Result<&FheType, HcuError> {
        self.types.resolve_handle(handle)
    }

    /// Resolve the cost of `operation` for `key`.
    pub fn price(&self, operation: &str, key: PriceKey<'_>) -> Result<u64, HcuError> {
        self.prices.price(operation, key)
    }
}
