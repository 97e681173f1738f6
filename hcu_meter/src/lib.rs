//! HCU (homomorphic compute unit) accounting for coprocessor transactions.
//!
//! Every homomorphic operation the coprocessor performs is announced by an
//! event naming the operation, its operand handles and its result handle.
//! Replaying the events of one transaction in order rebuilds the dependency
//! graph between handles; pricing every operation from a static price table
//! then yields the total work of the transaction and the cost of its most
//! expensive dependency chain (its depth).
//!
//! # Handle Layout
//!
//! Handles are 32 bytes. The byte at offset [`HANDLE_TYPE_BYTE_OFFSET`]
//! holds the index of the handle's FHE type in the [`TypeRegistry`].
//!
//! # Report Wire Format
//!
//! Reports can be written in a versioned binary format:
//!
//! ```text
//! [MAGIC: 4 bytes][VERSION: 4 bytes big-endian u32][PAYLOAD: msgpack bytes]
//! ```
//!
//! The deserializer only accepts data with an exact version match.

mod engine;
mod error;
pub mod operation;
mod registry;
mod tracker;
mod types;
mod wire;

pub use engine::{compute_cost, compute_trace_cost, operation_cost};
pub use error::{DeserializeError, DuplicateTypeIndex, HcuError, PeekError, SerializeError};
pub use operation::FheOperation;
pub use registry::{
    OperandShape, PriceEntry, PriceKey, PriceTable, PriceTables, Registry, TypePrices,
    TypeRegistry,
};
pub use types::{
    ArgValue, DecodedEvent, FheType, Handle, HcuReport, InvalidHexValue, TransactionTrace,
    TxOutcome,
};
pub use wire::{deserialize_report, peek_report_version, serialize_report};

/// Size of a handle in bytes.
pub const HANDLE_SIZE: usize = 32;

/// Offset of the FHE type index within a handle.
pub const HANDLE_TYPE_BYTE_OFFSET: usize = 30;

/// Current protocol version for reports.
pub const REPORT_VERSION: u32 = 1;

/// Magic bytes identifying HCU report files: "HCUR" in ASCII.
pub const REPORT_MAGIC: [u8; 4] = *b"HCUR";

/// Header size: 4 bytes magic + 4 bytes version.
pub const HEADER_SIZE: usize = 8;
