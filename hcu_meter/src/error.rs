//! Error types for HCU accounting and report serialization.

/// Error raised while accounting the HCU cost of a transaction.
///
/// Every variant aborts the whole accumulation; no partial report is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HcuError {
    /// The transaction did not succeed, so there is nothing to account.
    #[error("transaction reverted")]
    RevertedTransaction,
    /// A handle or argument references a type index absent from the registry.
    #[error("invalid FHE type index: {0}")]
    UnknownType(u32),
    /// The event name does not belong to any priced operator family.
    #[error("unhandled event {0}")]
    UnhandledOperation(String),
    /// The price table has no usable cost for this operation and key.
    #[error("missing operator price record for {operation} ({key})")]
    MissingPriceEntry { operation: String, key: String },
    /// An argument at a fixed position is absent or has the wrong width.
    #[error("malformed argument {position} of {operation}: {reason}")]
    MalformedArgument {
        operation: String,
        position: usize,
        reason: String,
    },
}

/// Error raised while building a type registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate FHE type index {index} ({first} and {second})")]
pub struct DuplicateTypeIndex {
    pub index: u8,
    pub first: String,
    pub second: String,
}

/// Error type for peeking version from serialized data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeekError {
    /// Data is too short to contain a valid header.
    #[error("data too short to contain valid header")]
    TooShort,
    /// Magic bytes do not match expected value.
    #[error("invalid magic bytes")]
    InvalidMagic,
    /// Version field is corrupt or unreadable.
    #[error("version field is corrupt or unreadable")]
    InvalidVersion,
}

/// Error type for deserialization operations.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// Error peeking the version header.
    #[error("header validation failed: {0}")]
    Peek(#[from] PeekError),
    /// Version is not supported.
    #[error("unsupported version {got}, expected {expected}")]
    UnsupportedVersion { got: u32, expected: u32 },
    /// Error deserializing the payload.
    #[error("payload deserialization failed")]
    Payload(#[source] rmp_serde::decode::Error),
}

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
#[error("payload serialization failed")]
pub struct SerializeError(#[source] pub(crate) rmp_serde::encode::Error);
