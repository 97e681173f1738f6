//! Type definitions for handles, decoded events and cost reports.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{HANDLE_SIZE, HANDLE_TYPE_BYTE_OFFSET};

/// Error type for hex-encoded values that cannot be decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidHexValue {
    /// The string is not valid hexadecimal.
    #[error("invalid hex string: {0}")]
    Hex(#[from] hex::FromHexError),
    /// The decoded value does not fit in a 32-byte handle.
    #[error("value is {0} bytes long, handles are at most 32 bytes")]
    TooLong(usize),
}

fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    }
}

/// Identifier of an encrypted value produced by the coprocessor.
///
/// The byte at [`HANDLE_TYPE_BYTE_OFFSET`] carries the index of the FHE type
/// the handle was declared with.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub [u8; HANDLE_SIZE]);

impl Handle {
    /// Build a handle from big-endian bytes, left-padding values shorter than 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, InvalidHexValue> {
        if bytes.len() > HANDLE_SIZE {
            return Err(InvalidHexValue::TooLong(bytes.len()));
        }
        let mut word = [0u8; HANDLE_SIZE];
        word[HANDLE_SIZE - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(word))
    }

    /// Index of the FHE type encoded in the handle.
    pub fn type_index(&self) -> u8 {
        self.0[HANDLE_TYPE_BYTE_OFFSET]
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({self})")
    }
}

impl FromStr for Handle {
    type Err = InvalidHexValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_be_slice(&decode_hex(s)?)
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An entry of the type registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FheType {
    /// Index encoded in handles and passed as event arguments.
    #[serde(rename = "value")]
    pub index: u8,
    /// Name used as key in the price table, e.g. `euint8`.
    #[serde(rename = "type")]
    pub name: String,
}

impl FheType {
    pub fn new(index: u8, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// A raw event argument: the big-endian bytes of an ABI value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArgValue(pub Vec<u8>);

impl ArgValue {
    /// Interpret the argument as a 32-byte handle.
    pub fn as_handle(&self) -> Option<Handle> {
        Handle::from_be_slice(&self.0).ok()
    }

    /// The bytes left after stripping leading zeros.
    pub fn significant_bytes(&self) -> &[u8] {
        let start = self.0.iter().position(|b| *b != 0).unwrap_or(self.0.len());
        &self.0[start..]
    }

    /// Interpret the argument as an unsigned integer of at most 4 significant bytes.
    pub fn as_u32(&self) -> Option<u32> {
        let significant = self.significant_bytes();
        if significant.len() > 4 {
            return None;
        }
        Some(
            significant
                .iter()
                .fold(0u32, |acc, b| (acc << 8) | u32::from(*b)),
        )
    }

    /// Interpret the argument as an unsigned integer of at most 1 significant byte.
    pub fn as_u8(&self) -> Option<u8> {
        self.as_u32().and_then(|value| u8::try_from(value).ok())
    }
}

impl From<Handle> for ArgValue {
    fn from(handle: Handle) -> Self {
        Self(handle.0.to_vec())
    }
}

impl From<u8> for ArgValue {
    fn from(value: u8) -> Self {
        Self(vec![value])
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgValue({self})")
    }
}

impl FromStr for ArgValue {
    type Err = InvalidHexValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(decode_hex(s)?))
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArgValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An event emitted by the coprocessor, already decoded from its raw log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEvent {
    /// Event name, e.g. `FheAdd`.
    pub name: String,
    /// Address of the contract that emitted the event, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<ArgValue>,
    /// Arguments in ABI order. Position 0 is the caller.
    pub args: Vec<ArgValue>,
}

impl DecodedEvent {
    pub fn new(name: impl Into<String>, args: Vec<ArgValue>) -> Self {
        Self {
            name: name.into(),
            address: None,
            args,
        }
    }
}

/// Final status of the executed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxOutcome {
    Success,
    Reverted,
}

impl TxOutcome {
    pub fn is_success(self) -> bool {
        self == TxOutcome::Success
    }
}

impl From<bool> for TxOutcome {
    fn from(ok: bool) -> Self {
        if ok {
            TxOutcome::Success
        } else {
            TxOutcome::Reverted
        }
    }
}

/// The outcome and decoded event log of one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTrace {
    pub status: TxOutcome,
    #[serde(default)]
    pub events: Vec<DecodedEvent>,
}

impl TransactionTrace {
    /// Keep only the events emitted by `emitter`.
    ///
    /// Addresses compare as integers, so `0x0e0e0e` matches its 20-byte
    /// zero-padded form. Events without a recorded address are dropped.
    pub fn retain_emitter(&mut self, emitter: &ArgValue) {
        let emitter = emitter.significant_bytes();
        self.events.retain(|event| {
            event
                .address
                .as_ref()
                .is_some_and(|address| address.significant_bytes() == emitter)
        });
    }
}

/// HCU cost of one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HcuReport {
    /// Sum of the own cost of every operation.
    pub total_work: u64,
    /// Largest cumulative cost over all produced handles, 0 when none were produced.
    pub max_depth: u64,
    /// Cumulative cost of every produced handle.
    pub per_handle_cost: BTreeMap<Handle, u64>,
}
