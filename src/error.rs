//! Error types for the codec, the header parser and the converter.

use thiserror::Error;

use crate::header::{AddressKind, AddressType};

/// Errors raised by the Bech32 primitive in [`crate::codec`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Bech32Error {
    /// Upper and lower case characters in the same string
    #[error("Bech32 string mixes upper and lower case")]
    MixedCase,

    /// The 6-character checksum does not verify against the HRP and data
    #[error("Bech32 checksum does not verify")]
    BadChecksum,

    /// The human-readable part is empty, too long or holds invalid characters
    #[error("invalid human-readable part: {0}")]
    InvalidHrp(String),

    /// Missing separator, invalid data characters and similar structural faults
    #[error("malformed Bech32 string: {0}")]
    Malformed(String),

    /// The encoder refused the input (for example it exceeds the code length)
    #[error("Bech32 encode error: {0}")]
    Encode(String),

    /// The startup capability check produced an unexpected string
    #[error("Bech32 self-check failed: got {0:?}")]
    SelfCheck(String),
}

/// Errors that can occur while turning raw input into address bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Odd length or a character outside `[0-9a-fA-F]`
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Not even a header byte
    #[error("address too short: need at least a header byte")]
    TooShort,

    /// High nibble of the header isn't a recognized address type
    #[error("unknown address type tag: 0x{0:X}")]
    UnknownTag(u8),

    /// Bech32-level failure
    #[error(transparent)]
    Bech32(#[from] Bech32Error),
}

/// Errors that can occur during a single address conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The input could not be decoded into a header and credential bytes
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Credential bytes after the header don't have a length valid for its type
    #[error(
        "{address_type} address carries {got} credential bytes, expected {}",
        .address_type.expected_lengths()
    )]
    MalformedLength {
        address_type: AddressType,
        got: usize,
    },

    /// The chain pointer tail of a pointer address is missing or malformed
    #[error("invalid chain pointer: {0}")]
    InvalidPointer(&'static str),

    /// The header describes a different kind of address than the caller asked for
    #[error("header type {address_type} is not a {kind} address")]
    KindMismatch {
        kind: AddressKind,
        address_type: AddressType,
    },

    /// Network id other than 0 (testnet) or 1 (mainnet)
    #[error("unsupported network id: {0}")]
    InvalidNetworkId(u8),

    /// HRP isn't one of `addr`, `addr_test`, `stake`, `stake_test`
    #[error("unknown HRP: {0}")]
    UnknownHrp(String),

    /// Neither a payment nor a reward address was supplied
    #[error("no payment or reward address provided")]
    NoInputProvided,
}

impl From<Bech32Error> for ConversionError {
    fn from(e: Bech32Error) -> Self {
        ConversionError::Decode(DecodeError::Bech32(e))
    }
}

impl ConversionError {
    /// Whether the failure concerns the shape of the request as a whole rather
    /// than the contents of one address.
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            ConversionError::NoInputProvided | ConversionError::InvalidNetworkId(_)
        )
    }
}
