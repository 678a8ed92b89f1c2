//! A hex to Bech32 converter for Cardano Shelley addresses (CIP-19).
//!
//! This crate supports:
//! - Payment (`addr…`) and reward (`stake…`) addresses.
//! - Base, pointer, enterprise and reward layouts, validated per header type.
//! - Mainnet vs Testnet via HRP, chosen by the caller's network id.
//! - Header parsing against the CIP-19 address type table.
//! - Batch conversion of a payment and a reward address with per-slot errors.
//! - Full encode/decode round-trip with Bech32 checksum per BIP-173.
//!
//! ```
//! use cardano_address::{AddressKind, Network, hex_to_bech32};
//!
//! let stake_key_hash = "337b62cfff6403a06a3acbc34f8c46003c69fe79a3628cefa9c47251";
//! let addr = hex_to_bech32(stake_key_hash, AddressKind::Reward, Network::Mainnet).unwrap();
//! assert_eq!(
//!     addr.as_str(),
//!     "stake1uyehkck0lajq8gr28t9uxnuvgcqrc6070x3k9r8048z8y5gh6ffgw"
//! );
//! ```

pub mod address;
pub mod batch;
pub mod codec;
pub mod error;
pub mod header;
pub mod normalize;
pub mod pointer;

pub use address::{
    Bech32Address, Credential, DecodedAddress, HeaderNetworkMismatch, decode_address,
    hex_to_bech32,
};
pub use batch::{
    AddressPair, BatchResult, ConversionRequest, ConversionResponse, ErrorResponse, SlotResult,
    convert_addresses,
};
pub use error::{Bech32Error, ConversionError, DecodeError};
pub use header::{
    AddressHeader, AddressKind, AddressType, CREDENTIAL_LENGTH, Network, parse_header,
};
pub use normalize::normalize;
pub use pointer::Pointer;
