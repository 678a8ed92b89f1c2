//! Networks, address kinds and the CIP-19 header byte.
//!
//! The first byte of every Shelley address is laid out as:
//! ```text
//! | bits 7..4: address type tag | bits 3..0: network id |
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConversionError, DecodeError};

/// Length in bytes of a key or script hash (Blake2b-224).
pub const CREDENTIAL_LENGTH: usize = 28;

/// Which network an address is encoded for.
///
/// This determines the `_test` suffix of the human-readable part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Network id 0
    Testnet,
    /// Network id 1
    Mainnet,
}

impl Network {
    /// Numeric network id as carried in the low nibble of the header.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Network::Testnet => 0,
            Network::Mainnet => 1,
        }
    }

    /// Reverse lookup from network id to enum.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Network> {
        match id {
            0 => Some(Network::Testnet),
            1 => Some(Network::Mainnet),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Network {
    type Error = ConversionError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Network::from_id(id).ok_or(ConversionError::InvalidNetworkId(id))
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "1" => Ok(Network::Mainnet),
            "testnet" | "0" => Ok(Network::Testnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        })
    }
}

/// Whether an address is a payment address or a reward (stake) address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Spending address, `addr…`
    Payment,
    /// Reward address, `stake…`
    Reward,
}

impl AddressKind {
    /// Human-readable part for this kind on the given network.
    #[must_use]
    pub fn hrp(self, network: Network) -> &'static str {
        match (self, network) {
            (AddressKind::Payment, Network::Mainnet) => "addr",
            (AddressKind::Payment, Network::Testnet) => "addr_test",
            (AddressKind::Reward, Network::Mainnet) => "stake",
            (AddressKind::Reward, Network::Testnet) => "stake_test",
        }
    }

    /// Reverse lookup from HRP to kind and network.
    #[must_use]
    pub fn from_hrp(hrp: &str) -> Option<(AddressKind, Network)> {
        match hrp {
            "addr" => Some((AddressKind::Payment, Network::Mainnet)),
            "addr_test" => Some((AddressKind::Payment, Network::Testnet)),
            "stake" => Some((AddressKind::Reward, Network::Mainnet)),
            "stake_test" => Some((AddressKind::Reward, Network::Testnet)),
            _ => None,
        }
    }
}

impl FromStr for AddressKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "payment" => Ok(AddressKind::Payment),
            "reward" | "stake" => Ok(AddressKind::Reward),
            other => Err(format!("unknown address kind: {other}")),
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressKind::Payment => "payment",
            AddressKind::Reward => "reward",
        })
    }
}

/// Address type carried in the high nibble of the header (CIP-19).
///
/// Tags `0x8` (Byron) and `0x9..=0xD` are not Shelley header layouts and are
/// rejected by [`AddressType::from_tag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    /// `0x0`: payment key hash, stake key hash
    BaseKeyKey,
    /// `0x1`: script hash, stake key hash
    BaseScriptKey,
    /// `0x2`: payment key hash, script hash
    BaseKeyScript,
    /// `0x3`: script hash, script hash
    BaseScriptScript,
    /// `0x4`: payment key hash, chain pointer
    PointerKey,
    /// `0x5`: script hash, chain pointer
    PointerScript,
    /// `0x6`: payment key hash only
    EnterpriseKey,
    /// `0x7`: script hash only
    EnterpriseScript,
    /// `0xE`: stake key hash
    RewardKey,
    /// `0xF`: script hash
    RewardScript,
}

impl AddressType {
    /// Four-bit tag for the header's high nibble.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            AddressType::BaseKeyKey => 0x0,
            AddressType::BaseScriptKey => 0x1,
            AddressType::BaseKeyScript => 0x2,
            AddressType::BaseScriptScript => 0x3,
            AddressType::PointerKey => 0x4,
            AddressType::PointerScript => 0x5,
            AddressType::EnterpriseKey => 0x6,
            AddressType::EnterpriseScript => 0x7,
            AddressType::RewardKey => 0xE,
            AddressType::RewardScript => 0xF,
        }
    }

    /// Reverse lookup from tag to enum.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<AddressType> {
        match tag {
            0x0 => Some(AddressType::BaseKeyKey),
            0x1 => Some(AddressType::BaseScriptKey),
            0x2 => Some(AddressType::BaseKeyScript),
            0x3 => Some(AddressType::BaseScriptScript),
            0x4 => Some(AddressType::PointerKey),
            0x5 => Some(AddressType::PointerScript),
            0x6 => Some(AddressType::EnterpriseKey),
            0x7 => Some(AddressType::EnterpriseScript),
            0xE => Some(AddressType::RewardKey),
            0xF => Some(AddressType::RewardScript),
            _ => None,
        }
    }

    /// Valid credential byte counts after the header.
    ///
    /// Pointer types are followed by a chain pointer after their single
    /// credential; see [`AddressType::has_pointer`]. A base key/key header
    /// with only the payment credential is the shortened form some wallet
    /// APIs hand out, and is accepted alongside the full form.
    #[must_use]
    pub fn credential_lengths(self) -> &'static [usize] {
        match self {
            AddressType::BaseKeyKey => &[2 * CREDENTIAL_LENGTH, CREDENTIAL_LENGTH],
            AddressType::BaseScriptKey
            | AddressType::BaseKeyScript
            | AddressType::BaseScriptScript => &[2 * CREDENTIAL_LENGTH],
            AddressType::PointerKey
            | AddressType::PointerScript
            | AddressType::EnterpriseKey
            | AddressType::EnterpriseScript
            | AddressType::RewardKey
            | AddressType::RewardScript => &[CREDENTIAL_LENGTH],
        }
    }

    /// Whether a chain pointer follows the credential.
    #[must_use]
    pub fn has_pointer(self) -> bool {
        matches!(self, AddressType::PointerKey | AddressType::PointerScript)
    }

    pub(crate) fn expected_lengths(self) -> &'static str {
        match self {
            AddressType::BaseKeyKey => "56 (or 28)",
            AddressType::BaseScriptKey
            | AddressType::BaseKeyScript
            | AddressType::BaseScriptScript => "56",
            AddressType::PointerKey | AddressType::PointerScript => "28 plus a chain pointer",
            _ => "28",
        }
    }

    /// The kind of address this type belongs to.
    #[must_use]
    pub fn kind(self) -> AddressKind {
        match self {
            AddressType::RewardKey | AddressType::RewardScript => AddressKind::Reward,
            _ => AddressKind::Payment,
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressType::BaseKeyKey => "base (key, key)",
            AddressType::BaseScriptKey => "base (script, key)",
            AddressType::BaseKeyScript => "base (key, script)",
            AddressType::BaseScriptScript => "base (script, script)",
            AddressType::PointerKey => "pointer (key)",
            AddressType::PointerScript => "pointer (script)",
            AddressType::EnterpriseKey => "enterprise (key)",
            AddressType::EnterpriseScript => "enterprise (script)",
            AddressType::RewardKey => "reward (key)",
            AddressType::RewardScript => "reward (script)",
        })
    }
}

/// The parsed first byte of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressHeader {
    /// Address type from the high nibble
    pub address_type: AddressType,
    /// Raw low nibble; only 0 and 1 are assigned, the rest are reserved
    pub network_id: u8,
}

impl AddressHeader {
    /// Header for a known type and network.
    #[must_use]
    pub fn new(address_type: AddressType, network: Network) -> Self {
        AddressHeader {
            address_type,
            network_id: network.id(),
        }
    }

    /// Split a header byte into type tag and network nibble.
    ///
    /// # Errors
    /// Returns `DecodeError::UnknownTag` if the high nibble isn't a Shelley type.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let tag = byte >> 4;
        let address_type = AddressType::from_tag(tag).ok_or(DecodeError::UnknownTag(tag))?;
        Ok(AddressHeader {
            address_type,
            network_id: byte & 0x0F,
        })
    }

    /// Byte form of the header.
    #[must_use]
    pub fn byte(self) -> u8 {
        (self.address_type.tag() << 4) | (self.network_id & 0x0F)
    }

    /// The network named by the header, if the nibble is an assigned one.
    #[must_use]
    pub fn network(self) -> Option<Network> {
        Network::from_id(self.network_id)
    }
}

/// Parse the header from the leading byte of a raw address.
///
/// # Errors
/// - `DecodeError::TooShort` on empty input
/// - `DecodeError::UnknownTag` for Byron and reserved type tags
pub fn parse_header(bytes: &[u8]) -> Result<AddressHeader, DecodeError> {
    let first = bytes.first().ok_or(DecodeError::TooShort)?;
    AddressHeader::from_byte(*first)
}
