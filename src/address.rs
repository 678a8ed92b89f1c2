//! Hex to Bech32 address conversion and its inverse.

use hex::encode as hex_encode;
use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::codec;
use crate::error::ConversionError;
use crate::header::{AddressHeader, AddressKind, CREDENTIAL_LENGTH, Network, parse_header};
use crate::normalize::normalize;
use crate::pointer::Pointer;

/// A 28-byte key or script hash.
pub type Credential = [u8; CREDENTIAL_LENGTH];

/// The header's network nibble disagrees with the network the caller asked for.
///
/// Advisory only: the caller's network still selects the HRP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderNetworkMismatch {
    /// Low nibble of the header byte
    pub header_network_id: u8,
    /// Network the address was encoded for
    pub requested: Network,
}

impl fmt::Display for HeaderNetworkMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "header network id {} does not match requested {} ({})",
            self.header_network_id,
            self.requested,
            self.requested.id()
        )
    }
}

/// The structured form of an address: header, credentials and, for pointer
/// addresses, the chain pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Network selecting the HRP
    pub network: Network,
    /// Payment or reward
    pub kind: AddressKind,
    /// Parsed header byte
    pub header: AddressHeader,
    /// One or two credentials, in address order
    pub credentials: Vec<Credential>,
    /// Chain pointer of a pointer address
    pub pointer: Option<Pointer>,
}

impl DecodedAddress {
    /// Build from raw address bytes (header first).
    ///
    /// # Errors
    /// - `DecodeError::TooShort` / `DecodeError::UnknownTag` from the header
    /// - `ConversionError::KindMismatch` if the header type belongs to the other kind
    /// - `ConversionError::MalformedLength` if the credential bytes don't fit the header type
    /// - `ConversionError::InvalidPointer` if a pointer address has a bad or missing tail
    pub fn from_bytes(
        bytes: &[u8],
        kind: AddressKind,
        network: Network,
    ) -> Result<Self, ConversionError> {
        let header = parse_header(bytes)?;
        if header.address_type.kind() != kind {
            return Err(ConversionError::KindMismatch {
                kind,
                address_type: header.address_type,
            });
        }

        let address_type = header.address_type;
        let rest = &bytes[1..];
        let (body, tail) = if address_type.has_pointer() {
            rest.split_at(rest.len().min(CREDENTIAL_LENGTH))
        } else {
            (rest, &[][..])
        };
        if !address_type.credential_lengths().contains(&body.len()) {
            return Err(ConversionError::MalformedLength {
                address_type,
                got: body.len(),
            });
        }
        let pointer = if address_type.has_pointer() {
            Some(Pointer::from_bytes(tail)?)
        } else {
            None
        };

        let credentials = body
            .chunks_exact(CREDENTIAL_LENGTH)
            .map(|chunk| {
                let mut credential = [0u8; CREDENTIAL_LENGTH];
                credential.copy_from_slice(chunk);
                credential
            })
            .collect();

        Ok(DecodedAddress {
            network,
            kind,
            header,
            credentials,
            pointer,
        })
    }

    /// The raw address bytes: `[ header, credential…, pointer? ]`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.credentials.len() * CREDENTIAL_LENGTH);
        bytes.push(self.header.byte());
        for credential in &self.credentials {
            bytes.extend_from_slice(credential);
        }
        if let Some(pointer) = &self.pointer {
            bytes.extend(pointer.to_bytes());
        }
        bytes
    }

    /// Hex of the raw address bytes
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex_encode(self.to_bytes())
    }

    /// Hex of each credential
    #[must_use]
    pub fn credentials_hex(&self) -> Vec<String> {
        self.credentials.iter().map(hex_encode).collect()
    }

    /// HRP for this address's kind and network.
    #[must_use]
    pub fn hrp(&self) -> &'static str {
        self.kind.hrp(self.network)
    }

    /// Bech32-encode under [`DecodedAddress::hrp`].
    ///
    /// # Errors
    /// Returns a wrapped `Bech32Error` if the codec refuses the input.
    pub fn encode(&self) -> Result<String, ConversionError> {
        Ok(codec::encode(self.hrp(), &self.to_bytes())?)
    }

    /// The header/network disagreement, if any.
    #[must_use]
    pub fn network_mismatch(&self) -> Option<HeaderNetworkMismatch> {
        (self.header.network_id != self.network.id()).then_some(HeaderNetworkMismatch {
            header_network_id: self.header.network_id,
            requested: self.network,
        })
    }
}

/// Whether `bytes` form a complete, well-formed address of the given kind.
pub(crate) fn is_well_formed(bytes: &[u8], kind: AddressKind) -> bool {
    DecodedAddress::from_bytes(bytes, kind, Network::Mainnet).is_ok()
}

impl fmt::Display for DecodedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.encode().map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

/// A successfully converted address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bech32Address {
    /// The structured address that was encoded
    pub address: DecodedAddress,
    /// The Bech32 string
    pub bech32: String,
    /// Set when the header named a different network than the caller
    pub mismatch: Option<HeaderNetworkMismatch>,
}

impl Bech32Address {
    /// The Bech32 string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.bech32
    }
}

impl fmt::Display for Bech32Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bech32)
    }
}

/// Convert a hex address of the given kind into its Bech32 form.
///
/// The caller's `network` selects the HRP. A header naming another network is
/// reported through [`Bech32Address::mismatch`], not as an error.
///
/// # Errors
/// Returns `ConversionError` on any failure:
/// - Invalid hex
/// - Missing header or unknown type tag
/// - Header type of the other kind
/// - Credential length not valid for the header type
/// - Missing or malformed chain pointer on a pointer address
pub fn hex_to_bech32(
    hex: &str,
    kind: AddressKind,
    network: Network,
) -> Result<Bech32Address, ConversionError> {
    let bytes = normalize(hex, kind, network)?;
    let address = DecodedAddress::from_bytes(&bytes, kind, network)?;

    let mismatch = address.network_mismatch();
    if let Some(m) = &mismatch {
        warn!(%kind, "{m}");
    }

    let bech32 = address.encode()?;
    Ok(Bech32Address {
        address,
        bech32,
        mismatch,
    })
}

/// Decode a Bech32 address string back into its parts.
///
/// The HRP decides kind and network.
///
/// # Errors
/// Returns `ConversionError` on any failure:
/// - Bad checksum, mixed case or malformed string
/// - HRP other than `addr`, `addr_test`, `stake`, `stake_test`
/// - Header and credential faults as in [`DecodedAddress::from_bytes`]
pub fn decode_address(s: &str) -> Result<DecodedAddress, ConversionError> {
    let (hrp, bytes) = codec::decode(s)?;
    let (kind, network) =
        AddressKind::from_hrp(&hrp).ok_or_else(|| ConversionError::UnknownHrp(hrp.clone()))?;
    DecodedAddress::from_bytes(&bytes, kind, network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Bech32Error, DecodeError};
    use crate::header::AddressType;

    const PAYMENT_KEY_HASH: &str = "9493315cd92eb5d8c4304e67b7e16ae36d61d34502694657811a2c8e";
    const STAKE_KEY_HASH: &str = "337b62cfff6403a06a3acbc34f8c46003c69fe79a3628cefa9c47251";

    // CIP-19 test vectors
    const BASE_MAINNET: &str = "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgse35a3x";
    const BASE_TESTNET: &str = "addr_test1qz2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgs68faae";
    const ENTERPRISE_MAINNET: &str = "addr1vx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzers66hrl8";
    const ENTERPRISE_TESTNET: &str = "addr_test1vz2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzerspjrlsz";
    const STAKE_MAINNET: &str = "stake1uyehkck0lajq8gr28t9uxnuvgcqrc6070x3k9r8048z8y5gh6ffgw";
    const STAKE_TESTNET: &str = "stake_test1uqehkck0lajq8gr28t9uxnuvgcqrc6070x3k9r8048z8y5gssrtvn";
    const POINTER_MAINNET: &str = "addr1gx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer5pnz75xxcrzqf96k";
    const POINTER_TESTNET: &str = "addr_test1gz2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer5pnz75xxcrdw5vky";
    // slot 2498243, tx 27, cert 3
    const POINTER_TAIL: &str = "8198bd431b03";

    #[test]
    fn base_address_mainnet() {
        let hex = format!("01{PAYMENT_KEY_HASH}{STAKE_KEY_HASH}");
        let addr = hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet).unwrap();
        assert_eq!(addr.as_str(), BASE_MAINNET);
        assert_eq!(addr.address.header.address_type, AddressType::BaseKeyKey);
        assert_eq!(addr.address.credentials.len(), 2);
        assert_eq!(addr.mismatch, None);
    }

    #[test]
    fn base_address_testnet() {
        let hex = format!("00{PAYMENT_KEY_HASH}{STAKE_KEY_HASH}");
        let addr = hex_to_bech32(&hex, AddressKind::Payment, Network::Testnet).unwrap();
        assert_eq!(addr.to_string(), BASE_TESTNET);
    }

    #[test]
    fn enterprise_addresses() {
        let main = hex_to_bech32(
            &format!("61{PAYMENT_KEY_HASH}"),
            AddressKind::Payment,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(main.as_str(), ENTERPRISE_MAINNET);

        let test = hex_to_bech32(
            &format!("60{PAYMENT_KEY_HASH}"),
            AddressKind::Payment,
            Network::Testnet,
        )
        .unwrap();
        assert_eq!(test.as_str(), ENTERPRISE_TESTNET);
    }

    #[test]
    fn framed_enterprise_address() {
        let addr = hex_to_bech32(
            &format!("0161{PAYMENT_KEY_HASH}"),
            AddressKind::Payment,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(addr.as_str(), ENTERPRISE_MAINNET);
    }

    #[test]
    fn single_credential_after_01_selects_prefix_by_network() {
        let hex = format!("01{PAYMENT_KEY_HASH}");

        let main = hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet).unwrap();
        assert!(main.as_str().starts_with("addr1"));
        assert_eq!(
            main.as_str(),
            "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzers9rdrk8"
        );
        assert_eq!(main.mismatch, None);

        let test = hex_to_bech32(&hex, AddressKind::Payment, Network::Testnet).unwrap();
        assert!(test.as_str().starts_with("addr_test1"));
        assert_eq!(
            test.as_str(),
            "addr_test1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzers7efwe9"
        );
        assert_eq!(
            test.mismatch,
            Some(HeaderNetworkMismatch {
                header_network_id: 1,
                requested: Network::Testnet,
            })
        );
    }

    #[test]
    fn bare_stake_key_hash_gets_a_header() {
        let main = hex_to_bech32(STAKE_KEY_HASH, AddressKind::Reward, Network::Mainnet).unwrap();
        assert_eq!(main.address.header.byte(), 0xE1);
        assert_eq!(main.as_str(), STAKE_MAINNET);

        let test = hex_to_bech32(STAKE_KEY_HASH, AddressKind::Reward, Network::Testnet).unwrap();
        assert_eq!(test.as_str(), STAKE_TESTNET);
        assert_eq!(test.mismatch, None);
    }

    #[test]
    fn framed_reward_addresses() {
        let key = hex_to_bech32(
            &format!("e1{STAKE_KEY_HASH}"),
            AddressKind::Reward,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(key.as_str(), STAKE_MAINNET);

        let script = hex_to_bech32(
            &format!("f1{STAKE_KEY_HASH}"),
            AddressKind::Reward,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.address.header.address_type, AddressType::RewardScript);
        assert_eq!(
            script.as_str(),
            "stake17yehkck0lajq8gr28t9uxnuvgcqrc6070x3k9r8048z8y5g7j4flw"
        );
    }

    #[test]
    fn caller_network_wins_over_header() {
        let addr = hex_to_bech32(
            &format!("e1{STAKE_KEY_HASH}"),
            AddressKind::Reward,
            Network::Testnet,
        )
        .unwrap();
        assert_eq!(
            addr.as_str(),
            "stake_test1uyehkck0lajq8gr28t9uxnuvgcqrc6070x3k9r8048z8y5gszn6v5"
        );
        let mismatch = addr.mismatch.unwrap();
        assert_eq!(mismatch.header_network_id, 1);
        assert_eq!(mismatch.requested, Network::Testnet);
    }

    #[test]
    fn conversion_is_deterministic() {
        let hex = format!("31{PAYMENT_KEY_HASH}{STAKE_KEY_HASH}");
        let a = hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet).unwrap();
        let b = hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            "addr1xx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgsgqke6n"
        );
    }

    #[test]
    fn short_reward_hash_is_not_padded() {
        let short = &STAKE_KEY_HASH[..54];
        assert_eq!(
            hex_to_bech32(short, AddressKind::Reward, Network::Mainnet),
            Err(ConversionError::MalformedLength {
                address_type: AddressType::RewardKey,
                got: 27,
            })
        );
    }

    #[test]
    fn payment_credential_lengths_are_exact() {
        let hex = format!("61{PAYMENT_KEY_HASH}00");
        assert_eq!(
            hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::MalformedLength {
                address_type: AddressType::EnterpriseKey,
                got: 29,
            })
        );
        assert_eq!(
            hex_to_bech32("61", AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::MalformedLength {
                address_type: AddressType::EnterpriseKey,
                got: 0,
            })
        );
    }

    #[test]
    fn credential_length_follows_header_type() {
        let one = PAYMENT_KEY_HASH.to_string();
        let two = format!("{PAYMENT_KEY_HASH}{STAKE_KEY_HASH}");
        let cases = [
            (AddressType::BaseKeyKey, &two, true),
            (AddressType::BaseKeyKey, &one, true),
            (AddressType::BaseScriptKey, &two, true),
            (AddressType::BaseScriptKey, &one, false),
            (AddressType::BaseKeyScript, &one, false),
            (AddressType::BaseScriptScript, &one, false),
            (AddressType::EnterpriseKey, &one, true),
            (AddressType::EnterpriseKey, &two, false),
            (AddressType::EnterpriseScript, &two, false),
            (AddressType::RewardKey, &two, false),
            (AddressType::RewardScript, &two, false),
        ];

        for (address_type, body, accepted) in cases {
            let header = AddressHeader::new(address_type, Network::Mainnet).byte();
            let hex = format!("{header:02x}{body}");
            let result = hex_to_bech32(&hex, address_type.kind(), Network::Mainnet);
            if accepted {
                assert!(result.is_ok(), "{address_type} with {} bytes", body.len() / 2);
            } else {
                assert_eq!(
                    result,
                    Err(ConversionError::MalformedLength {
                        address_type,
                        got: body.len() / 2,
                    }),
                    "{address_type} with {} bytes",
                    body.len() / 2
                );
            }
        }
    }

    #[test]
    fn enterprise_header_with_two_credentials_is_rejected() {
        let hex = format!("61{PAYMENT_KEY_HASH}{PAYMENT_KEY_HASH}");
        assert_eq!(
            hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::MalformedLength {
                address_type: AddressType::EnterpriseKey,
                got: 56,
            })
        );
    }

    #[test]
    fn pointer_addresses() {
        let main = hex_to_bech32(
            &format!("41{PAYMENT_KEY_HASH}{POINTER_TAIL}"),
            AddressKind::Payment,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(main.as_str(), POINTER_MAINNET);
        assert_eq!(
            main.address.pointer,
            Some(Pointer {
                slot: 2498243,
                tx_index: 27,
                cert_index: 3,
            })
        );
        assert_eq!(main.address.credentials_hex(), vec![PAYMENT_KEY_HASH.to_string()]);

        let test = hex_to_bech32(
            &format!("40{PAYMENT_KEY_HASH}{POINTER_TAIL}"),
            AddressKind::Payment,
            Network::Testnet,
        )
        .unwrap();
        assert_eq!(test.as_str(), POINTER_TESTNET);

        let script = hex_to_bech32(
            &format!("51{PAYMENT_KEY_HASH}000000"),
            AddressKind::Payment,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(script.address.pointer, Some(Pointer::default()));
        assert_eq!(
            script.as_str(),
            "addr12x2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzersqqqqq68526e"
        );
    }

    #[test]
    fn pointer_header_needs_a_pointer() {
        assert_eq!(
            hex_to_bech32(
                &format!("41{PAYMENT_KEY_HASH}"),
                AddressKind::Payment,
                Network::Mainnet
            ),
            Err(ConversionError::InvalidPointer("missing"))
        );
        assert_eq!(
            hex_to_bech32(
                &format!("41{PAYMENT_KEY_HASH}8198"),
                AddressKind::Payment,
                Network::Mainnet
            ),
            Err(ConversionError::InvalidPointer("truncated"))
        );
        assert_eq!(
            hex_to_bech32("41aabb", AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::MalformedLength {
                address_type: AddressType::PointerKey,
                got: 2,
            })
        );
    }

    #[test]
    fn framed_pointer_address() {
        let addr = hex_to_bech32(
            &format!("0141{PAYMENT_KEY_HASH}{POINTER_TAIL}"),
            AddressKind::Payment,
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(addr.as_str(), POINTER_MAINNET);
    }

    #[test]
    fn empty_payment_hex_is_too_short() {
        assert_eq!(
            hex_to_bech32("", AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::Decode(DecodeError::TooShort))
        );
    }

    #[test]
    fn byron_tag_is_unknown() {
        let hex = format!("82{PAYMENT_KEY_HASH}");
        assert_eq!(
            hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::Decode(DecodeError::UnknownTag(0x8)))
        );
    }

    #[test]
    fn kind_must_match_header_type() {
        let hex = format!("e1{STAKE_KEY_HASH}");
        assert_eq!(
            hex_to_bech32(&hex, AddressKind::Payment, Network::Mainnet),
            Err(ConversionError::KindMismatch {
                kind: AddressKind::Payment,
                address_type: AddressType::RewardKey,
            })
        );

        let hex = format!("61{PAYMENT_KEY_HASH}");
        assert!(matches!(
            hex_to_bech32(&hex, AddressKind::Reward, Network::Mainnet),
            Err(ConversionError::KindMismatch { .. })
        ));
    }

    #[test]
    fn invalid_hex_is_reported() {
        assert!(matches!(
            hex_to_bech32("e1xyz0", AddressKind::Reward, Network::Mainnet),
            Err(ConversionError::Decode(DecodeError::InvalidHex(_)))
        ));
    }

    #[test]
    fn decode_cip19_vectors() {
        let base = decode_address(BASE_MAINNET).unwrap();
        assert_eq!(base.kind, AddressKind::Payment);
        assert_eq!(base.network, Network::Mainnet);
        assert_eq!(base.header.address_type, AddressType::BaseKeyKey);
        assert_eq!(
            base.credentials_hex(),
            vec![PAYMENT_KEY_HASH.to_string(), STAKE_KEY_HASH.to_string()]
        );

        let stake = decode_address(STAKE_TESTNET).unwrap();
        assert_eq!(stake.kind, AddressKind::Reward);
        assert_eq!(stake.network, Network::Testnet);
        assert_eq!(stake.to_hex(), format!("e0{STAKE_KEY_HASH}"));
    }

    #[test]
    fn decode_then_encode_is_byte_identical() {
        for s in [
            BASE_MAINNET,
            BASE_TESTNET,
            ENTERPRISE_MAINNET,
            ENTERPRISE_TESTNET,
            STAKE_MAINNET,
            STAKE_TESTNET,
            POINTER_MAINNET,
            POINTER_TESTNET,
        ] {
            let decoded = decode_address(s).unwrap();
            assert_eq!(decoded.to_string(), s);

            let again = hex_to_bech32(&decoded.to_hex(), decoded.kind, decoded.network).unwrap();
            assert_eq!(again.address, decoded);
        }
    }

    #[test]
    fn decode_pointer_vector() {
        let decoded = decode_address(POINTER_MAINNET).unwrap();
        assert_eq!(decoded.header.address_type, AddressType::PointerKey);
        assert_eq!(decoded.to_hex(), format!("41{PAYMENT_KEY_HASH}{POINTER_TAIL}"));
        assert_eq!(decoded.pointer.map(|p| p.slot), Some(2498243));
    }

    #[test]
    fn decode_rejects_foreign_hrp() {
        let other = codec::encode("stake_vkh", &hex::decode(STAKE_KEY_HASH).unwrap()).unwrap();
        assert_eq!(
            decode_address(&other),
            Err(ConversionError::UnknownHrp("stake_vkh".to_string()))
        );
    }

    #[test]
    fn decode_rejects_corrupted_checksum() {
        let mut corrupted = STAKE_MAINNET.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert_eq!(
            decode_address(&corrupted),
            Err(ConversionError::from(Bech32Error::BadChecksum))
        );
    }
}
