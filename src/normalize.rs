//! Turning caller-supplied hex into raw address bytes.
//!
//! Two input conventions are recognized on top of plain hex:
//!
//! - Payment hex may carry a leading `"01"` framing marker added by an
//!   upstream wallet API. This marker is not part of the CIP-19 address
//!   format. Since `0x01` is also a legitimate header (mainnet base address),
//!   the marker is only stripped when the bytes are not a well-formed payment
//!   address as given but are one without it.
//! - Reward hex may be a bare 28-byte stake key hash. A `0xE0 | network`
//!   header is synthesized in front of it.

use tracing::debug;

use crate::address::is_well_formed;
use crate::error::DecodeError;
use crate::header::{AddressKind, AddressType, CREDENTIAL_LENGTH, Network};

/// Framing marker some wallet APIs put in front of payment address hex.
pub const PAYMENT_FRAMING_MARKER: &str = "01";

/// Shortest complete reward address: header plus one credential.
const REWARD_ADDRESS_LENGTH: usize = 1 + CREDENTIAL_LENGTH;

/// Decode `hex` into the raw bytes of an address of the given kind.
///
/// `network` is only consulted when a reward header has to be synthesized.
///
/// # Errors
/// Returns `DecodeError::InvalidHex` for odd-length input or non-hex characters.
pub fn normalize(hex: &str, kind: AddressKind, network: Network) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = hex::decode(hex)?;

    match kind {
        AddressKind::Payment => {
            if hex.starts_with(PAYMENT_FRAMING_MARKER)
                && !is_well_formed(&bytes, kind)
                && is_well_formed(&bytes[1..], kind)
            {
                debug!(len = bytes.len(), "stripping payment framing marker");
                bytes.remove(0);
            }
        }
        AddressKind::Reward => {
            if bytes.len() < REWARD_ADDRESS_LENGTH {
                let header = (AddressType::RewardKey.tag() << 4) | network.id();
                debug!(
                    len = bytes.len(),
                    header = %format_args!("0x{header:02X}"),
                    "synthesizing reward header for bare credential"
                );
                bytes.insert(0, header);
            }
        }
    }

    Ok(bytes)
}
