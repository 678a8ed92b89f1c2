//! General-purpose Bech32 (BIP-173) codec.
//!
//! Knows nothing about Cardano: it turns an HRP plus a byte payload into a
//! checksummed string and back. Length is bounded by the Bech32 code length
//! (1023 characters) rather than the 90 characters of segwit addresses, since
//! Shelley base addresses run past 100 characters.

use bech32::primitives::decode::UncheckedHrpstring;
use bech32::{Bech32, Hrp};

use crate::error::Bech32Error;

/// Separator between the HRP and the data part.
const SEPARATOR: char = '1';

/// Characters of checksum at the end of the data part.
const CHECKSUM_LENGTH: usize = 6;

/// Longest data part the Bech32 checksum is defined for.
const CODE_LENGTH: usize = 1023;

/// BIP-173 vector with an empty payload, used by [`self_check`].
const SELF_CHECK_VECTOR: &str = "a12uel5l";

/// Encode `payload` under `hrp` with a Bech32 checksum.
///
/// Output is always lowercase.
///
/// # Errors
/// - `Bech32Error::InvalidHrp` if the HRP is empty, too long or not printable ASCII
/// - `Bech32Error::Encode` if the result would exceed the code length
pub fn encode(hrp: &str, payload: &[u8]) -> Result<String, Bech32Error> {
    let hrp = Hrp::parse(hrp).map_err(|e| Bech32Error::InvalidHrp(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, payload).map_err(|e| Bech32Error::Encode(e.to_string()))
}

/// Decode a Bech32 string into its lowercase HRP and byte payload.
///
/// # Errors
/// - `Bech32Error::MixedCase` if upper and lower case letters are mixed
/// - `Bech32Error::Malformed` on a missing separator, invalid characters or a
///   data part too short or too long to carry a checksum
/// - `Bech32Error::BadChecksum` if the checksum does not verify
pub fn decode(s: &str) -> Result<(String, Vec<u8>), Bech32Error> {
    if is_mixed_case(s) {
        return Err(Bech32Error::MixedCase);
    }

    let unchecked =
        UncheckedHrpstring::new(s).map_err(|e| Bech32Error::Malformed(e.to_string()))?;
    let data_len = s.rsplit_once(SEPARATOR).map_or(0, |(_, data)| data.len());
    if data_len < CHECKSUM_LENGTH {
        return Err(Bech32Error::Malformed(format!(
            "data part of {data_len} characters cannot hold a checksum"
        )));
    }
    if data_len > CODE_LENGTH {
        return Err(Bech32Error::Malformed(format!(
            "data part of {data_len} characters exceeds the code length"
        )));
    }
    let checked = unchecked
        .validate_and_remove_checksum::<Bech32>()
        .map_err(|_| Bech32Error::BadChecksum)?;

    let hrp = checked.hrp().as_str().to_ascii_lowercase();
    let payload = checked.byte_iter().collect();
    Ok((hrp, payload))
}

/// Verify the codec against a known vector.
///
/// Run once at startup; a failure means the primitive is unusable and no
/// conversion should be attempted.
///
/// # Errors
/// Returns the first codec error, or `Bech32Error::SelfCheck` if the vector
/// does not re-encode to itself.
pub fn self_check() -> Result<(), Bech32Error> {
    let (hrp, payload) = decode(SELF_CHECK_VECTOR)?;
    let reencoded = encode(&hrp, &payload)?;
    if reencoded != SELF_CHECK_VECTOR {
        return Err(Bech32Error::SelfCheck(reencoded));
    }

    // a corrupted vector must be refused
    match decode("a12uel5m") {
        Err(Bech32Error::BadChecksum) => Ok(()),
        Err(e) => Err(e),
        Ok((hrp, _)) => Err(Bech32Error::SelfCheck(hrp)),
    }
}

fn is_mixed_case(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_lowercase()) && s.chars().any(|c| c.is_ascii_uppercase())
}
