//! Chain pointers carried by pointer addresses (header types 4 and 5).
//!
//! A pointer is three variable-length naturals (slot, transaction index,
//! certificate index). Each is written big-endian in 7-bit groups, with the
//! high bit set on every byte except the last.

use serde::Serialize;

use crate::error::ConversionError;

/// Location of the stake registration certificate a pointer address delegates to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pointer {
    /// Slot number
    pub slot: u64,
    /// Transaction index within the slot
    pub tx_index: u64,
    /// Certificate index within the transaction
    pub cert_index: u64,
}

impl Pointer {
    /// Parse the pointer tail of a pointer address.
    ///
    /// The tail must hold exactly three canonically encoded naturals.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidPointer` on a missing, truncated,
    /// overlong or padded tail.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConversionError> {
        if bytes.is_empty() {
            return Err(ConversionError::InvalidPointer("missing"));
        }

        let mut rest = bytes;
        let slot = read_natural(&mut rest)?;
        let tx_index = read_natural(&mut rest)?;
        let cert_index = read_natural(&mut rest)?;
        if !rest.is_empty() {
            return Err(ConversionError::InvalidPointer("trailing bytes"));
        }

        Ok(Pointer {
            slot,
            tx_index,
            cert_index,
        })
    }

    /// Byte form: the three naturals back to back.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for value in [self.slot, self.tx_index, self.cert_index] {
            write_natural(value, &mut out);
        }
        out
    }
}

fn read_natural(bytes: &mut &[u8]) -> Result<u64, ConversionError> {
    let input = *bytes;
    let mut value: u64 = 0;
    for (i, &byte) in input.iter().enumerate() {
        // a leading zero group would give the same number a second encoding
        if i == 0 && byte == 0x80 {
            return Err(ConversionError::InvalidPointer("non-canonical natural"));
        }
        if value.leading_zeros() < 7 {
            return Err(ConversionError::InvalidPointer("natural overflows 64 bits"));
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            *bytes = &input[i + 1..];
            return Ok(value);
        }
    }
    Err(ConversionError::InvalidPointer("truncated"))
}

fn write_natural(mut value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cip19_pointer() {
        let bytes = hex::decode("8198bd431b03").unwrap();
        let pointer = Pointer::from_bytes(&bytes).unwrap();
        assert_eq!(
            pointer,
            Pointer {
                slot: 2498243,
                tx_index: 27,
                cert_index: 3,
            }
        );
        assert_eq!(pointer.to_bytes(), bytes);
    }

    #[test]
    fn zero_pointer_is_three_bytes() {
        let pointer = Pointer::from_bytes(&[0, 0, 0]).unwrap();
        assert_eq!(pointer, Pointer::default());
        assert_eq!(pointer.to_bytes(), vec![0, 0, 0]);
    }

    #[test]
    fn max_values_survive() {
        let pointer = Pointer {
            slot: u64::MAX,
            tx_index: 1 << 7,
            cert_index: 127,
        };
        assert_eq!(Pointer::from_bytes(&pointer.to_bytes()).unwrap(), pointer);
    }

    #[test]
    fn malformed_tails() {
        assert_eq!(
            Pointer::from_bytes(&[]),
            Err(ConversionError::InvalidPointer("missing"))
        );
        assert_eq!(
            Pointer::from_bytes(&[0x01, 0x02]),
            Err(ConversionError::InvalidPointer("truncated"))
        );
        assert_eq!(
            Pointer::from_bytes(&[0x01, 0x02, 0x83]),
            Err(ConversionError::InvalidPointer("truncated"))
        );
        assert_eq!(
            Pointer::from_bytes(&[0x01, 0x02, 0x03, 0x04]),
            Err(ConversionError::InvalidPointer("trailing bytes"))
        );
        assert_eq!(
            Pointer::from_bytes(&[0x80, 0x01, 0x02, 0x03]),
            Err(ConversionError::InvalidPointer("non-canonical natural"))
        );
        let mut overlong = vec![0xFF; 10];
        overlong.extend([0x7F, 0x00, 0x00]);
        assert_eq!(
            Pointer::from_bytes(&overlong),
            Err(ConversionError::InvalidPointer("natural overflows 64 bits"))
        );
    }
}
