//! Converting a payment and a reward address in one call.
//!
//! Each slot is converted on its own; a failure in one never discards the
//! other's result. [`ConversionRequest`] and [`ConversionResponse`] carry the
//! JSON shapes used by transport front ends.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::address::{Bech32Address, hex_to_bech32};
use crate::error::ConversionError;
use crate::header::{AddressKind, Network};

/// Outcome of converting one address slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotResult {
    /// Hex exactly as supplied
    pub hex: String,
    /// The converted address or why conversion failed
    pub outcome: Result<Bech32Address, ConversionError>,
}

impl SlotResult {
    fn convert(hex: &str, kind: AddressKind, network: Network) -> Self {
        let outcome = hex_to_bech32(hex, kind, network);
        match &outcome {
            Ok(addr) => debug!(%kind, bech32 = %addr, "converted"),
            Err(e) => info!(%kind, error = %e, "conversion failed"),
        }
        SlotResult {
            hex: hex.to_string(),
            outcome,
        }
    }

    /// Whether the slot converted.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-slot results of [`convert_addresses`].
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResult {
    /// Network every slot was encoded for
    pub network: Network,
    /// Present when a payment address was supplied
    pub payment: Option<SlotResult>,
    /// Present when a reward address was supplied
    pub reward: Option<SlotResult>,
}

/// Convert whichever of the two addresses were supplied.
///
/// Empty or whitespace-only strings count as not supplied.
///
/// # Errors
/// Returns `ConversionError::NoInputProvided` only if neither address was given.
/// Per-address failures are reported inside the returned [`BatchResult`].
pub fn convert_addresses(
    payment_hex: Option<&str>,
    reward_hex: Option<&str>,
    network: Network,
) -> Result<BatchResult, ConversionError> {
    let payment_hex = payment_hex.filter(|s| !s.trim().is_empty());
    let reward_hex = reward_hex.filter(|s| !s.trim().is_empty());

    if payment_hex.is_none() && reward_hex.is_none() {
        return Err(ConversionError::NoInputProvided);
    }

    Ok(BatchResult {
        network,
        payment: payment_hex.map(|hex| SlotResult::convert(hex, AddressKind::Payment, network)),
        reward: reward_hex.map(|hex| SlotResult::convert(hex, AddressKind::Reward, network)),
    })
}

fn default_network_id() -> u8 {
    1
}

/// JSON request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Hex payment address, optionally behind the `"01"` framing marker
    #[serde(default)]
    pub payment_hex_address: Option<String>,
    /// Hex reward address or bare stake key hash
    #[serde(default)]
    pub reward_hex_address: Option<String>,
    /// 0 = testnet, 1 = mainnet
    #[serde(default = "default_network_id")]
    pub network_id: u8,
}

impl ConversionRequest {
    /// Run the batch conversion this request describes.
    ///
    /// # Errors
    /// - `ConversionError::InvalidNetworkId` if `networkId` isn't 0 or 1
    /// - `ConversionError::NoInputProvided` if neither address is present
    pub fn convert(&self) -> Result<ConversionResponse, ConversionError> {
        let network = Network::try_from(self.network_id)?;
        let result = convert_addresses(
            self.payment_hex_address.as_deref(),
            self.reward_hex_address.as_deref(),
            network,
        )?;
        Ok(ConversionResponse::from(result))
    }
}

/// Hex input next to its Bech32 form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddressPair {
    /// Hex exactly as supplied
    pub hex: String,
    /// Bech32 encoding
    pub bech32: String,
}

/// JSON body of a (possibly partially) successful batch conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    /// Always `true`; per-slot failures go in the `*_error` fields
    pub success: bool,
    /// Network both slots were encoded for
    pub network: Network,
    /// Numeric form of `network`
    pub network_id: u8,
    /// Converted payment address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_address: Option<AddressPair>,
    /// Converted reward address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_address: Option<AddressPair>,
    /// Why the payment slot failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_error: Option<String>,
    /// Why the reward slot failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_error: Option<String>,
    /// Advisory header/network mismatches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<BatchResult> for ConversionResponse {
    fn from(result: BatchResult) -> Self {
        let mut response = ConversionResponse {
            success: true,
            network: result.network,
            network_id: result.network.id(),
            payment_address: None,
            reward_address: None,
            payment_error: None,
            reward_error: None,
            warnings: Vec::new(),
        };

        if let Some(slot) = result.payment {
            let (pair, error) = split_slot(slot, AddressKind::Payment, &mut response.warnings);
            response.payment_address = pair;
            response.payment_error = error;
        }
        if let Some(slot) = result.reward {
            let (pair, error) = split_slot(slot, AddressKind::Reward, &mut response.warnings);
            response.reward_address = pair;
            response.reward_error = error;
        }

        response
    }
}

fn split_slot(
    slot: SlotResult,
    kind: AddressKind,
    warnings: &mut Vec<String>,
) -> (Option<AddressPair>, Option<String>) {
    match slot.outcome {
        Ok(addr) => {
            if let Some(m) = addr.mismatch {
                warnings.push(format!("{kind} address: {m}"));
            }
            let pair = AddressPair {
                hex: slot.hex,
                bech32: addr.bech32,
            };
            (Some(pair), None)
        }
        Err(e) => (None, Some(format!("Failed to convert {kind} address: {e}"))),
    }
}

/// JSON body of a request that failed as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Generic category: `"Invalid request"` or `"Failed to convert addresses"`
    pub error: String,
    /// Text of the underlying error
    pub details: String,
}

impl ErrorResponse {
    /// Generic message plus the underlying error text.
    #[must_use]
    pub fn new(error: impl Into<String>, details: impl ToString) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
            details: details.to_string(),
        }
    }
}

impl From<&ConversionError> for ErrorResponse {
    fn from(e: &ConversionError) -> Self {
        let error = if e.is_request_error() {
            "Invalid request"
        } else {
            "Failed to convert addresses"
        };
        ErrorResponse::new(error, e)
    }
}
