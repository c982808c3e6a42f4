// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub use fvm_shared4::address::{Address, Protocol};

use fvm_shared2::address::Address as AddressV2;

/// Storage market actor address.
pub const STORAGE_MARKET_ACTOR_ADDR: Address = Address::new_id(5);

/// Raised when address bytes from one namespace are not a valid address in
/// the other.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert address bytes 0x{bytes}: {reason}")]
pub struct ConversionError {
    bytes: String,
    reason: String,
}

impl ConversionError {
    fn new(bytes: &[u8], reason: impl ToString) -> Self {
        Self {
            bytes: hex::encode(bytes),
            reason: reason.to_string(),
        }
    }
}

/// Converts a storage market protocol address into a ledger address.
pub fn from_address_v2_to_v4(addr: &AddressV2) -> Result<Address, ConversionError> {
    let bytes = addr.to_bytes();
    Address::from_bytes(&bytes).map_err(|e| ConversionError::new(&bytes, e))
}

/// Converts a ledger address into a storage market protocol address.
pub fn from_address_v4_to_v2(addr: &Address) -> Result<AddressV2, ConversionError> {
    let bytes = addr.to_bytes();
    AddressV2::from_bytes(&bytes).map_err(|e| ConversionError::new(&bytes, e))
}
