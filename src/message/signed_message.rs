// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Message, message_cid};
use crate::shim::crypto::{Signature, SignatureType};
use crate::utils::cid::CidCborExt as _;
use cid::Cid;
use fvm_ipld_encoding::tuple::*;

/// Represents a wrapped message with signature bytes.
#[derive(PartialEq, Clone, Debug, Serialize_tuple, Deserialize_tuple)]
pub struct SignedMessage {
    pub message: Message,
    pub signature: Signature,
}

impl SignedMessage {
    /// Generate a new signed message from fields.
    /// The signature will not be verified.
    pub fn new_unchecked(message: Message, signature: Signature) -> SignedMessage {
        SignedMessage { message, signature }
    }

    /// Checks if the signed message is a BLS message.
    pub fn is_bls(&self) -> bool {
        self.signature.signature_type() == SignatureType::Bls
    }

    // BLS messages are identified by the unsigned message, because their
    // signatures are aggregated away in blocks.
    pub fn cid(&self) -> Result<Cid, fvm_ipld_encoding::Error> {
        if self.is_bls() {
            message_cid(&self.message)
        } else {
            Cid::from_cbor_blake2b256(self)
        }
    }
}
