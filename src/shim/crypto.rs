// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_ipld_encoding::{de, ser, strict_bytes};
use fvm_shared2::crypto::signature::Signature as SignatureV2;
use num::FromPrimitive;
use num_derive::FromPrimitive;
use std::borrow::Cow;

/// Signature variants for Filecoin signatures.
#[derive(Clone, Debug, PartialEq, FromPrimitive, Copy, Eq, Hash)]
#[repr(u8)]
pub enum SignatureType {
    Secp256k1 = 1,
    Bls = 2,
}

impl SignatureType {
    /// Type tag of a storage market protocol signature.
    pub fn from_market(sig: &SignatureV2) -> Option<Self> {
        Self::from_u8(sig.sig_type as u8)
    }
}

/// A cryptographic signature, represented in bytes, of any key protocol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub sig_type: SignatureType,
    pub bytes: Vec<u8>,
}

impl ser::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut bytes = Vec::with_capacity(self.bytes.len() + 1);
        // Insert signature type byte
        bytes.push(self.sig_type as u8);
        bytes.extend_from_slice(&self.bytes);

        strict_bytes::Serialize::serialize(&bytes, serializer)
    }
}

impl<'de> de::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let bytes: Cow<'de, [u8]> = strict_bytes::Deserialize::deserialize(deserializer)?;
        match bytes.split_first() {
            None => Err(de::Error::custom("Cannot deserialize empty bytes")),
            Some((&sig_byte, rest)) => {
                let sig_type = SignatureType::from_u8(sig_byte).ok_or_else(|| {
                    de::Error::custom(format!(
                        "Invalid signature type byte (must be 1 or 2), was {sig_byte}"
                    ))
                })?;

                Ok(Signature {
                    bytes: rest.to_vec(),
                    sig_type,
                })
            }
        }
    }
}

impl Signature {
    /// Creates a BLS Signature given the raw bytes.
    pub fn new_bls(bytes: Vec<u8>) -> Self {
        Self {
            sig_type: SignatureType::Bls,
            bytes,
        }
    }

    /// Creates a SECP Signature given the raw bytes.
    pub fn new_secp256k1(bytes: Vec<u8>) -> Self {
        Self {
            sig_type: SignatureType::Secp256k1,
            bytes,
        }
    }

    /// Converts a storage market protocol signature, keeping its type tag.
    pub fn from_market(sig: &SignatureV2) -> Option<Self> {
        SignatureType::from_market(sig).map(|sig_type| Self {
            sig_type,
            bytes: sig.bytes.clone(),
        })
    }

    /// Re-tags the raw bytes for the storage market protocol.
    pub fn into_market(self) -> SignatureV2 {
        match self.sig_type {
            SignatureType::Bls => SignatureV2::new_bls(self.bytes),
            SignatureType::Secp256k1 => SignatureV2::new_secp256k1(self.bytes),
        }
    }

    pub fn signature_type(&self) -> SignatureType {
        self.sig_type
    }

    /// Returns reference to signature bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_signature_type_is_preserved() {
        let bls = Signature::new_bls(vec![1, 2, 3]).into_market();
        assert_eq!(SignatureType::from_market(&bls), Some(SignatureType::Bls));
        let secp = Signature::new_secp256k1(vec![4; 65]).into_market();
        let back = Signature::from_market(&secp).unwrap();
        assert_eq!(back, Signature::new_secp256k1(vec![4; 65]));
    }

    #[test]
    fn empty_signature_bytes_are_rejected() {
        let encoded = fvm_ipld_encoding::to_vec(&fvm_ipld_encoding::BytesSer(&[])).unwrap();
        assert!(fvm_ipld_encoding::from_slice::<Signature>(&encoded).is_err());
    }

    #[test]
    fn signature_type_byte_leads_encoding() {
        let sig = Signature::new_bls(vec![9; 96]);
        let encoded = fvm_ipld_encoding::to_vec(&sig).unwrap();
        let decoded: Signature = fvm_ipld_encoding::from_slice(&encoded).unwrap();
        assert_eq!(decoded, sig);
    }
}
