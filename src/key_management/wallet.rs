// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{KeyInfo, KeyStore, Signer, errors::Error};
use crate::shim::{
    address::Address,
    crypto::{Signature, SignatureType},
};
use crate::utils::encoding::blake2b_256;
use bls_signatures::{PrivateKey as BlsPrivate, Serialize as _};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint as _;
use rand::rngs::OsRng;

/// Return the public key for a given private key and `SignatureType`
pub fn to_public(sig_type: SignatureType, private_key: &[u8]) -> Result<Vec<u8>, Error> {
    match sig_type {
        SignatureType::Bls => Ok(BlsPrivate::from_bytes(private_key)
            .map_err(|err| Error::Other(err.to_string()))?
            .public_key()
            .as_bytes()),
        SignatureType::Secp256k1 => {
            let private_key = SigningKey::from_slice(private_key)
                .map_err(|err| Error::Other(err.to_string()))?;
            let public_key = private_key.verifying_key().to_encoded_point(false);
            Ok(public_key.as_bytes().to_vec())
        }
    }
}

/// Return a new Address that is of a given `SignatureType` and uses the
/// supplied public key
pub fn new_address(sig_type: SignatureType, public_key: &[u8]) -> Result<Address, Error> {
    match sig_type {
        SignatureType::Bls => {
            Address::new_bls(public_key).map_err(|err| Error::Other(err.to_string()))
        }
        SignatureType::Secp256k1 => {
            Address::new_secp256k1(public_key).map_err(|err| Error::Other(err.to_string()))
        }
    }
}

/// Sign takes in `SignatureType`, private key and message. Returns a
/// Signature for that message
pub fn sign(sig_type: SignatureType, private_key: &[u8], msg: &[u8]) -> Result<Signature, Error> {
    match sig_type {
        SignatureType::Bls => {
            let priv_key =
                BlsPrivate::from_bytes(private_key).map_err(|err| Error::Other(err.to_string()))?;
            let sig = priv_key.sign(msg);
            Ok(Signature::new_bls(sig.as_bytes()))
        }
        SignatureType::Secp256k1 => {
            let priv_key = SigningKey::from_slice(private_key)
                .map_err(|err| Error::Other(err.to_string()))?;
            let msg_hash = blake2b_256(msg);
            let (sig, recovery_id) = priv_key
                .sign_prehash_recoverable(&msg_hash)
                .map_err(|err| Error::Other(err.to_string()))?;
            let mut new_bytes = [0; 65];
            new_bytes[..64].copy_from_slice(&sig.to_bytes());
            new_bytes[64] = recovery_id.to_byte();
            Ok(Signature::new_secp256k1(new_bytes.to_vec()))
        }
    }
}

/// Generate a new private key
pub fn generate(sig_type: SignatureType) -> Vec<u8> {
    let rng = &mut OsRng;
    match sig_type {
        SignatureType::Bls => BlsPrivate::generate(rng).as_bytes(),
        SignatureType::Secp256k1 => SigningKey::random(rng).to_bytes().to_vec(),
    }
}

/// A wallet is a collection of private keys which can be used to sign
/// messages on behalf of the addresses they control.
#[derive(Debug, Default)]
pub struct Wallet {
    keystore: KeyStore,
}

impl Wallet {
    pub fn new(keystore: KeyStore) -> Self {
        Self { keystore }
    }

    /// Generates a new key of the given type and returns its address.
    pub fn generate_addr(&self, sig_type: SignatureType) -> Result<Address, Error> {
        self.import(KeyInfo::new(sig_type, generate(sig_type)))
    }

    /// Adds a key to the wallet and returns the address it controls.
    pub fn import(&self, key_info: KeyInfo) -> Result<Address, Error> {
        let public_key = to_public(key_info.key_type(), key_info.private_key())?;
        let addr = new_address(key_info.key_type(), &public_key)?;
        self.keystore.put(addr, key_info)?;
        Ok(addr)
    }

    pub fn has_key(&self, addr: &Address) -> bool {
        self.keystore.get(addr).is_ok()
    }
}

impl Signer for Wallet {
    fn sign_bytes(&self, data: &[u8], addr: &Address) -> Result<Signature, Error> {
        let key_info = self.keystore.get(addr)?;
        sign(key_info.key_type(), key_info.private_key(), data)
    }
}
