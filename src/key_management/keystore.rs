// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::errors::Error;
use crate::shim::{address::Address, crypto::SignatureType};
use ahash::HashMap;
use parking_lot::RwLock;

/// Private key with its signature scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyInfo {
    key_type: SignatureType,
    private_key: Vec<u8>,
}

impl std::fmt::Debug for KeyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyInfo")
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

impl KeyInfo {
    pub fn new(key_type: SignatureType, private_key: Vec<u8>) -> Self {
        KeyInfo {
            key_type,
            private_key,
        }
    }

    pub fn key_type(&self) -> SignatureType {
        self.key_type
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

/// In-memory key store, indexed by the address each key controls.
#[derive(Debug, Default)]
pub struct KeyStore {
    keys: RwLock<HashMap<Address, KeyInfo>>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: &Address) -> Result<KeyInfo, Error> {
        self.keys
            .read()
            .get(addr)
            .cloned()
            .ok_or_else(|| Error::NoKey(addr.to_string()))
    }

    pub fn put(&self, addr: Address, key_info: KeyInfo) -> Result<(), Error> {
        let mut keys = self.keys.write();
        if keys.contains_key(&addr) {
            return Err(Error::KeyExists);
        }
        keys.insert(addr, key_info);
        Ok(())
    }
}
