// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;
mod keystore;
mod wallet;

pub use errors::Error;
pub use keystore::{KeyInfo, KeyStore};
pub use wallet::{Wallet, generate, new_address, sign, to_public};

use crate::shim::{address::Address, crypto::Signature};

/// Signs arbitrary bytes with the key controlling an address.
pub trait Signer: Send + Sync {
    fn sign_bytes(&self, data: &[u8], addr: &Address) -> Result<Signature, Error>;
}
