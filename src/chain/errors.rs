// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::blocks::TipsetKey;
use crate::shim::address::Address;
use thiserror::Error;

/// Chain error
#[derive(Debug, Error)]
pub enum Error {
    /// Tipset is not known to the store
    #[error("Tipset {0} not found")]
    TipsetNotFound(TipsetKey),
    /// Actor for given address not found
    #[error("Actor for address: {0} does not exist")]
    ActorNotFound(Address),
    /// Stored actor state does not have the requested shape
    #[error("Failed to decode state of actor {addr}: {reason}")]
    Decode { addr: Address, reason: String },
    #[error(transparent)]
    Encoding(#[from] fvm_ipld_encoding::Error),
}
