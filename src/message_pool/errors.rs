// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::chain::Error as ChainError;
use crate::key_management::Error as KeyError;
use thiserror::Error;

/// `MessagePool` error.
#[derive(Debug, Error)]
pub enum Error {
    /// Error indicating message that's too large
    #[error("Message is too big")]
    MessageTooBig,
    #[error("Not enough funds to execute transaction")]
    NotEnoughFunds,
    #[error("Invalid from address")]
    InvalidFromAddr,
    #[error("Gas limit must be positive")]
    InvalidGasLimit,
    #[error("Message value can't be negative")]
    NegativeValue,
    #[error("Failed to sign message: {0}")]
    Signing(#[from] KeyError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Encoding(#[from] fvm_ipld_encoding::Error),
    /// Message was admitted locally but peers did not accept it
    #[error("Failed to publish message: {0}")]
    Publication(String),
    #[error("Publication task ended without a result")]
    PublicationAbandoned,
}
