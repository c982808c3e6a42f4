// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::chain::Error as ChainError;
use crate::key_management::Error as KeyError;
use crate::market::{Address, DealID};
use crate::message_pool::Error as MpoolError;
use crate::shim::{address::ConversionError, error::ExitCode};
use crate::state_manager::Error as WaitError;
use cid::Cid;
use thiserror::Error;

/// Storage provider node error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    AddressConversion(#[from] ConversionError),
    #[error("Failed to encode call data: {0}")]
    Encoding(#[from] fvm_ipld_encoding::Error),
    /// Proposal terms that have no ledger representation
    #[error("Invalid deal proposal: {0}")]
    InvalidProposal(String),
    #[error("No deals for {0}")]
    NoDeals(Address),
    #[error("Could not find deal for id {0}")]
    DealNotFound(DealID),
    #[error("Deal {0} is not in any pre-committed sector")]
    DealNotInSector(DealID),
    /// On-chain deal whose terms cannot be expressed in the market protocol
    #[error("Deal {deal_id} has malformed terms: {reason}")]
    MalformedDeal { deal_id: DealID, reason: String },
    /// Message was rejected before it left this node
    #[error("Failed to submit message: {0}")]
    Submission(#[source] MpoolError),
    /// Message was admitted locally but could not be propagated
    #[error(transparent)]
    Publication(MpoolError),
    #[error("Message {cid} failed on chain with exit code {}", .exit_code.value())]
    ExecutionFailed { cid: Cid, exit_code: ExitCode },
    #[error("Successful call to publish storage deals did not return deal ids")]
    NoDealIds,
    #[error("Timed out waiting for message {0}")]
    Timeout(Cid),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Head change subscription closed")]
    ChainClosed,
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("Failed to resolve miner worker: {0:#}")]
    Worker(anyhow::Error),
    #[error("Failed to sign: {0}")]
    Signing(#[from] KeyError),
    #[error("Failed to seal piece: {0:#}")]
    Sealing(anyhow::Error),
}

impl From<WaitError> for Error {
    fn from(e: WaitError) -> Self {
        match e {
            WaitError::Cancelled => Error::Cancelled,
            WaitError::ChainClosed => Error::ChainClosed,
            WaitError::Chain(e) => Error::Chain(e),
        }
    }
}
