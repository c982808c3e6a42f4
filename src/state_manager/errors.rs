// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::chain::Error as ChainError;
use thiserror::Error;

/// State manager error
#[derive(Debug, Error)]
pub enum Error {
    /// The waiting caller gave up before a match was seen
    #[error("Wait was cancelled")]
    Cancelled,
    /// Head change publisher went away while waiting
    #[error("Head change subscription closed")]
    ChainClosed,
    #[error(transparent)]
    Chain(#[from] ChainError),
}
