// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Key already exists in key store
    #[error("Key already exists")]
    KeyExists,
    #[error("Key not found for address {0}")]
    NoKey(String),
    #[error("{0}")]
    Other(String),
}
