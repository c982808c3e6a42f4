// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Decoded state, method numbers and call parameters of the built-in actors
//! the deal connector talks to.

pub mod market;
pub mod miner;

pub const METHOD_CONSTRUCTOR: u64 = 1;
