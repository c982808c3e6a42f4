// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Storage provider node for the storage market, backed by a Filecoin chain.

pub mod actors;
pub mod blocks;
pub mod chain;
pub mod cli_shared;
pub mod deal_connector;
pub mod key_management;
pub mod market;
pub mod message;
pub mod message_pool;
pub mod piece_manager;
pub mod shim;
pub mod state_manager;
pub mod utils;

pub use deal_connector::{ConnectorConfig, StorageProviderNodeConnector};
