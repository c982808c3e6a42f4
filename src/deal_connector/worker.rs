// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use crate::actors::miner;
use crate::blocks::TipsetKey;
use crate::chain::{ChainReader, ChainReaderExt as _};
use crate::shim::address::Address;
use async_trait::async_trait;

/// Resolves the worker account that signs a miner's messages.
#[async_trait]
pub trait WorkerGetter: Send + Sync {
    async fn worker(&self, miner: &Address, key: &TipsetKey) -> anyhow::Result<Address>;
}

/// Reads the worker from the miner actor's state.
pub struct StateWorkerGetter<C> {
    chain: Arc<C>,
}

impl<C> StateWorkerGetter<C> {
    pub fn new(chain: Arc<C>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl<C: ChainReader> WorkerGetter for StateWorkerGetter<C> {
    async fn worker(&self, miner: &Address, key: &TipsetKey) -> anyhow::Result<Address> {
        let state: miner::State = self.chain.get_actor_state_at(key, miner)?;
        Ok(state.info.worker)
    }
}
