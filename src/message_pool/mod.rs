// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod config;
mod errors;
mod outbox;

pub use self::{config::MpoolConfig, errors::Error, outbox::Outbox};

use crate::message::{MethodNum, SignedMessage};
use crate::shim::{address::Address, econ::TokenAmount};
use async_trait::async_trait;
use cid::Cid;
use fvm_ipld_encoding::RawBytes;
use tokio::sync::oneshot;

/// Gas pricing of an outgoing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasParams {
    pub fee_cap: TokenAmount,
    pub premium: TokenAmount,
    pub limit: u64,
}

/// Resolves once a locally admitted message has been handed to the network.
#[derive(Debug)]
pub struct PublicationSignal(oneshot::Receiver<Result<(), Error>>);

impl PublicationSignal {
    pub fn new(rx: oneshot::Receiver<Result<(), Error>>) -> Self {
        Self(rx)
    }

    /// A signal that is already resolved with `result`.
    pub fn resolved(result: Result<(), Error>) -> Self {
        let (tx, rx) = oneshot::channel();
        // the receiver is held right here
        let _ = tx.send(result);
        Self(rx)
    }

    pub async fn wait(self) -> Result<(), Error> {
        self.0.await.unwrap_or(Err(Error::PublicationAbandoned))
    }
}

/// Admits signed messages for inclusion on chain.
#[async_trait]
pub trait MessageSubmitter: Send + Sync {
    /// Signs and admits a message from `from`. Returns the message id and a
    /// signal for its propagation. Fails only on local validation.
    async fn send(
        &self,
        from: Address,
        to: Address,
        value: TokenAmount,
        gas: &GasParams,
        method_num: MethodNum,
        params: RawBytes,
    ) -> Result<(Cid, PublicationSignal), Error>;
}

/// Propagates admitted messages to the network.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, msg: &SignedMessage) -> anyhow::Result<()>;
}
