// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use super::{Error, GasParams, MessagePublisher, MessageSubmitter, MpoolConfig, PublicationSignal};
use crate::chain::ChainReader;
use crate::key_management::Signer;
use crate::message::{Message, MethodNum, SignedMessage, message_cid};
use crate::shim::{address::Address, econ::TokenAmount};
use ahash::HashMap;
use async_trait::async_trait;
use cid::Cid;
use fvm_ipld_encoding::RawBytes;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Local sender of messages: validates, sequences and signs them, then hands
/// them to a [`MessagePublisher`] in the background.
pub struct Outbox<C> {
    chain: Arc<C>,
    signer: Arc<dyn Signer>,
    publisher: Arc<dyn MessagePublisher>,
    config: MpoolConfig,
    /// Messages sent from local addresses, ordered by sequence.
    pending: Mutex<HashMap<Address, Vec<SignedMessage>>>,
}

impl<C: ChainReader> Outbox<C> {
    pub fn new(
        chain: Arc<C>,
        signer: Arc<dyn Signer>,
        publisher: Arc<dyn MessagePublisher>,
        config: MpoolConfig,
    ) -> Self {
        Self {
            chain,
            signer,
            publisher,
            config,
            pending: Default::default(),
        }
    }

    /// Messages sent from `addr` that the chain has not yet accounted for.
    pub fn pending_for(&self, addr: &Address) -> Vec<SignedMessage> {
        self.pending.lock().get(addr).cloned().unwrap_or_default()
    }

    fn push(&self, message: Message) -> Result<SignedMessage, Error> {
        if message.value.is_negative() {
            return Err(Error::NegativeValue);
        }
        if message.gas_limit == 0 {
            return Err(Error::InvalidGasLimit);
        }

        let head = self.chain.head();
        let actor = self
            .chain
            .get_actor(&head, &message.from)?
            .ok_or(Error::InvalidFromAddr)?;
        let required_funds = TokenAmount::from_atto(
            message.value.atto() + message.gas_fee_cap.atto() * message.gas_limit,
        );
        if actor.balance < required_funds {
            return Err(Error::NotEnoughFunds);
        }

        // The lock spans sequence assignment and recording so concurrent
        // sends from one address never share a sequence.
        let mut pending = self.pending.lock();
        let mset = pending.entry(message.from).or_default();
        mset.retain(|m| m.message.sequence >= actor.sequence);
        let sequence = mset
            .last()
            .map_or(actor.sequence, |m| m.message.sequence + 1)
            .max(actor.sequence);

        let message = Message {
            sequence,
            ..message
        };
        let cid = message_cid(&message)?;
        let signature = self.signer.sign_bytes(&cid.to_bytes(), &message.from)?;
        let signed = SignedMessage::new_unchecked(message, signature);

        if fvm_ipld_encoding::to_vec(&signed)?.len() > self.config.max_message_size {
            return Err(Error::MessageTooBig);
        }
        mset.push(signed.clone());
        Ok(signed)
    }
}

#[async_trait]
impl<C: ChainReader + 'static> MessageSubmitter for Outbox<C> {
    async fn send(
        &self,
        from: Address,
        to: Address,
        value: TokenAmount,
        gas: &GasParams,
        method_num: MethodNum,
        params: RawBytes,
    ) -> Result<(Cid, PublicationSignal), Error> {
        let signed = self.push(Message {
            version: 0,
            from,
            to,
            sequence: 0,
            value,
            method_num,
            params,
            gas_limit: gas.limit,
            gas_fee_cap: gas.fee_cap.clone(),
            gas_premium: gas.premium.clone(),
        })?;
        let cid = signed.cid()?;
        debug!(%cid, %from, %to, method_num, sequence = signed.message.sequence, "message admitted");

        let (tx, rx) = oneshot::channel();
        let publisher = self.publisher.clone();
        tokio::spawn(async move {
            let result = publisher.publish(&signed).await.map_err(|e| {
                warn!(%cid, "failed to publish message: {e:#}");
                Error::Publication(e.to_string())
            });
            if tx.send(result).is_err() {
                debug!(%cid, "publication result dropped, no one is waiting");
            }
        });
        Ok((cid, PublicationSignal::new(rx)))
    }
}
