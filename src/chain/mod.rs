// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;
pub mod store;
#[cfg(test)]
mod tests;

pub use self::errors::Error;
pub use self::store::{ActorState, ChainStore, StateTree};

use std::sync::Arc;

use crate::blocks::{Tipset, TipsetKey};
use crate::message::{Receipt, SignedMessage};
use crate::shim::address::Address;
use cid::Cid;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast::Receiver as Subscriber;

/// `Enum` for `pubsub` channel that defines message type variant and data
/// contained in message type.
#[derive(Clone, Debug)]
pub enum HeadChange {
    Apply(Arc<Tipset>),
}

/// A message included in a tipset, with the receipt of its execution.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutedMessage {
    pub cid: Cid,
    pub message: SignedMessage,
    pub receipt: Receipt,
}

/// Read-only access to actor state at a given chain snapshot.
pub trait ChainReader: Send + Sync {
    /// Key of the current heaviest tipset.
    fn head(&self) -> TipsetKey;

    fn get_tipset(&self, key: &TipsetKey) -> Result<Arc<Tipset>, Error>;

    /// Actor at `addr` in the state of the tipset `key`, `None` if the actor
    /// does not exist there.
    fn get_actor(&self, key: &TipsetKey, addr: &Address) -> Result<Option<ActorState>, Error>;
}

/// Typed state reads on top of [`ChainReader`].
pub trait ChainReaderExt: ChainReader {
    fn get_required_actor(&self, key: &TipsetKey, addr: &Address) -> Result<ActorState, Error> {
        self.get_actor(key, addr)?
            .ok_or(Error::ActorNotFound(*addr))
    }

    /// Decodes the state of the actor at `addr` into `S`. A shape mismatch
    /// is reported as [`Error::Decode`] and is not worth retrying.
    fn get_actor_state_at<S: DeserializeOwned>(
        &self,
        key: &TipsetKey,
        addr: &Address,
    ) -> Result<S, Error> {
        let actor = self.get_required_actor(key, addr)?;
        fvm_ipld_encoding::from_slice(&actor.state).map_err(|e| Error::Decode {
            addr: *addr,
            reason: e.to_string(),
        })
    }
}

impl<T: ChainReader + ?Sized> ChainReaderExt for T {}

/// Confirmed history of the chain, and notification of new heads.
pub trait ChainHistory: Send + Sync {
    fn heaviest_tipset(&self) -> Arc<Tipset>;

    fn load_tipset(&self, key: &TipsetKey) -> Result<Arc<Tipset>, Error>;

    /// Messages included in `tipset`, in inclusion order, with their receipts.
    fn executed_messages(&self, tipset: &Tipset) -> Result<Arc<Vec<ExecutedMessage>>, Error>;

    fn subscribe_head_changes(&self) -> Subscriber<HeadChange>;
}
