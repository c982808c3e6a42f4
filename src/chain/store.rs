// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use super::{ChainHistory, ChainReader, Error, ExecutedMessage, HeadChange};
use crate::blocks::{Tipset, TipsetKey};
use crate::message::{Receipt, SignedMessage};
use crate::shim::{address::Address, econ::TokenAmount};
use ahash::{HashMap, HashMapExt as _};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::broadcast::{self, Receiver as Subscriber, Sender as Publisher};
use tracing::debug;

// A cap on the size of the future_sink
const SINK_CAP: usize = 200;

/// State of a single actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorState {
    /// Sequence of the next message the actor may send.
    pub sequence: u64,
    pub balance: TokenAmount,
    /// CBOR-encoded actor state.
    pub state: Vec<u8>,
}

impl ActorState {
    pub fn new<S: Serialize>(balance: TokenAmount, state: &S) -> Result<Self, Error> {
        Ok(Self {
            sequence: 0,
            balance,
            state: fvm_ipld_encoding::to_vec(state)?,
        })
    }

    /// Account actors carry no state of their own.
    pub fn account(balance: TokenAmount) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }
}

/// Actors by address, as of one tipset.
#[derive(Clone, Debug, Default)]
pub struct StateTree {
    actors: HashMap<Address, ActorState>,
}

impl StateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_actor(&self, addr: &Address) -> Option<&ActorState> {
        self.actors.get(addr)
    }

    pub fn set_actor(&mut self, addr: Address, actor: ActorState) {
        self.actors.insert(addr, actor);
    }

    /// Replaces the state of the actor at `addr`, creating an empty actor if
    /// there is none.
    pub fn set_state<S: Serialize>(&mut self, addr: Address, state: &S) -> Result<(), Error> {
        let encoded = fvm_ipld_encoding::to_vec(state)?;
        self.actors.entry(addr).or_default().state = encoded;
        Ok(())
    }

    fn bump_sequence(&mut self, addr: &Address, sequence: u64) {
        if let Some(actor) = self.actors.get_mut(addr) {
            actor.sequence = actor.sequence.max(sequence + 1);
        }
    }
}

/// In-memory chain: every applied tipset with its state and executed
/// messages, plus a publisher of head changes. All caches are behind locks so
/// a consistent `ChainStore` can be shared across tasks.
pub struct ChainStore {
    /// Publisher for head change events
    publisher: Publisher<HeadChange>,
    tipsets: RwLock<HashMap<TipsetKey, Arc<Tipset>>>,
    states: RwLock<HashMap<TipsetKey, Arc<StateTree>>>,
    messages: RwLock<HashMap<TipsetKey, Arc<Vec<ExecutedMessage>>>>,
    heaviest: RwLock<Arc<Tipset>>,
    apply_lock: Mutex<()>,
}

impl ChainStore {
    pub fn new(genesis_state: StateTree) -> Result<Self, Error> {
        let (publisher, _) = broadcast::channel(SINK_CAP);
        let genesis = Arc::new(Tipset::new(TipsetKey::default(), 0, vec![])?);
        let key = genesis.key().clone();

        let mut tipsets = HashMap::new();
        tipsets.insert(key.clone(), genesis.clone());
        let mut states = HashMap::new();
        states.insert(key.clone(), Arc::new(genesis_state));
        let mut messages = HashMap::new();
        messages.insert(key, Arc::new(vec![]));

        Ok(Self {
            publisher,
            tipsets: RwLock::new(tipsets),
            states: RwLock::new(states),
            messages: RwLock::new(messages),
            heaviest: RwLock::new(genesis),
            apply_lock: Mutex::new(()),
        })
    }

    pub fn state(&self, key: &TipsetKey) -> Result<Arc<StateTree>, Error> {
        self.states
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::TipsetNotFound(key.clone()))
    }

    /// State of the heaviest tipset, as a starting point for the next one.
    pub fn head_state(&self) -> Result<StateTree, Error> {
        let head = self.heaviest_tipset();
        Ok(self.state(head.key())?.as_ref().clone())
    }

    /// Mines a tipset on top of the current head that includes `messages`
    /// and leaves the chain in `state`, then announces it as the new head.
    /// Sender sequences are advanced past the included messages.
    pub fn apply_tipset(
        &self,
        mut state: StateTree,
        messages: Vec<(SignedMessage, Receipt)>,
    ) -> Result<Arc<Tipset>, Error> {
        let _guard = self.apply_lock.lock();
        let parent = self.heaviest_tipset();

        let executed = messages
            .into_iter()
            .map(|(message, receipt)| -> Result<ExecutedMessage, Error> {
                state.bump_sequence(&message.message.from, message.message.sequence);
                Ok(ExecutedMessage {
                    cid: message.cid()?,
                    message,
                    receipt,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let tipset = Arc::new(Tipset::new(
            parent.key().clone(),
            parent.epoch() + 1,
            executed.iter().map(|m| m.cid).collect(),
        )?);
        let key = tipset.key().clone();

        self.tipsets.write().insert(key.clone(), tipset.clone());
        self.states.write().insert(key.clone(), Arc::new(state));
        self.messages.write().insert(key, Arc::new(executed));
        *self.heaviest.write() = tipset.clone();

        if self
            .publisher
            .send(HeadChange::Apply(tipset.clone()))
            .is_err()
        {
            debug!("did not publish head change, no active receivers");
        }
        Ok(tipset)
    }
}

impl ChainReader for ChainStore {
    fn head(&self) -> TipsetKey {
        self.heaviest.read().key().clone()
    }

    fn get_tipset(&self, key: &TipsetKey) -> Result<Arc<Tipset>, Error> {
        self.load_tipset(key)
    }

    fn get_actor(&self, key: &TipsetKey, addr: &Address) -> Result<Option<ActorState>, Error> {
        Ok(self.state(key)?.get_actor(addr).cloned())
    }
}

impl ChainHistory for ChainStore {
    fn heaviest_tipset(&self) -> Arc<Tipset> {
        self.heaviest.read().clone()
    }

    fn load_tipset(&self, key: &TipsetKey) -> Result<Arc<Tipset>, Error> {
        self.tipsets
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::TipsetNotFound(key.clone()))
    }

    fn executed_messages(&self, tipset: &Tipset) -> Result<Arc<Vec<ExecutedMessage>>, Error> {
        self.messages
            .read()
            .get(tipset.key())
            .cloned()
            .ok_or_else(|| Error::TipsetNotFound(tipset.key().clone()))
    }

    fn subscribe_head_changes(&self) -> Subscriber<HeadChange> {
        self.publisher.subscribe()
    }
}
