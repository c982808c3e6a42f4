// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;
mod matcher;

pub use self::errors::Error;
pub use self::matcher::{MessageCidMatcher, MessageMatcher, SectorCommitMatcher};

use std::sync::Arc;

use crate::blocks::Tipset;
use crate::chain::{ChainHistory, ExecutedMessage, HeadChange};
use crate::message::Receipt;
use crate::shim::clock::ChainEpoch;
use cid::Cid;
use tokio::select;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A message that satisfied a matcher, and the tipset that included it.
#[derive(Clone, Debug)]
pub struct ChainMatch {
    pub tipset: Arc<Tipset>,
    pub message: ExecutedMessage,
}

/// Finds messages in chain history and waits for them to be included.
pub struct Waiter<C> {
    chain: Arc<C>,
    lookback_limit: Option<ChainEpoch>,
}

impl<C> Clone for Waiter<C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            lookback_limit: self.lookback_limit,
        }
    }
}

impl<C: ChainHistory> Waiter<C> {
    pub fn new(chain: Arc<C>, lookback_limit: Option<ChainEpoch>) -> Self {
        Self {
            chain,
            lookback_limit,
        }
    }

    fn search_tipset(
        &self,
        tipset: &Arc<Tipset>,
        matcher: &dyn MessageMatcher,
    ) -> Result<Option<ChainMatch>, Error> {
        let found = self
            .chain
            .executed_messages(tipset)?
            .iter()
            .find(|m| matcher.matches(&m.message, &m.cid))
            .cloned();
        Ok(found.map(|message| ChainMatch {
            tipset: tipset.clone(),
            message,
        }))
    }

    /// Scans confirmed history, newest first, from the heaviest tipset back
    /// to genesis, or at most `lookback_limit` epochs when one is set. Never
    /// blocks.
    pub fn find(&self, matcher: &dyn MessageMatcher) -> Result<Option<ChainMatch>, Error> {
        let mut current = self.chain.heaviest_tipset();
        let stop = self
            .lookback_limit
            .map(|limit| current.epoch().saturating_sub(limit));
        loop {
            if let Some(found) = self.search_tipset(&current, matcher)? {
                return Ok(Some(found));
            }
            if current.is_genesis() || stop.is_some_and(|stop| current.epoch() <= stop) {
                return Ok(None);
            }
            current = self.chain.load_tipset(current.parents())?;
        }
    }

    /// Runs `on_match` once with the first message satisfying `matcher`,
    /// whether it is already in history or arrives in a later tipset.
    ///
    /// The head change subscription is taken before history is scanned, so a
    /// tipset applied in between is seen by one or the other. Once `cancel`
    /// fires, `on_match` is never run.
    pub async fn wait_predicate<F, R>(
        &self,
        matcher: &dyn MessageMatcher,
        cancel: &CancellationToken,
        on_match: F,
    ) -> Result<R, Error>
    where
        F: FnOnce(ChainMatch) -> R + Send,
    {
        let mut subscriber = self.chain.subscribe_head_changes();
        let found = match self.find(matcher)? {
            Some(found) => found,
            None => loop {
                select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    change = subscriber.recv() => match change {
                        Ok(HeadChange::Apply(tipset)) => {
                            if let Some(found) = self.search_tipset(&tipset, matcher)? {
                                break found;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("waiter head change subscriber lagged, skipped {skipped} events");
                            if let Some(found) = self.find(matcher)? {
                                break found;
                            }
                        }
                        Err(RecvError::Closed) => return Err(Error::ChainClosed),
                    },
                }
            },
        };

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        debug!(
            cid = %found.message.cid,
            epoch = found.tipset.epoch(),
            "matched message on chain"
        );
        Ok(on_match(found))
    }

    /// Waits for the message `cid` and hands its receipt to `on_receipt`.
    pub async fn wait<F, R>(
        &self,
        cid: Cid,
        cancel: &CancellationToken,
        on_receipt: F,
    ) -> Result<R, Error>
    where
        F: FnOnce(Receipt) -> R + Send,
    {
        self.wait_predicate(&MessageCidMatcher(cid), cancel, |found| {
            on_receipt(found.message.receipt)
        })
        .await
    }
}
