// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::actors::{market::DealID, miner};
use crate::message::SignedMessage;
use crate::shim::address::Address;
use cid::Cid;

/// Selects the on-chain messages a caller is waiting for.
pub trait MessageMatcher: Send + Sync {
    fn matches(&self, msg: &SignedMessage, cid: &Cid) -> bool;
}

impl<F> MessageMatcher for F
where
    F: Fn(&SignedMessage, &Cid) -> bool + Send + Sync,
{
    fn matches(&self, msg: &SignedMessage, cid: &Cid) -> bool {
        self(msg, cid)
    }
}

/// Matches one message by its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageCidMatcher(pub Cid);

impl MessageMatcher for MessageCidMatcher {
    fn matches(&self, _: &SignedMessage, cid: &Cid) -> bool {
        *cid == self.0
    }
}

/// Matches the sector commitment, sent by `provider`, of a sector holding
/// `deal_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorCommitMatcher {
    pub provider: Address,
    pub deal_id: DealID,
}

impl SectorCommitMatcher {
    /// Commit parameters of `msg`, if it is a sector commitment at all.
    pub fn commit_info(msg: &SignedMessage) -> Option<miner::SectorProveCommitInfo> {
        if msg.message.method_num != miner::Method::ProveCommitSector as u64 {
            return None;
        }
        msg.message.params.deserialize().ok()
    }
}

impl MessageMatcher for SectorCommitMatcher {
    fn matches(&self, msg: &SignedMessage, _: &Cid) -> bool {
        if msg.message.from != self.provider {
            return false;
        }
        Self::commit_info(msg).is_some_and(|info| info.deal_ids.contains(&self.deal_id))
    }
}
