// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;

use crate::shim::clock::ChainEpoch;
use crate::utils::cid::CidCborExt as _;
use cid::Cid;
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

/// A set of CIDs forming a unique key for a tipset.
///
/// Equal keys will have equivalent iteration order, but note that the CIDs
/// are *not* maintained in the same order as the canonical iteration order of
/// blocks in a tipset (which is by ticket).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipsetKey(Vec<Cid>);

impl TipsetKey {
    pub fn new(cids: Vec<Cid>) -> Self {
        Self(cids)
    }

    pub fn cids(&self) -> &[Cid] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TipsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

/// An immutable chain snapshot: a tipset key, the key of its parent and the
/// epoch it was mined at, together with the CIDs of the messages it includes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tipset {
    key: TipsetKey,
    parents: TipsetKey,
    epoch: ChainEpoch,
    messages: Vec<Cid>,
}

impl Tipset {
    /// Builds a tipset on top of `parents`. The key is derived from the
    /// content, so two tipsets with equal parents, epoch and messages share a
    /// key.
    pub fn new(
        parents: TipsetKey,
        epoch: ChainEpoch,
        messages: Vec<Cid>,
    ) -> Result<Self, fvm_ipld_encoding::Error> {
        let header = Cid::from_cbor_blake2b256(&(&parents, epoch, &messages))?;
        Ok(Self {
            key: TipsetKey::new(vec![header]),
            parents,
            epoch,
            messages,
        })
    }

    pub fn key(&self) -> &TipsetKey {
        &self.key
    }

    pub fn parents(&self) -> &TipsetKey {
        &self.parents
    }

    pub fn epoch(&self) -> ChainEpoch {
        self.epoch
    }

    /// CIDs of the messages included in this tipset, in inclusion order.
    pub fn messages(&self) -> &[Cid] {
        &self.messages
    }

    pub fn is_genesis(&self) -> bool {
        self.parents.is_empty()
    }
}
