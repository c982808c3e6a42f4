// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::market::DealID;
use crate::shim::{address::Address, clock::ChainEpoch, econ::TokenAmount, sector::SectorNumber};
use fvm_ipld_encoding::tuple::*;
use num_derive::FromPrimitive;

/// Storage miner actor methods available
#[derive(FromPrimitive)]
#[repr(u64)]
pub enum Method {
    PreCommitSector = 6,
    ProveCommitSector = 7,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct MinerInfo {
    /// Account that owns this miner.
    pub owner: Address,
    /// Worker account for this miner. Signs blocks and the miner's on-chain
    /// messages.
    pub worker: Address,
}

/// Information provided by a miner when pre-committing a sector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct SectorPreCommitInfo {
    pub sector_number: SectorNumber,
    /// Deals packed into the sector, in the order their pieces are laid out.
    pub deal_ids: Vec<DealID>,
    pub expiration: ChainEpoch,
}

/// Information stored on-chain for a pre-committed sector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct SectorPreCommitOnChainInfo {
    pub info: SectorPreCommitInfo,
    pub pre_commit_deposit: TokenAmount,
    pub pre_commit_epoch: ChainEpoch,
}

/// Parameters of `ProveCommitSector`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct SectorProveCommitInfo {
    pub sector_number: SectorNumber,
    pub deal_ids: Vec<DealID>,
}

/// Miner actor state
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct State {
    pub info: MinerInfo,
    /// Sectors that have been pre-committed but not yet proven, in the order
    /// they were pre-committed.
    pub pre_committed_sectors: Vec<SectorPreCommitOnChainInfo>,
}

impl State {
    pub fn new(info: MinerInfo) -> Self {
        Self {
            info,
            pre_committed_sectors: Vec::new(),
        }
    }

    /// Finds the pre-committed sector that packs `deal_id`.
    pub fn precommit_with_deal(&self, deal_id: DealID) -> Option<&SectorPreCommitOnChainInfo> {
        self.pre_committed_sectors
            .iter()
            .find(|sector| sector.info.deal_ids.contains(&deal_id))
    }
}
