// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Types of the storage market protocol, and the node interface a storage
//! provider drives deals through. Addresses, amounts and signatures here are
//! the protocol's own, not the ledger's.

use crate::blocks::TipsetKey;
use crate::piece_manager::PieceReader;
use crate::shim::clock::ChainEpoch;
use async_trait::async_trait;
use cid::Cid;
use tokio_util::sync::CancellationToken;

pub use crate::actors::market::DealID;
pub use crate::shim::sector::SectorNumber;
pub use fvm_shared2::address::{Address, Protocol};
pub use fvm_shared2::crypto::signature::{Signature, SignatureType};
pub use fvm_shared2::econ::TokenAmount;

/// Opaque freshness token: the head a node answered from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateKey {
    pub tipset_key: TipsetKey,
    pub height: ChainEpoch,
}

/// Funds an account holds in the market.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub available: TokenAmount,
    pub locked: TokenAmount,
}

/// Deal terms as negotiated between client and provider.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageDealProposal {
    /// Bytes of the piece CID.
    pub piece_ref: Vec<u8>,
    pub piece_size: u64,
    pub client: Address,
    pub provider: Address,
    /// Last epoch the deal is stored at.
    pub proposal_expiration: u64,
    /// Epochs the deal runs for, ending at `proposal_expiration`.
    pub duration: u64,
    pub storage_price_per_epoch: TokenAmount,
    pub storage_collateral: TokenAmount,
    pub proposer_signature: Signature,
}

/// A deal as tracked by the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct MinerDeal {
    pub proposal: StorageDealProposal,
    pub proposal_cid: Cid,
    /// Assigned once the deal has been published.
    pub deal_id: DealID,
}

/// A published deal as projected from chain state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageDeal {
    pub piece_ref: Vec<u8>,
    pub piece_size: u64,
    pub client: Address,
    pub provider: Address,
    pub proposal_expiration: u64,
    pub duration: u64,
    pub storage_price_per_epoch: TokenAmount,
    pub storage_collateral: TokenAmount,
    pub activation_epoch: u64,
}

/// Where a deal's piece lives in a sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceLocation {
    pub sector_number: SectorNumber,
    pub offset: u64,
    pub length: u64,
}

/// Called once with the number of the sector a deal was committed into.
pub type DealSectorCommittedCallback = Box<dyn FnOnce(SectorNumber) + Send>;

/// Chain-facing side of a storage provider. Operations that wait on the
/// chain take a token the caller cancels to give up.
#[async_trait]
pub trait StorageProviderNode: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn most_recent_state_id(&self) -> Result<StateKey, Self::Error>;

    /// Deposits `amount` into the market escrow of `addr`.
    async fn add_funds(
        &self,
        addr: &Address,
        amount: &TokenAmount,
        cancel: &CancellationToken,
    ) -> Result<(), Self::Error>;

    async fn ensure_funds(&self, addr: &Address, amount: &TokenAmount) -> Result<(), Self::Error>;

    async fn get_balance(&self, addr: &Address) -> Result<Balance, Self::Error>;

    /// Publishes `deal` and returns its deal ID with the id of the publishing
    /// message.
    async fn publish_deals(
        &self,
        deal: &MinerDeal,
        cancel: &CancellationToken,
    ) -> Result<(DealID, Cid), Self::Error>;

    async fn list_provider_deals(&self, addr: &Address) -> Result<Vec<StorageDeal>, Self::Error>;

    /// Hands the piece of a published deal over for sealing.
    async fn on_deal_complete(
        &self,
        deal: &MinerDeal,
        piece_size: u64,
        piece: PieceReader,
    ) -> Result<(), Self::Error>;

    async fn get_miner_worker(&self, miner: &Address) -> Result<Address, Self::Error>;

    async fn sign_bytes(&self, signer: &Address, data: &[u8]) -> Result<Signature, Self::Error>;

    /// Returns after `cb` has run, once `provider` commits a sector holding
    /// `deal_id`.
    async fn on_deal_sector_committed(
        &self,
        provider: &Address,
        deal_id: DealID,
        cb: DealSectorCommittedCallback,
        cancel: &CancellationToken,
    ) -> Result<(), Self::Error>;

    async fn locate_piece_for_deal_within_sector(
        &self,
        deal_id: DealID,
    ) -> Result<PieceLocation, Self::Error>;
}
