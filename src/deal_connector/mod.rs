// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Storage provider side of the storage market, backed by the chain: deal
//! publication and funding go out as market actor messages, and everything
//! else is read from actor state at the current head.

mod config;
mod errors;
mod worker;

pub use self::config::ConnectorConfig;
pub use self::errors::Error;
pub use self::worker::{StateWorkerGetter, WorkerGetter};

use std::sync::Arc;

use crate::actors::{market as market_actor, miner};
use crate::blocks::TipsetKey;
use crate::chain::{ChainHistory, ChainReader, ChainReaderExt as _};
use crate::key_management::Signer;
use crate::market::{
    self, Balance, DealID, DealSectorCommittedCallback, MinerDeal, PieceLocation, StateKey,
    StorageDeal, StorageDealProposal, StorageProviderNode,
};
use crate::message::{MethodNum, Receipt};
use crate::message_pool::{MessageSubmitter, PublicationSignal};
use crate::piece_manager::{PieceManager, PieceReader};
use crate::shim::{
    address::{Address, STORAGE_MARKET_ACTOR_ADDR, from_address_v2_to_v4, from_address_v4_to_v2},
    clock::ChainEpoch,
    crypto::Signature,
    econ::{TokenAmount, from_token_v2_to_v4, from_token_v4_to_v2},
    piece::PaddedPieceSize,
};
use crate::state_manager::{SectorCommitMatcher, Waiter};
use async_trait::async_trait;
use cid::Cid;
use fvm_ipld_encoding::RawBytes;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Implements [`StorageProviderNode`] for the miner `miner_addr` on top of a
/// chain, a message outbox and a piece manager.
pub struct StorageProviderNodeConnector<C> {
    miner_addr: market::Address,
    chain: Arc<C>,
    outbox: Arc<dyn MessageSubmitter>,
    waiter: Waiter<C>,
    piece_manager: Arc<dyn PieceManager>,
    worker_getter: Arc<dyn WorkerGetter>,
    signer: Arc<dyn Signer>,
    config: ConnectorConfig,
}

impl<C> StorageProviderNodeConnector<C>
where
    C: ChainReader + ChainHistory + 'static,
{
    pub fn new(
        miner_addr: market::Address,
        chain: Arc<C>,
        outbox: Arc<dyn MessageSubmitter>,
        piece_manager: Arc<dyn PieceManager>,
        worker_getter: Arc<dyn WorkerGetter>,
        signer: Arc<dyn Signer>,
        config: ConnectorConfig,
    ) -> Self {
        let waiter = Waiter::new(chain.clone(), config.lookback_limit);
        Self {
            miner_addr,
            chain,
            outbox,
            waiter,
            piece_manager,
            worker_getter,
            signer,
            config,
        }
    }

    fn market_state(&self, key: &TipsetKey) -> Result<market_actor::State, Error> {
        Ok(self
            .chain
            .get_actor_state_at(key, &STORAGE_MARKET_ACTOR_ADDR)?)
    }

    async fn resolve_worker(&self, miner: &Address, key: &TipsetKey) -> Result<Address, Error> {
        self.worker_getter
            .worker(miner, key)
            .await
            .map_err(Error::Worker)
    }

    /// Worker of this connector's miner, which sends its market messages.
    async fn own_worker(&self, key: &TipsetKey) -> Result<Address, Error> {
        let miner = from_address_v2_to_v4(&self.miner_addr)?;
        self.resolve_worker(&miner, key).await
    }

    /// Sends a market actor call from `from` and waits for its receipt.
    async fn call_market(
        &self,
        from: Address,
        method_num: MethodNum,
        value: TokenAmount,
        params: RawBytes,
        cancel: &CancellationToken,
    ) -> Result<(Cid, Receipt), Error> {
        let (cid, signal) = self
            .outbox
            .send(
                from,
                STORAGE_MARKET_ACTOR_ADDR,
                value,
                &self.config.gas_params(),
                method_num,
                params,
            )
            .await
            .map_err(Error::Submission)?;
        let receipt = self.wait_on_submission(cid, signal, cancel).await?;
        Ok((cid, receipt))
    }

    /// Waits for the propagation of `cid`, then for its receipt. The receipt
    /// is not waited on once propagation failed. A non-zero exit code is an
    /// error.
    async fn wait_on_submission(
        &self,
        cid: Cid,
        signal: PublicationSignal,
        cancel: &CancellationToken,
    ) -> Result<Receipt, Error> {
        let wait = async {
            select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                published = signal.wait() => published.map_err(Error::Publication)?,
            }
            let receipt = self.waiter.wait(cid, cancel, |receipt| receipt).await?;
            if !receipt.exit_code.is_success() {
                return Err(Error::ExecutionFailed {
                    cid,
                    exit_code: receipt.exit_code,
                });
            }
            Ok::<_, Error>(receipt)
        };
        match tokio::time::timeout(self.config.message_wait_timeout, wait).await {
            Ok(res) => res,
            Err(_) => {
                warn!(%cid, "gave up waiting for message after {:?}", self.config.message_wait_timeout);
                Err(Error::Timeout(cid))
            }
        }
    }
}

/// Translates negotiated terms into the market actor's proposal. The deal
/// ends at the proposal's expiration and starts `duration` epochs before.
fn to_deal_proposal(
    proposal: &StorageDealProposal,
) -> Result<market_actor::ClientDealProposal, Error> {
    let piece_cid = Cid::try_from(proposal.piece_ref.as_slice())
        .map_err(|e| Error::InvalidProposal(format!("piece reference is not a CID: {e}")))?;
    let end_epoch = ChainEpoch::try_from(proposal.proposal_expiration)
        .map_err(|_| Error::InvalidProposal("expiration out of range".into()))?;
    let start_epoch = ChainEpoch::try_from(proposal.duration)
        .ok()
        .and_then(|duration| end_epoch.checked_sub(duration))
        .filter(|start| *start >= 0)
        .ok_or_else(|| Error::InvalidProposal("duration exceeds expiration".into()))?;
    let proposer_signature = Signature::from_market(&proposal.proposer_signature)
        .ok_or_else(|| Error::InvalidProposal("unsupported signature type".into()))?;

    Ok(market_actor::ClientDealProposal {
        proposal: market_actor::DealProposal {
            piece_cid,
            piece_size: PaddedPieceSize(proposal.piece_size),
            client: from_address_v2_to_v4(&proposal.client)?,
            provider: from_address_v2_to_v4(&proposal.provider)?,
            start_epoch,
            end_epoch,
            storage_price_per_epoch: from_token_v2_to_v4(&proposal.storage_price_per_epoch),
            provider_collateral: from_token_v2_to_v4(&proposal.storage_collateral),
        },
        proposer_signature,
    })
}

fn to_storage_deal(
    deal_id: DealID,
    proposal: &market_actor::DealProposal,
) -> Result<StorageDeal, Error> {
    let epoch_to_u64 = |epoch: ChainEpoch| {
        u64::try_from(epoch).map_err(|_| Error::MalformedDeal {
            deal_id,
            reason: format!("negative epoch {epoch}"),
        })
    };
    Ok(StorageDeal {
        piece_ref: proposal.piece_cid.to_bytes(),
        piece_size: proposal.piece_size.0,
        client: from_address_v4_to_v2(&proposal.client)?,
        provider: from_address_v4_to_v2(&proposal.provider)?,
        proposal_expiration: epoch_to_u64(proposal.end_epoch)?,
        duration: epoch_to_u64(proposal.duration())?,
        storage_price_per_epoch: from_token_v4_to_v2(&proposal.storage_price_per_epoch),
        storage_collateral: from_token_v4_to_v2(&proposal.provider_collateral),
        activation_epoch: epoch_to_u64(proposal.start_epoch)?,
    })
}

/// Finds `deal_id` among the miner's pre-committed sectors. Pieces are laid
/// out in the order the sector lists its deals, so the offset is the sum of
/// the sizes of the deals listed before it.
pub fn locate_piece(
    market: &market_actor::State,
    miner: &miner::State,
    deal_id: DealID,
) -> Result<PieceLocation, Error> {
    let sector = miner
        .precommit_with_deal(deal_id)
        .ok_or(Error::DealNotInSector(deal_id))?;
    let mut offset = 0;
    for id in &sector.info.deal_ids {
        let size = market
            .get_deal(*id)
            .ok_or(Error::DealNotFound(*id))?
            .proposal
            .piece_size
            .0;
        if *id == deal_id {
            return Ok(PieceLocation {
                sector_number: sector.info.sector_number,
                offset,
                length: size,
            });
        }
        offset += size;
    }
    Err(Error::DealNotInSector(deal_id))
}

#[async_trait]
impl<C> StorageProviderNode for StorageProviderNodeConnector<C>
where
    C: ChainReader + ChainHistory + 'static,
{
    type Error = Error;

    async fn most_recent_state_id(&self) -> Result<StateKey, Error> {
        let key = self.chain.head();
        let tipset = self.chain.get_tipset(&key)?;
        Ok(StateKey {
            tipset_key: key,
            height: tipset.epoch(),
        })
    }

    #[instrument(skip(self, cancel))]
    async fn add_funds(
        &self,
        addr: &market::Address,
        amount: &market::TokenAmount,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        let params = RawBytes::serialize(from_address_v2_to_v4(addr)?)?;
        let worker = self.own_worker(&self.chain.head()).await?;
        let (cid, _) = self
            .call_market(
                worker,
                market_actor::Method::AddBalance as u64,
                from_token_v2_to_v4(amount),
                params,
                cancel,
            )
            .await?;
        info!(%cid, "added market funds");
        Ok(())
    }

    // Only checks that market state is readable; topping up is left to the
    // caller through `add_funds`.
    async fn ensure_funds(
        &self,
        addr: &market::Address,
        amount: &market::TokenAmount,
    ) -> Result<(), Error> {
        let state = self.market_state(&self.chain.head())?;
        let available = state.balance(&from_address_v2_to_v4(addr)?).escrow;
        let wanted = from_token_v2_to_v4(amount);
        if available < wanted {
            debug!(%addr, %available, %wanted, "market escrow below requested amount");
        }
        Ok(())
    }

    async fn get_balance(&self, addr: &market::Address) -> Result<Balance, Error> {
        let state = self.market_state(&self.chain.head())?;
        let balance = state.balance(&from_address_v2_to_v4(addr)?);
        Ok(Balance {
            available: from_token_v4_to_v2(&balance.escrow),
            locked: from_token_v4_to_v2(&balance.locked),
        })
    }

    #[instrument(skip_all, fields(proposal = %deal.proposal_cid))]
    async fn publish_deals(
        &self,
        deal: &MinerDeal,
        cancel: &CancellationToken,
    ) -> Result<(DealID, Cid), Error> {
        let params = RawBytes::serialize(market_actor::PublishStorageDealsParams {
            deals: vec![to_deal_proposal(&deal.proposal)?],
        })?;
        let worker = self.own_worker(&self.chain.head()).await?;
        let (cid, receipt) = self
            .call_market(
                worker,
                market_actor::Method::PublishStorageDeals as u64,
                TokenAmount::default(),
                params,
                cancel,
            )
            .await?;

        let ret: market_actor::PublishStorageDealsReturn = receipt.return_data.deserialize()?;
        let (&deal_id, rest) = ret.ids.split_first().ok_or(Error::NoDealIds)?;
        if !rest.is_empty() {
            warn!(%cid, "publish returned {} deal ids, only {deal_id} is reported", ret.ids.len());
        }
        info!(%cid, deal_id, "published storage deal");
        Ok((deal_id, cid))
    }

    async fn list_provider_deals(&self, addr: &market::Address) -> Result<Vec<StorageDeal>, Error> {
        let state = self.market_state(&self.chain.head())?;
        let ids = state
            .deal_ids_for_party(&from_address_v2_to_v4(addr)?)
            .ok_or(Error::NoDeals(*addr))?;
        ids.iter()
            .map(|id| {
                let deal = state.get_deal(*id).ok_or(Error::DealNotFound(*id))?;
                to_storage_deal(*id, &deal.proposal)
            })
            .collect()
    }

    async fn on_deal_complete(
        &self,
        deal: &MinerDeal,
        piece_size: u64,
        piece: PieceReader,
    ) -> Result<(), Error> {
        self.piece_manager
            .seal_piece_into_new_sector(deal.deal_id, piece_size, piece)
            .await
            .map_err(Error::Sealing)
    }

    async fn get_miner_worker(&self, miner: &market::Address) -> Result<market::Address, Error> {
        let miner = from_address_v2_to_v4(miner)?;
        let worker = self.resolve_worker(&miner, &self.chain.head()).await?;
        Ok(from_address_v4_to_v2(&worker)?)
    }

    async fn sign_bytes(
        &self,
        signer: &market::Address,
        data: &[u8],
    ) -> Result<market::Signature, Error> {
        let signature = self
            .signer
            .sign_bytes(data, &from_address_v2_to_v4(signer)?)?;
        let bytes = signature.bytes;
        Ok(match signer.protocol() {
            market::Protocol::BLS => market::Signature::new_bls(bytes),
            _ => market::Signature::new_secp256k1(bytes),
        })
    }

    #[instrument(skip(self, cb, cancel))]
    async fn on_deal_sector_committed(
        &self,
        provider: &market::Address,
        deal_id: DealID,
        cb: DealSectorCommittedCallback,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        let matcher = SectorCommitMatcher {
            provider: from_address_v2_to_v4(provider)?,
            deal_id,
        };
        let fire = move |msg: &crate::message::SignedMessage| {
            SectorCommitMatcher::commit_info(msg)
                .map(|info| {
                    debug!(sector = info.sector_number, "deal sector committed");
                    cb(info.sector_number)
                })
                .ok_or(Error::DealNotInSector(deal_id))
        };

        if let Some(found) = self.waiter.find(&matcher)? {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            return fire(&found.message.message);
        }
        self.waiter
            .wait_predicate(&matcher, cancel, |found| fire(&found.message.message))
            .await?
    }

    async fn locate_piece_for_deal_within_sector(
        &self,
        deal_id: DealID,
    ) -> Result<PieceLocation, Error> {
        let key = self.chain.head();
        let market = self.market_state(&key)?;
        let miner: miner::State = self
            .chain
            .get_actor_state_at(&key, &from_address_v2_to_v4(&self.miner_addr)?)?;
        locate_piece(&market, &miner, deal_id)
    }
}
