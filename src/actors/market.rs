// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::METHOD_CONSTRUCTOR;
use crate::shim::{
    address::Address, clock::ChainEpoch, crypto::Signature, econ::TokenAmount,
    piece::PaddedPieceSize,
};
use cid::Cid;
use fvm_ipld_encoding::tuple::*;
use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

pub type DealID = u64;

/// Market actor methods available
#[derive(FromPrimitive)]
#[repr(u64)]
pub enum Method {
    Constructor = METHOD_CONSTRUCTOR,
    AddBalance = 2,
    WithdrawBalance = 3,
    PublishStorageDeals = 4,
}

/// Note: `start_epoch` and `end_epoch` bound the span during which the
/// provider is paid `storage_price_per_epoch`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct DealProposal {
    pub piece_cid: Cid,
    pub piece_size: PaddedPieceSize,
    pub client: Address,
    pub provider: Address,
    pub start_epoch: ChainEpoch,
    pub end_epoch: ChainEpoch,
    pub storage_price_per_epoch: TokenAmount,
    pub provider_collateral: TokenAmount,
}

impl DealProposal {
    pub fn duration(&self) -> ChainEpoch {
        self.end_epoch - self.start_epoch
    }
}

/// A deal proposal together with the signature of the party that proposed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct ClientDealProposal {
    pub proposal: DealProposal,
    pub proposer_signature: Signature,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct PublishStorageDealsParams {
    pub deals: Vec<ClientDealProposal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct PublishStorageDealsReturn {
    pub ids: Vec<DealID>,
}

/// A published deal as recorded by the market actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct OnChainDeal {
    pub id: DealID,
    pub proposal: DealProposal,
    /// Epoch the deal's sector was activated, `-1` until then.
    pub sector_start_epoch: ChainEpoch,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct BalanceEntry {
    pub address: Address,
    pub amount: TokenAmount,
}

/// Balance table which handles getting and updating token balances specifically
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceTable(Vec<BalanceEntry>);

impl BalanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets token amount for given address in balance table. Addresses
    /// without an entry hold nothing.
    pub fn get(&self, key: &Address) -> TokenAmount {
        self.0
            .iter()
            .find(|entry| &entry.address == key)
            .map(|entry| entry.amount.clone())
            .unwrap_or_default()
    }

    /// Adds token amount to previously initialized account.
    pub fn add(&mut self, key: &Address, value: &TokenAmount) {
        match self.0.iter_mut().find(|entry| &entry.address == key) {
            Some(entry) => entry.amount = &entry.amount + value,
            None => self.0.push(BalanceEntry {
                address: *key,
                amount: value.clone(),
            }),
        }
    }
}

/// Deal IDs a party takes part in, in publication order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct PartyDeals {
    pub party: Address,
    pub deal_ids: Vec<DealID>,
}

/// Amounts an account holds in the market actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketBalance {
    pub escrow: TokenAmount,
    pub locked: TokenAmount,
}

/// Market actor state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct State {
    /// Total amount held in escrow, indexed by actor address (including both
    /// locked and unlocked amounts).
    pub escrow_table: BalanceTable,
    /// Amount locked, indexed by actor address.
    pub locked_table: BalanceTable,
    pub deals: Vec<OnChainDeal>,
    /// Metadata cached for efficient lookup of the deals of one party.
    pub deal_ids_by_party: Vec<PartyDeals>,
    /// Deal id state sequential incrementer
    pub next_id: DealID,
}

impl State {
    pub fn get_deal(&self, id: DealID) -> Option<&OnChainDeal> {
        self.deals.iter().find(|deal| deal.id == id)
    }

    /// `None` when the party has never taken part in a deal.
    pub fn deal_ids_for_party(&self, party: &Address) -> Option<&[DealID]> {
        self.deal_ids_by_party
            .iter()
            .find(|entry| &entry.party == party)
            .map(|entry| entry.deal_ids.as_slice())
    }

    /// Reads both balance tables for `addr`; absent entries count as zero.
    pub fn balance(&self, addr: &Address) -> MarketBalance {
        MarketBalance {
            escrow: self.escrow_table.get(addr),
            locked: self.locked_table.get(addr),
        }
    }

    /// Records a published deal, indexing it under both parties.
    pub fn insert_deal(&mut self, proposal: DealProposal) -> DealID {
        let id = self.next_id;
        self.next_id += 1;
        for party in [proposal.client, proposal.provider] {
            match self.deal_ids_by_party.iter_mut().find(|e| e.party == party) {
                Some(entry) => entry.deal_ids.push(id),
                None => self.deal_ids_by_party.push(PartyDeals {
                    party,
                    deal_ids: vec![id],
                }),
            }
        }
        self.deals.push(OnChainDeal {
            id,
            proposal,
            sector_start_epoch: -1,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::cid::CidCborExt as _;
    use quickcheck_macros::quickcheck;

    fn proposal(client: u64, provider: u64, size: u64) -> DealProposal {
        DealProposal {
            piece_cid: Cid::from_cbor_blake2b256(&size).unwrap(),
            piece_size: PaddedPieceSize(size),
            client: Address::new_id(client),
            provider: Address::new_id(provider),
            start_epoch: 10,
            end_epoch: 110,
            storage_price_per_epoch: TokenAmount::from_atto(2),
            provider_collateral: TokenAmount::from_atto(5),
        }
    }

    #[quickcheck]
    fn missing_balance_entries_are_zero(present: u64, absent: u64) -> bool {
        if present == absent {
            return true;
        }
        let mut state = State::default();
        state
            .escrow_table
            .add(&Address::new_id(present), &TokenAmount::from_atto(10));
        state.balance(&Address::new_id(absent)) == MarketBalance::default()
    }

    #[test]
    fn balance_reads_both_tables() {
        let addr = Address::new_id(100);
        let mut state = State::default();
        state.escrow_table.add(&addr, &TokenAmount::from_atto(30));
        state.escrow_table.add(&addr, &TokenAmount::from_atto(12));
        state.locked_table.add(&addr, &TokenAmount::from_atto(7));
        assert_eq!(
            state.balance(&addr),
            MarketBalance {
                escrow: TokenAmount::from_atto(42),
                locked: TokenAmount::from_atto(7),
            }
        );
    }

    #[test]
    fn inserted_deals_are_indexed_by_party() {
        let mut state = State::default();
        let a = state.insert_deal(proposal(100, 200, 128));
        let b = state.insert_deal(proposal(101, 200, 256));
        assert_eq!((a, b), (0, 1));
        assert_eq!(
            state.deal_ids_for_party(&Address::new_id(200)),
            Some([0, 1].as_slice())
        );
        assert_eq!(
            state.deal_ids_for_party(&Address::new_id(101)),
            Some([1].as_slice())
        );
        assert_eq!(state.deal_ids_for_party(&Address::new_id(300)), None);
        assert_eq!(state.get_deal(1).unwrap().proposal.piece_size.0, 256);
        assert_eq!(state.get_deal(1).unwrap().proposal.duration(), 100);
    }

    #[test]
    fn state_decodes_from_cbor() {
        let mut state = State::default();
        state.insert_deal(proposal(100, 200, 128));
        state
            .locked_table
            .add(&Address::new_id(200), &TokenAmount::from_atto(5));
        let bytes = fvm_ipld_encoding::to_vec(&state).unwrap();
        let decoded: State = fvm_ipld_encoding::from_slice(&bytes).unwrap();
        assert_eq!(decoded, state);
    }
}
