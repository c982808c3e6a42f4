// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::actors::market;
use crate::message::Message;
use crate::shim::{address::STORAGE_MARKET_ACTOR_ADDR, crypto::Signature, econ::TokenAmount};
use fvm_ipld_encoding::RawBytes;

fn signed(from: Address, sequence: u64) -> SignedMessage {
    SignedMessage::new_unchecked(
        Message {
            version: 0,
            from,
            to: STORAGE_MARKET_ACTOR_ADDR,
            sequence,
            value: TokenAmount::default(),
            method_num: 2,
            params: RawBytes::default(),
            gas_limit: 300,
            gas_fee_cap: TokenAmount::from_atto(1),
            gas_premium: TokenAmount::from_atto(1),
        },
        Signature::new_secp256k1(vec![0; 65]),
    )
}

fn genesis_store() -> ChainStore {
    let mut state = StateTree::new();
    state
        .set_state(STORAGE_MARKET_ACTOR_ADDR, &market::State::default())
        .unwrap();
    state.set_actor(
        Address::new_id(100),
        ActorState::account(TokenAmount::from_atto(1000)),
    );
    ChainStore::new(state).unwrap()
}

#[test]
fn genesis_is_head() {
    let cs = genesis_store();
    let head = cs.get_tipset(&cs.head()).unwrap();
    assert!(head.is_genesis());
    assert_eq!(head.epoch(), 0);
    assert_eq!(cs.heaviest_tipset().key(), head.key());
}

#[test]
fn decodes_actor_state_in_requested_shape() {
    let cs = genesis_store();
    let state: market::State = cs
        .get_actor_state_at(&cs.head(), &STORAGE_MARKET_ACTOR_ADDR)
        .unwrap();
    assert_eq!(state, market::State::default());
}

#[test]
fn missing_actor_is_not_found() {
    let cs = genesis_store();
    let err = cs
        .get_actor_state_at::<market::State>(&cs.head(), &Address::new_id(999))
        .unwrap_err();
    assert!(matches!(err, Error::ActorNotFound(addr) if addr == Address::new_id(999)));
}

#[test]
fn shape_mismatch_is_a_decode_error() {
    let cs = genesis_store();
    // account actors have no market state to decode
    let err = cs
        .get_actor_state_at::<market::State>(&cs.head(), &Address::new_id(100))
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn unknown_tipset_is_not_found() {
    let cs = genesis_store();
    let err = cs.get_tipset(&TipsetKey::default()).unwrap_err();
    assert!(matches!(err, Error::TipsetNotFound(_)));
}

#[test]
fn reads_stay_on_their_snapshot() {
    let cs = genesis_store();
    let before = cs.head();
    let mut next = cs.head_state().unwrap();
    let mut market_state = market::State::default();
    market_state
        .escrow_table
        .add(&Address::new_id(100), &TokenAmount::from_atto(5));
    next.set_state(STORAGE_MARKET_ACTOR_ADDR, &market_state)
        .unwrap();
    cs.apply_tipset(next, vec![]).unwrap();

    let old: market::State = cs
        .get_actor_state_at(&before, &STORAGE_MARKET_ACTOR_ADDR)
        .unwrap();
    let new: market::State = cs
        .get_actor_state_at(&cs.head(), &STORAGE_MARKET_ACTOR_ADDR)
        .unwrap();
    assert_eq!(old.balance(&Address::new_id(100)).escrow, TokenAmount::default());
    assert_eq!(
        new.balance(&Address::new_id(100)).escrow,
        TokenAmount::from_atto(5)
    );
}

#[tokio::test]
async fn apply_tipset_publishes_and_records_messages() {
    let cs = genesis_store();
    let mut subscriber = cs.subscribe_head_changes();
    let msg = signed(Address::new_id(100), 0);
    let ts = cs
        .apply_tipset(
            cs.head_state().unwrap(),
            vec![(msg.clone(), Receipt::ok(RawBytes::default()))],
        )
        .unwrap();

    let HeadChange::Apply(announced) = subscriber.recv().await.unwrap();
    assert_eq!(announced.key(), ts.key());
    assert_eq!(ts.epoch(), 1);

    let executed = cs.executed_messages(&ts).unwrap();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].cid, msg.cid().unwrap());
    assert_eq!(ts.messages(), &[msg.cid().unwrap()]);

    let sender = cs.get_actor(&cs.head(), &Address::new_id(100)).unwrap();
    assert_eq!(sender.unwrap().sequence, 1);
}
