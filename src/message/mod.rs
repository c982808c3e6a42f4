// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod signed_message;

pub use crate::shim::message::{Message, MethodNum};
pub use signed_message::SignedMessage;

use crate::shim::error::ExitCode;
use crate::utils::cid::CidCborExt as _;
use cid::Cid;
use fvm_ipld_encoding::RawBytes;

/// Content address of an unsigned message.
pub fn message_cid(message: &Message) -> Result<Cid, fvm_ipld_encoding::Error> {
    Cid::from_cbor_blake2b256(message)
}

/// Result of executing a message on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub exit_code: ExitCode,
    pub return_data: RawBytes,
    pub gas_used: u64,
}

impl Receipt {
    pub fn ok(return_data: RawBytes) -> Self {
        Self {
            exit_code: ExitCode::OK,
            return_data,
            gas_used: 0,
        }
    }

    pub fn failed(exit_code: ExitCode) -> Self {
        Self {
            exit_code,
            return_data: RawBytes::default(),
            gas_used: 0,
        }
    }
}
