// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::time::Duration;

use crate::message_pool::GasParams;
use crate::shim::{clock::ChainEpoch, econ::TokenAmount};
use crate::utils::io::read_toml;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

/// Gas and waiting parameters of the messages a connector sends.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Fee cap, in attoFIL per gas unit.
    pub gas_fee_cap: u64,
    /// Gas premium, in attoFIL per gas unit.
    pub gas_premium: u64,
    pub gas_limit: u64,
    /// How long a submitted message may take to land on chain.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub message_wait_timeout: Duration,
    /// Epochs of history searched for an already included message. Unset
    /// searches back to genesis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookback_limit: Option<ChainEpoch>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            gas_fee_cap: 1,
            gas_premium: 1,
            gas_limit: 300,
            message_wait_timeout: Duration::from_secs(600),
            lookback_limit: None,
        }
    }
}

impl ConnectorConfig {
    pub fn from_toml(toml: &str) -> anyhow::Result<Self> {
        read_toml(toml)
    }

    pub fn gas_params(&self) -> GasParams {
        GasParams {
            fee_cap: TokenAmount::from_atto(self.gas_fee_cap),
            premium: TokenAmount::from_atto(self.gas_premium),
            limit: self.gas_limit,
        }
    }
}
