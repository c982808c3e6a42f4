// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 << 10;

/// Config available for the local message outbox.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpoolConfig {
    /// Largest accepted serialized signed message, in bytes.
    pub max_message_size: usize,
}

impl Default for MpoolConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
