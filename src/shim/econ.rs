// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub use fvm_shared4::econ::TokenAmount;

use fvm_shared2::econ::TokenAmount as TokenAmountV2;

pub fn from_token_v2_to_v4(token: &TokenAmountV2) -> TokenAmount {
    TokenAmount::from_atto(token.atto().clone())
}

pub fn from_token_v4_to_v2(token: &TokenAmount) -> TokenAmountV2 {
    TokenAmountV2::from_atto(token.atto().clone())
}
