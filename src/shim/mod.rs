// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Ledger-side primitive types, and the conversions between them and the
//! storage market protocol's own primitives.

pub mod address;
pub mod crypto;
pub mod econ;

pub mod clock {
    pub use fvm_shared4::clock::ChainEpoch;
}

pub mod error {
    pub use fvm_shared4::error::ExitCode;
}

pub mod piece {
    pub use fvm_shared4::piece::PaddedPieceSize;
}

pub mod sector {
    pub use fvm_shared4::sector::SectorNumber;
}

pub mod message {
    pub use fvm_shared4::MethodNum;
    pub use fvm_shared4::message::Message;
}
