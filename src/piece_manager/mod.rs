// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::actors::market::DealID;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt as _};

/// Boxed reader over the bytes of a piece.
pub type PieceReader = Box<dyn AsyncRead + Send + Unpin>;

/// Packs deal pieces into sectors and seals them.
#[async_trait]
pub trait PieceManager: Send + Sync {
    /// Writes `piece_size` bytes read from `piece` into a fresh sector and
    /// starts sealing it.
    async fn seal_piece_into_new_sector(
        &self,
        deal_id: DealID,
        piece_size: u64,
        piece: PieceReader,
    ) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedPiece {
    pub deal_id: DealID,
    pub data: Vec<u8>,
}

/// Keeps pieces in memory, one sector per piece. Sealing is left to whoever
/// drains the staged pieces.
#[derive(Debug, Default)]
pub struct InMemoryPieceManager {
    staged: Mutex<Vec<StagedPiece>>,
}

impl InMemoryPieceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_staged(&self) -> Vec<StagedPiece> {
        std::mem::take(&mut *self.staged.lock())
    }
}

#[async_trait]
impl PieceManager for InMemoryPieceManager {
    async fn seal_piece_into_new_sector(
        &self,
        deal_id: DealID,
        piece_size: u64,
        mut piece: PieceReader,
    ) -> anyhow::Result<()> {
        let mut data = Vec::new();
        piece.read_to_end(&mut data).await?;
        anyhow::ensure!(
            data.len() as u64 == piece_size,
            "piece of deal {deal_id} is {} bytes, expected {piece_size}",
            data.len()
        );
        self.staged.lock().push(StagedPiece { deal_id, data });
        Ok(())
    }
}
