// 1回の着弾解決の結果

use serde::{Deserialize, Serialize};

use crate::domain::bubble::{BubbleId, BubbleKind};
use crate::domain::grid::{LatticePos, Point};

/// 盤面から取り除かれた泡（描画側のアニメーション用に位置も持つ）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemovedBubble {
    pub id: BubbleId,
    pub kind: BubbleKind,
    pub pos: LatticePos,
    pub center: Point,
}

/// 着弾解決の結果
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// 置いた泡
    pub placed: BubbleId,
    /// 置いた格子
    pub slot: LatticePos,
    /// 置いた泡の同種連結の大きさ
    pub cluster_size: usize,
    /// マッチ・特殊効果で消えた泡
    pub matched: Vec<RemovedBubble>,
    /// 支えを失って落ちた泡
    pub fell: Vec<RemovedBubble>,
    /// この解決で加算された得点
    pub score_delta: u64,
    /// 盤面が空になったか
    pub board_cleared: bool,
}

impl Resolution {
    pub fn new(placed: BubbleId, slot: LatticePos, cluster_size: usize) -> Self {
        Self {
            placed,
            slot,
            cluster_size,
            matched: Vec::new(),
            fell: Vec::new(),
            score_delta: 0,
            board_cleared: false,
        }
    }

    /// 何か消えたか
    pub fn removed_any(&self) -> bool {
        !self.matched.is_empty() || !self.fell.is_empty()
    }

    pub fn total_removed(&self) -> usize {
        self.matched.len() + self.fell.len()
    }
}
