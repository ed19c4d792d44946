// 同種連結の探索

use std::collections::{BTreeSet, VecDeque};

use crate::domain::bubble::BubbleId;
use crate::domain::grid::Board;

/// 同種の連結グループを求める
pub struct ClusterMatcher;

impl ClusterMatcher {
    /// seed を含む同種の最大連結集合
    ///
    /// 種類の違う泡は通り抜けない。seed が盤面にない場合は空集合、
    /// 同種の隣がなければ seed 単体を返す（しきい値判定は呼び出し側）。
    pub fn find_cluster(board: &Board, seed: BubbleId) -> BTreeSet<BubbleId> {
        let base = match board.bubble(seed) {
            Some(b) => b,
            None => return BTreeSet::new(),
        };
        let mut out = BTreeSet::new();
        let mut q = VecDeque::new();
        out.insert(seed);
        q.push_back(base.pos);
        while let Some(pos) = q.pop_front() {
            for n in board.neighbors_of(pos) {
                let Some(other) = board.get(n) else { continue };
                if other.kind != base.kind || out.contains(&other.id) {
                    continue;
                }
                out.insert(other.id);
                q.push_back(n);
            }
        }
        out
    }
}
