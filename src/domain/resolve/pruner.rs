// 支えを失った泡の検出（アンカー行からの全体連結）

use std::collections::{BTreeSet, VecDeque};

use crate::domain::bubble::{BubbleId, IdSet};
use crate::domain::grid::Board;

/// アンカー行から届かない泡を求める
pub struct ConnectivityPruner;

impl ConnectivityPruner {
    /// 0行目のすべての泡から種類を問わず塗りつぶし、届かなかった泡を返す
    pub fn find_unsupported(board: &Board) -> BTreeSet<BubbleId> {
        let mut reached = IdSet::default();
        let mut q = VecDeque::new();
        for anchor in board.anchored() {
            reached.insert(anchor.id);
            q.push_back(anchor.pos);
        }
        while let Some(pos) = q.pop_front() {
            for n in board.neighbors_of(pos) {
                let Some(other) = board.get(n) else { continue };
                if reached.insert(other.id) {
                    q.push_back(n);
                }
            }
        }
        board
            .all_attached()
            .filter(|b| !reached.contains(&b.id))
            .map(|b| b.id)
            .collect()
    }
}
