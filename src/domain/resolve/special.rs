// 特殊泡（範囲消し・列消し）の効果範囲

use std::collections::BTreeSet;

use crate::domain::bubble::{BubbleId, BubbleKind};
use crate::domain::grid::Board;

/// 特殊泡の追加消去を求める
pub struct SpecialEffectResolver;

impl SpecialEffectResolver {
    /// 置いた泡の効果で追加で消える泡
    ///
    /// 置いた泡自身の連結が `min_match` 以上のときだけ発動する。
    /// 範囲消しは中心から `area_radius` 未満の泡すべて、
    /// 列消しは同じ格子列の泡すべて（種類は問わない）。
    pub fn expand(
        board: &Board,
        placed: BubbleId,
        cluster: &BTreeSet<BubbleId>,
        min_match: usize,
        area_radius: f64,
    ) -> BTreeSet<BubbleId> {
        let mut extra = BTreeSet::new();
        if cluster.len() < min_match || !cluster.contains(&placed) {
            return extra;
        }
        let Some(origin) = board.bubble(placed) else {
            return extra;
        };

        match origin.kind {
            BubbleKind::AreaClear => {
                let geometry = board.geometry();
                let center = geometry.lattice_to_position(origin.pos);
                let limit = area_radius * area_radius;
                for b in board.all_attached() {
                    if geometry.lattice_to_position(b.pos).distance_sq(center) < limit {
                        extra.insert(b.id);
                    }
                }
            }
            BubbleKind::ColumnClear => {
                for b in board.all_attached() {
                    if b.pos.col == origin.pos.col {
                        extra.insert(b.id);
                    }
                }
            }
            BubbleKind::Color(_) => {}
        }
        extra
    }
}
