// 着弾位置から吸着先の格子を決めて盤面に確定する

use crate::domain::bubble::{BubbleId, BubbleKind};
use crate::domain::error::EngineError;
use crate::domain::grid::{Board, LatticePos, Point};
use crate::vlog;

const LOG_PLACE_VERBOSE: bool = true;

// 距離（二乗, px²）の同値判定に使う許容誤差
const DIST_EPSILON: f64 = 1e-6;

/// 吸着処理のユーティリティ
pub struct Placement;

impl Placement {
    /// 着弾点に最も近い空き格子を選ぶ
    ///
    /// 候補格子は盤面内に丸めてから使う。空いていればそれを使い、埋まっていれば
    /// 周囲6マス、それも全滅なら2周目から、着弾点とのユークリッド距離が
    /// 最小の格子を選ぶ。同距離は行→列の小さい順。
    pub fn choose_slot(board: &Board, stop: Point) -> Result<LatticePos, EngineError> {
        let geometry = board.geometry();
        let candidate = geometry.clamp_to_bounds(geometry.position_to_lattice(stop));
        if board.is_free(candidate) {
            return Ok(candidate);
        }

        let ring1 = geometry.neighbor_slots(candidate);
        if let Some(pos) = Self::nearest_free(board, stop, ring1.iter().copied()) {
            return Ok(pos);
        }

        // 2周目: 1周目の隣接から中心と1周目を除いたもの
        let mut ring2: Vec<LatticePos> = ring1
            .iter()
            .flat_map(|&p| geometry.neighbor_slots(p))
            .filter(|p| *p != candidate && !ring1.contains(p))
            .collect();
        ring2.sort_unstable();
        ring2.dedup();
        if let Some(pos) = Self::nearest_free(board, stop, ring2.into_iter()) {
            return Ok(pos);
        }

        Err(EngineError::PlacementFailed { near: candidate })
    }

    /// 空き格子のうち着弾点に最も近いもの
    fn nearest_free(
        board: &Board,
        stop: Point,
        slots: impl Iterator<Item = LatticePos>,
    ) -> Option<LatticePos> {
        let geometry = board.geometry();
        slots
            .filter(|&p| board.is_free(p))
            .map(|p| (geometry.lattice_to_position(p).distance_sq(stop), p))
            .min_by(|a, b| {
                if (a.0 - b.0).abs() <= DIST_EPSILON {
                    a.1.cmp(&b.1)
                } else {
                    a.0.total_cmp(&b.0)
                }
            })
            .map(|(_, p)| p)
    }

    /// 吸着先を決めて盤面に確定する
    pub fn commit(
        board: &mut Board,
        stop: Point,
        kind: BubbleKind,
    ) -> Result<(BubbleId, LatticePos), EngineError> {
        let pos = Self::choose_slot(board, stop)?;
        let id = board.spawn(kind, pos)?;
        if LOG_PLACE_VERBOSE {
            vlog!(
                "[配置] {} {} 着弾=({:.1}, {:.1}) → 格子{}",
                id,
                kind.label(),
                stop.x,
                stop.y,
                pos
            );
        }
        Ok((id, pos))
    }
}
