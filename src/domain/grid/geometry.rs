// 六角格子の座標変換 - 連続座標 ↔ 格子座標、隣接判定

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::config::EngineConfig;

/// 格子座標（行, 列）。奇数行は半径ぶん右にずれる
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LatticePos {
    pub row: i32,
    pub col: i32,
}

impl LatticePos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_odd_row(self) -> bool {
        self.row.rem_euclid(2) == 1
    }
}

impl fmt::Display for LatticePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 連続座標（px）。y は下向きが正
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

// 偶数行・奇数行の隣接オフセット（行差, 列差）
const EVEN_ROW_DIRS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, -1), (-1, 0), (1, -1), (1, 0)];
const ODD_ROW_DIRS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// 格子の幾何。状態を持たない純粋な変換のみ
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub radius: f64,
    pub top_margin: f64,
    pub columns: usize,
    pub max_rows: usize,
    pub adjacency_factor: f64,
}

impl GridGeometry {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            radius: config.grid.radius.get(),
            top_margin: config.grid.top_margin,
            columns: config.grid.columns,
            max_rows: config.grid.board_max_rows,
            adjacency_factor: config.grid.adjacency_factor,
        }
    }

    /// 行の間隔 r·√3
    #[inline]
    pub fn row_pitch(&self) -> f64 {
        self.radius * 3f64.sqrt()
    }

    #[inline]
    fn row_offset(&self, row: i32) -> f64 {
        if row.rem_euclid(2) == 1 {
            self.radius
        } else {
            0.0
        }
    }

    /// 連続座標 → 格子座標。常に何らかの座標を返す（範囲・占有は呼び出し側で確認）
    pub fn position_to_lattice(&self, p: Point) -> LatticePos {
        let row = ((p.y - self.top_margin) / self.row_pitch()).floor() as i32;
        let col = ((p.x - self.row_offset(row)) / (2.0 * self.radius)).floor() as i32;
        LatticePos { row, col }
    }

    /// 格子座標 → 格子中心の連続座標
    pub fn lattice_to_position(&self, pos: LatticePos) -> Point {
        let x = self.row_offset(pos.row) + pos.col as f64 * 2.0 * self.radius + self.radius;
        let y = pos.row as f64 * self.row_pitch() + self.radius + self.top_margin;
        Point { x, y }
    }

    /// 中心間距離が隣接しきい値未満か
    pub fn are_neighbors(&self, a: Point, b: Point) -> bool {
        let limit = self.adjacency_factor * self.radius;
        a.distance_sq(b) < limit * limit
    }

    /// 周囲6マスの格子座標（範囲外も含む）
    pub fn neighbor_slots(&self, pos: LatticePos) -> [LatticePos; 6] {
        let dirs = if pos.is_odd_row() {
            &ODD_ROW_DIRS
        } else {
            &EVEN_ROW_DIRS
        };
        dirs.map(|(dr, dc)| LatticePos::new(pos.row + dr, pos.col + dc))
    }

    /// 盤面の範囲内か
    pub fn in_bounds(&self, pos: LatticePos) -> bool {
        pos.row >= 0
            && (pos.row as usize) < self.max_rows
            && pos.col >= 0
            && (pos.col as usize) < self.columns
    }

    /// 盤面の範囲内に丸める（行・列それぞれ最も近い値へ）
    pub fn clamp_to_bounds(&self, pos: LatticePos) -> LatticePos {
        let last_row = (self.max_rows as i32 - 1).max(0);
        let last_col = (self.columns as i32 - 1).max(0);
        LatticePos::new(pos.row.clamp(0, last_row), pos.col.clamp(0, last_col))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_roundtrip_over_whole_board() {
        let g = GridGeometry::default();
        for row in 0..g.max_rows as i32 {
            for col in 0..g.columns as i32 {
                let pos = LatticePos::new(row, col);
                assert_eq!(g.position_to_lattice(g.lattice_to_position(pos)), pos);
            }
        }
    }

    #[test]
    fn lattice_roundtrip_outside_board() {
        let g = GridGeometry::default();
        for pos in [
            LatticePos::new(-1, 0),
            LatticePos::new(-3, -2),
            LatticePos::new(40, 15),
            LatticePos::new(1, -1),
        ] {
            assert_eq!(g.position_to_lattice(g.lattice_to_position(pos)), pos);
        }
    }

    #[test]
    fn odd_rows_are_shifted_by_one_radius() {
        let g = GridGeometry::default();
        let even = g.lattice_to_position(LatticePos::new(0, 0));
        let odd = g.lattice_to_position(LatticePos::new(1, 0));
        assert_eq!(even.x, g.radius);
        assert_eq!(odd.x, 2.0 * g.radius);
        assert!((odd.y - even.y - g.row_pitch()).abs() < 1e-9);
    }

    #[test]
    fn first_row_center_matches_field_layout() {
        let g = GridGeometry::default();
        let p = g.lattice_to_position(LatticePos::new(0, 3));
        assert_eq!(p, Point::new(22.0 + 3.0 * 44.0, 42.0));
    }

    #[test]
    fn boundary_positions_floor_consistently() {
        let g = GridGeometry::default();
        // 境界ちょうどは下側・右側の格子に入る
        let q = Point::new(2.0 * g.radius, g.top_margin);
        assert_eq!(g.position_to_lattice(q), LatticePos::new(0, 1));
        let odd = Point::new(3.0 * g.radius, g.top_margin + 1.5 * g.row_pitch());
        assert_eq!(g.position_to_lattice(odd), LatticePos::new(1, 1));
        let left_of_odd = Point::new(3.0 * g.radius - 0.01, g.top_margin + 1.5 * g.row_pitch());
        assert_eq!(g.position_to_lattice(left_of_odd), LatticePos::new(1, 0));
    }

    #[test]
    fn neighbor_slots_are_exactly_geometric_neighbors() {
        let g = GridGeometry::default();
        for pos in [LatticePos::new(4, 4), LatticePos::new(5, 4)] {
            let center = g.lattice_to_position(pos);
            let slots = g.neighbor_slots(pos);
            for row in pos.row - 3..=pos.row + 3 {
                for col in pos.col - 3..=pos.col + 3 {
                    let other = LatticePos::new(row, col);
                    if other == pos {
                        continue;
                    }
                    let near = g.are_neighbors(center, g.lattice_to_position(other));
                    assert_eq!(near, slots.contains(&other), "{pos} vs {other}");
                }
            }
        }
    }

    #[test]
    fn neighbor_relation_is_symmetric() {
        let g = GridGeometry::default();
        let pos = LatticePos::new(3, 2);
        for n in g.neighbor_slots(pos) {
            assert!(g.neighbor_slots(n).contains(&pos));
        }
    }

    #[test]
    fn in_bounds_checks_rows_and_columns() {
        let g = GridGeometry::default();
        assert!(g.in_bounds(LatticePos::new(0, 0)));
        assert!(g.in_bounds(LatticePos::new(g.max_rows as i32 - 1, g.columns as i32 - 1)));
        assert!(!g.in_bounds(LatticePos::new(-1, 0)));
        assert!(!g.in_bounds(LatticePos::new(0, g.columns as i32)));
        assert!(!g.in_bounds(LatticePos::new(g.max_rows as i32, 0)));
    }

    #[test]
    fn clamp_to_bounds_snaps_outside_positions() {
        let g = GridGeometry::default();
        let last_row = g.max_rows as i32 - 1;
        assert_eq!(g.clamp_to_bounds(LatticePos::new(3, 4)), LatticePos::new(3, 4));
        assert_eq!(g.clamp_to_bounds(LatticePos::new(-2, 13)), LatticePos::new(0, 9));
        assert_eq!(g.clamp_to_bounds(LatticePos::new(20, -1)), LatticePos::new(last_row, 0));
    }
}
