// Board型 - 吸着済みの泡を格子座標とIDの両方で引ける疎な盤面

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};

use super::geometry::{GridGeometry, LatticePos, Point};
use crate::domain::bubble::{BubbleId, BubbleKind, IdMap};
use crate::domain::error::EngineError;

/// 盤面に吸着している泡
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachedBubble {
    pub id: BubbleId,
    pub kind: BubbleKind,
    pub pos: LatticePos,
}

/// 吸着済みの泡の集合
///
/// ID → 泡 と 格子 → ID の2つの索引を常に同期して持つ。
/// 格子側は BTreeMap なので走査順は行優先で決定的。
#[derive(Clone, Debug)]
pub struct Board {
    geometry: GridGeometry,
    bubbles: IdMap<AttachedBubble>,
    slots: BTreeMap<LatticePos, BubbleId>,
    next_id: u64,
}

impl Board {
    /// 空の盤面を作成
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            bubbles: IdMap::default(),
            slots: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// 新しいIDを発行して挿入
    pub fn spawn(&mut self, kind: BubbleKind, pos: LatticePos) -> Result<BubbleId, EngineError> {
        let id = BubbleId(self.next_id);
        self.insert(id, kind, pos)?;
        Ok(id)
    }

    /// 指定IDで挿入（範囲外・使用中・発行済みIDは失敗）
    ///
    /// 一度発行したIDは取り除いた後でも受け付けない。
    pub fn insert(
        &mut self,
        id: BubbleId,
        kind: BubbleKind,
        pos: LatticePos,
    ) -> Result<(), EngineError> {
        if id.get() < self.next_id {
            return Err(EngineError::StaleId { id });
        }
        if !self.geometry.in_bounds(pos) {
            return Err(EngineError::OutOfBounds { pos });
        }
        if let Some(&occupant) = self.slots.get(&pos) {
            return Err(EngineError::SlotOccupied { pos, occupant });
        }
        self.slots.insert(pos, id);
        self.bubbles.insert(id, AttachedBubble { id, kind, pos });
        self.next_id = id.get() + 1;
        Ok(())
    }

    /// IDで取り除く（両索引から）
    pub fn remove(&mut self, id: BubbleId) -> Option<AttachedBubble> {
        let bubble = self.bubbles.remove(&id)?;
        self.slots.remove(&bubble.pos);
        Some(bubble)
    }

    /// 格子位置の泡を取得
    pub fn get(&self, pos: LatticePos) -> Option<AttachedBubble> {
        self.slots.get(&pos).and_then(|id| self.bubbles.get(id)).copied()
    }

    /// IDの泡を取得
    pub fn bubble(&self, id: BubbleId) -> Option<AttachedBubble> {
        self.bubbles.get(&id).copied()
    }

    pub fn contains(&self, id: BubbleId) -> bool {
        self.bubbles.contains_key(&id)
    }

    pub fn is_occupied(&self, pos: LatticePos) -> bool {
        self.slots.contains_key(&pos)
    }

    /// 範囲内かつ空いている格子か
    pub fn is_free(&self, pos: LatticePos) -> bool {
        self.geometry.in_bounds(pos) && !self.is_occupied(pos)
    }

    /// 吸着済みの泡を行優先順で列挙
    pub fn all_attached(&self) -> impl Iterator<Item = AttachedBubble> + '_ {
        self.slots.values().filter_map(|id| self.bubbles.get(id).copied())
    }

    /// アンカー行（0行目）の泡を列挙
    pub fn anchored(&self) -> impl Iterator<Item = AttachedBubble> + '_ {
        let first_row = LatticePos::new(0, i32::MIN)..LatticePos::new(1, i32::MIN);
        self.slots
            .range(first_row)
            .filter_map(|(_, id)| self.bubbles.get(id).copied())
    }

    /// 周囲6マスのうち泡がある格子（全泡の総当たりはしない）
    pub fn neighbors_of(&self, pos: LatticePos) -> Vec<LatticePos> {
        self.geometry
            .neighbor_slots(pos)
            .into_iter()
            .filter(|n| self.slots.contains_key(n))
            .collect()
    }

    /// 泡の中心座標
    pub fn center_of(&self, id: BubbleId) -> Option<Point> {
        self.bubbles
            .get(&id)
            .map(|b| self.geometry.lattice_to_position(b.pos))
    }

    /// 全消去（ID発行位置はセッション中維持する）
    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.slots.clear();
    }

    /// 2つの索引の整合性を検証
    pub fn validate(&self) -> Result<()> {
        if self.bubbles.len() != self.slots.len() {
            return Err(anyhow!(
                "索引の件数が不一致: id={} slot={}",
                self.bubbles.len(),
                self.slots.len()
            ));
        }
        for (pos, id) in &self.slots {
            let bubble = self
                .bubbles
                .get(id)
                .ok_or_else(|| anyhow!("格子 {} の {} がID索引にない", pos, id))?;
            if bubble.pos != *pos {
                return Err(anyhow!("{} の位置が不一致: {} / {}", id, bubble.pos, pos));
            }
            if id.get() >= self.next_id {
                return Err(anyhow!("{} が発行位置 {} を越えている", id, self.next_id));
            }
        }
        Ok(())
    }

    /// 文字列表現から構築
    ///
    /// 1行が盤面の1行。`.` は空き、`0`〜`5` は色、`A` は範囲消し、`C` は列消し。
    /// 行内の空白は無視し、空行は読み飛ばす（空の行は `.` で書く）。
    /// 列数に満たない行は右側が空きになる。
    pub fn from_layout(geometry: GridGeometry, layout: &str) -> Result<Self> {
        let mut board = Self::new(geometry);
        let rows = layout
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|chars| !chars.is_empty());

        for (row, chars) in rows.enumerate() {
            if chars.len() > geometry.columns {
                return Err(anyhow!(
                    "{}行目の文字数が多すぎます: 最大{}、実際{}",
                    row,
                    geometry.columns,
                    chars.len()
                ));
            }
            for (col, &ch) in chars.iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let pos = LatticePos::new(row as i32, col as i32);
                let kind = BubbleKind::from_char(ch)
                    .with_context(|| format!("格子 {} の文字が不正", pos))?;
                board.spawn(kind, pos)?;
            }
        }

        Ok(board)
    }

    /// 文字列表現に変換（奇数行は1文字ぶん字下げ、末尾の空行は省略）
    pub fn to_layout(&self) -> String {
        let last_row = match self.slots.keys().map(|p| p.row).max() {
            Some(r) => r,
            None => return String::new(),
        };
        let mut s = String::new();
        for row in 0..=last_row {
            if row % 2 == 1 {
                s.push(' ');
            }
            for col in 0..self.geometry.columns as i32 {
                let ch = self
                    .get(LatticePos::new(row, col))
                    .map(|b| b.kind.to_char())
                    .unwrap_or('.');
                s.push(ch);
            }
            s.push('\n');
        }
        s
    }
}
