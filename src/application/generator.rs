// 泡の種類の生成とレベルの盤面生成

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::COLOR_COUNT;
use crate::domain::bubble::BubbleKind;
use crate::domain::config::{EngineConfig, SpawnWeights};
use crate::domain::grid::{Board, LatticePos};
use crate::vlog;

const LOG_GEN_VERBOSE: bool = true;

/// 生成の用途（確率が異なる）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnMode {
    /// レベル開始時の盤面
    LevelFill,
    /// 発射する弾
    Runtime,
}

/// レベルの初期行数: min(6 + level/2, max_rows)
pub fn level_row_count(level: u32, max_rows: usize) -> usize {
    (6 + level as usize / 2).min(max_rows)
}

/// 抽選結果から種類を決める
///
/// 範囲消しと列消しは独立に判定し、両方当たった場合は列消しを優先する。
pub fn kind_from_rolls(
    area_roll: f64,
    column_roll: f64,
    color: u8,
    weights: &SpawnWeights,
) -> BubbleKind {
    let area = area_roll < weights.area_clear.get();
    let column = column_roll < weights.column_clear.get();
    if column {
        BubbleKind::ColumnClear
    } else if area {
        BubbleKind::AreaClear
    } else {
        debug_assert!(color < COLOR_COUNT, "色番号が範囲外: {color}");
        BubbleKind::Color(color)
    }
}

/// 重み付きで泡の種類を生成する
pub struct BubbleGenerator<R: Rng> {
    rng: R,
    level_weights: SpawnWeights,
    runtime_weights: SpawnWeights,
    level_max_rows: usize,
}

impl BubbleGenerator<StdRng> {
    /// シード固定の生成器（再現性あり）
    pub fn seeded(seed: u64, config: &EngineConfig) -> Self {
        Self::new(StdRng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> BubbleGenerator<R> {
    pub fn new(rng: R, config: &EngineConfig) -> Self {
        Self {
            rng,
            level_weights: config.level_spawn,
            runtime_weights: config.runtime_spawn,
            level_max_rows: config.grid.level_max_rows,
        }
    }

    /// 種類を1つ生成
    pub fn generate_kind(&mut self, mode: SpawnMode) -> BubbleKind {
        let weights = match mode {
            SpawnMode::LevelFill => self.level_weights,
            SpawnMode::Runtime => self.runtime_weights,
        };
        // 乱数列が用途によらず一定になるよう毎回3つ引く
        let area_roll: f64 = self.rng.gen();
        let column_roll: f64 = self.rng.gen();
        let color = self.rng.gen_range(0..COLOR_COUNT);
        kind_from_rolls(area_roll, column_roll, color, &weights)
    }

    /// 盤面を空にしてレベルの行数ぶん全列を埋める。埋めた行数を返す
    pub fn fill_level(&mut self, board: &mut Board, level: u32) -> Result<usize> {
        let columns = board.geometry().columns;
        let rows = level_row_count(level, self.level_max_rows);
        board.clear();
        for row in 0..rows {
            for col in 0..columns {
                let kind = self.generate_kind(SpawnMode::LevelFill);
                let pos = LatticePos::new(row as i32, col as i32);
                board
                    .spawn(kind, pos)
                    .with_context(|| format!("レベル{}の格子{}を埋められません", level, pos))?;
            }
        }
        if LOG_GEN_VERBOSE {
            vlog!("[生成器] レベル{} 行数={} 泡={}", level, rows, board.len());
        }
        Ok(rows)
    }
}
