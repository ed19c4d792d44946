// エンジン設定のValue Objects

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// 泡の半径（px）を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BubbleRadius(f64);

impl BubbleRadius {
    pub fn new(px: f64) -> Result<Self> {
        if !px.is_finite() || px <= 0.0 {
            return Err(anyhow!("半径は正の有限値である必要があります: {}", px));
        }
        Ok(Self(px))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

/// 確率を表すValue Object (0.0 ~ 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(anyhow!("確率は0.0~1.0の範囲: {}", value));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn zero() -> Self {
        Self(0.0)
    }
}

/// 消去に必要な連結数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchThreshold(usize);

impl MatchThreshold {
    pub fn new(count: usize) -> Result<Self> {
        if count < 2 {
            return Err(anyhow!("消去数は2以上である必要があります: {}", count));
        }
        if count > 12 {
            return Err(anyhow!("消去数が大きすぎます: {}", count));
        }
        Ok(Self(count))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// 格子と特殊泡の効果範囲
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub radius: BubbleRadius,
    pub columns: usize,
    pub level_max_rows: usize,
    pub board_max_rows: usize,
    pub top_margin: f64,
    pub adjacency_factor: f64,
    pub area_clear_radius: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            radius: BubbleRadius(BUBBLE_RADIUS),
            columns: COLS,
            level_max_rows: LEVEL_MAX_ROWS,
            board_max_rows: BOARD_MAX_ROWS,
            top_margin: TOP_MARGIN,
            adjacency_factor: ADJACENCY_FACTOR,
            area_clear_radius: AREA_CLEAR_RADIUS,
        }
    }
}

/// 特殊泡の出現確率（2つは独立に判定し、両方当たれば列消しを優先）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    pub area_clear: Probability,
    pub column_clear: Probability,
}

impl SpawnWeights {
    /// レベル生成時の確率
    pub fn level_fill() -> Self {
        Self {
            area_clear: Probability(LEVEL_AREA_CLEAR_CHANCE),
            column_clear: Probability(LEVEL_COLUMN_CLEAR_CHANCE),
        }
    }

    /// 発射用に生成する泡の確率
    pub fn runtime() -> Self {
        Self {
            area_clear: Probability(SPAWN_AREA_CLEAR_CHANCE),
            column_clear: Probability(SPAWN_COLUMN_CLEAR_CHANCE),
        }
    }

    /// 特殊泡なし（色のみ）
    pub fn colors_only() -> Self {
        Self {
            area_clear: Probability::zero(),
            column_clear: Probability::zero(),
        }
    }
}

/// 得点設定
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub match_points: u64,
    pub fall_points: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_points: MATCH_POINTS,
            fall_points: FALL_POINTS,
        }
    }
}

/// 物理（弾の移動）に関する設定
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    pub shooter_offset: f64,
    pub projectile_speed: f64,
    pub wall_restitution: f64,
    pub aim_margin: f64,
    pub miss_margin: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            shooter_offset: SHOOTER_OFFSET,
            projectile_speed: PROJECTILE_SPEED,
            wall_restitution: WALL_RESTITUTION,
            aim_margin: AIM_MARGIN,
            miss_margin: MISS_MARGIN,
        }
    }
}

/// エンジン全体の設定
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub min_match: MatchThreshold,
    pub scoring: ScoringConfig,
    pub level_spawn: SpawnWeights,
    pub runtime_spawn: SpawnWeights,
    pub field: FieldConfig,
    pub max_lives: u32,
}

impl EngineConfig {
    /// 値同士の整合性を検証（デシリアライズ後にも呼ぶ）
    pub fn validate(&self) -> Result<()> {
        let g = &self.grid;
        BubbleRadius::new(g.radius.get())?;
        MatchThreshold::new(self.min_match.get())?;
        for w in [&self.level_spawn, &self.runtime_spawn] {
            Probability::new(w.area_clear.get())?;
            Probability::new(w.column_clear.get())?;
        }
        if g.columns == 0 {
            return Err(anyhow!("列数は1以上である必要があります"));
        }
        if g.level_max_rows == 0 || g.board_max_rows < g.level_max_rows {
            return Err(anyhow!(
                "行数が不正: level_max_rows={} board_max_rows={}",
                g.level_max_rows,
                g.board_max_rows
            ));
        }
        // 隣接6方向（距離2r）を含み、2周目（距離2√3r）を含まないこと
        let f = g.adjacency_factor;
        if !(2.0 < f && f < 2.0 * 3f64.sqrt()) {
            return Err(anyhow!("隣接係数は(2.0, 2√3)の範囲: {}", f));
        }
        if !(g.area_clear_radius.is_finite() && g.area_clear_radius > 0.0) {
            return Err(anyhow!(
                "範囲消しの半径は正である必要があります: {}",
                g.area_clear_radius
            ));
        }
        if !g.top_margin.is_finite() {
            return Err(anyhow!("上端余白が不正: {}", g.top_margin));
        }
        // 弾が盤面の右端をすり抜けない幅（壁際の弾と端の泡の中心距離が2r未満）
        let r = g.radius.get();
        let row_span = r * (2.0 * g.columns as f64 + 1.0);
        let width = self.field.width;
        if !(row_span <= width && width < row_span + 2.0 * r) {
            return Err(anyhow!(
                "フィールド幅 {} は盤面の横幅 {} 以上 {} 未満である必要があります",
                width,
                row_span,
                row_span + 2.0 * r
            ));
        }
        if !(self.field.projectile_speed.is_finite() && self.field.projectile_speed > 0.0) {
            return Err(anyhow!("弾速は正である必要があります"));
        }
        if !(0.0..=1.0).contains(&self.field.wall_restitution) {
            return Err(anyhow!("反発係数は0.0~1.0の範囲"));
        }
        if self.max_lives == 0 {
            return Err(anyhow!("残機は1以上である必要があります"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            min_match: MatchThreshold(MIN_MATCH),
            scoring: ScoringConfig::default(),
            level_spawn: SpawnWeights::level_fill(),
            runtime_spawn: SpawnWeights::runtime(),
            field: FieldConfig::default(),
            max_lives: MAX_LIVES,
        }
    }
}
