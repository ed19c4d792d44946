// 盤面・フィールド定数

/// ====== 盤面定数 ======
/// 1 行あたりの列数
pub const COLS: usize = 10;
/// レベル生成で埋める最大行数
pub const LEVEL_MAX_ROWS: usize = 12;
/// 配置可能な最大行数（これより下には吸着できない）
pub const BOARD_MAX_ROWS: usize = 18;
/// 泡の半径（px）
pub const BUBBLE_RADIUS: f64 = 22.0;
/// 盤面上端（アンカー行の上端）までの余白
pub const TOP_MARGIN: f64 = 20.0;
/// 隣接判定の距離係数（半径倍）。接触距離 2.0 より少し大きめ
pub const ADJACENCY_FACTOR: f64 = 2.1;
/// 範囲消し泡の効果半径（px）
pub const AREA_CLEAR_RADIUS: f64 = 120.0;

/// 色の数（通常泡の種類）
pub const COLOR_COUNT: u8 = 6;
/// 消去に必要な最小連結数
pub const MIN_MATCH: usize = 3;

/// ====== 得点 ======
pub const MATCH_POINTS: u64 = 20;
pub const FALL_POINTS: u64 = 10;

/// ====== フィールド（物理） ======
pub const FIELD_WIDTH: f64 = 480.0;
pub const FIELD_HEIGHT: f64 = 800.0;
/// 発射台の下端からの距離
pub const SHOOTER_OFFSET: f64 = 60.0;
pub const PROJECTILE_SPEED: f64 = 8.0;
pub const WALL_RESTITUTION: f64 = 0.7;
/// 発射角の水平からの最小余裕（rad）
pub const AIM_MARGIN: f64 = 0.1;
/// 画面下端をこれだけ越えたら外れ
pub const MISS_MARGIN: f64 = 50.0;
pub const MAX_LIVES: u32 = 3;

/// ====== 出現確率 ======
pub const LEVEL_AREA_CLEAR_CHANCE: f64 = 0.05;
pub const LEVEL_COLUMN_CLEAR_CHANCE: f64 = 0.05;
pub const SPAWN_AREA_CLEAR_CHANCE: f64 = 0.10;
pub const SPAWN_COLUMN_CLEAR_CHANCE: f64 = 0.10;
