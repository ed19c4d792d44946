// エンジンのイベント定義（描画・音・UI 層に依存しない）

use serde::{Deserialize, Serialize};

use crate::domain::resolve::RemovedBubble;

/// エンジン・セッションから外部へ通知するイベント
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// マッチ・特殊効果で消えた泡
    Matched { bubbles: Vec<RemovedBubble>, points: u64 },
    /// 支えを失って落ちた泡
    Fell { bubbles: Vec<RemovedBubble>, points: u64 },
    /// 盤面が空になった（1回の解決につき最大1回）
    BoardCleared,
    /// 弾がどこにも吸着せず画面外へ出た
    Missed,
    /// レベル開始
    LevelStarted { level: u32, rows: usize },
    /// 残機が減った
    LifeLost { remaining: u32 },
    /// ゲーム終了
    GameOver { score: u64, level: u32 },
}

impl EngineEvent {
    /// ログ・集計用の短い名前
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Matched { .. } => "matched",
            EngineEvent::Fell { .. } => "fell",
            EngineEvent::BoardCleared => "board_cleared",
            EngineEvent::Missed => "missed",
            EngineEvent::LevelStarted { .. } => "level_started",
            EngineEvent::LifeLost { .. } => "life_lost",
            EngineEvent::GameOver { .. } => "game_over",
        }
    }
}
