// エンジンのエラー種別

use crate::domain::bubble::BubbleId;
use crate::domain::grid::LatticePos;
use std::fmt;

/// エンジンが返す型付きエラー
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// 既に泡がある格子へ挿入しようとした（配置処理の内部でのみ発生）
    SlotOccupied { pos: LatticePos, occupant: BubbleId },
    /// 盤面の範囲外
    OutOfBounds { pos: LatticePos },
    /// 発行済みのIDで挿入しようとした（IDは再利用しない）
    StaleId { id: BubbleId },
    /// 空き格子が見つからず吸着できない（ラウンド終了扱い）
    PlacementFailed { near: LatticePos },
    /// 認識できない種類コード
    InvalidKind { code: u8 },
    /// 盤面テキストの不正文字
    InvalidSymbol { ch: char },
    /// 現在の状態では受け付けない操作
    InvalidState { expected: &'static str, actual: &'static str },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SlotOccupied { pos, occupant } => {
                write!(f, "格子 {pos} は既に {occupant} が使用中")
            }
            EngineError::OutOfBounds { pos } => write!(f, "格子 {pos} は盤面の範囲外"),
            EngineError::StaleId { id } => write!(f, "{id} は発行済みのため再利用できません"),
            EngineError::PlacementFailed { near } => {
                write!(f, "格子 {near} 付近に空きがなく配置できません")
            }
            EngineError::InvalidKind { code } => write!(f, "不正な種類コード: {code}"),
            EngineError::InvalidSymbol { ch } => write!(f, "不正な文字: {ch}"),
            EngineError::InvalidState { expected, actual } => {
                write!(f, "状態が不正: 期待 {expected}、実際 {actual}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
