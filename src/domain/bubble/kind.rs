// 泡の種類定義（ドメイン層）

use crate::constants::COLOR_COUNT;
use crate::domain::error::EngineError;
use serde::{Deserialize, Serialize};

/// 泡の種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleKind {
    Color(u8),   // 0..=5 = '0'..'5'
    AreaClear,   // 'A' 周囲をまとめて消す
    ColumnClear, // 'C' 同じ列をまとめて消す
}

impl BubbleKind {
    /// 色番号から通常泡を作る（範囲外は InvalidKind）
    pub fn color(index: u8) -> Result<Self, EngineError> {
        if index >= COLOR_COUNT {
            return Err(EngineError::InvalidKind { code: index });
        }
        Ok(BubbleKind::Color(index))
    }

    /// 種類コード（0..=5 色, 6 範囲消し, 7 列消し）から変換
    pub fn from_code(code: u8) -> Result<Self, EngineError> {
        match code {
            c if c < COLOR_COUNT => Ok(BubbleKind::Color(c)),
            6 => Ok(BubbleKind::AreaClear),
            7 => Ok(BubbleKind::ColumnClear),
            _ => Err(EngineError::InvalidKind { code }),
        }
    }

    /// 種類コードに変換
    pub fn code(self) -> u8 {
        match self {
            BubbleKind::Color(c) => c,
            BubbleKind::AreaClear => 6,
            BubbleKind::ColumnClear => 7,
        }
    }

    pub fn is_special(self) -> bool {
        !matches!(self, BubbleKind::Color(_))
    }

    /// 盤面テキストの1文字から変換
    pub fn from_char(ch: char) -> Result<Self, EngineError> {
        match ch {
            '0'..='9' => Self::color(ch as u8 - b'0'),
            'A' => Ok(BubbleKind::AreaClear),
            'C' => Ok(BubbleKind::ColumnClear),
            _ => Err(EngineError::InvalidSymbol { ch }),
        }
    }

    /// 盤面テキスト用の1文字に変換
    pub fn to_char(self) -> char {
        match self {
            BubbleKind::Color(c) => (b'0' + c) as char,
            BubbleKind::AreaClear => 'A',
            BubbleKind::ColumnClear => 'C',
        }
    }

    /// 表示名（ログ用）
    pub fn label(self) -> &'static str {
        match self {
            BubbleKind::Color(0) => "血赤",
            BubbleKind::Color(1) => "藍",
            BubbleKind::Color(2) => "深緑",
            BubbleKind::Color(3) => "金",
            BubbleKind::Color(4) => "青灰",
            BubbleKind::Color(5) => "セピア",
            BubbleKind::Color(_) => "?",
            BubbleKind::AreaClear => "爆弾",
            BubbleKind::ColumnClear => "稲妻",
        }
    }
}
