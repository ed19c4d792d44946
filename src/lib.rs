// 六角格子バブルシューター - 着弾解決エンジン ライブラリモジュール

pub mod constants;
pub mod domain;         // ドメイン層
pub mod application;    // アプリケーション層
pub mod infrastructure; // インフラ層
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::{
    EngineEvent, EngineState, GameSession, ProjectileState, ResolutionCoordinator,
    ResolutionReport,
};
pub use domain::bubble::{BubbleId, BubbleKind};
pub use domain::config::EngineConfig;
pub use domain::error::EngineError;
pub use domain::grid::{Board, GridGeometry, LatticePos, Point};
pub use domain::resolve::{RemovedBubble, Resolution};
