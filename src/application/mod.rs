// アプリケーション層 - 着弾解決の進行、セッション、泡の生成

pub mod coordinator;
pub mod event;
pub mod generator;
pub mod physics;
pub mod progress;
pub mod session;

pub use coordinator::{EngineState, ProjectileState, ResolutionCoordinator, ResolutionReport};
pub use event::EngineEvent;
pub use generator::{level_row_count, BubbleGenerator, SpawnMode};
pub use physics::{Projectile, StepOutcome};
pub use progress::{ProgressManager, ProgressStats};
pub use session::GameSession;
