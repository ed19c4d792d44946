// 並列実行

pub mod parallel;

pub use parallel::{GameSummary, ParallelConfig, ParallelExecutor};
