// インフラ層 - 外部システムとの接続、技術的実装

pub mod config_loader;
pub mod executor;
pub mod storage;

pub use config_loader::load_config;
pub use executor::{GameSummary, ParallelConfig, ParallelExecutor};
pub use storage::{EventRecord, EventWriter, FileEventWriter, MemoryEventWriter};
