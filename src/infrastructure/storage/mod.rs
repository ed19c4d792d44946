// 永続化 - イベントの書き出し

pub mod writer;

pub use writer::{EventRecord, EventWriter, FileEventWriter, MemoryEventWriter, OutputFormat};
