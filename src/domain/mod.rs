// ドメイン層 - 六角格子のマッチングエンジンの中核

pub mod bubble;
pub mod config;
pub mod error;
pub mod grid;
pub mod resolve;
