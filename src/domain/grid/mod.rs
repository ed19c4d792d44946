// 盤面関連のドメイン層 - 六角格子と盤面

pub mod board;
pub mod geometry;

pub use board::{AttachedBubble, Board};
pub use geometry::{GridGeometry, LatticePos, Point};
