// 泡そのものを表す値型

pub mod id;
pub mod kind;

pub use id::{BubbleId, IdMap, IdSet};
pub use kind::BubbleKind;
