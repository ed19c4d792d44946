// 着弾から消去までの解決処理（ドメイン層）

pub mod cluster;
pub mod placement;
pub mod pruner;
pub mod result;
pub mod special;

pub use cluster::ClusterMatcher;
pub use placement::Placement;
pub use pruner::ConnectivityPruner;
pub use result::{RemovedBubble, Resolution};
pub use special::SpecialEffectResolver;
