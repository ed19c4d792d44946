// 泡ID - 配列位置に依存しない安定した識別子

use nohash_hasher::BuildNoHashHasher;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

// ID キー専用のノーハッシュ
pub type IdMap<V> = HashMap<BubbleId, V, BuildNoHashHasher<BubbleId>>;
pub type IdSet = HashSet<BubbleId, BuildNoHashHasher<BubbleId>>;

/// 泡の一意なID（セッション内で再利用しない）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BubbleId(pub u64);

impl BubbleId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// 単一の u64 を書き込むだけなのでノーハッシュで扱える
impl nohash_hasher::IsEnabled for BubbleId {}
