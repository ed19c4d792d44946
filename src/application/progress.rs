// 進捗管理（複数ゲームの自動プレイ集計）

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 進捗統計
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub games_finished: u64,
    pub shots_fired: u64,
    pub bubbles_removed: u64,
    pub total_score: u64,
    pub best_score: u64,
}

/// 進捗マネージャー（スレッド間で共有して使う）
pub struct ProgressManager {
    abort_flag: Arc<AtomicBool>,
    games_finished: AtomicU64,
    shots_fired: AtomicU64,
    bubbles_removed: AtomicU64,
    total_score: AtomicU64,
    best_score: AtomicU64,
    start_time: Instant,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            abort_flag: Arc::new(AtomicBool::new(false)),
            games_finished: AtomicU64::new(0),
            shots_fired: AtomicU64::new(0),
            bubbles_removed: AtomicU64::new(0),
            total_score: AtomicU64::new(0),
            best_score: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// 中断フラグを取得
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort_flag)
    }

    /// 実行を中断
    pub fn abort(&self) {
        self.abort_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.abort_flag.load(Ordering::Relaxed)
    }

    pub fn add_shots(&self, count: u64) {
        self.shots_fired.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_removed(&self, count: u64) {
        self.bubbles_removed.fetch_add(count, Ordering::Relaxed);
    }

    /// 1ゲーム終了を記録
    pub fn finish_game(&self, score: u64) {
        self.games_finished.fetch_add(1, Ordering::Relaxed);
        self.total_score.fetch_add(score, Ordering::Relaxed);
        self.best_score.fetch_max(score, Ordering::Relaxed);
    }

    /// 現在の統計を取得
    pub fn get_stats(&self) -> ProgressStats {
        ProgressStats {
            games_finished: self.games_finished.load(Ordering::Relaxed),
            shots_fired: self.shots_fired.load(Ordering::Relaxed),
            bubbles_removed: self.bubbles_removed.load(Ordering::Relaxed),
            total_score: self.total_score.load(Ordering::Relaxed),
            best_score: self.best_score.load(Ordering::Relaxed),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 発射速度（発/秒）
    pub fn shots_per_second(&self) -> f64 {
        let shots = self.shots_fired.load(Ordering::Relaxed) as f64;
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            shots / elapsed
        } else {
            0.0
        }
    }

    /// リセット
    pub fn reset(&mut self) {
        self.abort_flag.store(false, Ordering::Relaxed);
        for counter in [
            &self.games_finished,
            &self.shots_fired,
            &self.bubbles_removed,
            &self.total_score,
            &self.best_score,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.start_time = Instant::now();
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
