// 並列実行管理 - シードごとの自動プレイを rayon で並べる

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::session::{GameSession, DEFAULT_MAX_STEPS};
use crate::application::{EngineEvent, ProgressManager};
use crate::domain::config::EngineConfig;
use crate::infrastructure::storage::EventRecord;
use crate::vlog;

const LOG_EXEC_VERBOSE: bool = true;

/// 自動プレイの照準用乱数をゲーム本体の乱数と分ける
const AIM_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// 並列実行設定
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// ワーカースレッド数
    pub num_workers: usize,
    /// 1ゲームあたりの最大発射数
    pub max_shots: u64,
    /// イベントを集計結果に含めるか
    pub record_events: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            max_shots: 500,
            record_events: false,
        }
    }
}

impl ParallelConfig {
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Self::default()
        }
    }

    pub fn with_max_shots(mut self, max_shots: u64) -> Self {
        self.max_shots = max_shots;
        self
    }

    pub fn with_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }
}

/// 1ゲームの集計
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub score: u64,
    pub level: u32,
    pub shots: u64,
    pub removed: u64,
    pub game_over: bool,
    #[serde(skip)]
    pub events: Vec<EventRecord>,
}

/// 並列実行エグゼキューター
pub struct ParallelExecutor {
    config: ParallelConfig,
    abort_flag: Arc<AtomicBool>,
}

impl ParallelExecutor {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            config,
            abort_flag: Arc::new(AtomicBool::new(false)),
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

    pub fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// シードごとに1ゲームずつ自動プレイし、シード順の集計を返す
    ///
    /// 中断された場合、未開始のゲームは結果に含まれない。
    pub fn run(
        &self,
        engine: &EngineConfig,
        seeds: &[u64],
        progress: &ProgressManager,
    ) -> Result<Vec<GameSummary>> {
        engine.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_workers.max(1))
            .build()?;

        let results: Vec<Option<GameSummary>> = pool.install(|| {
            seeds
                .par_iter()
                .map(|&seed| {
                    if self.is_aborted() || progress.is_aborted() {
                        return Ok(None);
                    }
                    self.play_game(engine, seed, progress).map(Some)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(results.into_iter().flatten().collect())
    }

    fn play_game(
        &self,
        engine: &EngineConfig,
        seed: u64,
        progress: &ProgressManager,
    ) -> Result<GameSummary> {
        let mut session = GameSession::new(engine.clone(), seed)?;
        let mut aim_rng = StdRng::seed_from_u64(seed ^ AIM_SEED_SALT);
        let mut records = Vec::new();
        let mut removed = 0u64;

        let start = session.start()?;
        self.record(&mut records, seed, 0, start);

        while !session.is_game_over() && session.shots() < self.config.max_shots {
            if self.is_aborted() || progress.is_aborted() {
                break;
            }
            let angle = choose_angle(&session, &mut aim_rng);
            let events = session.play_shot(angle, DEFAULT_MAX_STEPS)?;
            let shot_removed = removed_count(&events);
            removed += shot_removed;
            progress.add_shots(1);
            progress.add_removed(shot_removed);
            self.record(&mut records, seed, session.shots(), events);
        }

        progress.finish_game(session.score());
        if LOG_EXEC_VERBOSE {
            vlog!(
                "[実行] シード{} 得点={} レベル={} 発射={} 終了={}",
                seed,
                session.score(),
                session.level(),
                session.shots(),
                session.is_game_over()
            );
        }

        Ok(GameSummary {
            seed,
            score: session.score(),
            level: session.level(),
            shots: session.shots(),
            removed,
            game_over: session.is_game_over(),
            events: records,
        })
    }

    fn record(
        &self,
        records: &mut Vec<EventRecord>,
        game: u64,
        shot: u64,
        events: Vec<EngineEvent>,
    ) {
        if self.config.record_events {
            records.extend(events.into_iter().map(|e| EventRecord::new(game, shot, e)));
        }
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(ParallelConfig::default())
    }
}

/// 消えた泡の数（マッチ＋落下）
fn removed_count(events: &[EngineEvent]) -> u64 {
    events
        .iter()
        .map(|e| match e {
            EngineEvent::Matched { bubbles, .. } | EngineEvent::Fell { bubbles, .. } => {
                bubbles.len() as u64
            }
            _ => 0,
        })
        .sum()
}

/// 自動プレイの照準: 次弾と同じ種類の泡のうち一番下の列を狙う。無ければ乱数
fn choose_angle(session: &GameSession, rng: &mut StdRng) -> f64 {
    let kind = session.next_kind();
    let board = session.board();
    let lowest_row = board
        .all_attached()
        .filter(|b| kind.is_special() || b.kind == kind)
        .map(|b| b.pos.row)
        .max();

    if let Some(row) = lowest_row {
        let targets: Vec<_> = board
            .all_attached()
            .filter(|b| b.pos.row == row && (kind.is_special() || b.kind == kind))
            .collect();
        let target = targets[rng.gen_range(0..targets.len())];
        return session.aim_at(board.geometry().lattice_to_position(target.pos));
    }
    rng.gen_range(-2.8..-0.34)
}
