// ゲームセッション - 残機・レベル進行・次弾・ゲームオーバー

use anyhow::Result;
use crossbeam_channel::Sender;
use rand::rngs::StdRng;

use super::coordinator::{EngineState, ResolutionCoordinator};
use super::event::EngineEvent;
use super::generator::{BubbleGenerator, SpawnMode};
use super::physics::{shooter_position, Projectile, StepOutcome};
use crate::domain::bubble::BubbleKind;
use crate::domain::config::EngineConfig;
use crate::domain::error::EngineError;
use crate::domain::grid::{Board, Point};
use crate::vlog;

const LOG_SESSION_VERBOSE: bool = true;

/// 1発の弾が決着するまでの上限ステップ数（既定の速度なら十分）
pub const DEFAULT_MAX_STEPS: usize = 2_000;

/// 1プレイ分の状態をまとめて所有する
pub struct GameSession {
    coordinator: ResolutionCoordinator,
    generator: BubbleGenerator<StdRng>,
    level: u32,
    lives: u32,
    next_kind: BubbleKind,
    projectile: Option<Projectile>,
    game_over: bool,
    shots: u64,
    events_tx: Option<Sender<EngineEvent>>,
}

impl GameSession {
    /// シード固定で作成（盤面はまだ空。`start` で埋める）
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self> {
        let mut generator = BubbleGenerator::seeded(seed, &config);
        let lives = config.max_lives;
        let coordinator = ResolutionCoordinator::new(config)?;
        let next_kind = generator.generate_kind(SpawnMode::Runtime);
        Ok(Self {
            coordinator,
            generator,
            level: 1,
            lives,
            next_kind,
            projectile: None,
            game_over: false,
            shots: 0,
            events_tx: None,
        })
    }

    pub fn with_event_sender(mut self, tx: Sender<EngineEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    pub fn board(&self) -> &Board {
        self.coordinator.board()
    }

    pub fn config(&self) -> &EngineConfig {
        self.coordinator.config()
    }

    pub fn score(&self) -> u64 {
        self.coordinator.score()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn shots(&self) -> u64 {
        self.shots
    }

    pub fn next_kind(&self) -> BubbleKind {
        self.next_kind
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn state(&self) -> EngineState {
        self.coordinator.state()
    }

    /// レベル1から開始する
    pub fn start(&mut self) -> Result<Vec<EngineEvent>> {
        self.level = 1;
        self.lives = self.coordinator.config().max_lives;
        self.game_over = false;
        self.projectile = None;
        self.shots = 0;
        self.coordinator.reset();
        let events = vec![self.fill_level()?];
        self.emit(&events);
        Ok(events)
    }

    /// 発射台から目標点へ向けた角度（制限前）
    pub fn aim_at(&self, target: Point) -> f64 {
        let origin = shooter_position(&self.coordinator.config().field);
        (target.y - origin.y).atan2(target.x - origin.x)
    }

    /// 次弾を角度 angle で発射する
    pub fn fire(&mut self, angle: f64) -> Result<(), EngineError> {
        if self.game_over {
            return Err(EngineError::InvalidState {
                expected: "Playing",
                actual: "GameOver",
            });
        }
        self.coordinator.launch()?;
        let kind = self.next_kind;
        let field = &self.coordinator.config().field;
        self.projectile = Some(Projectile::launch(kind, angle, field));
        self.next_kind = self.generator.generate_kind(SpawnMode::Runtime);
        self.shots += 1;
        if LOG_SESSION_VERBOSE {
            vlog!(
                "[セッション] 発射 {} 角度={:.3} 次弾={}",
                kind.label(),
                angle,
                self.next_kind.label()
            );
        }
        Ok(())
    }

    /// 弾を1ステップ進め、決着したらイベントを返す
    pub fn tick(&mut self) -> Result<Vec<EngineEvent>> {
        let Some(mut projectile) = self.projectile else {
            return Ok(Vec::new());
        };
        let outcome = projectile.step(self.coordinator.board(), &self.coordinator.config().field);
        let events = match outcome {
            StepOutcome::Flying => {
                self.projectile = Some(projectile);
                return Ok(Vec::new());
            }
            StepOutcome::Missed => {
                self.projectile = None;
                self.handle_miss()?
            }
            StepOutcome::Collided(state) => {
                self.projectile = None;
                match self.coordinator.report_collision(state) {
                    Ok(report) => {
                        let mut events = report.events;
                        if report.resolution.board_cleared {
                            self.level += 1;
                            events.push(self.fill_level()?);
                        }
                        events
                    }
                    Err(EngineError::PlacementFailed { near }) => {
                        if LOG_SESSION_VERBOSE {
                            vlog!("[セッション] 配置不能 格子{}付近", near);
                        }
                        vec![self.finish()]
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };
        self.emit(&events);
        Ok(events)
    }

    /// 発射から決着までを進める
    pub fn play_shot(&mut self, angle: f64, max_steps: usize) -> Result<Vec<EngineEvent>> {
        self.fire(angle)?;
        for _ in 0..max_steps {
            let events = self.tick()?;
            if self.projectile.is_none() {
                return Ok(events);
            }
        }
        anyhow::bail!("{}ステップ以内に弾が決着しませんでした", max_steps)
    }

    fn handle_miss(&mut self) -> Result<Vec<EngineEvent>> {
        let mut events = self.coordinator.report_miss()?;
        self.lives = self.lives.saturating_sub(1);
        events.push(EngineEvent::LifeLost { remaining: self.lives });
        if self.lives == 0 {
            events.push(self.finish());
        }
        Ok(events)
    }

    fn fill_level(&mut self) -> Result<EngineEvent> {
        let board = self.coordinator.board_mut()?;
        let rows = self.generator.fill_level(board, self.level)?;
        if LOG_SESSION_VERBOSE {
            vlog!("[セッション] レベル{}開始 行数={} 残機={}", self.level, rows, self.lives);
        }
        Ok(EngineEvent::LevelStarted { level: self.level, rows })
    }

    fn finish(&mut self) -> EngineEvent {
        self.game_over = true;
        if LOG_SESSION_VERBOSE {
            vlog!("[セッション] ゲームオーバー 得点={} レベル={}", self.score(), self.level);
        }
        EngineEvent::GameOver {
            score: self.score(),
            level: self.level,
        }
    }

    fn emit(&self, events: &[EngineEvent]) {
        if let Some(tx) = &self.events_tx {
            for event in events {
                let _ = tx.send(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::LatticePos;
    use std::f64::consts::PI;

    fn started(seed: u64) -> GameSession {
        let mut session = GameSession::new(EngineConfig::default(), seed).unwrap();
        session.start().unwrap();
        session
    }

    /// 外れ弾: 発射台の真下へ飛ばす
    fn force_miss(session: &mut GameSession) -> Vec<EngineEvent> {
        session.fire(-PI / 2.0).unwrap();
        if let Some(p) = session.projectile.as_mut() {
            p.vy = p.vy.abs();
        }
        let mut events = Vec::new();
        while session.projectile.is_some() {
            events.extend(session.tick().unwrap());
        }
        events
    }

    #[test]
    fn start_fills_first_level() {
        let session = started(1);
        assert_eq!(session.level(), 1);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.board().len(), 60);
        assert_eq!(session.state(), EngineState::Idle);
    }

    #[test]
    fn start_reports_level_started() {
        let mut session = GameSession::new(EngineConfig::default(), 3).unwrap();
        let events = session.start().unwrap();
        assert_eq!(events, vec![EngineEvent::LevelStarted { level: 1, rows: 6 }]);
    }

    #[test]
    fn shot_attaches_and_returns_to_idle() {
        let mut session = started(5);
        let before = session.board().len();
        let events = session.play_shot(-PI / 2.0, DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(session.shots(), 1);
        assert_eq!(session.state(), EngineState::Idle);
        assert!(session.projectile().is_none());

        let removed: usize = events
            .iter()
            .map(|e| match e {
                EngineEvent::Matched { bubbles, .. } | EngineEvent::Fell { bubbles, .. } => {
                    bubbles.len()
                }
                _ => 0,
            })
            .sum();
        assert_eq!(session.board().len(), before + 1 - removed);
        assert!(session.board().validate().is_ok());
    }

    #[test]
    fn fire_while_flying_is_rejected() {
        let mut session = started(9);
        session.fire(-1.0).unwrap();
        assert!(session.fire(-1.0).is_err());
    }

    #[test]
    fn three_misses_end_the_game() {
        let mut session = started(2);
        let first = force_miss(&mut session);
        assert_eq!(first, vec![EngineEvent::Missed, EngineEvent::LifeLost { remaining: 2 }]);
        force_miss(&mut session);
        let last = force_miss(&mut session);
        assert!(matches!(last.last(), Some(EngineEvent::GameOver { level: 1, .. })));
        assert!(session.is_game_over());
        assert!(session.fire(-1.0).is_err());
    }

    #[test]
    fn clearing_board_advances_level() {
        let mut session = started(4);
        // 盤面を2個の赤だけにして3個目を撃ち込む
        {
            let board = session.coordinator.board_mut().unwrap();
            board.clear();
            board.spawn(BubbleKind::Color(0), LatticePos::new(0, 4)).unwrap();
            board.spawn(BubbleKind::Color(0), LatticePos::new(0, 5)).unwrap();
        }
        session.next_kind = BubbleKind::Color(0);
        let events = session.play_shot(-PI / 2.0, DEFAULT_MAX_STEPS).unwrap();
        assert!(events.contains(&EngineEvent::BoardCleared));
        assert_eq!(events.last(), Some(&EngineEvent::LevelStarted { level: 2, rows: 7 }));
        assert_eq!(session.level(), 2);
        assert_eq!(session.board().len(), 70);
    }

    #[test]
    fn events_are_forwarded_to_sender() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut session = GameSession::new(EngineConfig::default(), 8)
            .unwrap()
            .with_event_sender(tx);
        session.start().unwrap();
        force_miss(&mut session);
        let names: Vec<&str> = rx.try_iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["level_started", "missed", "life_lost"]);
    }

    #[test]
    fn aim_at_points_up_towards_board() {
        let session = started(1);
        let angle = session.aim_at(Point::new(240.0, 100.0));
        assert!((angle + PI / 2.0).abs() < 1e-9);
    }
}
