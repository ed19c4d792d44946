// 着弾解決の司令塔 - 配置 → 連結 → 特殊効果 → 消去 → 落下 → 得点・イベント

use std::collections::BTreeSet;

use anyhow::Result;
use crossbeam_channel::Sender;

use super::event::EngineEvent;
use crate::domain::bubble::{BubbleId, BubbleKind};
use crate::domain::config::EngineConfig;
use crate::domain::error::EngineError;
use crate::domain::grid::{Board, GridGeometry, Point};
use crate::domain::resolve::{
    ClusterMatcher, ConnectivityPruner, Placement, RemovedBubble, Resolution,
    SpecialEffectResolver,
};
use crate::vlog;

const LOG_RESOLVE_VERBOSE: bool = true;
const LOG_RESOLVE_BOARD: bool = false; // 解決後の盤面テキストも出す

/// 司令塔の状態
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// 次の弾待ち
    Idle,
    /// 弾が飛行中（物理側が所有）
    Flying,
    /// 着弾解決中（外部入力を受け付けない）
    Resolving,
}

impl EngineState {
    pub fn name(self) -> &'static str {
        match self {
            EngineState::Idle => "Idle",
            EngineState::Flying => "Flying",
            EngineState::Resolving => "Resolving",
        }
    }
}

/// 物理側から渡される着弾時の弾の状態
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileState {
    pub position: Point,
    pub kind: BubbleKind,
}

/// 1回の着弾解決の報告（結果と発行したイベント）
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionReport {
    pub resolution: Resolution,
    pub events: Vec<EngineEvent>,
}

/// 盤面・得点・状態をまとめて所有し、着弾を1ステップで解決する
pub struct ResolutionCoordinator {
    config: EngineConfig,
    board: Board,
    state: EngineState,
    score: u64,
    events_tx: Option<Sender<EngineEvent>>,
}

impl ResolutionCoordinator {
    /// 空の盤面で作成
    pub fn new(config: EngineConfig) -> Result<Self> {
        let board = Board::new(GridGeometry::from_config(&config));
        Self::with_board(config, board)
    }

    /// 既存の盤面で作成（盤面の幾何は設定から作り直さない）
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self> {
        config.validate()?;
        board.validate()?;
        Ok(Self {
            config,
            board,
            state: EngineState::Idle,
            score: 0,
            events_tx: None,
        })
    }

    /// イベントの送信先を設定
    pub fn with_event_sender(mut self, tx: Sender<EngineEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 盤面の直接編集（レベル準備用。Idle のときだけ）
    pub fn board_mut(&mut self) -> Result<&mut Board, EngineError> {
        self.expect_state(EngineState::Idle)?;
        Ok(&mut self.board)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// 盤面を空にし得点を0に戻す（IDの採番は続ける）
    pub fn reset(&mut self) {
        self.board.clear();
        self.score = 0;
        self.state = EngineState::Idle;
    }

    fn expect_state(&self, expected: EngineState) -> Result<(), EngineError> {
        if self.state != expected {
            return Err(EngineError::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    /// 弾を発射（Idle → Flying）
    pub fn launch(&mut self) -> Result<(), EngineError> {
        self.expect_state(EngineState::Idle)?;
        self.state = EngineState::Flying;
        Ok(())
    }

    /// 弾がどこにも吸着せず外れた（Flying → Idle）
    pub fn report_miss(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        self.expect_state(EngineState::Flying)?;
        self.state = EngineState::Idle;
        let events = vec![EngineEvent::Missed];
        self.emit(&events);
        Ok(events)
    }

    /// 着弾を解決する（Flying → Resolving → Idle）
    ///
    /// 配置できなかった場合は `PlacementFailed` を返し、状態は Idle に戻る。
    pub fn report_collision(
        &mut self,
        projectile: ProjectileState,
    ) -> Result<ResolutionReport, EngineError> {
        self.expect_state(EngineState::Flying)?;
        self.state = EngineState::Resolving;
        let outcome = self.resolve(projectile);
        self.state = EngineState::Idle;

        let report = outcome?;
        self.emit(&report.events);
        Ok(report)
    }

    fn resolve(&mut self, projectile: ProjectileState) -> Result<ResolutionReport, EngineError> {
        let (placed, slot) =
            Placement::commit(&mut self.board, projectile.position, projectile.kind)?;

        let cluster = ClusterMatcher::find_cluster(&self.board, placed);
        let min_match = self.config.min_match.get();
        let mut resolution = Resolution::new(placed, slot, cluster.len());

        // 1段目: マッチと特殊効果
        let mut matched: BTreeSet<BubbleId> = BTreeSet::new();
        if cluster.len() >= min_match {
            let extra = SpecialEffectResolver::expand(
                &self.board,
                placed,
                &cluster,
                min_match,
                self.config.grid.area_clear_radius,
            );
            matched.extend(cluster.iter().copied());
            matched.extend(extra);
        }
        resolution.matched = self.remove_all(&matched);

        // 2段目: 0行目から届かない泡を落とす
        let falling = ConnectivityPruner::find_unsupported(&self.board);
        resolution.fell = self.remove_all(&falling);

        let scoring = self.config.scoring;
        let matched_points = resolution.matched.len() as u64 * scoring.match_points;
        let fell_points = resolution.fell.len() as u64 * scoring.fall_points;
        resolution.score_delta = matched_points + fell_points;
        resolution.board_cleared = self.board.is_empty() && resolution.removed_any();
        self.score += resolution.score_delta;

        let mut events = Vec::new();
        if !resolution.matched.is_empty() {
            events.push(EngineEvent::Matched {
                bubbles: resolution.matched.clone(),
                points: matched_points,
            });
        }
        if !resolution.fell.is_empty() {
            events.push(EngineEvent::Fell {
                bubbles: resolution.fell.clone(),
                points: fell_points,
            });
        }
        if resolution.board_cleared {
            events.push(EngineEvent::BoardCleared);
        }

        if LOG_RESOLVE_VERBOSE {
            vlog!(
                "[解決] {} 格子{} 連結={} 消去={} 落下={} +{}点 (計{}点) 残り={}",
                placed,
                slot,
                resolution.cluster_size,
                resolution.matched.len(),
                resolution.fell.len(),
                resolution.score_delta,
                self.score,
                self.board.len()
            );
        }
        if LOG_RESOLVE_BOARD {
            vlog!("{}", self.board.to_layout());
        }

        Ok(ResolutionReport { resolution, events })
    }

    /// ID集合を盤面から取り除き、取り除いた泡を返す
    fn remove_all(&mut self, ids: &BTreeSet<BubbleId>) -> Vec<RemovedBubble> {
        let geometry = *self.board.geometry();
        ids.iter()
            .filter_map(|&id| self.board.remove(id))
            .map(|b| RemovedBubble {
                id: b.id,
                kind: b.kind,
                pos: b.pos,
                center: geometry.lattice_to_position(b.pos),
            })
            .collect()
    }

    fn emit(&self, events: &[EngineEvent]) {
        if let Some(tx) = &self.events_tx {
            for event in events {
                // 受信側が閉じていても解決は続ける
                let _ = tx.send(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::LatticePos;

    fn coordinator(layout: &str) -> ResolutionCoordinator {
        let config = EngineConfig::default();
        let board = Board::from_layout(GridGeometry::from_config(&config), layout).unwrap();
        ResolutionCoordinator::with_board(config, board).unwrap()
    }

    fn shoot_at(
        c: &mut ResolutionCoordinator,
        row: i32,
        col: i32,
        kind: BubbleKind,
    ) -> ResolutionReport {
        let position = c.board().geometry().lattice_to_position(LatticePos::new(row, col));
        c.launch().unwrap();
        c.report_collision(ProjectileState { position, kind }).unwrap()
    }

    #[test]
    fn collision_requires_flying_state() {
        let mut c = coordinator("0");
        let err = c
            .report_collision(ProjectileState {
                position: Point::new(60.0, 42.0),
                kind: BubbleKind::Color(0),
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));
        assert!(c.report_miss().is_err());
    }

    #[test]
    fn launch_twice_is_rejected() {
        let mut c = coordinator("");
        c.launch().unwrap();
        assert_eq!(c.state(), EngineState::Flying);
        assert!(c.launch().is_err());
        assert!(c.board_mut().is_err());
    }

    #[test]
    fn pair_stays_on_board() {
        let mut c = coordinator("0.........");
        let report = shoot_at(&mut c, 0, 1, BubbleKind::Color(0));
        assert_eq!(report.resolution.cluster_size, 2);
        assert!(!report.resolution.removed_any());
        assert!(report.events.is_empty());
        assert_eq!(c.board().len(), 2);
        assert_eq!(c.state(), EngineState::Idle);
    }

    #[test]
    fn triple_is_removed_and_scored() {
        let mut c = coordinator("00.1111111");
        let report = shoot_at(&mut c, 0, 2, BubbleKind::Color(0));
        assert_eq!(report.resolution.matched.len(), 3);
        assert_eq!(report.resolution.score_delta, 60);
        assert_eq!(c.score(), 60);
        assert_eq!(c.board().len(), 7);
        assert!(matches!(report.events[0], EngineEvent::Matched { points: 60, .. }));
    }

    #[test]
    fn miss_emits_missed_and_returns_to_idle() {
        let mut c = coordinator("0");
        c.launch().unwrap();
        let events = c.report_miss().unwrap();
        assert_eq!(events, vec![EngineEvent::Missed]);
        assert_eq!(c.state(), EngineState::Idle);
    }

    #[test]
    fn placement_failure_returns_to_idle() {
        let config = EngineConfig::default();
        let mut board = Board::new(GridGeometry::from_config(&config));
        let g = *board.geometry();
        for row in 0..g.max_rows as i32 {
            for col in 0..g.columns as i32 {
                let kind = BubbleKind::Color(((row + col) % 6) as u8);
                board.spawn(kind, LatticePos::new(row, col)).unwrap();
            }
        }
        let mut c = ResolutionCoordinator::with_board(config, board).unwrap();
        c.launch().unwrap();
        let err = c
            .report_collision(ProjectileState {
                position: g.lattice_to_position(LatticePos::new(5, 5)),
                kind: BubbleKind::Color(0),
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::PlacementFailed { .. }));
        assert_eq!(c.state(), EngineState::Idle);
    }

    #[test]
    fn reset_clears_board_and_score() {
        let mut c = coordinator("00.1111111");
        shoot_at(&mut c, 0, 2, BubbleKind::Color(0));
        c.launch().unwrap();
        c.reset();
        assert_eq!(c.state(), EngineState::Idle);
        assert_eq!(c.score(), 0);
        assert!(c.board().is_empty());
    }

    #[test]
    fn events_are_forwarded_to_sender() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut c = coordinator("00........").with_event_sender(tx);
        shoot_at(&mut c, 0, 2, BubbleKind::Color(0));
        let received: Vec<EngineEvent> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].name(), "matched");
        assert_eq!(received[1], EngineEvent::BoardCleared);
    }
}
