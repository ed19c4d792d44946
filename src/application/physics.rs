// 弾の移動（物理側の既定実装）- 壁反射・天井/泡との接触・外れ判定

use std::f64::consts::PI;

use super::coordinator::ProjectileState;
use crate::domain::bubble::BubbleKind;
use crate::domain::config::FieldConfig;
use crate::domain::grid::{Board, Point};

/// 1ステップ進めた結果
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// まだ飛行中
    Flying,
    /// 天井か泡に接触した（この状態で着弾解決する）
    Collided(ProjectileState),
    /// 画面下へ抜けた
    Missed,
}

/// 飛行中の弾
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub position: Point,
    pub vx: f64,
    pub vy: f64,
    pub kind: BubbleKind,
}

/// 発射角を水平近くにならないよう制限する（上向きが負）
pub fn clamp_aim(angle: f64, margin: f64) -> f64 {
    angle.clamp(-PI + margin, -margin)
}

/// 発射位置（フィールド下部中央）
pub fn shooter_position(field: &FieldConfig) -> Point {
    Point::new(field.width / 2.0, field.height - field.shooter_offset)
}

impl Projectile {
    /// 発射台から角度 angle で発射する
    pub fn launch(kind: BubbleKind, angle: f64, field: &FieldConfig) -> Self {
        let angle = clamp_aim(angle, field.aim_margin);
        Self {
            position: shooter_position(field),
            vx: angle.cos() * field.projectile_speed,
            vy: angle.sin() * field.projectile_speed,
            kind,
        }
    }

    pub fn state(&self) -> ProjectileState {
        ProjectileState {
            position: self.position,
            kind: self.kind,
        }
    }

    /// 1ステップ進める
    pub fn step(&mut self, board: &Board, field: &FieldConfig) -> StepOutcome {
        let geometry = board.geometry();
        let r = geometry.radius;
        self.position.x += self.vx;
        self.position.y += self.vy;

        // 壁で減衰しつつ反射
        if self.position.x - r < 0.0 || self.position.x + r > field.width {
            self.vx *= -field.wall_restitution;
            self.position.x = self.position.x.clamp(r, field.width - r);
        }

        if self.position.y - r <= geometry.top_margin {
            return StepOutcome::Collided(self.state());
        }

        let touch = 2.0 * r;
        let hit = board.all_attached().any(|b| {
            geometry.lattice_to_position(b.pos).distance_sq(self.position) < touch * touch
        });
        if hit {
            return StepOutcome::Collided(self.state());
        }

        if self.position.y > field.height + field.miss_margin {
            return StepOutcome::Missed;
        }
        StepOutcome::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{GridGeometry, LatticePos};

    fn field() -> FieldConfig {
        FieldConfig::default()
    }

    fn empty_board() -> Board {
        Board::new(GridGeometry::default())
    }

    fn run(p: &mut Projectile, board: &Board) -> StepOutcome {
        for _ in 0..10_000 {
            match p.step(board, &field()) {
                StepOutcome::Flying => continue,
                other => return other,
            }
        }
        StepOutcome::Flying
    }

    #[test]
    fn aim_is_clamped_away_from_horizontal() {
        assert_eq!(clamp_aim(0.5, 0.1), -0.1);
        assert_eq!(clamp_aim(-PI, 0.1), -PI + 0.1);
        assert_eq!(clamp_aim(-1.0, 0.1), -1.0);
    }

    #[test]
    fn launch_starts_at_shooter_with_configured_speed() {
        let p = Projectile::launch(BubbleKind::Color(0), -PI / 2.0, &field());
        assert_eq!(p.position, Point::new(240.0, 740.0));
        assert!((p.vx.hypot(p.vy) - 8.0).abs() < 1e-9);
        assert!(p.vy < 0.0);
    }

    #[test]
    fn straight_shot_hits_ceiling_on_empty_board() {
        let board = empty_board();
        let mut p = Projectile::launch(BubbleKind::Color(0), -PI / 2.0, &field());
        match run(&mut p, &board) {
            StepOutcome::Collided(state) => {
                assert!(state.position.y - 22.0 <= 20.0);
                assert_eq!(state.kind, BubbleKind::Color(0));
            }
            other => panic!("天井に当たるはず: {:?}", other),
        }
    }

    #[test]
    fn straight_shot_stops_below_existing_bubble() {
        let board = Board::from_layout(GridGeometry::default(), "0000000000").unwrap();
        let mut p = Projectile::launch(BubbleKind::Color(1), -PI / 2.0, &field());
        match run(&mut p, &board) {
            StepOutcome::Collided(state) => {
                let g = board.geometry();
                let nearest = g.lattice_to_position(LatticePos::new(0, 5));
                assert!(nearest.distance(state.position) < 44.0);
                assert!(state.position.y > 42.0);
            }
            other => panic!("泡に当たるはず: {:?}", other),
        }
    }

    #[test]
    fn wall_bounce_reverses_and_damps_horizontal_speed() {
        let board = empty_board();
        let mut p = Projectile {
            position: Point::new(30.0, 400.0),
            vx: -10.0,
            vy: -1.0,
            kind: BubbleKind::Color(0),
        };
        assert_eq!(p.step(&board, &field()), StepOutcome::Flying);
        assert_eq!(p.position.x, 22.0);
        assert!((p.vx - 7.0).abs() < 1e-9);
    }

    #[test]
    fn falling_below_field_is_a_miss() {
        let board = empty_board();
        let mut p = Projectile {
            position: Point::new(240.0, 845.0),
            vx: 0.0,
            vy: 8.0,
            kind: BubbleKind::Color(0),
        };
        assert_eq!(p.step(&board, &field()), StepOutcome::Missed);
    }
}
