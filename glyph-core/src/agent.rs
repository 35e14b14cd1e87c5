use crate::render::{Bounds, Color, RenderSurface};
use crate::vector::sin_f64;
use crate::{SimConfig, Vector2D};
use rand::Rng;

/// Limb swing frequency in radians per millisecond (roughly two strides a second).
const LIMB_CYCLE_RATE: f64 = 0.012;
const LIMB_LINE_WIDTH: f32 = 1.5;

/// Stable identity of an agent within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Waiting for its activation delay to elapse.
    Dormant,
    Active,
    /// Eaten. Terminal; purged by the simulation on the next frame.
    Consumed,
}

/// A running character glyph.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub glyph: char,
    pub color: Color,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub state: AgentState,
    pub activation_delay_ms: f64,
    pub spawned_at: f64,
    /// Per-agent offset so limbs do not swing in lockstep.
    pub animation_phase: f64,
    pub bounds: Bounds,
}

/// Two-segment limb polylines: joint, bend, tip. Index 0 is the left side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limbs {
    pub legs: [[Vector2D; 3]; 2],
    pub arms: [[Vector2D; 3]; 2],
}

impl Agent {
    pub fn new(id: AgentId, glyph: char, position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            id,
            glyph,
            color: Color::rgb(0xd4, 0xd4, 0xd4),
            position,
            velocity,
            state: AgentState::Dormant,
            activation_delay_ms: 0.0,
            spawned_at: 0.0,
            animation_phase: 0.0,
            bounds: Bounds::new(0.0, 0.0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == AgentState::Active
    }

    pub fn is_consumed(&self) -> bool {
        self.state == AgentState::Consumed
    }

    /// Wake the agent once its activation delay has elapsed since spawning.
    pub fn activate(&mut self, now: f64) {
        if self.state == AgentState::Dormant && now - self.spawned_at >= self.activation_delay_ms {
            self.state = AgentState::Active;
        }
    }

    pub fn mark_consumed(&mut self) {
        self.state = AgentState::Consumed;
    }

    /// Advance one frame: move, bounce off the walls, and occasionally wander.
    pub fn tick<R: Rng + ?Sized>(&mut self, bounds: Bounds, config: &SimConfig, rng: &mut R) {
        if !self.is_active() {
            return;
        }

        self.bounds = bounds;
        self.position += self.velocity;
        self.contain_within_bounds(config.wall_margin);

        if rng.gen_bool(config.agent_wander_chance as f64) {
            let strength = config.agent_wander_strength;
            let delta = Vector2D::new(
                (rng.gen::<f32>() * 2.0 - 1.0) * strength,
                (rng.gen::<f32>() * 2.0 - 1.0) * strength,
            );
            self.velocity = (self.velocity + delta).limit(config.agent_max_speed);
        }
    }

    fn contain_within_bounds(&mut self, margin: f32) {
        let Bounds { width, height } = self.bounds;

        // Bounce off edges by reversing velocity component
        if self.position.x < margin {
            self.position.x = margin;
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > width - margin {
            self.position.x = width - margin;
            self.velocity.x = -self.velocity.x.abs();
        }

        if self.position.y < margin {
            self.position.y = margin;
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > height - margin {
            self.position.y = height - margin;
            self.velocity.y = -self.velocity.y.abs();
        }
    }

    /// Limb geometry at `now`, or `None` unless the agent is running.
    pub fn limbs(&self, now: f64) -> Option<Limbs> {
        if !self.is_active() {
            return None;
        }

        let phase = (now - self.spawned_at) * LIMB_CYCLE_RATE + self.animation_phase;
        let swing = sin_f64(phase) as f32;
        let p = self.position;

        let leg = |side: f32, swing: f32| {
            let hip = p + Vector2D::new(side * 2.0, 6.0);
            let knee = hip + Vector2D::new(swing * 4.0, 5.0);
            let foot = knee + Vector2D::new(swing * 1.5 - 1.5, 5.0);
            [hip, knee, foot]
        };
        let arm = |side: f32, swing: f32| {
            let shoulder = p + Vector2D::new(side * 4.0, 0.0);
            let elbow = shoulder + Vector2D::new(side * 2.0 + swing * 3.0, 3.0);
            let hand = elbow + Vector2D::new(swing * 2.0, -2.0);
            [shoulder, elbow, hand]
        };

        Some(Limbs {
            legs: [leg(-1.0, swing), leg(1.0, -swing)],
            arms: [arm(-1.0, swing), arm(1.0, -swing)],
        })
    }

    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S, now: f64, show_limbs: bool) {
        if self.is_consumed() {
            return;
        }

        surface.draw_glyph(self.glyph, self.position, self.color);

        if !show_limbs {
            return;
        }
        if let Some(limbs) = self.limbs(now) {
            for segment in limbs.legs.iter().chain(limbs.arms.iter()) {
                surface.stroke_polyline(segment, self.color, LIMB_LINE_WIDTH);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingSurface;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn agent_at(x: f32, y: f32, vx: f32, vy: f32) -> Agent {
        let mut agent = Agent::new(AgentId(0), 'a', Vector2D::new(x, y), Vector2D::new(vx, vy));
        agent.state = AgentState::Active;
        agent
    }

    #[test]
    fn test_activation_waits_for_delay() {
        let mut agent = Agent::new(AgentId(1), 'x', Vector2D::zero(), Vector2D::zero());
        agent.spawned_at = 1000.0;
        agent.activation_delay_ms = 50.0;

        agent.activate(1049.0);
        assert_eq!(agent.state, AgentState::Dormant);

        agent.activate(1050.0);
        assert_eq!(agent.state, AgentState::Active);

        agent.activate(5000.0);
        assert_eq!(agent.state, AgentState::Active);
    }

    #[test]
    fn test_consumed_is_terminal() {
        let mut agent = Agent::new(AgentId(1), 'x', Vector2D::zero(), Vector2D::zero());
        agent.mark_consumed();
        agent.activate(1e9);
        assert!(agent.is_consumed());
    }

    #[test]
    fn test_dormant_agent_does_not_move() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut agent = Agent::new(AgentId(0), 'a', Vector2D::new(50.0, 50.0), Vector2D::new(2.0, 0.0));
        agent.tick(Bounds::new(100.0, 100.0), &SimConfig::default(), &mut rng);
        assert_eq!(agent.position, Vector2D::new(50.0, 50.0));
    }

    #[test]
    fn test_tick_moves_by_velocity() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = SimConfig {
            agent_wander_chance: 0.0,
            ..SimConfig::default()
        };
        let mut agent = agent_at(50.0, 50.0, 2.0, -1.0);
        agent.tick(Bounds::new(100.0, 100.0), &config, &mut rng);
        assert_eq!(agent.position, Vector2D::new(52.0, 49.0));
    }

    #[test]
    fn test_wall_bounce_reflects_and_clamps() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = SimConfig {
            agent_wander_chance: 0.0,
            ..SimConfig::default()
        };

        let mut agent = agent_at(89.0, 11.0, 2.0, -2.0);
        agent.tick(Bounds::new(100.0, 100.0), &config, &mut rng);

        assert_eq!(agent.position, Vector2D::new(90.0, 10.0));
        assert_eq!(agent.velocity, Vector2D::new(-2.0, 2.0));

        let mut agent = agent_at(11.0, 89.0, -2.0, 2.0);
        agent.tick(Bounds::new(100.0, 100.0), &config, &mut rng);

        assert_eq!(agent.position, Vector2D::new(10.0, 90.0));
        assert_eq!(agent.velocity, Vector2D::new(2.0, -2.0));
    }

    #[test]
    fn test_speed_never_exceeds_max() {
        let mut rng = SmallRng::seed_from_u64(42);
        let config = SimConfig {
            agent_wander_chance: 1.0,
            agent_wander_strength: 5.0,
            ..SimConfig::default()
        };
        let bounds = Bounds::new(400.0, 300.0);
        let mut agent = agent_at(200.0, 150.0, 1.0, 1.0);

        for _ in 0..5000 {
            agent.tick(bounds, &config, &mut rng);
            assert!(agent.velocity.magnitude() <= config.agent_max_speed + 1e-4);
            assert!(agent.position.x >= config.wall_margin && agent.position.x <= 390.0);
            assert!(agent.position.y >= config.wall_margin && agent.position.y <= 290.0);
        }
    }

    #[test]
    fn test_dormant_agent_renders_without_limbs() {
        let agent = Agent::new(AgentId(0), 'q', Vector2D::new(10.0, 10.0), Vector2D::zero());
        let mut surface = RecordingSurface::sized(100.0, 100.0);

        agent.render(&mut surface, 500.0, true);

        assert_eq!(surface.glyphs(), ['q']);
        assert_eq!(surface.polylines(), 0);
        assert!(agent.limbs(500.0).is_none());
    }

    #[test]
    fn test_active_agent_renders_four_limbs() {
        let agent = agent_at(10.0, 10.0, 0.0, 0.0);
        let mut surface = RecordingSurface::sized(100.0, 100.0);

        agent.render(&mut surface, 500.0, true);
        assert_eq!(surface.polylines(), 4);

        let mut surface = RecordingSurface::sized(100.0, 100.0);
        agent.render(&mut surface, 500.0, false);
        assert_eq!(surface.polylines(), 0);
    }

    #[test]
    fn test_limbs_swing_in_antiphase() {
        let mut agent = agent_at(0.0, 0.0, 0.0, 0.0);
        agent.animation_phase = 1.0;
        let limbs = agent.limbs(0.0).unwrap();

        let left_leg = limbs.legs[0][1].x - limbs.legs[0][0].x;
        let right_leg = limbs.legs[1][1].x - limbs.legs[1][0].x;
        assert!(left_leg * right_leg < 0.0);

        // Arm knee offsets include a fixed outward bend of 2 units per side.
        let left_arm = limbs.arms[0][1].x - limbs.arms[0][0].x + 2.0;
        let right_arm = limbs.arms[1][1].x - limbs.arms[1][0].x - 2.0;
        assert!(left_arm * right_leg < 0.0);
        assert!(right_arm * left_leg < 0.0);
    }
}
