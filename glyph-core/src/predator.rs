use crate::agent::{Agent, AgentId};
use crate::render::{Bounds, Color, Ellipse, RenderSurface};
use crate::vector::sin;
use crate::{SimConfig, Vector2D};
use core::f32::consts::{FRAC_PI_2, TAU};
use rand::Rng;

const BODY_COLOR: Color = Color::rgb(0xf4, 0x47, 0x47);
const WING_COLOR: Color = Color::rgb(0xe8, 0xe8, 0xf0);

/// A bug that hunts down running glyphs.
#[derive(Debug, Clone)]
pub struct Predator {
    pub position: Vector2D,
    /// Direction of travel in radians.
    pub heading: f32,
    pub wing_phase: f32,
    pub speed: f32,
    /// Agent being chased. Looked up by id every tick, never trusted as-is.
    pub target: Option<AgentId>,
}

impl Predator {
    pub fn new(position: Vector2D, heading: f32, speed: f32) -> Self {
        Self {
            position,
            heading,
            wing_phase: 0.0,
            speed,
            target: None,
        }
    }

    /// Place a predator on a random edge of `bounds`, heading roughly inwards.
    pub fn at_random_edge<R: Rng + ?Sized>(bounds: Bounds, config: &SimConfig, rng: &mut R) -> Self {
        let along = rng.gen::<f32>();
        let position = match rng.gen_range(0..4) {
            0 => Vector2D::new(along * bounds.width, 0.0),
            1 => Vector2D::new(bounds.width, along * bounds.height),
            2 => Vector2D::new(along * bounds.width, bounds.height),
            _ => Vector2D::new(0.0, along * bounds.height),
        };
        let heading = position.angle_to(&bounds.center()) + (rng.gen::<f32>() - 0.5);
        let speed = config.predator_speed_min
            + rng.gen::<f32>() * (config.predator_speed_max - config.predator_speed_min);

        Self::new(position, heading, speed)
    }

    /// Nearest active agent. Ties go to the first one in `agents`.
    pub fn find_target(&self, agents: &[Agent]) -> Option<AgentId> {
        self.nearest_active(agents).map(|index| agents[index].id)
    }

    fn nearest_active(&self, agents: &[Agent]) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, agent) in agents.iter().enumerate() {
            if !agent.is_active() {
                continue;
            }
            let distance = self.position.distance(&agent.position);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Index of the current target if it is still present and active.
    fn live_target(&self, agents: &[Agent]) -> Option<usize> {
        let id = self.target?;
        agents
            .iter()
            .position(|agent| agent.id == id && agent.is_active())
    }

    /// Advance one frame. Returns the id of the agent eaten this tick, if any.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        agents: &mut [Agent],
        bounds: Bounds,
        config: &SimConfig,
        rng: &mut R,
    ) -> Option<AgentId> {
        self.wing_phase = (self.wing_phase + config.wing_flap_rate) % TAU;

        let index = self
            .live_target(agents)
            .or_else(|| self.nearest_active(agents));
        self.target = index.map(|index| agents[index].id);

        let Some(index) = index else {
            self.wander(bounds, config, rng);
            return None;
        };

        let target = &mut agents[index];
        self.heading = self.position.angle_to(&target.position);
        self.position += Vector2D::from_angle(self.heading) * self.speed;

        if self.position.distance(&target.position) < config.contact_radius {
            target.mark_consumed();
            self.target = None;
            return Some(target.id);
        }
        None
    }

    fn wander<R: Rng + ?Sized>(&mut self, bounds: Bounds, config: &SimConfig, rng: &mut R) {
        if rng.gen_bool(config.predator_jitter_chance as f64) {
            self.heading += (rng.gen::<f32>() * 2.0 - 1.0) * config.predator_jitter_angle;
        }
        self.position += Vector2D::from_angle(self.heading) * self.speed;
        self.wrap_edges(bounds, config.wrap_overscan);
    }

    fn wrap_edges(&mut self, bounds: Bounds, overscan: f32) {
        if self.position.x < -overscan {
            self.position.x = bounds.width + overscan;
        } else if self.position.x > bounds.width + overscan {
            self.position.x = -overscan;
        }

        if self.position.y < -overscan {
            self.position.y = bounds.height + overscan;
        } else if self.position.y > bounds.height + overscan {
            self.position.y = -overscan;
        }
    }

    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        let forward = Vector2D::from_angle(self.heading);
        let side = Vector2D::from_angle(self.heading + FRAC_PI_2);
        let spread = 5.0 + sin(self.wing_phase) * 3.0;

        surface.fill_ellipse(
            &Ellipse {
                center: self.position,
                radius_x: 18.0,
                radius_y: 18.0,
                rotation: 0.0,
            },
            BODY_COLOR.with_alpha(0.15),
        );

        for (sign, tilt) in [(1.0, 0.4), (-1.0, -0.4)] {
            surface.fill_ellipse(
                &Ellipse {
                    center: self.position + side * (sign * spread) - forward * 2.0,
                    radius_x: 6.0,
                    radius_y: 3.0,
                    rotation: self.heading + FRAC_PI_2 + tilt,
                },
                WING_COLOR.with_alpha(0.6),
            );
        }

        surface.fill_ellipse(
            &Ellipse {
                center: self.position,
                radius_x: 7.0,
                radius_y: 4.0,
                rotation: self.heading,
            },
            BODY_COLOR,
        );
    }
}
