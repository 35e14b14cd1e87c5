use crate::agent::{Agent, AgentId};
use crate::render::{Bounds, PALETTE};
use crate::{SimConfig, Vector2D};
use alloc::vec::Vec;
use core::f32::consts::TAU;
use rand::Rng;

/// Columns a tab occupies on the monospace grid.
const TAB_WIDTH: usize = 2;

/// Monospace grid geometry of the text being turned into agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnLayout {
    /// Surface size at spawn time.
    pub bounds: Bounds,
    pub char_width: f32,
    pub line_height: f32,
    /// Top-left corner of the first character cell.
    pub origin: Vector2D,
}

impl SpawnLayout {
    pub fn new(bounds: Bounds, char_width: f32, line_height: f32) -> Self {
        Self {
            bounds,
            char_width,
            line_height,
            origin: Vector2D::zero(),
        }
    }

    pub fn with_origin(self, origin: Vector2D) -> Self {
        Self { origin, ..self }
    }

    /// Centre of the cell at `row`, `col`.
    pub fn cell_center(&self, row: usize, col: usize) -> Vector2D {
        Vector2D::new(
            self.origin.x + col as f32 * self.char_width + self.char_width / 2.0,
            self.origin.y + row as f32 * self.line_height + self.line_height / 2.0,
        )
    }
}

/// Turns text into a staggered wave of agents.
///
/// The first agent wakes immediately and each following one waits a little
/// longer than its predecessor. The gap starts at the initial interval and
/// shrinks geometrically towards a floor, so the run starts as a visible
/// ripple and ends with everything waking almost at once.
#[derive(Debug, Clone, Copy)]
pub struct Spawner {
    interval_initial_ms: f64,
    interval_decay: f64,
    interval_min_ms: f64,
    max_speed: f32,
}

impl Spawner {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            interval_initial_ms: config.spawn_interval_initial_ms,
            interval_decay: config.spawn_interval_decay,
            interval_min_ms: config.spawn_interval_min_ms,
            max_speed: config.agent_max_speed,
        }
    }

    /// One agent per non-whitespace character of `text`, in reading order.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        text: &str,
        layout: &SpawnLayout,
        now: f64,
        rng: &mut R,
    ) -> Vec<Agent> {
        let mut agents = Vec::new();
        let mut delay = 0.0;
        let mut interval = self.interval_initial_ms;
        let (mut row, mut col) = (0usize, 0usize);

        for glyph in text.chars() {
            match glyph {
                '\n' => {
                    row += 1;
                    col = 0;
                    continue;
                }
                '\r' => continue,
                '\t' => {
                    col += TAB_WIDTH;
                    continue;
                }
                c if c.is_whitespace() => {
                    col += 1;
                    continue;
                }
                _ => {}
            }

            let heading = rng.gen::<f32>() * TAU;
            let speed = self.max_speed * (0.5 + rng.gen::<f32>() * 0.5);
            let mut agent = Agent::new(
                AgentId(agents.len() as u32),
                glyph,
                layout.cell_center(row, col),
                Vector2D::from_angle(heading) * speed,
            );
            agent.color = PALETTE[rng.gen_range(0..PALETTE.len())];
            agent.activation_delay_ms = delay;
            agent.spawned_at = now;
            agent.animation_phase = rng.gen::<f64>() * core::f64::consts::TAU;
            agent.bounds = layout.bounds;
            agents.push(agent);

            delay += interval;
            interval = (interval * self.interval_decay).max(self.interval_min_ms);
            col += 1;
        }

        log::debug!(
            "spawned {} agents from {} chars, last wakes after {:.0}ms",
            agents.len(),
            text.chars().count(),
            agents.last().map_or(0.0, |agent| agent.activation_delay_ms)
        );
        agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn layout() -> SpawnLayout {
        SpawnLayout::new(Bounds::new(800.0, 600.0), 10.0, 20.0)
    }

    fn spawn(text: &str) -> Vec<Agent> {
        let mut rng = SmallRng::seed_from_u64(2024);
        Spawner::new(&SimConfig::default()).spawn(text, &layout(), 0.0, &mut rng)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_two_chars_on_grid() {
        let config = SimConfig::default();
        let agents = spawn("ab");

        assert_eq!(agents.len(), 2);
        assert!(approx(agents[0].position.x, 5.0) && approx(agents[0].position.y, 10.0));
        assert!(approx(agents[1].position.x, 15.0) && approx(agents[1].position.y, 10.0));
        assert_eq!(agents[0].activation_delay_ms, 0.0);
        assert_eq!(agents[1].activation_delay_ms, config.spawn_interval_initial_ms);
        assert_eq!(agents[0].glyph, 'a');
        assert_eq!(agents[1].glyph, 'b');
    }

    #[test]
    fn test_tab_counts_two_columns() {
        let agents = spawn("a\tb");
        assert_eq!(agents.len(), 2);
        assert!(approx(agents[1].position.x - agents[0].position.x, 30.0));
    }

    #[test]
    fn test_space_skipped_but_advances_column() {
        let agents = spawn("a b");
        assert_eq!(agents.len(), 2);
        assert!(approx(agents[1].position.x - agents[0].position.x, 20.0));
    }

    #[test]
    fn test_newline_moves_to_next_row() {
        let agents = spawn("ab\r\n  c");
        assert_eq!(agents.len(), 3);
        assert!(approx(agents[2].position.x, 25.0));
        assert!(approx(agents[2].position.y, 30.0));
    }

    #[test]
    fn test_unicode_whitespace_is_skipped() {
        let agents = spawn("a\u{00a0}\u{3000}b");
        assert_eq!(agents.len(), 2);
        assert!(approx(agents[1].position.x - agents[0].position.x, 30.0));
    }

    #[test]
    fn test_origin_offset() {
        let mut rng = SmallRng::seed_from_u64(1);
        let layout = layout().with_origin(Vector2D::new(40.0, 8.0));
        let agents = Spawner::new(&SimConfig::default()).spawn("x", &layout, 0.0, &mut rng);
        assert!(approx(agents[0].position.x, 45.0));
        assert!(approx(agents[0].position.y, 18.0));
    }

    #[test]
    fn test_delays_strictly_increase_and_floor_out() {
        let config = SimConfig::default();
        let text: alloc::string::String = core::iter::repeat('x').take(200).collect();
        let agents = spawn(&text);

        for pair in agents.windows(2) {
            let gap = pair[1].activation_delay_ms - pair[0].activation_delay_ms;
            assert!(gap > 0.0);
            assert!(gap <= config.spawn_interval_initial_ms + 1e-9);
            assert!(gap >= config.spawn_interval_min_ms - 1e-9);
        }

        let last_gap = agents[199].activation_delay_ms - agents[198].activation_delay_ms;
        assert!((last_gap - config.spawn_interval_min_ms).abs() < 1e-9);
    }

    #[test]
    fn test_agents_start_dormant_with_bounded_speed_and_palette_color() {
        let config = SimConfig::default();
        for agent in spawn("fn main() { println!(\"hi\"); }") {
            assert_eq!(agent.state, AgentState::Dormant);
            assert!(agent.velocity.magnitude() <= config.agent_max_speed + 1e-4);
            assert!(PALETTE.contains(&agent.color));
            assert_eq!(agent.bounds, layout().bounds);
        }
    }

    #[test]
    fn test_same_seed_same_agents() {
        let first = spawn("hello");
        let second = spawn("hello");
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.velocity, b.velocity);
            assert_eq!(a.color, b.color);
            assert_eq!(a.animation_phase, b.animation_phase);
        }
    }

    #[test]
    fn test_whitespace_only_text_spawns_nothing() {
        assert!(spawn(" \t\n \r\n").is_empty());
    }
}
