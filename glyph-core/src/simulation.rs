use crate::agent::{Agent, AgentState};
use crate::predator::Predator;
use crate::render::{Bounds, RenderSurface};
use crate::spawner::{SpawnLayout, Spawner};
use crate::{ConfigError, SimConfig};
use alloc::vec::Vec;
use glyph_shared::RunStatus;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Identifies one scheduled frame. Only the most recently issued handle is
/// honoured; every other one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Result of offering a frame to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame ran. Schedule the next one with this handle.
    Rendered(FrameHandle),
    /// The surface has no size yet. Nothing changed; try again next frame.
    Skipped(FrameHandle),
    /// The handle is stale because the run was stopped or restarted.
    Cancelled,
}

impl FrameOutcome {
    /// Handle for the next frame, if the loop should continue.
    pub fn next(&self) -> Option<FrameHandle> {
        match self {
            Self::Rendered(handle) | Self::Skipped(handle) => Some(*handle),
            Self::Cancelled => None,
        }
    }
}

/// Owns every agent and predator of a run and advances them frame by frame.
///
/// The host drives the loop: `start` returns the first [`FrameHandle`], each
/// call to [`Simulation::frame`] returns the next one, and `stop` revokes
/// whatever is outstanding so a callback queued before the stop does nothing.
pub struct Simulation {
    pub agents: Vec<Agent>,
    pub predators: Vec<Predator>,
    pub config: SimConfig,
    show_limbs: bool,
    running: bool,
    scheduled: Option<FrameHandle>,
    next_handle: u64,
    frame: u64,
    consumed_total: usize,
    rng: SmallRng,
}

impl Simulation {
    #[cfg(feature = "std")]
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic simulation for a given seed.
    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimConfig, rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            agents: Vec::new(),
            predators: Vec::new(),
            config,
            show_limbs: true,
            running: false,
            scheduled: None,
            next_handle: 0,
            frame: 0,
            consumed_total: 0,
            rng,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handle of the frame the simulation is waiting for, if any.
    pub fn scheduled(&self) -> Option<FrameHandle> {
        self.scheduled
    }

    pub fn limb_rendering_enabled(&self) -> bool {
        self.show_limbs
    }

    /// Turn `text` into agents using the simulation's own RNG.
    pub fn spawn_text(&mut self, text: &str, layout: &SpawnLayout, now: f64) -> Vec<Agent> {
        Spawner::new(&self.config).spawn(text, layout, now, &mut self.rng)
    }

    /// Begin a run with `agents`, replacing any agents from a previous run.
    ///
    /// Predators added while idle are kept and join the hunt.
    pub fn start(&mut self, agents: Vec<Agent>) -> FrameHandle {
        log::debug!(
            "starting run with {} agents and {} predators",
            agents.len(),
            self.predators.len()
        );
        self.agents = agents;
        self.running = true;
        self.frame = 0;
        self.consumed_total = 0;
        self.schedule()
    }

    /// End the run: revoke the scheduled frame, clear the surface and drop
    /// every entity.
    pub fn stop<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.running {
            log::debug!(
                "stopping run after {} frames, {} agents eaten",
                self.frame,
                self.consumed_total
            );
        }
        self.running = false;
        self.scheduled = None;
        self.agents.clear();
        self.predators.clear();
        surface.clear_all();
    }

    /// Add a predator on a random edge of `bounds`. Works whether or not a
    /// run is in progress.
    pub fn spawn_predator(&mut self, bounds: Bounds) {
        let predator = Predator::at_random_edge(bounds, &self.config, &mut self.rng);
        log::debug!(
            "predator spawned at ({:.0}, {:.0}), {} total",
            predator.position.x,
            predator.position.y,
            self.predators.len() + 1
        );
        self.predators.push(predator);
    }

    /// Takes effect from the next rendered frame.
    pub fn set_limb_rendering_enabled(&mut self, enabled: bool) {
        self.show_limbs = enabled;
    }

    fn schedule(&mut self) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.scheduled = Some(handle);
        handle
    }

    /// Run the frame identified by `handle` at host time `now` (milliseconds).
    pub fn frame<S: RenderSurface + ?Sized>(
        &mut self,
        handle: FrameHandle,
        now: f64,
        surface: &mut S,
    ) -> FrameOutcome {
        if !self.running || self.scheduled != Some(handle) {
            return FrameOutcome::Cancelled;
        }

        let Some(bounds) = surface.size() else {
            return FrameOutcome::Skipped(self.schedule());
        };

        self.agents.retain(|agent| !agent.is_consumed());

        for agent in &mut self.agents {
            agent.activate(now);
            agent.tick(bounds, &self.config, &mut self.rng);
        }

        for predator in &mut self.predators {
            if let Some(eaten) = predator.tick(&mut self.agents, bounds, &self.config, &mut self.rng)
            {
                log::trace!("agent {:?} eaten", eaten);
                self.consumed_total += 1;
            }
        }

        surface.clear(0.0, 0.0, bounds.width, bounds.height);
        for agent in &self.agents {
            agent.render(surface, now, self.show_limbs);
        }
        for predator in &self.predators {
            predator.render(surface);
        }

        self.frame += 1;
        FrameOutcome::Rendered(self.schedule())
    }

    pub fn status(&self) -> RunStatus {
        let mut status = RunStatus {
            running: self.running,
            consumed_total: self.consumed_total,
            predators: self.predators.len(),
            frame: self.frame,
            ..RunStatus::default()
        };
        for agent in &self.agents {
            match agent.state {
                AgentState::Dormant => status.dormant += 1,
                AgentState::Active => status.active += 1,
                AgentState::Consumed => {}
            }
        }
        status
    }
}
