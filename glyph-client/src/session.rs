use crate::ascii::AsciiSurface;
use anyhow::{Context, Result};
use glyph_core::Simulation;
use glyph_shared::RunStatus;
use std::io::Write;
use std::time::Duration;

/// How a terminal run is paced and when bugs are released.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Total predators to release over the run.
    pub predators: usize,
    /// Frames between predator releases. The first one arrives on frame 0.
    pub predator_every: u64,
    pub max_frames: u64,
    /// Simulated time per frame, in milliseconds.
    pub frame_ms: f64,
    /// Sleep between frames so the run plays back in real time.
    pub realtime: bool,
    /// Print every frame to the output.
    pub draw: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            predators: 3,
            predator_every: 30,
            max_frames: 3000,
            frame_ms: 1000.0 / 30.0,
            realtime: false,
            draw: false,
        }
    }
}

/// Drives one simulation run against an ASCII surface.
pub struct Session {
    sim: Simulation,
    surface: AsciiSurface,
    options: SessionOptions,
}

impl Session {
    pub fn new(sim: Simulation, surface: AsciiSurface, options: SessionOptions) -> Self {
        Self {
            sim,
            surface,
            options,
        }
    }

    pub fn surface(&self) -> &AsciiSurface {
        &self.surface
    }

    /// Run `text` until every glyph is eaten or the frame budget runs out.
    ///
    /// Returns the status as of the last frame; the simulation is stopped
    /// afterwards.
    pub fn run<W: Write>(&mut self, text: &str, out: &mut W) -> Result<RunStatus> {
        let layout = self.surface.layout();
        let agents = self.sim.spawn_text(text, &layout, 0.0);
        log::info!(
            "Running {} glyphs on a {}x{} surface",
            agents.len(),
            layout.bounds.width,
            layout.bounds.height
        );

        let mut handle = self.sim.start(agents);
        let mut now = 0.0;
        let mut released = 0;

        for frame in 0..self.options.max_frames {
            if released < self.options.predators
                && frame % self.options.predator_every.max(1) == 0
            {
                self.sim.spawn_predator(layout.bounds);
                released += 1;
            }

            now += self.options.frame_ms;
            handle = match self.sim.frame(handle, now, &mut self.surface).next() {
                Some(next) => next,
                None => break,
            };

            if self.options.draw {
                write!(out, "\x1b[H\x1b[2J{}", self.surface).context("Failed to draw frame")?;
                out.flush().context("Failed to flush frame")?;
            }

            let status = self.sim.status();
            if status.remaining() == 0 {
                log::info!("All glyphs eaten after {} frames", status.frame);
                break;
            }

            if self.options.realtime {
                std::thread::sleep(Duration::from_secs_f64(self.options.frame_ms / 1000.0));
            }
        }

        let status = self.sim.status();
        if status.remaining() > 0 {
            log::warn!("Frame budget exhausted with {} glyphs left", status.remaining());
        }
        self.sim.stop(&mut self.surface);

        Ok(status)
    }
}
