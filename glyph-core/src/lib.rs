#![cfg_attr(not(feature = "std"), no_std)]

//! Simulation core for the glyph run animation: text characters wake up,
//! run around a surface and get eaten by bugs.
//!
//! Everything here is host-agnostic. Hosts supply time as a millisecond
//! timestamp, a [`RenderSurface`] to draw on, and drive the frame loop with
//! the [`FrameHandle`]s returned by [`Simulation`].

extern crate alloc;

pub mod agent;
pub mod config;
pub mod predator;
pub mod render;
pub mod simulation;
pub mod spawner;
pub mod vector;

pub use agent::{Agent, AgentId, AgentState, Limbs};
pub use config::{ConfigError, SimConfig};
pub use predator::Predator;
pub use render::{Bounds, Color, Ellipse, RenderSurface, PALETTE};
pub use simulation::{FrameHandle, FrameOutcome, Simulation};
pub use spawner::{SpawnLayout, Spawner};
pub use vector::Vector2D;
