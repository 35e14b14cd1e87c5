#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Tunable simulation constants as exchanged with hosts.
///
/// Every field has a default, so a settings file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunSettings {
    pub agent_max_speed: f32,
    pub wall_margin: f32,
    pub agent_wander_chance: f32,
    pub agent_wander_strength: f32,
    pub predator_speed_min: f32,
    pub predator_speed_max: f32,
    pub contact_radius: f32,
    pub predator_jitter_chance: f32,
    pub wrap_overscan: f32,
    pub spawn_interval_initial_ms: f64,
    pub spawn_interval_decay: f64,
    pub spawn_interval_min_ms: f64,
    pub show_limbs: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            agent_max_speed: 2.5,
            wall_margin: 10.0,
            agent_wander_chance: 0.02,
            agent_wander_strength: 0.5,
            predator_speed_min: 2.0,
            predator_speed_max: 3.5,
            contact_radius: 20.0,
            predator_jitter_chance: 0.05,
            wrap_overscan: 20.0,
            spawn_interval_initial_ms: 50.0,
            spawn_interval_decay: 0.95,
            spawn_interval_min_ms: 5.0,
            show_limbs: true,
        }
    }
}

#[cfg(feature = "std")]
impl RunSettings {
    /// Parse settings from JSON, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot of a run, reported back to hosts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStatus {
    pub running: bool,
    pub dormant: usize,
    pub active: usize,
    pub consumed_total: usize,
    pub predators: usize,
    pub frame: u64,
}

impl RunStatus {
    /// Agents still on the surface, whether waiting or running.
    pub fn remaining(&self) -> usize {
        self.dormant + self.active
    }
}
