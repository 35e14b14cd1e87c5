use glyph_shared::RunSettings;
use thiserror::Error;

/// Configuration for the glyph simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Upper bound on an agent's speed, in units per tick.
    pub agent_max_speed: f32,
    /// Distance from each wall at which agents bounce.
    pub wall_margin: f32,
    /// Per-tick probability that an active agent changes direction.
    pub agent_wander_chance: f32,
    /// Largest per-axis velocity change applied by a wander step.
    pub agent_wander_strength: f32,
    pub predator_speed_min: f32,
    pub predator_speed_max: f32,
    /// A predator consumes its target when closer than this.
    pub contact_radius: f32,
    /// Per-tick probability that an idle predator jitters its heading.
    pub predator_jitter_chance: f32,
    /// Largest heading change of a jitter, in radians either way.
    pub predator_jitter_angle: f32,
    /// How far past an edge an idle predator travels before wrapping.
    pub wrap_overscan: f32,
    /// Wing phase advance per tick.
    pub wing_flap_rate: f32,
    pub spawn_interval_initial_ms: f64,
    pub spawn_interval_decay: f64,
    pub spawn_interval_min_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from(&RunSettings::default())
    }
}

impl From<&RunSettings> for SimConfig {
    fn from(settings: &RunSettings) -> Self {
        Self {
            agent_max_speed: settings.agent_max_speed,
            wall_margin: settings.wall_margin,
            agent_wander_chance: settings.agent_wander_chance,
            agent_wander_strength: settings.agent_wander_strength,
            predator_speed_min: settings.predator_speed_min,
            predator_speed_max: settings.predator_speed_max,
            contact_radius: settings.contact_radius,
            predator_jitter_chance: settings.predator_jitter_chance,
            predator_jitter_angle: core::f32::consts::PI,
            wrap_overscan: settings.wrap_overscan,
            wing_flap_rate: 0.3,
            spawn_interval_initial_ms: settings.spawn_interval_initial_ms,
            spawn_interval_decay: settings.spawn_interval_decay,
            spawn_interval_min_ms: settings.spawn_interval_min_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    Probability { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("predator speed band is empty: min {min} > max {max}")]
    SpeedBand { min: f32, max: f32 },
    #[error("spawn interval decay must be in (0, 1], got {0}")]
    Decay(f64),
}

impl SimConfig {
    /// Check the values the simulation relies on.
    ///
    /// Probabilities feed `Rng::gen_bool`, which panics outside `[0, 1]`, and
    /// a zero interval floor would stop activation delays from increasing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("agent_wander_chance", self.agent_wander_chance),
            ("predator_jitter_chance", self.predator_jitter_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }

        for (name, value) in [
            ("agent_max_speed", self.agent_max_speed as f64),
            ("predator_speed_min", self.predator_speed_min as f64),
            ("contact_radius", self.contact_radius as f64),
            ("spawn_interval_initial_ms", self.spawn_interval_initial_ms),
            ("spawn_interval_min_ms", self.spawn_interval_min_ms),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if self.predator_speed_min > self.predator_speed_max {
            return Err(ConfigError::SpeedBand {
                min: self.predator_speed_min,
                max: self.predator_speed_max,
            });
        }

        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return Err(ConfigError::Decay(self.spawn_interval_decay));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_from_settings() {
        let settings = RunSettings {
            contact_radius: 42.0,
            ..RunSettings::default()
        };
        let config = SimConfig::from(&settings);
        assert_eq!(config.contact_radius, 42.0);
        assert_eq!(config.predator_jitter_angle, core::f32::consts::PI);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = SimConfig {
            agent_wander_chance: 1.5,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability {
                name: "agent_wander_chance",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_speed_band() {
        let config = SimConfig {
            predator_speed_min: 4.0,
            predator_speed_max: 1.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpeedBand { .. })));
    }

    #[test]
    fn test_rejects_zero_floor_and_bad_decay() {
        let config = SimConfig {
            spawn_interval_min_ms: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { .. })
        ));

        let config = SimConfig {
            spawn_interval_decay: 1.2,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Decay(1.2)));
    }
}
