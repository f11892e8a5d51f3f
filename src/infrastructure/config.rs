use crate::domain::history::DEFAULT_CAPACITY;
use crate::domain::sample::Channel;
use crate::domain::thresholds::Thresholds;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// One hour; longer periods make the seeded backlog reach implausibly far back.
pub const MAX_TICK_INTERVAL_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{channel} threshold min {min} is greater than max {max}")]
    InvertedThreshold { channel: Channel, min: f64, max: f64 },
    #[error("{channel} threshold is not a finite number")]
    NonFiniteThreshold { channel: Channel },
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
    #[error("tick interval must be at least 1ms")]
    ZeroInterval,
    #[error("tick interval of {0}ms exceeds the maximum of {max}ms", max = MAX_TICK_INTERVAL_MS)]
    IntervalTooLong(u64),
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub simulation: SimulationSettings,
    pub thresholds: Thresholds,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub title: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            title: "Water Quality Monitor".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_interval_ms: u64,
    pub history_capacity: usize,
    /// Fixed seed for a reproducible run; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1800,
            history_capacity: DEFAULT_CAPACITY,
            seed: None,
        }
    }
}

impl SimulationSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.simulation.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.simulation.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(ConfigError::IntervalTooLong(
                self.simulation.tick_interval_ms,
            ));
        }
        for channel in Channel::ALL {
            let bound = self.thresholds.bound(channel);
            if bound.min.into_iter().chain(bound.max).any(|v| !v.is_finite()) {
                return Err(ConfigError::NonFiniteThreshold { channel });
            }
            if let (Some(min), Some(max)) = (bound.min, bound.max) {
                if min > max {
                    return Err(ConfigError::InvertedThreshold { channel, min, max });
                }
            }
        }
        Ok(())
    }
}

/// Load settings from `config/dashboard.*` (optional) and `WQD_` environment
/// variables, e.g. `WQD_SIMULATION__TICK_INTERVAL_MS=500`.
pub fn load_settings() -> anyhow::Result<Settings> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("WQD")
                .prefix_separator("_")
                .separator("__"),
        );
    settings_from(builder)
}

fn settings_from(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::thresholds::Bound;

    fn from_toml(toml: &str) -> anyhow::Result<Settings> {
        settings_from(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let settings = from_toml("").unwrap();

        assert_eq!(settings.simulation.tick_interval_ms, 1800);
        assert_eq!(settings.simulation.history_capacity, 40);
        assert_eq!(settings.simulation.seed, None);
        assert_eq!(settings.thresholds, Thresholds::default());
        assert_eq!(settings.server.bind.port(), 8080);
    }

    #[test]
    fn test_partial_override() {
        let settings = from_toml(
            r#"
            [simulation]
            tick_interval_ms = 500
            seed = 42

            [thresholds.water_level]
            min = 35.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.simulation.tick_interval(), Duration::from_millis(500));
        assert_eq!(settings.simulation.seed, Some(42));
        assert_eq!(settings.simulation.history_capacity, 40);
        assert_eq!(settings.thresholds.water_level, Bound::at_least(35.0));
        assert_eq!(settings.thresholds.ph, Bound::new(Some(6.5), Some(8.5)));
    }

    #[test]
    fn test_inverted_threshold_is_rejected() {
        let err = from_toml(
            r#"
            [thresholds.ph]
            min = 9.0
            max = 6.0
            "#,
        )
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvertedThreshold {
                channel: Channel::Ph,
                min: 9.0,
                max: 6.0
            })
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut settings = Settings::default();
        settings.simulation.history_capacity = 0;
        assert_eq!(settings.validate(), Err(ConfigError::ZeroCapacity));

        settings.simulation.history_capacity = 40;
        settings.simulation.tick_interval_ms = 0;
        assert_eq!(settings.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_overlong_interval_is_rejected() {
        let mut settings = Settings::default();
        settings.simulation.tick_interval_ms = MAX_TICK_INTERVAL_MS;
        assert_eq!(settings.validate(), Ok(()));

        settings.simulation.tick_interval_ms = u64::MAX;
        assert_eq!(
            settings.validate(),
            Err(ConfigError::IntervalTooLong(u64::MAX))
        );

        let err = from_toml(
            r#"
            [simulation]
            tick_interval_ms = 90000000
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::IntervalTooLong(90_000_000))
        );
    }
}
