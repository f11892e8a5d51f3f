// Threshold configuration per channel
use super::sample::Channel;
use serde::{Deserialize, Serialize};

/// Inclusive safe band for one channel. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Bound {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Bound {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Human-readable description of the band, e.g. `6.5-8.5` or `<= 5`.
    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            (Some(min), None) => format!(">= {}", min),
            (None, Some(max)) => format!("<= {}", max),
            (None, None) => "any".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    pub ph: Bound,
    pub turbidity: Bound,
    pub temperature: Bound,
    pub water_level: Bound,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ph: Bound::new(Some(6.5), Some(8.5)),
            turbidity: Bound::at_most(5.0),
            temperature: Bound::at_most(30.0),
            water_level: Bound::at_least(20.0),
        }
    }
}

impl Thresholds {
    pub fn bound(&self, channel: Channel) -> &Bound {
        match channel {
            Channel::Ph => &self.ph,
            Channel::Turbidity => &self.turbidity,
            Channel::Temperature => &self.temperature,
            Channel::WaterLevel => &self.water_level,
        }
    }
}
