// Sample domain model - one reading across all monitored channels
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A monitored water-quality quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Ph,
    Turbidity,
    Temperature,
    WaterLevel,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Ph,
        Channel::Turbidity,
        Channel::Temperature,
        Channel::WaterLevel,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Channel::Ph => "ph",
            Channel::Turbidity => "turbidity",
            Channel::Temperature => "temperature",
            Channel::WaterLevel => "waterLevel",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Channel::Ph => "pH",
            Channel::Turbidity => "Turbidity",
            Channel::Temperature => "Temperature",
            Channel::WaterLevel => "Tank Level",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Channel::Ph => "",
            Channel::Turbidity => "NTU",
            Channel::Temperature => "°C",
            Channel::WaterLevel => "%",
        }
    }

    /// Unit as appended to a formatted value.
    pub fn suffix(self) -> &'static str {
        match self {
            Channel::Turbidity => " NTU",
            other => other.unit(),
        }
    }

    /// Decimal places kept when a value is stored.
    pub fn precision(self) -> i32 {
        match self {
            Channel::Ph | Channel::Turbidity => 2,
            Channel::Temperature | Channel::WaterLevel => 1,
        }
    }

    /// Physically valid range; every stored value lies inside it.
    pub fn valid_range(self) -> (f64, f64) {
        match self {
            Channel::Ph => (5.0, 9.5),
            Channel::Turbidity => (0.0, 20.0),
            Channel::Temperature => (15.0, 45.0),
            Channel::WaterLevel => (0.0, 100.0),
        }
    }

    /// Clamp to the valid range, then round to the channel precision.
    pub fn normalize(self, value: f64) -> f64 {
        let (min, max) = self.valid_range();
        round_to(value.clamp(min, max), self.precision())
    }

    pub fn format_value(self, value: f64) -> String {
        format!("{:.*}", self.precision() as usize, value)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub ph: f64,
    pub turbidity: f64,
    pub temperature: f64,
    pub water_level_percent: f64,
}

impl Sample {
    pub fn new(
        timestamp: DateTime<Utc>,
        ph: f64,
        turbidity: f64,
        temperature: f64,
        water_level_percent: f64,
    ) -> Self {
        Self {
            timestamp,
            ph,
            turbidity,
            temperature,
            water_level_percent,
        }
    }

    /// Starting point for the synthetic run: a healthy, mostly full tank.
    pub fn initial(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, 7.2, 1.2, 27.5, 85.0)
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Ph => self.ph,
            Channel::Turbidity => self.turbidity,
            Channel::Temperature => self.temperature,
            Channel::WaterLevel => self.water_level_percent,
        }
    }

    /// Copy with one channel replaced, normalized to that channel's range.
    pub fn with_value(&self, channel: Channel, value: f64) -> Self {
        let value = channel.normalize(value);
        let mut next = *self;
        match channel {
            Channel::Ph => next.ph = value,
            Channel::Turbidity => next.turbidity = value,
            Channel::Temperature => next.temperature = value,
            Channel::WaterLevel => next.water_level_percent = value,
        }
        next
    }

    /// First channel whose value is non-finite or outside its valid range.
    pub fn out_of_range(&self) -> Option<(Channel, f64)> {
        Channel::ALL.into_iter().find_map(|channel| {
            let value = self.value(channel);
            let (min, max) = channel.valid_range();
            if value.is_finite() && (min..=max).contains(&value) {
                None
            } else {
                Some((channel, value))
            }
        })
    }
}
