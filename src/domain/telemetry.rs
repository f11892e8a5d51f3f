// Telemetry view models - tiles, series and gauge handed to presentation
use super::sample::Channel;
use super::status::Status;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub channel: Channel,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    pub status: Status,
    pub threshold: String,
}

impl TileData {
    pub fn new(channel: Channel, value: f64, status: Status, threshold: String) -> Self {
        Self {
            channel,
            title: channel.title().to_string(),
            unit: channel.unit().to_string(),
            value,
            precision: channel.precision(),
            status,
            threshold,
        }
    }

    pub fn display_value(&self) -> String {
        self.channel.format_value(self.value)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub channel: Channel,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(channel: Channel, points: Vec<TimeSeriesPoint>) -> Self {
        Self { channel, points }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankGauge {
    pub fill_percent: f64,
    pub status: Status,
}
