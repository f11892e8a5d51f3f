// Dashboard domain model - one immutable snapshot of the simulated tank
use super::sample::Channel;
use super::telemetry::{SeriesData, TankGauge, TileData};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub tick: u64,
    pub safe: bool,
    pub alerts: Vec<String>,
    pub tiles: Vec<TileData>,
    pub series: Vec<SeriesData>,
    pub tank: TankGauge,
}

impl Dashboard {
    #[cfg(test)]
    pub fn tile(&self, channel: Channel) -> Option<&TileData> {
        self.tiles.iter().find(|t| t.channel == channel)
    }

    pub fn series(&self, channel: Channel) -> Option<&SeriesData> {
        self.series.iter().find(|s| s.channel == channel)
    }
}
