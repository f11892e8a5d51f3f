// Dashboard service - Use case for building dashboard snapshots from history
use crate::application::status_evaluator::{channel_status, evaluate};
use crate::domain::dashboard::Dashboard;
use crate::domain::history::History;
use crate::domain::sample::{Channel, Sample};
use crate::domain::telemetry::{SeriesData, TankGauge, TileData, TimeSeriesPoint};
use crate::domain::thresholds::Thresholds;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct DashboardService {
    title: String,
    thresholds: Thresholds,
}

impl DashboardService {
    pub fn new(title: String, thresholds: Thresholds) -> Self {
        Self { title, thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Snapshot of `history` as of `now`. `None` while the history is empty.
    pub fn build(&self, history: &History, tick: u64, now: DateTime<Utc>) -> Option<Dashboard> {
        let latest = history.latest()?;
        let evaluation = evaluate(latest, &self.thresholds);

        let tiles = Channel::ALL
            .into_iter()
            .map(|channel| {
                TileData::new(
                    channel,
                    latest.value(channel),
                    evaluation.status(channel),
                    self.describe_threshold(channel),
                )
            })
            .collect();

        let series = Channel::ALL
            .into_iter()
            .map(|channel| SeriesData::new(channel, Self::points(history, channel)))
            .collect();

        Some(Dashboard {
            title: self.title.clone(),
            generated_at: now,
            tick,
            safe: evaluation.overall_safe,
            alerts: evaluation.alerts,
            tiles,
            series,
            tank: self.tank_gauge(latest),
        })
    }

    fn points(history: &History, channel: Channel) -> Vec<TimeSeriesPoint> {
        history
            .iter()
            .map(|s| TimeSeriesPoint::new(s.timestamp.timestamp_millis(), s.value(channel)))
            .collect()
    }

    fn tank_gauge(&self, latest: &Sample) -> TankGauge {
        TankGauge {
            fill_percent: latest.water_level_percent,
            status: channel_status(
                Channel::WaterLevel,
                latest.water_level_percent,
                &self.thresholds,
            ),
        }
    }

    fn describe_threshold(&self, channel: Channel) -> String {
        let bound = self.thresholds.bound(channel);
        match (bound.min, bound.max) {
            (None, None) => bound.describe(),
            _ => format!("{}{}", bound.describe(), channel.suffix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::Status;
    use chrono::Duration;

    fn history_with(levels: &[f64]) -> History {
        let base = Utc::now();
        let mut history = History::new(40);
        for (i, level) in levels.iter().enumerate() {
            history.append(Sample::new(
                base + Duration::seconds(i as i64),
                7.2,
                1.2,
                27.5,
                *level,
            ));
        }
        history
    }

    #[test]
    fn test_empty_history_has_no_dashboard() {
        let service = DashboardService::new("Tank".to_string(), Thresholds::default());
        assert!(service.build(&History::new(40), 0, Utc::now()).is_none());
    }

    #[test]
    fn test_build_reflects_latest_sample() {
        let service = DashboardService::new("Tank".to_string(), Thresholds::default());
        let history = history_with(&[90.0, 60.0, 12.5]);

        let dashboard = service.build(&history, 3, Utc::now()).unwrap();

        assert_eq!(dashboard.tick, 3);
        assert!(!dashboard.safe);
        assert_eq!(dashboard.alerts.len(), 1);
        assert_eq!(dashboard.tank.fill_percent, 12.5);
        assert_eq!(dashboard.tank.status, Status::Bad);

        let level = dashboard.tile(Channel::WaterLevel).unwrap();
        assert_eq!(level.status, Status::Bad);
        assert_eq!(level.threshold, ">= 20%");
        assert_eq!(dashboard.tile(Channel::Ph).unwrap().threshold, "6.5-8.5");

        let series = dashboard.series(Channel::WaterLevel).unwrap();
        assert_eq!(series.values(), vec![90.0, 60.0, 12.5]);
        assert!(series.points.windows(2).all(|w| w[0].time_ms < w[1].time_ms));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let service = DashboardService::new("Tank".to_string(), Thresholds::default());
        let dashboard = service.build(&history_with(&[80.0]), 1, Utc::now()).unwrap();

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["safe"], serde_json::json!(true));
        assert_eq!(json["tank"]["fillPercent"], serde_json::json!(80.0));
        assert_eq!(json["tiles"][3]["channel"], serde_json::json!("waterLevel"));
        assert_eq!(json["tiles"][0]["status"], serde_json::json!("ok"));
        assert!(json["series"][0]["points"][0]["timeMs"].is_i64());
    }
}
