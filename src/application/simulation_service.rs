// Simulation service - Owns the history and applies ticks and forced events
use crate::application::dashboard_service::DashboardService;
use crate::application::random_source::RandomSource;
use crate::application::sample_source::{SampleSource, SourceError};
use crate::application::signal_generator::ForcedEvent;
use crate::application::status_evaluator::evaluate;
use crate::domain::dashboard::Dashboard;
use crate::domain::history::History;
use crate::domain::sample::Sample;
use crate::domain::status::Evaluation;
use crate::infrastructure::config::SimulationSettings;
use chrono::{DateTime, Duration, Utc};

pub struct SimulationService {
    source: Box<dyn SampleSource>,
    events: Box<dyn RandomSource>,
    dashboard: DashboardService,
    history: History,
    interval: Duration,
    ticks: u64,
}

impl SimulationService {
    pub fn new(
        source: Box<dyn SampleSource>,
        events: Box<dyn RandomSource>,
        dashboard: DashboardService,
        settings: &SimulationSettings,
    ) -> Self {
        Self {
            source,
            events,
            dashboard,
            history: History::new(settings.history_capacity),
            interval: Duration::milliseconds(
                i64::try_from(settings.tick_interval_ms).unwrap_or(i64::MAX),
            ),
            ticks: 0,
        }
    }

    /// Fill the history with the source's backlog ending at `now`.
    ///
    /// A source without a backlog starts from a single initial reading. An
    /// already seeded history is left as is, and a backlog with any invalid
    /// reading is rejected whole.
    pub async fn seed(&mut self, now: DateTime<Utc>) -> Result<usize, SourceError> {
        if !self.history.is_empty() {
            tracing::debug!("History already seeded, skipping backfill");
            return Ok(self.history.len());
        }

        let samples = self
            .source
            .backfill(self.history.capacity(), self.interval, now)
            .await?;
        samples.iter().try_for_each(Self::check_bounds)?;

        if samples.is_empty() {
            self.history.append(Sample::initial(now));
        }
        for sample in samples {
            self.history.append(sample);
        }

        tracing::info!(
            "Seeded history from {} source with {} samples",
            self.source.name(),
            self.history.len()
        );
        Ok(self.history.len())
    }

    /// Produce and store one new sample stamped `at`.
    ///
    /// On error the history is left untouched.
    pub async fn tick(&mut self, at: DateTime<Utc>) -> Result<Sample, SourceError> {
        let previous = self
            .history
            .latest()
            .copied()
            .unwrap_or_else(|| Sample::initial(at));

        let sample = self.source.next_sample(&previous, at).await?;
        Self::check_bounds(&sample)?;

        self.history.append(sample);
        self.ticks += 1;
        Ok(sample)
    }

    pub fn force_event(&mut self, event: ForcedEvent, at: DateTime<Utc>) -> Option<Sample> {
        let events = &mut self.events;
        let forced = self
            .history
            .force_event(at, |last| event.apply(last, &mut **events));

        match &forced {
            Some(sample) => tracing::info!(
                "Forced {} event: level {}%, turbidity {} NTU",
                event,
                sample.water_level_percent,
                sample.turbidity
            ),
            None => tracing::warn!("Ignoring forced {} event on empty history", event),
        }
        forced
    }

    /// Status of the latest sample, computed on every call.
    pub fn evaluation(&self) -> Option<Evaluation> {
        self.history
            .latest()
            .map(|latest| evaluate(latest, self.dashboard.thresholds()))
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Option<Dashboard> {
        self.dashboard.build(&self.history, self.ticks, now)
    }

    #[cfg(test)]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn check_bounds(sample: &Sample) -> Result<(), SourceError> {
        match sample.out_of_range() {
            Some((channel, value)) => Err(SourceError::OutOfRange { channel, value }),
            None => Ok(()),
        }
    }
}
