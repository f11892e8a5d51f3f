// Sample source trait - where new readings come from
use crate::domain::sample::{Channel, Sample};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{channel} reading {value} is outside the valid range")]
    OutOfRange { channel: Channel, value: f64 },
    #[error("backfill of {steps} samples every {interval} reaches outside the clock range")]
    BackfillRange { steps: usize, interval: Duration },
    /// For feeds backed by real hardware or a network link that cannot
    /// currently produce a reading; the synthetic source never fails this way.
    #[allow(dead_code)]
    #[error("sample source unavailable: {0}")]
    Unavailable(String),
}

/// Produces one sample per call. The synthetic generator implements this; a
/// real sensor feed can replace it without touching history, evaluation or
/// presentation.
#[async_trait]
pub trait SampleSource: Send {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Next reading following `previous`, stamped `at`.
    async fn next_sample(
        &mut self,
        previous: &Sample,
        at: DateTime<Utc>,
    ) -> Result<Sample, SourceError>;

    /// Chronological backfill ending at `now`, used to seed the history.
    /// Sources without a backlog return nothing.
    async fn backfill(
        &mut self,
        _steps: usize,
        _interval: Duration,
        _now: DateTime<Utc>,
    ) -> Result<Vec<Sample>, SourceError> {
        Ok(Vec::new())
    }
}
