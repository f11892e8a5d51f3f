// Signal generator - synthetic drift, jitter and events for every channel
use crate::application::random_source::RandomSource;
use crate::application::sample_source::{SampleSource, SourceError};
use crate::domain::sample::{Channel, Sample};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PH_TARGET: (f64, f64) = (6.8, 7.6);
const PH_RATE: f64 = 0.08;
const PH_NOISE: (f64, f64) = (-0.03, 0.03);

const TURBIDITY_NOISE: (f64, f64) = (-0.12, 0.28);
const CONTAMINATION_PROBABILITY: f64 = 0.015;
const CONTAMINATION_SPIKE: (f64, f64) = (2.0, 6.0);
const SEED_TURBIDITY_MAX: f64 = 12.0;

const TEMPERATURE_TARGET: (f64, f64) = (26.0, 31.0);
const TEMPERATURE_RATE: f64 = 0.03;
const TEMPERATURE_NOISE: (f64, f64) = (-0.05, 0.12);

const LEVEL_DECLINE: (f64, f64) = (0.05, 0.5);
const TOP_UP_PROBABILITY: f64 = 0.06;
const TOP_UP: (f64, f64) = (0.02, 0.3);
const REFILL_PROBABILITY: f64 = 0.02;
const REFILL: (f64, f64) = (78.0, 100.0);
const FORCED_REFILL: (f64, f64) = (82.0, 100.0);

/// Seeding runs with a tighter turbidity ceiling so the backlog starts calm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seed,
    Live,
}

/// Advance every channel one step from `previous`.
///
/// Draws are consumed in a fixed order (pH, turbidity, temperature, level) so a
/// replayed random sequence reproduces the same series.
pub fn next_sample<R>(previous: &Sample, at: DateTime<Utc>, phase: Phase, rng: &mut R) -> Sample
where
    R: RandomSource + ?Sized,
{
    let ph = next_ph(previous.ph, rng);
    let turbidity = next_turbidity(previous.turbidity, phase, rng);
    let temperature = next_temperature(previous.temperature, rng);
    let water_level = next_water_level(previous.water_level_percent, rng);
    Sample::new(at, ph, turbidity, temperature, water_level)
}

fn drift_toward(value: f64, target: f64, rate: f64) -> f64 {
    value + (target - value) * rate
}

fn next_ph<R: RandomSource + ?Sized>(previous: f64, rng: &mut R) -> f64 {
    let target = rng.range(PH_TARGET.0, PH_TARGET.1);
    let value = drift_toward(previous, target, PH_RATE) + rng.range(PH_NOISE.0, PH_NOISE.1);
    Channel::Ph.normalize(value)
}

fn next_turbidity<R: RandomSource + ?Sized>(previous: f64, phase: Phase, rng: &mut R) -> f64 {
    let mut value = previous + rng.range(TURBIDITY_NOISE.0, TURBIDITY_NOISE.1);
    if rng.chance(CONTAMINATION_PROBABILITY) {
        value += rng.range(CONTAMINATION_SPIKE.0, CONTAMINATION_SPIKE.1);
    }
    if phase == Phase::Seed {
        value = value.min(SEED_TURBIDITY_MAX);
    }
    Channel::Turbidity.normalize(value)
}

fn next_temperature<R: RandomSource + ?Sized>(previous: f64, rng: &mut R) -> f64 {
    let target = rng.range(TEMPERATURE_TARGET.0, TEMPERATURE_TARGET.1);
    let value = drift_toward(previous, target, TEMPERATURE_RATE)
        + rng.range(TEMPERATURE_NOISE.0, TEMPERATURE_NOISE.1);
    Channel::Temperature.normalize(value)
}

fn next_water_level<R: RandomSource + ?Sized>(previous: f64, rng: &mut R) -> f64 {
    let mut value = previous - rng.range(LEVEL_DECLINE.0, LEVEL_DECLINE.1);
    if rng.chance(TOP_UP_PROBABILITY) {
        value += rng.range(TOP_UP.0, TOP_UP.1);
    }
    if rng.chance(REFILL_PROBABILITY) {
        value = rng.range(REFILL.0, REFILL.1);
    }
    Channel::WaterLevel.normalize(value)
}

#[derive(Debug, Error)]
#[error("unknown event '{0}', expected 'refill' or 'contamination'")]
pub struct UnknownEvent(String);

/// Manually triggered demo perturbations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedEvent {
    Refill,
    Contamination,
}

impl ForcedEvent {
    /// Rewrite only the affected channel of `sample`.
    pub fn apply<R: RandomSource + ?Sized>(self, sample: &Sample, rng: &mut R) -> Sample {
        match self {
            ForcedEvent::Refill => sample.with_value(
                Channel::WaterLevel,
                rng.range(FORCED_REFILL.0, FORCED_REFILL.1),
            ),
            ForcedEvent::Contamination => sample.with_value(
                Channel::Turbidity,
                sample.turbidity + rng.range(CONTAMINATION_SPIKE.0, CONTAMINATION_SPIKE.1),
            ),
        }
    }
}

impl FromStr for ForcedEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "refill" => Ok(ForcedEvent::Refill),
            "contamination" => Ok(ForcedEvent::Contamination),
            _ => Err(UnknownEvent(s.to_string())),
        }
    }
}

impl fmt::Display for ForcedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForcedEvent::Refill => write!(f, "refill"),
            ForcedEvent::Contamination => write!(f, "contamination"),
        }
    }
}

/// Sample source backed by the synthetic random walk.
pub struct SyntheticSource<R> {
    rng: R,
}

impl<R: RandomSource> SyntheticSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

#[async_trait]
impl<R: RandomSource> SampleSource for SyntheticSource<R> {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn next_sample(
        &mut self,
        previous: &Sample,
        at: DateTime<Utc>,
    ) -> Result<Sample, SourceError> {
        Ok(next_sample(previous, at, Phase::Live, &mut self.rng))
    }

    /// Walk forward from the initial sample so the last seeded reading lands on `now`.
    async fn backfill(
        &mut self,
        steps: usize,
        interval: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sample>, SourceError> {
        let stamp = |i: usize| {
            i32::try_from(i)
                .ok()
                .and_then(|i| interval.checked_mul(i))
                .and_then(|offset| now.checked_sub_signed(offset))
                .ok_or(SourceError::BackfillRange { steps, interval })
        };

        let mut current = Sample::initial(stamp(steps)?);
        let mut samples = Vec::with_capacity(steps);
        for i in (0..steps).rev() {
            current = next_sample(&current, stamp(i)?, Phase::Seed, &mut self.rng);
            samples.push(current);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::random_source::testing::SequenceRandom;
    use crate::infrastructure::rng::StdRandom;

    fn assert_within_bounds(sample: &Sample) {
        for channel in Channel::ALL {
            let (min, max) = channel.valid_range();
            let value = sample.value(channel);
            assert!(
                (min..=max).contains(&value),
                "{channel} out of bounds: {value}"
            );
        }
    }

    #[test]
    fn test_bounds_hold_over_many_ticks() {
        let mut rng = StdRandom::seeded(7);
        let mut sample = Sample::initial(Utc::now());
        for _ in 0..10_000 {
            sample = next_sample(&sample, sample.timestamp, Phase::Live, &mut rng);
            assert_within_bounds(&sample);
        }
    }

    #[test]
    fn test_bounds_hold_at_extreme_draws() {
        for draw in [0.0, 0.999_999] {
            let mut rng = SequenceRandom::constant(draw);
            let mut sample = Sample::initial(Utc::now());
            for _ in 0..10_000 {
                sample = next_sample(&sample, sample.timestamp, Phase::Live, &mut rng);
                assert_within_bounds(&sample);
            }
        }
    }

    #[test]
    fn test_step_with_midpoint_draws() {
        let mut rng = SequenceRandom::constant(0.5);
        let at = Utc::now();
        let previous = Sample::new(at, 7.0, 1.0, 27.0, 80.0);

        let next = next_sample(&previous, at, Phase::Live, &mut rng);

        assert_eq!(next.ph, 7.02);
        assert_eq!(next.turbidity, 1.08);
        assert_eq!(next.temperature, 27.1);
        assert_eq!(next.water_level_percent, 79.7);
    }

    #[test]
    fn test_low_draws_trigger_events() {
        let mut rng = SequenceRandom::constant(0.01);
        let at = Utc::now();
        let previous = Sample::new(at, 7.0, 1.0, 27.0, 80.0);

        let next = next_sample(&previous, at, Phase::Live, &mut rng);

        // contamination spike on top of the noise
        assert_eq!(next.turbidity, 2.92);
        // refill overrides decline and top-up
        assert_eq!(next.water_level_percent, 78.2);
    }

    #[test]
    fn test_seed_phase_caps_turbidity() {
        let at = Utc::now();
        let previous = Sample::new(at, 7.0, 11.95, 27.0, 80.0);

        let seeded = next_sample(&previous, at, Phase::Seed, &mut SequenceRandom::constant(0.99));
        let live = next_sample(&previous, at, Phase::Live, &mut SequenceRandom::constant(0.99));

        assert_eq!(seeded.turbidity, 12.0);
        assert_eq!(live.turbidity, 12.23);
    }

    #[test]
    fn test_forced_refill_range() {
        let sample = Sample::new(Utc::now(), 7.0, 1.0, 27.0, 12.0);
        for draw in [0.0, 0.3, 0.999] {
            let refilled = ForcedEvent::Refill.apply(&sample, &mut SequenceRandom::constant(draw));
            assert!((82.0..=100.0).contains(&refilled.water_level_percent));
            assert_eq!(refilled.turbidity, sample.turbidity);
        }
    }

    #[test]
    fn test_forced_contamination() {
        let sample = Sample::new(Utc::now(), 7.0, 1.0, 27.0, 50.0);
        let spiked = ForcedEvent::Contamination.apply(&sample, &mut SequenceRandom::constant(0.5));
        assert_eq!(spiked.turbidity, 5.0);
        assert_eq!(spiked.water_level_percent, 50.0);
    }

    #[test]
    fn test_forced_event_from_str() {
        assert_eq!("refill".parse::<ForcedEvent>().unwrap(), ForcedEvent::Refill);
        assert_eq!(
            "Contamination".parse::<ForcedEvent>().unwrap(),
            ForcedEvent::Contamination
        );
        assert!("drain".parse::<ForcedEvent>().is_err());
        assert_eq!(ForcedEvent::Refill.to_string(), "refill");
    }

    #[tokio::test]
    async fn test_backfill_is_chronological_and_ends_now() {
        let mut source = SyntheticSource::new(StdRandom::seeded(1));
        let now = Utc::now();
        let interval = Duration::milliseconds(1800);

        let samples = source.backfill(40, interval, now).await.unwrap();

        assert_eq!(samples.len(), 40);
        assert_eq!(samples.last().map(|s| s.timestamp), Some(now));
        assert_eq!(samples[0].timestamp, now - interval * 39);
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(samples.iter().all(|s| s.turbidity <= SEED_TURBIDITY_MAX));
    }

    #[tokio::test]
    async fn test_backfill_past_clock_range_is_an_error() {
        let mut source = SyntheticSource::new(StdRandom::seeded(1));

        let err = source
            .backfill(40, Duration::weeks(1_000_000), Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::BackfillRange { steps: 40, .. }));
    }
}
