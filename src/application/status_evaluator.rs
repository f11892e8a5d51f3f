// Status evaluator - thresholds to per-channel status, safety and alerts
use crate::domain::sample::{Channel, Sample};
use crate::domain::status::{ChannelStatus, Evaluation, Status};
use crate::domain::thresholds::Thresholds;

/// Severity of a threshold violation. Temperature is informational and only warns.
fn violation_status(channel: Channel) -> Status {
    match channel {
        Channel::Temperature => Status::Warn,
        Channel::Ph | Channel::Turbidity | Channel::WaterLevel => Status::Bad,
    }
}

pub fn channel_status(channel: Channel, value: f64, thresholds: &Thresholds) -> Status {
    if thresholds.bound(channel).contains(value) {
        Status::Ok
    } else {
        violation_status(channel)
    }
}

fn alert_message(channel: Channel, value: f64, thresholds: &Thresholds) -> String {
    let bound = thresholds.bound(channel);
    let value = channel.format_value(value);
    let unit = channel.suffix();
    match (bound.min, bound.max) {
        (Some(min), Some(max)) => format!(
            "{} {}{} is outside the safe range {}-{}{}",
            channel, value, unit, min, max, unit
        ),
        (Some(min), None) => format!(
            "{} {}{} is below the minimum of {}{}",
            channel, value, unit, min, unit
        ),
        (None, Some(max)) => format!(
            "{} {}{} is above the maximum of {}{}",
            channel, value, unit, max, unit
        ),
        (None, None) => format!("{} {}{} is out of range", channel, value, unit),
    }
}

/// Evaluate one sample against the thresholds. Pure: no state survives the call.
pub fn evaluate(sample: &Sample, thresholds: &Thresholds) -> Evaluation {
    let per_channel: Vec<ChannelStatus> = Channel::ALL
        .into_iter()
        .map(|channel| ChannelStatus {
            channel,
            status: channel_status(channel, sample.value(channel), thresholds),
        })
        .collect();

    let alerts = per_channel
        .iter()
        .filter(|c| c.status == Status::Bad)
        .map(|c| alert_message(c.channel, sample.value(c.channel), thresholds))
        .collect();

    let overall_safe = per_channel.iter().all(|c| c.status != Status::Bad);

    Evaluation {
        per_channel,
        overall_safe,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(ph: f64, turbidity: f64, temperature: f64, level: f64) -> Sample {
        Sample::new(Utc::now(), ph, turbidity, temperature, level)
    }

    #[test]
    fn test_healthy_sample_is_safe() {
        let result = evaluate(&sample(7.4, 1.5, 28.0, 78.5), &Thresholds::default());

        for channel in Channel::ALL {
            assert_eq!(result.status(channel), Status::Ok, "{channel}");
        }
        assert!(result.overall_safe);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_high_ph_is_bad_and_alerts_range() {
        let result = evaluate(&sample(9.0, 1.0, 20.0, 50.0), &Thresholds::default());

        assert_eq!(result.status(Channel::Ph), Status::Bad);
        assert!(!result.overall_safe);
        assert_eq!(result.alerts.len(), 1);
        assert!(result.alerts[0].contains("6.5"));
        assert!(result.alerts[0].contains("8.5"));
        assert!(result.alerts[0].contains("9.00"));
    }

    #[test]
    fn test_low_level_is_unsafe() {
        let result = evaluate(&sample(7.0, 1.0, 20.0, 10.0), &Thresholds::default());

        assert_eq!(result.status(Channel::WaterLevel), Status::Bad);
        assert!(!result.overall_safe);
        assert!(result.alerts[0].contains("10.0%"));
        assert!(result.alerts[0].contains("20%"));
    }

    #[test]
    fn test_turbidity_above_max_is_bad() {
        let result = evaluate(&sample(7.0, 7.25, 20.0, 50.0), &Thresholds::default());

        assert_eq!(result.status(Channel::Turbidity), Status::Bad);
        assert!(result.alerts[0].contains("7.25 NTU"));
    }

    #[test]
    fn test_hot_water_only_warns() {
        let result = evaluate(&sample(7.0, 1.0, 34.0, 50.0), &Thresholds::default());

        assert_eq!(result.status(Channel::Temperature), Status::Warn);
        assert!(result.overall_safe);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_every_bad_channel_alerts() {
        let result = evaluate(&sample(5.5, 9.0, 40.0, 5.0), &Thresholds::default());

        assert_eq!(result.alerts.len(), 3);
        assert_eq!(result.status(Channel::Temperature), Status::Warn);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let s = sample(8.7, 6.0, 31.0, 15.0);
        let thresholds = Thresholds::default();
        assert_eq!(evaluate(&s, &thresholds), evaluate(&s, &thresholds));
    }

    #[test]
    fn test_custom_thresholds() {
        let mut thresholds = Thresholds::default();
        thresholds.water_level.min = Some(60.0);

        let result = evaluate(&sample(7.0, 1.0, 20.0, 50.0), &thresholds);
        assert_eq!(result.status(Channel::WaterLevel), Status::Bad);
    }
}
