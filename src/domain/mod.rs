// Domain layer - Samples, thresholds, status and the dashboard read model
pub mod dashboard;
pub mod history;
pub mod sample;
pub mod status;
pub mod telemetry;
pub mod thresholds;
