// Derived channel status and evaluation result
use super::sample::Channel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warn,
    Bad,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Warn => "warn",
            Status::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatus {
    pub channel: Channel,
    pub status: Status,
}

/// Result of evaluating one sample. Never stored; recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub per_channel: Vec<ChannelStatus>,
    pub overall_safe: bool,
    pub alerts: Vec<String>,
}

impl Evaluation {
    pub fn status(&self, channel: Channel) -> Status {
        self.per_channel
            .iter()
            .find(|c| c.channel == channel)
            .map(|c| c.status)
            .unwrap_or(Status::Ok)
    }
}
