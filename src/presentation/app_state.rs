// Application state for HTTP handlers
use crate::application::ticker::TickerClient;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub ticker: TickerClient,
    pub refresh: Duration,
}
