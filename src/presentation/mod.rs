// Presentation layer - HTTP handlers and server-rendered views
pub mod app_state;
pub mod handlers;
pub mod page;
pub mod sparkline;
