// Server-rendered dashboard page: banner, alerts, channel cards and tank gauge
use crate::domain::dashboard::Dashboard;
use crate::domain::telemetry::{SeriesData, TankGauge, TileData};
use crate::presentation::sparkline::build_path;
use std::time::Duration;

const SPARK_WIDTH: f64 = 160.0;
const SPARK_HEIGHT: f64 = 36.0;
const TANK_WIDTH: f64 = 80.0;
const TANK_HEIGHT: f64 = 160.0;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; padding: 24px; }
h1 { margin: 0 0 16px; font-size: 1.5rem; }
.banner { padding: 12px 16px; border-radius: 8px; margin-bottom: 16px; font-weight: 600; }
.banner.safe { background: #14532d; }
.banner.attention { background: #7f1d1d; }
.alerts { margin: 0 0 16px; padding-left: 20px; color: #fecaca; }
.layout { display: flex; gap: 16px; flex-wrap: wrap; }
.cards { display: grid; grid-template-columns: repeat(2, 220px); gap: 16px; }
.card { background: #1e293b; border-radius: 8px; padding: 12px; border-left: 6px solid #475569; }
.card.ok { border-color: #22c55e; }
.card.warn { border-color: #eab308; }
.card.bad { border-color: #ef4444; }
.card .value { font-size: 1.75rem; font-weight: 700; }
.card .limit { font-size: 0.75rem; color: #94a3b8; }
.spark path { fill: none; stroke: #38bdf8; stroke-width: 2; }
.tank { background: #1e293b; border-radius: 8px; padding: 12px; text-align: center; }
.tank .fill.ok { fill: #0ea5e9; }
.tank .fill.warn { fill: #eab308; }
.tank .fill.bad { fill: #ef4444; }
.actions form { display: inline; }
.actions button { margin: 16px 8px 0 0; padding: 8px 12px; border-radius: 6px; border: 0; cursor: pointer; }
footer { margin-top: 16px; font-size: 0.75rem; color: #64748b; }
"#;

/// Render the full page. The browser reloads it every `refresh`.
pub fn render_page(dashboard: &Dashboard, refresh: Duration) -> String {
    let refresh_secs = refresh.as_secs_f64().max(1.0).round() as u64;
    let cards: String = dashboard
        .tiles
        .iter()
        .map(|tile| render_card(tile, dashboard.series(tile.channel)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{title}</h1>
{banner}
{alerts}
<div class="layout">
<div class="cards">
{cards}</div>
{tank}
</div>
<div class="actions">
<form method="post" action="/api/events/refill"><button type="submit">Refill tank</button></form>
<form method="post" action="/api/events/contamination"><button type="submit">Simulate contamination</button></form>
</div>
<footer>Tick {tick} &middot; updated {updated}</footer>
</body>
</html>
"#,
        title = escape_html(&dashboard.title),
        banner = render_banner(dashboard.safe),
        alerts = render_alerts(&dashboard.alerts),
        tank = render_tank(&dashboard.tank),
        tick = dashboard.tick,
        updated = dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn render_banner(safe: bool) -> &'static str {
    if safe {
        r#"<div class="banner safe">Water is safe</div>"#
    } else {
        r#"<div class="banner attention">Attention required</div>"#
    }
}

fn render_alerts(alerts: &[String]) -> String {
    if alerts.is_empty() {
        return String::new();
    }
    let items: String = alerts
        .iter()
        .map(|a| format!("<li>{}</li>", escape_html(a)))
        .collect();
    format!(r#"<ul class="alerts">{}</ul>"#, items)
}

fn render_card(tile: &TileData, series: Option<&SeriesData>) -> String {
    let path = series
        .map(|s| build_path(&s.values(), SPARK_WIDTH, SPARK_HEIGHT))
        .unwrap_or_default();
    format!(
        r#"<div class="card {status}" id="{id}">
<div class="title">{title}</div>
<div class="value">{value} <small>{unit}</small></div>
<div class="limit">safe {limit}</div>
<svg class="spark" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><path d="{path}"/></svg>
</div>
"#,
        status = tile.status.as_str(),
        id = tile.channel.id(),
        title = escape_html(&tile.title),
        value = tile.display_value(),
        unit = escape_html(&tile.unit),
        limit = escape_html(&tile.threshold),
        w = SPARK_WIDTH,
        h = SPARK_HEIGHT,
        path = path,
    )
}

fn render_tank(tank: &TankGauge) -> String {
    let fill = tank.fill_percent.clamp(0.0, 100.0);
    let fill_height = TANK_HEIGHT * fill / 100.0;
    format!(
        r##"<div class="tank">
<div class="title">Tank</div>
<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect x="0" y="0" width="{w}" height="{h}" rx="6" fill="#0f172a" stroke="#475569"/>
<rect class="fill {status}" x="0" y="{y:.2}" width="{w}" height="{fh:.2}" rx="6"/>
</svg>
<div class="value">{fill:.1}%</div>
</div>"##,
        w = TANK_WIDTH,
        h = TANK_HEIGHT,
        y = TANK_HEIGHT - fill_height,
        fh = fill_height,
        status = tank.status.as_str(),
        fill = fill,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
