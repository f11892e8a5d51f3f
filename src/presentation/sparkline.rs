// Sparkline geometry - values to an SVG path

/// Build an SVG path for `values` scaled into a `width` x `height` box.
///
/// Values are normalized to the slice's own min/max, so the line always uses
/// the full height. Higher values sit closer to the top. A single value is
/// drawn at the horizontal midpoint and a flat series at the vertical midpoint.
pub fn build_path(values: &[f64], width: f64, height: f64) -> String {
    if values.is_empty() {
        return String::new();
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    let step = match values.len() {
        1 => 0.0,
        n => width / (n - 1) as f64,
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = if values.len() == 1 {
                width / 2.0
            } else {
                i as f64 * step
            };
            let y = if span > 0.0 {
                height - (value - min) / span * height
            } else {
                height / 2.0
            };
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{}{:.2},{:.2}", command, x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
