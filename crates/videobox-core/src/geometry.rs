//! Numeric helpers shared by the players, the slider and pagination.

use crate::types::{Origin, Rect};

/// Clamp a configured size to a positive number, falling back to `default`
/// for missing, zero, negative or non-finite values.
pub fn clip(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

/// Lenient number parsing for attribute values: the longest numeric prefix
/// wins, so `"720px"` reads as 720 and `"abc"` as nothing.
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let prefix: &str = {
        let end = value
            .char_indices()
            .find(|(_, c)| !matches!(c, '0'..='9' | '.' | '+' | '-' | 'e' | 'E'))
            .map(|(i, _)| i)
            .unwrap_or(value.len());
        &value[..end]
    };

    (1..=prefix.len())
        .rev()
        .filter_map(|end| prefix[..end].parse::<f64>().ok())
        .find(|v| v.is_finite())
}

/// Width of the content box for `max_w`×`max_h` inside `available`, keeping
/// `chrome` pixels free on each axis.
///
/// The full box is used when it fits. When only the width is constrained the
/// box takes the available width; when the height is the binding constraint
/// the width shrinks until the height matches the available height.
pub fn fit_width(max_w: f64, max_h: f64, available: Rect, chrome: f64) -> f64 {
    let ratio = max_h / max_w;
    let room_w = (available.width - chrome).min(max_w);
    let room_h = (available.height - chrome).min(max_h);

    if max_w <= room_w && max_h <= room_h {
        return max_w.max(0.0);
    }
    if ratio * room_w <= room_h {
        return room_w.max(0.0);
    }
    (room_h / ratio).max(0.0)
}

/// Width an expand animation starts from (or a collapse ends at): the
/// origin width, else the origin height at the target aspect ratio, else
/// `fallback`.
pub fn initial_width(origin: &Origin, max_w: f64, max_h: f64, fallback: f64) -> f64 {
    match (origin.w, origin.h) {
        (Some(w), _) => w,
        (None, Some(h)) => h * max_w / max_h,
        (None, None) => fallback,
    }
}

/// Animation duration in milliseconds for a travel distance
pub fn travel_duration(distance: f64, factor: f64) -> f64 {
    factor * distance.abs()
}

/// Padding-bottom percentage that gives a `w`×`h` box
pub fn aspect_percent(w: f64, h: f64) -> f64 {
    100.0 * h / w
}

/// Wrap an index into `[0, total)`; 0 when there is nothing to index
pub fn circular_index(value: i64, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    value.rem_euclid(total as i64) as usize
}

pub fn px(value: f64) -> String {
    format!("{}px", value)
}

pub fn percent(value: f64) -> String {
    format!("{}%", value)
}
