//! JSON interchange of notch points.
//!
//! Both pipelines share one format: an array of `{"x": col, "y": row, "r": radius}`
//! objects. Automatic detection emits it; manual mode consumes it. Manual input
//! is parsed leniently and never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mask::Circle;
use crate::peaks::Peak;

/// Radius used when a point omits `r`.
pub const DEFAULT_POINT_RADIUS: i64 = 8;

/// A user- or detector-specified notch centre with its own radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotchPoint {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    pub r: i64,
}

impl NotchPoint {
    pub fn new(x: i64, y: i64, r: i64) -> Self {
        Self { x, y, r }
    }

    pub fn to_circle(self) -> Circle {
        Circle::new(self.y, self.x, self.r)
    }
}

/// Read a numeric field, truncating fractional values toward zero.
fn int_field(obj: &serde_json::Map<String, Value>, key: &str, default: i64) -> Option<i64> {
    match obj.get(key) {
        None | Some(Value::Null) => Some(default),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
}

fn point_from_value(value: &Value) -> Option<NotchPoint> {
    let obj = value.as_object()?;
    Some(NotchPoint {
        x: int_field(obj, "x", 0)?,
        y: int_field(obj, "y", 0)?,
        r: int_field(obj, "r", DEFAULT_POINT_RADIUS)?,
    })
}

/// Parse a point list.
///
/// Missing `x`/`y` default to 0 and a missing `r` to [`DEFAULT_POINT_RADIUS`].
/// Invalid JSON, a non-array document, or any entry that is not an object with
/// integer-like fields yields an empty list.
pub fn parse_points(json: &str) -> Vec<NotchPoint> {
    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring malformed notch points: {}", e);
            return Vec::new();
        }
    };

    let Value::Array(entries) = value else {
        tracing::warn!("Ignoring notch points: expected a JSON array");
        return Vec::new();
    };

    match entries.iter().map(point_from_value).collect::<Option<Vec<_>>>() {
        Some(points) => points,
        None => {
            tracing::warn!("Ignoring notch points: every entry must be an {{x, y, r}} object");
            Vec::new()
        }
    }
}

/// Convert detected peaks to points sharing one radius.
pub fn peaks_to_points(peaks: &[Peak], radius: u32) -> Vec<NotchPoint> {
    peaks
        .iter()
        .map(|p| NotchPoint::new(p.col as i64, p.row as i64, radius as i64))
        .collect()
}

/// Serialize points as a compact JSON array.
pub fn points_to_json(points: &[NotchPoint]) -> String {
    serde_json::to_string(points).expect("notch points always serialize")
}
