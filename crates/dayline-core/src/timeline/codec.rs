//! Day document encoding.
//!
//! Written form is `{"events": [...]}` in storage order. Reading also accepts
//! a bare list, and repairs individual items instead of rejecting the file:
//! numbers arriving as floats or strings are truncated to whole minutes,
//! missing or unusable bounds fall back to defaults, spans are clamped into
//! the window, and items starting at or after the window end are dropped.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::event::Event;
use super::slot::{Minutes, SlotGrid};
use crate::error::CodecError;

#[derive(Serialize)]
struct DayDocument<'a> {
    events: Vec<&'a Event>,
}

/// Pretty-printed day document; non-ASCII text is written verbatim.
pub fn serialize<'a>(events: impl IntoIterator<Item = &'a Event>) -> Result<String, serde_json::Error> {
    let doc = DayDocument {
        events: events.into_iter().collect(),
    };
    serde_json::to_string_pretty(&doc)
}

/// Parses a day document into clean events.
///
/// Fails only when the text is not JSON or has neither accepted shape.
pub fn deserialize(content: &str, grid: &SlotGrid) -> Result<Vec<Event>, CodecError> {
    let doc: Value = serde_json::from_str(content)?;
    let items = match &doc {
        Value::Object(map) => match map.get("events") {
            Some(Value::Array(items)) => items,
            _ => return Err(CodecError::UnsupportedShape),
        },
        Value::Array(items) => items,
        _ => return Err(CodecError::UnsupportedShape),
    };

    let mut events = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            warn!(position, "skipping non-object day item");
            continue;
        };
        match clean_item(fields, grid) {
            Some(event) => events.push(event),
            None => warn!(position, "dropping day item outside the window"),
        }
    }
    Ok(events)
}

fn clean_item(fields: &serde_json::Map<String, Value>, grid: &SlotGrid) -> Option<Event> {
    let window_end = grid.window_end();

    let mut start = fields
        .get("start")
        .and_then(coerce_minutes)
        .unwrap_or(grid.window_start);
    let mut end = fields
        .get("end")
        .and_then(coerce_minutes)
        .unwrap_or(start + grid.slot_minutes);
    if end <= start {
        end = start + grid.slot_minutes;
    }

    start = start.max(grid.window_start);
    end = end.min(window_end);
    if start >= window_end {
        return None;
    }
    if end <= start {
        end = (start + grid.slot_minutes).min(window_end);
    }

    Some(Event {
        start,
        end,
        title: coerce_text(fields.get("title")),
        location: coerce_text(fields.get("location")),
        reflection: coerce_text(fields.get("reflection")),
    })
}

/// Magnitude past which coerced minutes are pinned; far outside any window,
/// small enough that slot arithmetic cannot overflow.
const MINUTES_LIMIT: Minutes = Minutes::MAX / 4;

/// Whole minutes from an integer, a float, or a numeric string.
///
/// Fractions are truncated toward zero and huge magnitudes saturate.
/// Booleans, nulls and non-finite values do not count as numbers.
pub fn coerce_minutes(value: &Value) -> Option<Minutes> {
    let minutes = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(truncate_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Minutes>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_float))
        }
        _ => None,
    }?;
    Some(minutes.clamp(-MINUTES_LIMIT, MINUTES_LIMIT))
}

fn truncate_float(f: f64) -> Option<Minutes> {
    if f.is_finite() {
        // `as` saturates at the i64 bounds
        Some(f.trunc() as Minutes)
    } else {
        None
    }
}

fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
