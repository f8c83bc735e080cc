//! Display list for the timeline strip.
//!
//! [`render`] is a pure function of the timeline, the active gesture and the
//! layout. A GUI host walks the resulting [`Scene`] and paints each op with
//! its own toolkit; tests inspect it directly.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::event::EventId;
use super::gesture::GestureInterpreter;
use super::layout::{Layout, Rect};
use super::model::Timeline;
use super::slot::{format_clock, SLOTS_PER_LABEL};

/// Approximate advance of one narrow glyph at the label font size.
const GLYPH_WIDTH: f32 = 7.0;
/// Horizontal text padding inside a block.
const LABEL_PADDING: f32 = 10.0;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    GridLine { y: f32, x1: f32, x2: f32 },
    HourLabel { y: f32, text: String },
    EventBlock {
        id: EventId,
        rect: Rect,
        label: String,
        selected: bool,
    },
    /// Translucent preview of the span being drawn.
    DraftBlock { rect: Rect },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn blocks(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::EventBlock { .. }))
    }
}

pub fn render(timeline: &Timeline, gesture: &GestureInterpreter, layout: &Layout) -> Scene {
    let grid = timeline.grid();
    let slots = grid.slot_count();
    let mut ops = Vec::with_capacity(slots * 2 + timeline.len() + 1);

    for slot in 0..=slots {
        ops.push(DrawOp::GridLine {
            y: layout.slot_to_y(slot as i64),
            x1: layout.left_margin,
            x2: layout.width,
        });
    }
    for slot in (0..=slots).step_by(SLOTS_PER_LABEL) {
        let minutes = grid.minutes_at_slot(slot as i64);
        ops.push(DrawOp::HourLabel {
            y: layout.slot_to_y(slot as i64),
            text: format!("{}:00", &format_clock(minutes)[..2]),
        });
    }

    let selected = timeline.selected();
    for (id, event) in timeline.chronological() {
        if event.end <= grid.window_start || event.start >= grid.window_end() {
            continue;
        }
        let rect = layout.event_rect(event, grid);
        let budget = ((rect.width - LABEL_PADDING) / GLYPH_WIDTH).max(0.0) as usize;
        ops.push(DrawOp::EventBlock {
            id,
            rect,
            label: elide(&event.label(), budget),
            selected: selected == Some(id),
        });
    }

    if let Some((y1, y2)) = gesture.draft_rows() {
        ops.push(DrawOp::DraftBlock {
            rect: layout.span_rect(y1, y2),
        });
    }

    Scene {
        width: layout.width,
        height: layout.canvas_height(grid),
        ops,
    }
}

/// Cuts `text` to `columns` display columns, ending in `…` when shortened.
pub fn elide(text: &str, columns: usize) -> String {
    if text.width() <= columns {
        return text.to_string();
    }
    if columns == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > columns {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}
