//! Pixel geometry of the vertical timeline strip and hit-testing.

use serde::{Deserialize, Serialize};

use super::event::{Event, EventId};
use super::model::Timeline;
use super::slot::SlotGrid;

/// Horizontal inset of event blocks from the label column and right edge.
const BLOCK_INSET: f32 = 8.0;
/// Vertical offset of a block below its slot line.
const BLOCK_TOP_PAD: f32 = 2.0;
const MIN_BLOCK_HEIGHT: f32 = 2.0;
const MIN_EDGE_MARGIN: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// Which part of an event block a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    TopEdge,
    BottomEdge,
    Interior,
}

/// Strip dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default = "default_slot_height")]
    pub slot_height: f32,
    /// Width of the hour label column.
    #[serde(default = "default_left_margin")]
    pub left_margin: f32,
    #[serde(default = "default_width")]
    pub width: f32,
}

fn default_slot_height() -> f32 {
    12.0
}
fn default_left_margin() -> f32 {
    60.0
}
fn default_width() -> f32 {
    500.0
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            slot_height: default_slot_height(),
            left_margin: default_left_margin(),
            width: default_width(),
        }
    }
}

impl Layout {
    pub fn canvas_height(&self, grid: &SlotGrid) -> f32 {
        self.slot_height * grid.slot_count() as f32
    }

    /// Describes the first unusable dimension, if any.
    pub fn check(&self) -> Result<(), String> {
        if !self.slot_height.is_finite() || self.slot_height <= 0.0 {
            return Err(format!("slot_height must be positive, got {}", self.slot_height));
        }
        if !self.left_margin.is_finite() || self.left_margin < 0.0 {
            return Err(format!("left_margin must not be negative, got {}", self.left_margin));
        }
        if !self.width.is_finite() || self.width <= self.left_margin {
            return Err(format!(
                "width must exceed left_margin ({}), got {}",
                self.left_margin, self.width
            ));
        }
        Ok(())
    }

    /// Pointer rows outside the canvas count as its nearest edge.
    pub fn clamp_y(&self, y: f32, grid: &SlotGrid) -> f32 {
        y.clamp(0.0, self.canvas_height(grid).max(0.0))
    }

    pub fn slot_to_y(&self, slot: i64) -> f32 {
        slot as f32 * self.slot_height
    }

    /// Nearest slot boundary to a pixel row.
    pub fn y_to_slot(&self, y: f32) -> i64 {
        (y / self.slot_height).round() as i64
    }

    /// Whole slots covered by a vertical pixel delta, rounded.
    pub fn delta_slots(&self, dy: f32) -> i64 {
        (dy / self.slot_height).round() as i64
    }

    /// Distance from an edge that still grabs the edge instead of the body.
    pub fn edge_margin(&self) -> f32 {
        (self.slot_height / 2.0).floor().max(MIN_EDGE_MARGIN)
    }

    pub fn block_x(&self) -> f32 {
        self.left_margin + BLOCK_INSET
    }

    pub fn block_width(&self) -> f32 {
        (self.width - self.left_margin - 2.0 * BLOCK_INSET).max(0.0)
    }

    /// Block spanning the pixel rows `y1..y2`, used for the creation preview.
    pub fn span_rect(&self, y1: f32, y2: f32) -> Rect {
        let (top, bottom) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Rect {
            x: self.block_x(),
            y: top,
            width: self.block_width(),
            height: (bottom - top).max(MIN_BLOCK_HEIGHT),
        }
    }

    /// Rendered rectangle of an event, clipped to the window.
    pub fn event_rect(&self, event: &Event, grid: &SlotGrid) -> Rect {
        let top_min = (event.start - grid.window_start).max(0);
        let bottom_min = (event.end - grid.window_start).min(grid.window_length);
        let top_slot = grid.slot_of(grid.window_start + top_min);
        let bottom_slot = grid.slot_of(grid.window_start + bottom_min);
        let height = ((bottom_slot - top_slot) as f32 * self.slot_height - 1.0).max(MIN_BLOCK_HEIGHT);
        Rect {
            x: self.block_x(),
            y: self.slot_to_y(top_slot) + BLOCK_TOP_PAD,
            width: self.block_width(),
            height,
        }
    }

    /// Finds the event under `point`. Later events win where blocks overlap;
    /// the top edge is checked before the bottom edge.
    pub fn hit_test(&self, timeline: &Timeline, point: Point) -> Option<(HitKind, EventId)> {
        let margin = self.edge_margin();
        timeline.iter().rev().find_map(|(id, event)| {
            let rect = self.event_rect(event, timeline.grid());
            if !rect.contains(point) {
                return None;
            }
            let kind = if (point.y - rect.top()).abs() <= margin {
                HitKind::TopEdge
            } else if (point.y - rect.bottom()).abs() <= margin {
                HitKind::BottomEdge
            } else {
                HitKind::Interior
            };
            Some((kind, id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_rect_follows_slots() {
        let layout = Layout::default();
        let grid = SlotGrid::default();
        let rect = layout.event_rect(&Event::new(480, 540, "x"), &grid);
        assert_eq!(rect.y, 8.0 * 12.0 + 2.0);
        assert_eq!(rect.height, 4.0 * 12.0 - 1.0);
        assert_eq!(rect.x, 68.0);
        assert_eq!(rect.width, 500.0 - 60.0 - 16.0);
    }

    #[test]
    fn edge_margin_has_floor() {
        assert_eq!(Layout::default().edge_margin(), 6.0);
        let tall = Layout {
            slot_height: 30.0,
            ..Layout::default()
        };
        assert_eq!(tall.edge_margin(), 15.0);
    }

    #[test]
    fn hit_test_classifies_edges_and_interior() {
        let layout = Layout::default();
        let mut tl = Timeline::new();
        // 08:00-10:00: rect y = 98..193
        let id = tl.insert(Event::new(480, 600, "Work"));
        let x = 200.0;
        assert_eq!(layout.hit_test(&tl, Point::new(x, 100.0)), Some((HitKind::TopEdge, id)));
        assert_eq!(layout.hit_test(&tl, Point::new(x, 190.0)), Some((HitKind::BottomEdge, id)));
        assert_eq!(layout.hit_test(&tl, Point::new(x, 140.0)), Some((HitKind::Interior, id)));
        assert_eq!(layout.hit_test(&tl, Point::new(x, 300.0)), None);
        assert_eq!(layout.hit_test(&tl, Point::new(10.0, 140.0)), None);
    }

    #[test]
    fn later_event_wins_on_overlap() {
        let layout = Layout::default();
        let mut tl = Timeline::new();
        let _first = tl.insert(Event::new(480, 600, "A"));
        let second = tl.insert(Event::new(480, 600, "B"));
        let hit = layout.hit_test(&tl, Point::new(200.0, 140.0));
        assert_eq!(hit, Some((HitKind::Interior, second)));
    }

    #[test]
    fn check_rejects_unusable_dimensions() {
        assert!(Layout::default().check().is_ok());
        let bad = [
            Layout { slot_height: 0.0, ..Layout::default() },
            Layout { slot_height: -5.0, ..Layout::default() },
            Layout { slot_height: f32::NAN, ..Layout::default() },
            Layout { left_margin: -1.0, ..Layout::default() },
            Layout { width: 60.0, ..Layout::default() },
        ];
        for layout in bad {
            assert!(layout.check().is_err(), "{layout:?}");
        }
    }

    #[test]
    fn negative_slot_height_does_not_panic_on_clamp() {
        let layout = Layout { slot_height: -5.0, ..Layout::default() };
        assert_eq!(layout.clamp_y(100.0, &SlotGrid::default()), 0.0);
    }

    #[test]
    fn pointer_rows_are_clamped_to_canvas() {
        let layout = Layout::default();
        let grid = SlotGrid::default();
        assert_eq!(layout.canvas_height(&grid), 1152.0);
        assert_eq!(layout.clamp_y(-20.0, &grid), 0.0);
        assert_eq!(layout.clamp_y(5000.0, &grid), 1152.0);
    }
}
