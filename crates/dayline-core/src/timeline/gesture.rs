//! Pointer gesture interpreter.
//!
//! Turns press/move/release sequences into timeline mutations. Like the rest
//! of the editor it holds no thread; the host feeds pointer input in order.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -press(no hit)-> Creating -release-> Idle   (prompt, maybe create)
//! Idle -press(body)---> Moving ----release-> Idle   (select under pointer)
//! Idle -press(top)----> ResizingTop ---release-> Idle
//! Idle -press(bottom)-> ResizingBottom -release-> Idle
//! ```
//!
//! Moves and resizes work against a baseline captured at press time, so the
//! span after any pointer move depends only on the total pixel delta.

use tracing::debug;

use super::event::{Event, EventId, EventPatch};
use super::layout::{HitKind, Layout, Point};
use super::model::Timeline;
use super::slot::{Minutes, SlotGrid};

/// Start/end pair of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Minutes,
    pub end: Minutes,
}

impl Span {
    pub fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }

    pub fn of(event: &Event) -> Self {
        Self::new(event.start, event.end)
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }
}

/// Shifts a span by `delta` minutes without changing its duration; a span
/// pushed past either window bound is pushed back inside.
pub fn translate_span(grid: &SlotGrid, baseline: Span, delta: Minutes) -> Span {
    let duration = baseline.duration();
    let mut start = baseline.start + delta;
    let mut end = start + duration;
    if start < grid.window_start {
        start = grid.window_start;
        end = start + duration;
    }
    if end > grid.window_end() {
        end = grid.window_end();
        start = end - duration;
    }
    Span::new(start, end)
}

/// Moves the start edge, keeping at least one slot before the fixed end.
pub fn resize_top_span(grid: &SlotGrid, baseline: Span, delta: Minutes) -> Span {
    let latest = baseline.end - grid.slot_minutes;
    let start = (baseline.start + delta).min(latest).max(grid.window_start);
    Span::new(start, baseline.end)
}

/// Moves the end edge, keeping at least one slot after the fixed start.
pub fn resize_bottom_span(grid: &SlotGrid, baseline: Span, delta: Minutes) -> Span {
    let earliest = baseline.start + grid.slot_minutes;
    let end = (baseline.end + delta).min(grid.window_end()).max(earliest);
    Span::new(baseline.start, end)
}

/// Asks the user for the title of a freshly drawn event.
///
/// `None` means the request was cancelled.
pub trait TitlePrompt {
    fn request_title(&mut self) -> Option<String>;
}

impl<F> TitlePrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn request_title(&mut self) -> Option<String> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    /// Drawing a new event; rows are clamped canvas pixels.
    Creating { anchor_y: f32, current_y: f32 },
    Moving { id: EventId, baseline: Span, anchor_y: f32 },
    ResizingTop { id: EventId, baseline: Span, anchor_y: f32 },
    ResizingBottom { id: EventId, baseline: Span, anchor_y: f32 },
}

/// What a completed gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Release without a gesture, or on empty space after a drag.
    Ignored,
    Selected(EventId),
    Created(EventId),
    CreationCancelled,
    /// Provisionally committed; finish with [`Timeline::finalize_provisional`].
    AwaitingTitle(EventId),
    Moved(EventId),
    Resized(EventId),
}

#[derive(Debug, Clone, Copy)]
pub struct GestureInterpreter {
    state: GestureState,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Pixel rows of the creation preview while drawing.
    pub fn draft_rows(&self) -> Option<(f32, f32)> {
        match self.state {
            GestureState::Creating { anchor_y, current_y } => Some((anchor_y, current_y)),
            _ => None,
        }
    }

    /// Starts a gesture. A press arriving mid-gesture abandons the old one.
    pub fn press(&mut self, timeline: &Timeline, layout: &Layout, point: Point) {
        if !self.is_idle() {
            debug!(state = ?self.state, "press during active gesture; restarting");
        }
        let y = layout.clamp_y(point.y, timeline.grid());
        self.state = match layout.hit_test(timeline, point) {
            None => GestureState::Creating {
                anchor_y: y,
                current_y: y,
            },
            Some((kind, id)) => {
                // hit_test only returns live ids
                let baseline = timeline.get(id).map(Span::of).unwrap_or(Span::new(0, 0));
                match kind {
                    HitKind::Interior => GestureState::Moving { id, baseline, anchor_y: y },
                    HitKind::TopEdge => GestureState::ResizingTop { id, baseline, anchor_y: y },
                    HitKind::BottomEdge => GestureState::ResizingBottom { id, baseline, anchor_y: y },
                }
            }
        };
        debug!(state = ?self.state, "gesture started");
    }

    /// Pointer moved with the button held. Moves and resizes commit at once.
    pub fn drag(&mut self, timeline: &mut Timeline, layout: &Layout, point: Point) {
        let y = layout.clamp_y(point.y, timeline.grid());
        let grid = *timeline.grid();
        let (id, span) = match &mut self.state {
            GestureState::Idle => return,
            GestureState::Creating { current_y, .. } => {
                *current_y = y;
                return;
            }
            GestureState::Moving { id, baseline, anchor_y } => {
                let delta = layout.delta_slots(y - *anchor_y) * grid.slot_minutes;
                (*id, translate_span(&grid, *baseline, delta))
            }
            GestureState::ResizingTop { id, baseline, anchor_y } => {
                let delta = layout.delta_slots(y - *anchor_y) * grid.slot_minutes;
                (*id, resize_top_span(&grid, *baseline, delta))
            }
            GestureState::ResizingBottom { id, baseline, anchor_y } => {
                let delta = layout.delta_slots(y - *anchor_y) * grid.slot_minutes;
                (*id, resize_bottom_span(&grid, *baseline, delta))
            }
        };

        match timeline.get(id).map(Span::of) {
            None => {
                debug!(%id, "dragged event vanished; gesture dropped");
                self.state = GestureState::Idle;
            }
            Some(current) if current == span => {}
            Some(_) => {
                timeline.edit(id, EventPatch::span(span.start, span.end));
            }
        }
    }

    /// Ends the gesture, asking `prompt` for a title when an event was drawn.
    pub fn release(
        &mut self,
        timeline: &mut Timeline,
        layout: &Layout,
        point: Point,
        prompt: &mut dyn TitlePrompt,
    ) -> GestureOutcome {
        self.finish(timeline, layout, point, |timeline, span| {
            match prompt
                .request_title()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
            {
                Some(title) => {
                    let id = timeline.insert(Event::new(span.start, span.end, title));
                    timeline.select(Some(id));
                    GestureOutcome::Created(id)
                }
                None => GestureOutcome::CreationCancelled,
            }
        })
    }

    /// Ends the gesture without blocking on a title: a drawn event is
    /// committed untitled and selected, pending
    /// [`Timeline::finalize_provisional`].
    pub fn release_deferred(
        &mut self,
        timeline: &mut Timeline,
        layout: &Layout,
        point: Point,
    ) -> GestureOutcome {
        self.finish(timeline, layout, point, |timeline, span| {
            GestureOutcome::AwaitingTitle(timeline.insert_provisional(span.start, span.end))
        })
    }

    /// Abandons the gesture, restoring a moved or resized event to its baseline.
    pub fn cancel(&mut self, timeline: &mut Timeline) {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Moving { id, baseline, .. }
            | GestureState::ResizingTop { id, baseline, .. }
            | GestureState::ResizingBottom { id, baseline, .. } => {
                timeline.edit(id, EventPatch::span(baseline.start, baseline.end));
            }
            GestureState::Idle | GestureState::Creating { .. } => {}
        }
    }

    fn finish(
        &mut self,
        timeline: &mut Timeline,
        layout: &Layout,
        point: Point,
        create: impl FnOnce(&mut Timeline, Span) -> GestureOutcome,
    ) -> GestureOutcome {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let y = layout.clamp_y(point.y, timeline.grid());
        let outcome = match state {
            GestureState::Idle => GestureOutcome::Ignored,
            GestureState::Creating { anchor_y, .. } => {
                let span = drawn_span(timeline.grid(), layout, anchor_y, y);
                let (start, end) = timeline.normalize_span(span.start, span.end);
                match create(timeline, Span::new(start, end)) {
                    // a cancelled draft over an existing block still selects it
                    GestureOutcome::CreationCancelled => match layout.hit_test(timeline, point) {
                        Some((_, hit)) => {
                            timeline.select(Some(hit));
                            GestureOutcome::Selected(hit)
                        }
                        None => GestureOutcome::CreationCancelled,
                    },
                    outcome => outcome,
                }
            }
            GestureState::Moving { id, baseline, .. } => {
                select_on_release(timeline, layout, point, id, baseline, GestureOutcome::Moved)
            }
            GestureState::ResizingTop { id, baseline, .. }
            | GestureState::ResizingBottom { id, baseline, .. } => {
                select_on_release(timeline, layout, point, id, baseline, GestureOutcome::Resized)
            }
        };
        debug!(?outcome, "gesture finished");
        outcome
    }
}

/// Slot-aligned span covered by a creation drag between two pixel rows.
fn drawn_span(grid: &SlotGrid, layout: &Layout, y1: f32, y2: f32) -> Span {
    let (top, bottom) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
    let start_slot = layout.y_to_slot(top);
    let mut end_slot = layout.y_to_slot(bottom);
    if end_slot == start_slot {
        end_slot = start_slot + 1;
    }
    Span::new(grid.minutes_at_slot(start_slot), grid.minutes_at_slot(end_slot))
}

fn select_on_release(
    timeline: &mut Timeline,
    layout: &Layout,
    point: Point,
    id: EventId,
    baseline: Span,
    changed: fn(EventId) -> GestureOutcome,
) -> GestureOutcome {
    let edited = timeline.get(id).map(Span::of).filter(|span| *span != baseline);
    match layout.hit_test(timeline, point) {
        Some((_, hit)) => {
            timeline.select(Some(hit));
            if edited.is_some() {
                changed(id)
            } else {
                GestureOutcome::Selected(hit)
            }
        }
        None if edited.is_some() => changed(id),
        None => GestureOutcome::Ignored,
    }
}
