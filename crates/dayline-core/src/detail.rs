//! Detail form bound to the selected event.
//!
//! The panel keeps no copy of the event beyond what its fields display.
//! Population from the timeline only sets fields; it never runs the write-back
//! handlers, so filling the form cannot be mistaken for a user edit. Every
//! write-back goes through [`Timeline::apply_edit`], which does not notify,
//! so editing a field never bounces a notice back into the form.

use chrono::NaiveTime;

use crate::timeline::{
    minutes_to_wall_clock, Event, EventId, EventPatch, Minutes, SelectionObserver, Timeline,
};

/// Values shown by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub title: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub location: String,
    pub reflection: String,
}

impl Default for DetailFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            location: String::new(),
            reflection: String::new(),
        }
    }
}

impl DetailFields {
    fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            start: minutes_to_wall_clock(event.start),
            end: minutes_to_wall_clock(event.end),
            location: event.location.clone(),
            reflection: event.reflection.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DetailPanel {
    fields: DetailFields,
    bound: Option<EventId>,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &DetailFields {
        &self.fields
    }

    /// Event currently mirrored by the form.
    pub fn bound(&self) -> Option<EventId> {
        self.bound
    }

    /// All inputs and the delete action are disabled without a selection.
    pub fn is_enabled(&self) -> bool {
        self.bound.is_some()
    }

    /// Fills the form from `selected`, or clears and disables it.
    pub fn populate(&mut self, timeline: &Timeline, selected: Option<EventId>) {
        match selected.and_then(|id| timeline.get(id).map(|ev| (id, ev))) {
            Some((id, event)) => {
                self.fields = DetailFields::from_event(event);
                self.bound = Some(id);
            }
            None => {
                self.fields = DetailFields::default();
                self.bound = None;
            }
        }
    }

    // ── Text fields ──────────────────────────────────────────────────

    /// Keystroke in the title input; written back by [`finish_title`](Self::finish_title).
    pub fn type_title(&mut self, text: impl Into<String>) {
        if self.is_enabled() {
            self.fields.title = text.into();
        }
    }

    pub fn finish_title(&mut self, timeline: &mut Timeline) -> bool {
        let title = self.fields.title.clone();
        self.write_back(timeline, EventPatch::title(title))
    }

    /// Keystroke in the location input; written back by [`finish_location`](Self::finish_location).
    pub fn type_location(&mut self, text: impl Into<String>) {
        if self.is_enabled() {
            self.fields.location = text.into();
        }
    }

    pub fn finish_location(&mut self, timeline: &mut Timeline) -> bool {
        let location = self.fields.location.clone();
        self.write_back(timeline, EventPatch::location(location))
    }

    /// Reflection is written back on every change.
    pub fn change_reflection(&mut self, timeline: &mut Timeline, text: impl Into<String>) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.fields.reflection = text.into();
        let reflection = self.fields.reflection.clone();
        self.write_back(timeline, EventPatch::reflection(reflection))
    }

    // ── Time fields ──────────────────────────────────────────────────

    /// Start edit: snapped and clamped; an end at or before the new start is
    /// pushed one slot later, but not past the window end.
    pub fn commit_start(&mut self, timeline: &mut Timeline, time: NaiveTime) -> bool {
        let Some((id, event)) = self.target(timeline) else {
            return false;
        };
        let grid = *timeline.grid();
        let start = grid.snap_and_clamp(grid.wall_clock_to_minutes(time));
        let mut end = event.end;
        if start >= end {
            end = (start + grid.slot_minutes).min(grid.window_end());
        }
        self.write_span(timeline, id, start, end)
    }

    /// End edit: snapped and clamped; a start at or after the new end is
    /// pulled one slot earlier, but not before the window start.
    pub fn commit_end(&mut self, timeline: &mut Timeline, time: NaiveTime) -> bool {
        let Some((id, event)) = self.target(timeline) else {
            return false;
        };
        let grid = *timeline.grid();
        let end = grid.snap_and_clamp(grid.end_wall_clock_to_minutes(time));
        let mut start = event.start;
        if end <= start {
            start = (end - grid.slot_minutes).max(grid.window_start);
        }
        self.write_span(timeline, id, start, end)
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Removes the selected event without confirmation.
    pub fn delete(&mut self, timeline: &mut Timeline) -> Option<Event> {
        let id = timeline.selected()?;
        let removed = timeline.remove(id);
        self.populate(timeline, timeline.selected());
        removed
    }

    fn target(&self, timeline: &Timeline) -> Option<(EventId, Event)> {
        let id = timeline.selected()?;
        timeline.get(id).map(|ev| (id, ev.clone()))
    }

    fn write_back(&mut self, timeline: &mut Timeline, patch: EventPatch) -> bool {
        match timeline.selected() {
            Some(id) => timeline.apply_edit(id, patch),
            None => false,
        }
    }

    fn write_span(&mut self, timeline: &mut Timeline, id: EventId, start: Minutes, end: Minutes) -> bool {
        if !timeline.apply_edit(id, EventPatch::span(start, end)) {
            return false;
        }
        // Time inputs show what was stored; text inputs are left alone.
        if let Some(event) = timeline.get(id) {
            self.fields.start = minutes_to_wall_clock(event.start);
            self.fields.end = minutes_to_wall_clock(event.end);
        }
        true
    }
}

impl SelectionObserver for DetailPanel {
    fn selection_changed(&mut self, timeline: &Timeline, selected: Option<EventId>) {
        self.populate(timeline, selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Notice;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn bound_panel(start: Minutes, end: Minutes) -> (Timeline, DetailPanel, EventId) {
        let mut tl = Timeline::new();
        let id = tl.insert(Event::new(start, end, "Work").with_location("Office"));
        tl.select(Some(id));
        tl.take_notices();
        let mut panel = DetailPanel::new();
        panel.populate(&tl, Some(id));
        (tl, panel, id)
    }

    #[test]
    fn disabled_without_selection() {
        let tl = Timeline::new();
        let mut panel = DetailPanel::new();
        panel.populate(&tl, None);
        assert!(!panel.is_enabled());
        assert_eq!(panel.fields(), &DetailFields::default());
        assert_eq!(panel.fields().start, t(6, 0));
        assert_eq!(panel.fields().end, t(7, 0));
    }

    #[test]
    fn populate_mirrors_event() {
        let (_, panel, id) = bound_panel(1410, 1500);
        assert_eq!(panel.bound(), Some(id));
        assert_eq!(panel.fields().title, "Work");
        assert_eq!(panel.fields().location, "Office");
        assert_eq!(panel.fields().start, t(23, 30));
        assert_eq!(panel.fields().end, t(1, 0));
    }

    #[test]
    fn title_written_on_finish_only() {
        let (mut tl, mut panel, id) = bound_panel(600, 660);
        panel.type_title("Deep work");
        assert_eq!(tl.get(id).unwrap().title, "Work");
        assert!(panel.finish_title(&mut tl));
        assert_eq!(tl.get(id).unwrap().title, "Deep work");
        assert!(!tl.has_pending_notices());
    }

    #[test]
    fn location_and_reflection_write_back_silently() {
        let (mut tl, mut panel, id) = bound_panel(600, 660);
        panel.type_location("Cafe");
        panel.finish_location(&mut tl);
        panel.change_reflection(&mut tl, "went well");
        let ev = tl.get(id).unwrap();
        assert_eq!(ev.location, "Cafe");
        assert_eq!(ev.reflection, "went well");
        assert!(tl.take_notices().is_empty());
    }

    #[test]
    fn start_edit_snaps_and_pushes_end() {
        let (mut tl, mut panel, id) = bound_panel(600, 660);
        panel.commit_start(&mut tl, t(9, 7));
        assert_eq!((tl.get(id).unwrap().start, tl.get(id).unwrap().end), (540, 660));

        panel.commit_start(&mut tl, t(11, 0));
        assert_eq!((tl.get(id).unwrap().start, tl.get(id).unwrap().end), (660, 675));
        assert_eq!(panel.fields().end, t(11, 15));
    }

    #[test]
    fn start_edit_at_window_end_keeps_event_in_window() {
        let (mut tl, mut panel, id) = bound_panel(1740, 1800);
        panel.commit_start(&mut tl, t(5, 55));
        let ev = tl.get(id).unwrap();
        assert!(ev.start < ev.end);
        assert_eq!(ev.end, 1800);
    }

    #[test]
    fn end_edit_pulls_start_back() {
        let (mut tl, mut panel, id) = bound_panel(600, 660);
        panel.commit_end(&mut tl, t(9, 0));
        let ev = tl.get(id).unwrap();
        assert_eq!((ev.start, ev.end), (525, 540));
    }

    #[test]
    fn end_edit_clamps_start_to_window() {
        let (mut tl, mut panel, id) = bound_panel(360, 420);
        panel.commit_end(&mut tl, t(6, 5));
        let ev = tl.get(id).unwrap();
        assert_eq!((ev.start, ev.end), (360, 375));
    }

    #[test]
    fn end_of_six_means_next_morning() {
        let (mut tl, mut panel, id) = bound_panel(1500, 1560);
        panel.commit_end(&mut tl, t(6, 0));
        assert_eq!(tl.get(id).unwrap().end, 1800);
    }

    #[test]
    fn delete_clears_selection_and_disables() {
        let (mut tl, mut panel, id) = bound_panel(600, 660);
        let removed = panel.delete(&mut tl).unwrap();
        assert_eq!(removed.title, "Work");
        assert!(!tl.contains(id));
        assert!(!panel.is_enabled());
        assert_eq!(
            tl.take_notices(),
            vec![Notice::SelectionChanged { selected: None }]
        );
    }

    #[test]
    fn edits_without_selection_do_nothing() {
        let mut tl = Timeline::new();
        tl.insert(Event::new(600, 660, "Work"));
        let mut panel = DetailPanel::new();
        panel.type_title("ignored");
        assert_eq!(panel.fields().title, "");
        assert!(!panel.finish_title(&mut tl));
        assert!(!panel.commit_start(&mut tl, t(8, 0)));
        assert!(panel.delete(&mut tl).is_none());
        assert_eq!(tl.len(), 1);
    }
}
