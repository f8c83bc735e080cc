//! The day timeline aggregate.
//!
//! Owns every event of one diary day, the selection, and the notice outbox.
//! Events live in an insertion-ordered map keyed by [`EventId`]; insertion
//! order is the storage order written to disk, while the view always lists
//! events by ascending start.
//!
//! Two mutation entry points exist on purpose:
//!
//! - [`Timeline::edit`] is used by gestures and notifies when the edited event
//!   is selected, so the detail panel follows a live drag.
//! - [`Timeline::apply_edit`] is used by the detail panel writing its own
//!   fields back and never notifies.

use indexmap::IndexMap;
use tracing::debug;

use super::codec;
use super::event::{Event, EventId, EventPatch};
use super::notice::{Notice, Outbox};
use super::slot::{Minutes, SlotGrid};
use crate::error::CodecError;

#[derive(Debug, Default)]
pub struct Timeline {
    grid: SlotGrid,
    events: IndexMap<EventId, Event>,
    next_id: u64,
    selected: Option<EventId>,
    /// Event committed on release and still waiting for its title.
    provisional: Option<EventId>,
    outbox: Outbox,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(grid: SlotGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    /// Events in storage order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (EventId, &Event)> + '_ {
        self.events.iter().map(|(id, ev)| (*id, ev))
    }

    pub fn ids(&self) -> Vec<EventId> {
        self.events.keys().copied().collect()
    }

    /// Events by ascending start; ties keep storage order.
    pub fn chronological(&self) -> Vec<(EventId, &Event)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by_key(|(_, ev)| ev.start);
        sorted
    }

    /// Storage position of an event, the index used by day files.
    pub fn position_of(&self, id: EventId) -> Option<usize> {
        self.events.get_index_of(&id)
    }

    pub fn id_at(&self, position: usize) -> Option<EventId> {
        self.events.get_index(position).map(|(id, _)| *id)
    }

    pub fn selected(&self) -> Option<EventId> {
        self.selected
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selected.and_then(|id| self.events.get(&id))
    }

    pub fn provisional(&self) -> Option<EventId> {
        self.provisional
    }

    /// One `HH:MM-HH:MM title` line per event, chronologically.
    pub fn text_summary(&self) -> String {
        self.chronological()
            .into_iter()
            .map(|(_, ev)| ev.label())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── Notices ──────────────────────────────────────────────────────

    /// Drains queued notices for the subscriber.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.outbox.take()
    }

    pub fn has_pending_notices(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn notify_selection(&mut self) {
        self.outbox.push(Notice::SelectionChanged {
            selected: self.selected,
        });
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Clamps a span into the window with `end > start`.
    ///
    /// Values are not snapped; imported data may sit between slot boundaries.
    pub fn normalize_span(&self, start: Minutes, end: Minutes) -> (Minutes, Minutes) {
        let grid = &self.grid;
        let mut start = grid.clamp(start);
        let mut end = grid.clamp(end);
        if end <= start {
            end = (start + grid.slot_minutes).min(grid.window_end());
            if end <= start {
                start = (end - grid.slot_minutes).max(grid.window_start);
            }
        }
        (start, end)
    }

    /// Appends an event, clamping its span. Does not select it.
    pub fn insert(&mut self, mut event: Event) -> EventId {
        (event.start, event.end) = self.normalize_span(event.start, event.end);
        let id = EventId(self.next_id);
        self.next_id += 1;
        debug!(%id, start = event.start, end = event.end, "event inserted");
        self.events.insert(id, event);
        id
    }

    /// Selects `id`, or clears the selection for `None` or an unknown id.
    ///
    /// Always notifies, even when the selection is unchanged.
    pub fn select(&mut self, id: Option<EventId>) -> Option<EventId> {
        self.selected = id.filter(|id| self.events.contains_key(id));
        self.notify_selection();
        self.selected
    }

    /// External edit: applies `patch` and notifies when `id` is selected.
    pub fn edit(&mut self, id: EventId, patch: EventPatch) -> bool {
        let applied = self.patch(id, patch);
        if applied && self.selected == Some(id) {
            self.notify_selection();
        }
        applied
    }

    /// Internal apply: applies `patch` without notifying.
    pub fn apply_edit(&mut self, id: EventId, patch: EventPatch) -> bool {
        self.patch(id, patch)
    }

    fn patch(&mut self, id: EventId, patch: EventPatch) -> bool {
        let Some(current) = self.events.get(&id) else {
            return false;
        };
        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        (updated.start, updated.end) = self.normalize_span(updated.start, updated.end);
        if let Some(slot) = self.events.get_mut(&id) {
            *slot = updated;
        }
        true
    }

    /// Removes an event; removing the selected one clears the selection.
    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let removed = self.events.shift_remove(&id)?;
        debug!(%id, "event removed");
        if self.provisional == Some(id) {
            self.provisional = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
            self.notify_selection();
        }
        Some(removed)
    }

    /// Replaces the whole collection at once and clears the selection.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        self.events.clear();
        self.provisional = None;
        for event in events {
            self.insert(event);
        }
        self.selected = None;
        self.notify_selection();
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    // ── Two-phase creation ───────────────────────────────────────────

    /// Commits an untitled event and selects it while a title is requested.
    ///
    /// A previous provisional event that was never finalized is rolled back.
    pub fn insert_provisional(&mut self, start: Minutes, end: Minutes) -> EventId {
        if let Some(stale) = self.provisional.take() {
            self.remove(stale);
        }
        let id = self.insert(Event::new(start, end, ""));
        self.provisional = Some(id);
        self.select(Some(id));
        id
    }

    /// Titles the provisional event, or rolls it back when `title` is absent
    /// or blank. Returns the kept id.
    pub fn finalize_provisional(&mut self, id: EventId, title: Option<String>) -> Option<EventId> {
        if self.provisional != Some(id) {
            return None;
        }
        self.provisional = None;
        match title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(title) => {
                self.edit(id, EventPatch::title(title));
                Some(id)
            }
            None => {
                debug!(%id, "provisional event rolled back");
                self.remove(id);
                None
            }
        }
    }

    // ── Persistence contracts ────────────────────────────────────────

    /// Day document in storage order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        codec::serialize(self.events.values())
    }

    /// Replaces all events from a day document.
    ///
    /// On error nothing changes.
    pub fn import_json(&mut self, content: &str) -> Result<usize, CodecError> {
        let events = codec::deserialize(content, &self.grid)?;
        let count = events.len();
        self.replace_all(events);
        Ok(count)
    }
}
