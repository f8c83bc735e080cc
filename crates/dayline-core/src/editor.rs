//! Editing session for one diary day.
//!
//! [`DiaryEditor`] is the single owner of the timeline, the gesture
//! interpreter and the detail panel. Every input (pointer or form) runs to
//! completion and then pumps queued notices into the panel, so the panel is
//! always in sync with the timeline when the host repaints.

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::detail::DetailPanel;
use crate::error::{CodecError, Result};
use crate::storage::{Config, DiaryStore};
use crate::timeline::{
    render, Event, EventId, GestureInterpreter, GestureOutcome, Layout, Notice, Point, Scene,
    SelectionObserver, Timeline, TitlePrompt,
};

/// Result of loading a day file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Events replaced with the file's contents.
    Loaded(usize),
    /// No file for that day; the timeline is unchanged.
    NotFound,
    /// File is not a day document; the timeline is unchanged.
    Malformed,
}

#[derive(Debug, Default)]
pub struct DiaryEditor {
    timeline: Timeline,
    gesture: GestureInterpreter,
    panel: DetailPanel,
    layout: Layout,
    deferred_titles: bool,
}

impl DiaryEditor {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            layout: config.layout,
            deferred_titles: config.editor.deferred_titles,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    pub fn gesture(&self) -> &GestureInterpreter {
        &self.gesture
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scene(&self) -> Scene {
        render(&self.timeline, &self.gesture, &self.layout)
    }

    // ── Pointer input ────────────────────────────────────────────────

    pub fn pointer_press(&mut self, point: Point) {
        self.gesture.press(&self.timeline, &self.layout, point);
        self.pump();
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.gesture.drag(&mut self.timeline, &self.layout, point);
        self.pump();
    }

    /// Ends a gesture. With deferred titles configured, `prompt` is not
    /// consulted and a drawn event awaits [`DiaryEditor::resolve_title`].
    pub fn pointer_release(&mut self, point: Point, prompt: &mut dyn TitlePrompt) -> GestureOutcome {
        let outcome = if self.deferred_titles {
            self.gesture.release_deferred(&mut self.timeline, &self.layout, point)
        } else {
            self.gesture.release(&mut self.timeline, &self.layout, point, prompt)
        };
        self.pump();
        outcome
    }

    /// Answers the title request of a provisionally created event.
    pub fn resolve_title(&mut self, id: EventId, title: Option<String>) -> Option<EventId> {
        let kept = self.timeline.finalize_provisional(id, title);
        self.pump();
        kept
    }

    pub fn cancel_gesture(&mut self) {
        self.gesture.cancel(&mut self.timeline);
        self.pump();
    }

    pub fn select(&mut self, id: Option<EventId>) -> Option<EventId> {
        let selected = self.timeline.select(id);
        self.pump();
        selected
    }

    // ── Form input ───────────────────────────────────────────────────

    pub fn type_title(&mut self, text: impl Into<String>) {
        self.panel.type_title(text);
    }

    pub fn finish_title(&mut self) -> bool {
        self.panel.finish_title(&mut self.timeline)
    }

    pub fn type_location(&mut self, text: impl Into<String>) {
        self.panel.type_location(text);
    }

    pub fn finish_location(&mut self) -> bool {
        self.panel.finish_location(&mut self.timeline)
    }

    pub fn change_reflection(&mut self, text: impl Into<String>) -> bool {
        self.panel.change_reflection(&mut self.timeline, text)
    }

    pub fn commit_start(&mut self, time: NaiveTime) -> bool {
        self.panel.commit_start(&mut self.timeline, time)
    }

    pub fn commit_end(&mut self, time: NaiveTime) -> bool {
        self.panel.commit_end(&mut self.timeline, time)
    }

    pub fn delete_selected(&mut self) -> Option<Event> {
        let removed = self.panel.delete(&mut self.timeline);
        self.pump();
        removed
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Replaces the day's events from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. Missing and malformed
    /// files are reported through [`LoadStatus`]; in every case but
    /// `Loaded` the current events stay as they were.
    pub fn load_day(&mut self, store: &dyn DiaryStore, day: NaiveDate) -> Result<LoadStatus> {
        let Some(content) = store.load(day)? else {
            return Ok(LoadStatus::NotFound);
        };
        match self.import_json(&content) {
            Ok(count) => {
                info!(%day, count, location = %store.describe(day), "day loaded");
                Ok(LoadStatus::Loaded(count))
            }
            Err(e) => {
                warn!(%day, error = %e, "day file ignored");
                Ok(LoadStatus::Malformed)
            }
        }
    }

    /// Replaces the events with a day document's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not a day document; nothing changes.
    pub fn import_json(&mut self, content: &str) -> std::result::Result<usize, CodecError> {
        let count = self.timeline.import_json(content)?;
        self.gesture = GestureInterpreter::new();
        self.pump();
        Ok(count)
    }

    /// Drops every event of the day.
    pub fn clear_day(&mut self) {
        self.gesture = GestureInterpreter::new();
        self.timeline.clear();
        self.pump();
    }

    /// Writes the day's events to `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails; the session stays usable.
    pub fn save_day(&self, store: &mut dyn DiaryStore, day: NaiveDate) -> Result<String> {
        let content = self.timeline.to_json()?;
        store.save(day, &content)?;
        Ok(store.describe(day))
    }

    fn pump(&mut self) {
        for notice in self.timeline.take_notices() {
            match notice {
                Notice::SelectionChanged { selected } => {
                    self.panel.selection_changed(&self.timeline, selected);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, StorageError};
    use crate::storage::MemoryDiaryStore;

    const X: f32 = 200.0;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn create(editor: &mut DiaryEditor, y1: f32, y2: f32, title: &'static str) -> GestureOutcome {
        editor.pointer_press(Point::new(X, y1));
        editor.pointer_move(Point::new(X, y2));
        editor.pointer_release(Point::new(X, y2), &mut move || Some(title.to_string()))
    }

    #[test]
    fn creation_populates_panel() {
        let mut editor = DiaryEditor::default();
        let GestureOutcome::Created(id) = create(&mut editor, 96.0, 132.0, "Meeting") else {
            panic!("expected creation");
        };
        assert_eq!(editor.panel().bound(), Some(id));
        assert_eq!(editor.panel().fields().title, "Meeting");
        assert_eq!(editor.panel().fields().start, t(8, 0));
        assert_eq!(editor.panel().fields().end, t(8, 45));
    }

    #[test]
    fn panel_follows_live_drag() {
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");
        editor.pointer_press(Point::new(X, 114.0));
        editor.pointer_move(Point::new(X, 138.0));
        assert_eq!(editor.panel().fields().start, t(8, 30));
        assert_eq!(editor.panel().fields().end, t(9, 15));
    }

    #[test]
    fn form_edit_does_not_repopulate_drafts() {
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");
        editor.type_location("Room 4");
        editor.change_reflection("useful");
        // location draft survives because reflection write-back is silent
        assert_eq!(editor.panel().fields().location, "Room 4");
        editor.finish_location();
        let ev = editor.timeline().selected_event().unwrap();
        assert_eq!(ev.location, "Room 4");
        assert_eq!(ev.reflection, "useful");
    }

    #[test]
    fn deferred_titles_two_phase() {
        let mut cfg = Config::default();
        cfg.editor.deferred_titles = true;
        let mut editor = DiaryEditor::from_config(&cfg);
        let outcome = create(&mut editor, 96.0, 132.0, "unused");
        let GestureOutcome::AwaitingTitle(id) = outcome else {
            panic!("expected provisional event");
        };
        assert_eq!(editor.panel().bound(), Some(id));
        assert_eq!(editor.resolve_title(id, None), None);
        assert!(editor.timeline().is_empty());
        assert!(!editor.panel().is_enabled());
    }

    #[test]
    fn import_and_clear_reset_panel() {
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");
        assert!(editor.import_json("[1, 2]").is_ok());
        assert!(editor.timeline().is_empty());
        assert!(!editor.panel().is_enabled());

        assert_eq!(editor.import_json(r#"[{"start":420,"end":450}]"#).unwrap(), 1);
        assert!(editor.import_json("\"text\"").is_err());
        assert_eq!(editor.timeline().len(), 1);

        editor.clear_day();
        assert!(editor.timeline().is_empty());
    }

    #[test]
    fn delete_disables_panel() {
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");
        assert!(editor.delete_selected().is_some());
        assert!(editor.timeline().is_empty());
        assert!(!editor.panel().is_enabled());
    }

    struct BrokenStore;

    impl DiaryStore for BrokenStore {
        fn load(&self, _day: NaiveDate) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::ReadFailed {
                path: "broken".into(),
                source: std::io::ErrorKind::PermissionDenied.into(),
            })
        }

        fn save(&mut self, _day: NaiveDate, _content: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::WriteFailed {
                path: "broken".into(),
                source: std::io::ErrorKind::PermissionDenied.into(),
            })
        }

        fn describe(&self, _day: NaiveDate) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn store_failures_surface_as_storage_errors() {
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");

        let err = editor.save_day(&mut BrokenStore, day()).unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::WriteFailed { .. })));
        let err = editor.load_day(&BrokenStore, day()).unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::ReadFailed { .. })));
        assert_eq!(editor.timeline().len(), 1);
    }

    #[test]
    fn save_then_load_round_trip() {
        let mut store = MemoryDiaryStore::new();
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");
        editor.commit_end(t(9, 0));
        editor.save_day(&mut store, day()).unwrap();

        let mut fresh = DiaryEditor::default();
        assert_eq!(fresh.load_day(&store, day()).unwrap(), LoadStatus::Loaded(1));
        assert_eq!(fresh.timeline().text_summary(), "08:00-09:00 Meeting");
    }

    #[test]
    fn malformed_or_missing_file_keeps_events() {
        let mut store = MemoryDiaryStore::new();
        let mut editor = DiaryEditor::default();
        create(&mut editor, 96.0, 132.0, "Meeting");

        let other = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(editor.load_day(&store, other).unwrap(), LoadStatus::NotFound);

        store.insert(day(), "{not json");
        assert_eq!(editor.load_day(&store, day()).unwrap(), LoadStatus::Malformed);
        assert_eq!(editor.timeline().len(), 1);
        assert!(editor.panel().is_enabled());
    }
}
