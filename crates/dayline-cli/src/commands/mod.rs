pub mod config;
pub mod day;
pub mod event;

use chrono::{Local, NaiveDate, NaiveTime};
use dayline_core::{Config, DiaryEditor, DiaryStore, EventId, FsDiaryStore, LoadStatus};

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Editor for one diary day, backed by the configured diaries directory.
pub struct DaySession {
    pub editor: DiaryEditor,
    store: FsDiaryStore,
    day: NaiveDate,
}

impl DaySession {
    /// Loads the day's file. A file that is not a day document is an error
    /// here, so a later save cannot overwrite it.
    pub fn open(date: Option<NaiveDate>) -> CmdResult<Self> {
        let config = Config::load()?;
        let store = FsDiaryStore::new(config.diaries_dir()?);
        let day = date.unwrap_or_else(|| Local::now().date_naive());
        let mut editor = DiaryEditor::from_config(&config);
        if editor.load_day(&store, day)? == LoadStatus::Malformed {
            return Err(format!("{} is not a day document", store.describe(day)).into());
        }
        Ok(Self { editor, store, day })
    }

    pub fn save(&mut self) -> CmdResult<String> {
        Ok(self.editor.save_day(&mut self.store, self.day)?)
    }

    /// Event at a position of the day file.
    pub fn event_at(&self, position: usize) -> CmdResult<EventId> {
        self.editor
            .timeline()
            .id_at(position)
            .ok_or_else(|| format!("no event at position {position}").into())
    }

    pub fn describe(&self, id: EventId) -> String {
        let timeline = self.editor.timeline();
        match (timeline.position_of(id), timeline.get(id)) {
            (Some(pos), Some(event)) => format!("[{pos}] {}", event.label()),
            _ => id.to_string(),
        }
    }
}

/// Parses `HH:MM` from the command line.
pub fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("invalid time '{s}': {e}"))
}
