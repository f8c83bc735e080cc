//! Event types for the day timeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::slot::{format_range, Minutes};

/// Title shown for events without one.
pub const UNTITLED: &str = "(untitled)";

/// Stable handle to an event within one [`Timeline`](super::Timeline).
///
/// Allocated from a per-timeline counter and never reused, so selection and
/// in-flight drags keep pointing at the same event when others are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub(crate) u64);

impl EventId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One scheduled activity of the day.
///
/// Field order matches the persisted JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub start: Minutes,
    pub end: Minutes,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub reflection: String,
}

impl Event {
    pub fn new(start: Minutes, end: Minutes, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            title: title.into(),
            location: String::new(),
            reflection: String::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = reflection.into();
        self
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    /// Overlap is allowed in the model; this is informational only.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// `HH:MM-HH:MM title`, as drawn on the block and listed in summaries.
    pub fn label(&self) -> String {
        format!("{} {}", format_range(self.start, self.end), self.display_title())
    }
}

/// Field overrides applied by [`Timeline::edit`](super::Timeline::edit) and
/// [`Timeline::apply_edit`](super::Timeline::apply_edit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub start: Option<Minutes>,
    pub end: Option<Minutes>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub reflection: Option<String>,
}

impl EventPatch {
    pub fn span(start: Minutes, end: Minutes) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    pub fn reflection(reflection: impl Into<String>) -> Self {
        Self {
            reflection: Some(reflection.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(self, event: &mut Event) {
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(reflection) = self.reflection {
            event.reflection = reflection;
        }
    }
}
