//! # Dayline Core Library
//!
//! This library provides the core of the Dayline diary: a day timeline that
//! runs from 06:00 to 06:00 the next morning, carved into 15-minute slots,
//! edited by direct manipulation and through a detail form. The CLI binary and
//! any GUI host are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Timeline**: Event collection with stable ids, selection and notices
//! - **Gestures**: Press/move/release state machine for create, move and resize
//! - **Detail panel**: Form binding that writes back without echoing
//! - **Storage**: One JSON document per day and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Timeline`]: The day's events and the current selection
//! - [`GestureInterpreter`]: Pointer gesture state machine
//! - [`DetailPanel`]: Form mirror of the selected event
//! - [`DiaryEditor`]: Session owner routing input and notices
//! - [`DiaryStore`]: Trait for day file persistence

pub mod detail;
pub mod editor;
pub mod error;
pub mod storage;
pub mod timeline;

pub use detail::{DetailFields, DetailPanel};
pub use editor::{DiaryEditor, LoadStatus};
pub use error::{CodecError, ConfigError, CoreError, StorageError};
pub use storage::{Config, DiaryStore, FsDiaryStore, MemoryDiaryStore};
pub use timeline::{
    Event, EventId, EventPatch, GestureInterpreter, GestureOutcome, Layout, Notice, Point, Scene,
    SlotGrid, Timeline, TitlePrompt,
};
