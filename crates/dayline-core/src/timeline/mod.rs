//! Day timeline editor core.
//!
//! This module provides:
//! - Slot arithmetic for the 06:00-to-06:00 window
//! - The event collection with selection and change notices
//! - Pointer gesture interpretation (create, move, resize, select)
//! - A renderable scene and the JSON day document codec

pub mod codec;
mod event;
mod gesture;
mod layout;
mod model;
mod notice;
mod render;
mod slot;

pub use event::{Event, EventId, EventPatch, UNTITLED};
pub use gesture::{
    resize_bottom_span, resize_top_span, translate_span, GestureInterpreter, GestureOutcome,
    GestureState, Span, TitlePrompt,
};
pub use layout::{HitKind, Layout, Point, Rect};
pub use model::Timeline;
pub use notice::{Notice, SelectionObserver};
pub use render::{elide, render, DrawOp, Scene};
pub use slot::{
    format_clock, format_range, minutes_to_wall_clock, Minutes, SlotGrid, DEFAULT_SLOT_MINUTES,
    DEFAULT_WINDOW_LENGTH, DEFAULT_WINDOW_START,
};
