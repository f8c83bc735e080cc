//! Event commands.
//!
//! Every command drives the same editor a pointer or the detail form would:
//! `add`, `move` and `resize` replay a drag on the strip, `edit` fills the form.

use chrono::{NaiveDate, NaiveTime};
use clap::{Subcommand, ValueEnum};
use dayline_core::timeline::{GestureState, Minutes};
use dayline_core::{EventId, GestureOutcome, Point};

use super::{parse_clock, CmdResult, DaySession};

#[derive(Subcommand)]
pub enum EventAction {
    /// Draw a new event
    Add {
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_clock)]
        start: NaiveTime,
        /// End time (HH:MM, 06:00 is the end of the day)
        #[arg(long, value_parser = parse_clock)]
        end: NaiveTime,
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        reflection: Option<String>,
    },
    /// Change fields of an event
    Edit {
        /// Position in the day file (see `day show --positions`)
        position: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_clock)]
        start: Option<NaiveTime>,
        #[arg(long, value_parser = parse_clock)]
        end: Option<NaiveTime>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        reflection: Option<String>,
    },
    /// Drag an event by whole slots
    Move {
        position: usize,
        /// Slots to move; negative moves earlier
        #[arg(long, allow_negative_numbers = true)]
        slots: i64,
    },
    /// Drag one edge of an event by whole slots
    Resize {
        position: usize,
        #[arg(long, value_enum)]
        edge: Edge,
        /// Slots to drag the edge; negative drags it earlier
        #[arg(long, allow_negative_numbers = true)]
        slots: i64,
    },
    /// Delete an event
    Delete { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Edge {
    Top,
    Bottom,
}

pub fn run(action: EventAction, date: Option<NaiveDate>) -> CmdResult {
    let mut session = DaySession::open(date)?;
    let message = match action {
        EventAction::Add {
            start,
            end,
            title,
            location,
            reflection,
        } => {
            let id = add(&mut session, start, end, title)?;
            let editor = &mut session.editor;
            if let Some(location) = location {
                editor.type_location(location);
                editor.finish_location();
            }
            if let Some(reflection) = reflection {
                editor.change_reflection(reflection);
            }
            format!("added {}", session.describe(id))
        }
        EventAction::Edit {
            position,
            title,
            start,
            end,
            location,
            reflection,
        } => {
            if title.is_none()
                && start.is_none()
                && end.is_none()
                && location.is_none()
                && reflection.is_none()
            {
                return Err("nothing to edit".into());
            }
            let id = session.event_at(position)?;
            let editor = &mut session.editor;
            editor.select(Some(id));
            if let Some(title) = title {
                editor.type_title(title);
                editor.finish_title();
            }
            // start before end, so a later end is checked against the new start
            if let Some(start) = start {
                editor.commit_start(start);
            }
            if let Some(end) = end {
                editor.commit_end(end);
            }
            if let Some(location) = location {
                editor.type_location(location);
                editor.finish_location();
            }
            if let Some(reflection) = reflection {
                editor.change_reflection(reflection);
            }
            format!("edited {}", session.describe(id))
        }
        EventAction::Move { position, slots } => {
            let id = session.event_at(position)?;
            drag(&mut session, id, Grip::Body, slots)?;
            format!("moved {}", session.describe(id))
        }
        EventAction::Resize {
            position,
            edge,
            slots,
        } => {
            let id = session.event_at(position)?;
            let grip = match edge {
                Edge::Top => Grip::Top,
                Edge::Bottom => Grip::Bottom,
            };
            drag(&mut session, id, grip, slots)?;
            format!("resized {}", session.describe(id))
        }
        EventAction::Delete { position } => {
            let id = session.event_at(position)?;
            let label = session.describe(id);
            session.editor.select(Some(id));
            session.editor.delete_selected();
            format!("deleted {label}")
        }
    };
    let location = session.save()?;
    println!("{message}");
    println!("saved {location}");
    Ok(())
}

/// Draws `start..end` in the label column, where no block can be hit.
fn add(
    session: &mut DaySession,
    start: NaiveTime,
    end: NaiveTime,
    title: String,
) -> CmdResult<EventId> {
    let editor = &mut session.editor;
    let layout = *editor.layout();
    let grid = *editor.timeline().grid();
    let start = grid.wall_clock_to_minutes(start);
    let end = grid.end_wall_clock_to_minutes(end);
    if end <= start {
        return Err("end must be after start".into());
    }
    let row = |minutes: Minutes| layout.slot_to_y(grid.slot_of(grid.snap_and_clamp(minutes)));

    let (top, bottom) = (Point::new(0.0, row(start)), Point::new(0.0, row(end)));
    editor.pointer_press(top);
    editor.pointer_move(bottom);
    let mut title = Some(title);
    let outcome = editor.pointer_release(bottom, &mut || title.take());
    let created = match outcome {
        GestureOutcome::Created(id) => Some(id),
        GestureOutcome::AwaitingTitle(id) => editor.resolve_title(id, title.take()),
        _ => None,
    };
    created.ok_or_else(|| "title must not be blank".into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grip {
    Body,
    Top,
    Bottom,
}

/// Presses on the event's block, drags `slots` rows and releases.
fn drag(session: &mut DaySession, id: EventId, grip: Grip, slots: i64) -> CmdResult {
    let editor = &mut session.editor;
    let layout = *editor.layout();
    let event = editor
        .timeline()
        .get(id)
        .ok_or_else(|| format!("unknown event {id}"))?;
    let rect = layout.event_rect(event, editor.timeline().grid());
    let y = match grip {
        Grip::Body => rect.y + rect.height / 2.0,
        Grip::Top => rect.top(),
        Grip::Bottom => rect.bottom(),
    };
    let from = Point::new(rect.x + rect.width / 2.0, y);
    editor.pointer_press(from);

    let grabbed = match editor.gesture().state() {
        GestureState::Moving { id: hit, .. } => Some((Grip::Body, hit)),
        GestureState::ResizingTop { id: hit, .. } => Some((Grip::Top, hit)),
        GestureState::ResizingBottom { id: hit, .. } => Some((Grip::Bottom, hit)),
        _ => None,
    };
    if grabbed != Some((grip, id)) {
        editor.cancel_gesture();
        let what = session.describe(id);
        return Err(format!("cannot grab {what}: too short or covered by a later event").into());
    }

    let to = Point::new(from.x, from.y + slots as f32 * layout.slot_height);
    editor.pointer_move(to);
    editor.pointer_release(to, &mut || None::<String>);
    Ok(())
}
