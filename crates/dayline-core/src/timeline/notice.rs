//! Selection notices emitted by the timeline.
//!
//! The timeline never calls into its subscriber directly. It queues
//! [`Notice`]s and the owner drains them after each input step, forwarding
//! them to the one [`SelectionObserver`] (the detail panel). A single
//! subscriber is all the editor needs; fan-out is not supported.

use super::event::EventId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The selected event changed, or its fields changed while it stayed selected.
    SelectionChanged { selected: Option<EventId> },
}

/// Receiver of selection notices.
pub trait SelectionObserver {
    fn selection_changed(&mut self, timeline: &super::Timeline, selected: Option<EventId>);
}

/// Pending notices, drained by the subscriber.
#[derive(Debug, Default)]
pub(crate) struct Outbox {
    pending: Vec<Notice>,
}

impl Outbox {
    pub(crate) fn push(&mut self, notice: Notice) {
        // one notice per live drag, not one per pointer move
        if self.pending.last() == Some(&notice) {
            return;
        }
        self.pending.push(notice);
    }

    pub(crate) fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbox_collapses_repeats_and_drains() {
        let mut outbox = Outbox::default();
        let a = Notice::SelectionChanged { selected: Some(EventId(1)) };
        let none = Notice::SelectionChanged { selected: None };
        outbox.push(a);
        outbox.push(a);
        outbox.push(none);
        outbox.push(a);
        assert_eq!(outbox.take(), vec![a, none, a]);
        assert!(outbox.is_empty());
    }
}
