use std::collections::VecDeque;

use crate::domain::Person;

/// Undo steps kept before the oldest is dropped.
const MAX_UNDO: usize = 100;

/// Snapshots of the person list for undo and redo.
///
/// The lock flag is never part of a snapshot. At most [`MAX_UNDO`] steps
/// can be undone.
#[derive(Debug, Default)]
pub(crate) struct History {
    undo: VecDeque<Vec<Person>>,
    redo: Vec<Vec<Person>>,
}

impl History {
    /// Records the state before a successful undoable command.
    ///
    /// Anything that could have been redone is discarded.
    pub(crate) fn record(&mut self, before: Vec<Person>) {
        self.push_undo(before);
        self.redo.clear();
    }

    /// Steps back, stashing `current` for redo.
    pub(crate) fn undo(&mut self, current: Vec<Person>) -> Option<Vec<Person>> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Steps forward again, stashing `current` for undo.
    pub(crate) fn redo(&mut self, current: Vec<Person>) -> Option<Vec<Person>> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    fn push_undo(&mut self, snapshot: Vec<Person>) {
        if self.undo.len() == MAX_UNDO {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{alice, benson};

    #[test]
    fn nothing_to_undo_or_redo() {
        let mut history = History::default();
        assert_eq!(history.undo(vec![alice()]), None);
        assert_eq!(history.redo(vec![alice()]), None);
    }

    #[test]
    fn undo_then_redo() {
        let mut history = History::default();
        history.record(vec![]);
        history.record(vec![alice()]);
        let current = vec![alice(), benson()];

        let previous = history.undo(current.clone()).unwrap();
        assert_eq!(previous, vec![alice()]);

        let restored = history.redo(previous).unwrap();
        assert_eq!(restored, current);
    }

    #[test]
    fn recording_discards_redo() {
        let mut history = History::default();
        history.record(vec![]);
        let previous = history.undo(vec![alice()]).unwrap();

        history.record(previous);

        assert_eq!(history.redo(vec![benson()]), None);
    }

    #[test]
    fn oldest_steps_are_dropped_past_the_limit() {
        let mut history = History::default();
        for n in 0..=MAX_UNDO {
            history.record(vec![alice(); n]);
        }

        let mut steps = 0;
        let mut last = Vec::new();
        while let Some(previous) = history.undo(Vec::new()) {
            steps += 1;
            last = previous;
        }

        assert_eq!(steps, MAX_UNDO);
        // The very first snapshot (empty) is gone.
        assert_eq!(last.len(), 1);
    }
}
