use std::collections::VecDeque;

use crate::chart::Note;

/// One input column. Notes are kept in chart order and only the head is ever
/// looked at.
#[derive(Debug, Clone, Default)]
pub struct Lane {
    pub index: usize,
    notes: VecDeque<Note>,
}

impl Lane {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            notes: VecDeque::new(),
        }
    }

    /// Caller guarantees non-decreasing beats.
    pub fn push_in_order(&mut self, note: Note) {
        debug_assert!(
            self.notes.back().map_or(true, |last| last.beat <= note.beat),
            "lane {} pushed out of order",
            self.index
        );
        self.notes.push_back(note);
    }

    pub fn peek(&self) -> Option<&Note> {
        self.notes.front()
    }

    pub fn peek_mut(&mut self) -> Option<&mut Note> {
        self.notes.front_mut()
    }

    /// Does not touch the note's state; mark it before popping.
    pub fn pop_front(&mut self) -> Option<Note> {
        let note = self.notes.pop_front();
        if note.is_none() {
            log::warn!("pop on empty lane {}", self.index);
        }
        note
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

/// Builds `keys` lanes, one per index.
pub fn lanes(keys: usize) -> Vec<Lane> {
    (0..keys).map(Lane::new).collect()
}
