use std::collections::HashMap;

pub use rhein_schema::{Chart, ChartEvent, ChartNote, EventValue, Judgement};

use crate::error::SetupError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteState {
    Pending,
    /// Hit by the player; deviance in signed seconds (positive = late).
    Calculated { deviance: f64 },
    /// Scrolled past the miss window without a hit.
    Destroyed,
}

/// A note in play. Leaves `Pending` exactly once and is frozen afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub lane: usize,
    pub beat: f64,
    /// Carried for the record only; holds are judged on their head like taps.
    pub length: f64,
    state: NoteState,
}

impl Note {
    pub fn new(lane: usize, beat: f64, length: f64) -> Self {
        Self {
            lane,
            beat,
            length,
            state: NoteState::Pending,
        }
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn is_calculated(&self) -> bool {
        matches!(self.state, NoteState::Calculated { .. })
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, NoteState::Destroyed)
    }

    pub fn is_judged(&self) -> bool {
        self.state != NoteState::Pending
    }

    pub fn deviance(&self) -> Option<f64> {
        match self.state {
            NoteState::Calculated { deviance } => Some(deviance),
            _ => None,
        }
    }

    /// Target time in seconds at the given tempo.
    pub fn time(&self, bpm: f64) -> f64 {
        self.beat * 60.0 / bpm
    }

    /// Returns false (and leaves the note untouched) if it was already judged.
    pub fn calculate(&mut self, deviance: f64) -> bool {
        if self.is_judged() {
            return false;
        }
        self.state = NoteState::Calculated { deviance };
        true
    }

    pub fn destroy(&mut self) -> bool {
        if self.is_judged() {
            return false;
        }
        self.state = NoteState::Destroyed;
        true
    }
}

impl From<&ChartNote> for Note {
    fn from(n: &ChartNote) -> Self {
        Note::new(n.lane as usize, n.beat, n.length)
    }
}

/// Checks the invariants the judge relies on before any note is moved.
pub fn validate(chart: &Chart, keys: usize) -> Result<(), SetupError> {
    if !(chart.bpm.is_finite() && chart.bpm > 0.0) {
        return Err(SetupError::InvalidBpm(chart.bpm));
    }

    let mut last: HashMap<u32, f64> = HashMap::new();
    for note in &chart.notes {
        if !note.beat.is_finite() || !note.length.is_finite() || note.length < 0.0 {
            return Err(SetupError::InvalidNote { beat: note.beat });
        }
        if note.lane as usize >= keys {
            return Err(SetupError::LaneOutOfRange {
                lane: note.lane,
                beat: note.beat,
                keys,
            });
        }
        if let Some(previous) = last.insert(note.lane, note.beat) {
            if note.beat < previous {
                return Err(SetupError::UnorderedLane {
                    lane: note.lane,
                    beat: note.beat,
                    previous,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_leaves_pending_once() {
        let mut note = Note::new(0, 1.0, 0.0);
        assert!(note.calculate(0.012));
        assert!(!note.destroy());
        assert!(!note.calculate(0.5));
        assert!(note.is_calculated());
        assert!(!note.is_destroyed());
        assert_eq!(note.deviance(), Some(0.012));
    }

    #[test]
    fn note_time_follows_bpm() {
        let note = Note::new(2, 3.0, 0.0);
        assert_eq!(note.time(120.0), 1.5);
        assert_eq!(note.time(60.0), 3.0);
    }

    #[test]
    fn validate_rejects_bad_charts() {
        let mut chart = Chart::new(120.0);
        chart.notes = vec![ChartNote::tap(0, 1.0), ChartNote::tap(4, 2.0)];
        assert!(matches!(
            validate(&chart, 4),
            Err(SetupError::LaneOutOfRange { lane: 4, .. })
        ));

        chart.notes = vec![ChartNote::tap(1, 2.0), ChartNote::tap(1, 1.0)];
        assert!(matches!(
            validate(&chart, 4),
            Err(SetupError::UnorderedLane { lane: 1, .. })
        ));

        chart.notes = vec![ChartNote::hold(1, 2.0, -1.0)];
        assert!(matches!(validate(&chart, 4), Err(SetupError::InvalidNote { .. })));

        chart.notes.clear();
        chart.bpm = 0.0;
        assert_eq!(validate(&chart, 4), Err(SetupError::InvalidBpm(0.0)));
    }
}
