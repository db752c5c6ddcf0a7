use rhein_schema::Judgement;

use crate::chart::Note;
use crate::gameplay::lane::{lanes, Lane};
use crate::gameplay::timing::TimingWindows;

#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResult {
    pub lane: usize,
    /// The note as it left its lane, already marked.
    pub note: Note,
    pub judgement: Judgement,
    /// Signed milliseconds, `None` when the note scrolled past the miss window.
    pub deviance_ms: Option<i32>,
}

/// Signed deviation in whole milliseconds; positive means late.
pub fn deviation_ms(position: f64, note_time: f64) -> i32 {
    ((position - note_time) * 1000.0).round() as i32
}

/// Per-lane note queues plus the windows they are judged against.
#[derive(Debug, Clone)]
pub struct JudgeMachine {
    lanes: Vec<Lane>,
    windows: TimingWindows,
}

impl JudgeMachine {
    pub fn new(keys: usize, windows: TimingWindows) -> Self {
        Self {
            lanes: lanes(keys),
            windows,
        }
    }

    /// Distributes notes into their lanes, keeping input order within a lane.
    pub fn load(&mut self, notes: impl IntoIterator<Item = Note>) {
        for note in notes {
            match self.lanes.get_mut(note.lane) {
                Some(lane) => lane.push_in_order(note),
                None => log::warn!("dropping note at beat {} for missing lane {}", note.beat, note.lane),
            }
        }
    }

    pub fn windows(&self) -> &TimingWindows {
        &self.windows
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn remaining(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(Lane::is_empty)
    }

    pub fn clear(&mut self) {
        for lane in &mut self.lanes {
            lane.clear();
        }
    }

    /// Judges at most one note per lane, lanes in ascending order.
    ///
    /// The head note expires as a Miss once it is past the late edge of the
    /// miss window, pressed or not. Otherwise a press within reach hits it.
    /// `pressed(lane)` should answer whether the lane's key went down this tick.
    pub fn process_tick(
        &mut self,
        position: f64,
        bpm: f64,
        pressed: impl Fn(usize) -> bool,
    ) -> Vec<JudgmentResult> {
        let mut results = Vec::new();

        for lane in &mut self.lanes {
            let index = lane.index;
            let Some(head) = lane.peek_mut() else {
                continue;
            };
            if head.is_judged() {
                // loaded already marked; it has had its judgement
                log::warn!("lane {index} head at beat {} was already judged, discarding", head.beat);
                lane.pop_front();
                continue;
            }
            let time = head.time(bpm);
            let d = deviation_ms(position, time);

            if self.windows.too_late(d) {
                head.destroy();
                if let Some(note) = lane.pop_front() {
                    results.push(JudgmentResult {
                        lane: index,
                        note,
                        judgement: Judgement::Miss,
                        deviance_ms: None,
                    });
                }
            } else if pressed(index) && self.windows.hittable(d) {
                let judgement = self.windows.classify(d);
                head.calculate(position - time);
                if let Some(note) = lane.pop_front() {
                    results.push(JudgmentResult {
                        lane: index,
                        note,
                        judgement,
                        deviance_ms: Some(d),
                    });
                }
            }
        }

        results
    }
}
