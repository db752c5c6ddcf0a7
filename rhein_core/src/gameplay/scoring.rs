use rhein_schema::Judgement;

use crate::chart::Note;

/// Consumes every judgement exactly once, in the order they were produced.
pub trait Scorer: Send {
    fn on_judge(&mut self, note: &Note, judgement: Judgement);

    fn score(&self) -> u64;

    fn combo(&self) -> u32;

    fn max_combo(&self) -> u32;

    /// Percentage in `0..=100`; 100 before anything was judged.
    fn accuracy(&self) -> f64;

    fn count(&self, judgement: Judgement) -> u32;
}

pub trait Health: Send {
    fn on_judge(&mut self, note: &Note, judgement: Judgement);

    /// Always within `[0, 1]`.
    fn value(&self) -> f64;

    fn is_depleted(&self) -> bool {
        self.value() <= 0.0
    }
}

/// Score weight per judgement, indexed worst first like [`Judgement`]'s order.
pub const SCORE_WEIGHTS: [u64; 6] = [0, 50, 100, 200, 300, 320];

// accuracy does not reward Marvelous over Perfect
const ACCURACY_WEIGHTS: [f64; 6] = [0.0, 50.0, 100.0, 200.0, 300.0, 300.0];

/// Combo, weighted score and accuracy.
#[derive(Debug, Clone)]
pub struct StandardScorer {
    break_threshold: Judgement,
    counts: [u32; 6],
    combo: u32,
    max_combo: u32,
    score: u64,
}

impl StandardScorer {
    /// Judgements at or below `break_threshold` reset the combo.
    pub fn new(break_threshold: Judgement) -> Self {
        Self {
            break_threshold,
            counts: [0; 6],
            combo: 0,
            max_combo: 0,
            score: 0,
        }
    }

    pub fn judged(&self) -> u32 {
        self.counts.iter().sum()
    }
}

impl Default for StandardScorer {
    fn default() -> Self {
        Self::new(Judgement::Miss)
    }
}

impl Scorer for StandardScorer {
    fn on_judge(&mut self, _note: &Note, judgement: Judgement) {
        let i = judgement as usize;
        self.counts[i] += 1;
        self.score += SCORE_WEIGHTS[i];

        if judgement <= self.break_threshold {
            if self.combo > 0 {
                log::trace!("combo broken at {}", self.combo);
            }
            self.combo = 0;
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn combo(&self) -> u32 {
        self.combo
    }

    fn max_combo(&self) -> u32 {
        self.max_combo
    }

    fn accuracy(&self) -> f64 {
        let judged = self.judged();
        if judged == 0 {
            return 100.0;
        }
        let earned: f64 = self
            .counts
            .iter()
            .zip(ACCURACY_WEIGHTS)
            .map(|(&n, w)| n as f64 * w)
            .sum();
        earned / (judged as f64 * 300.0) * 100.0
    }

    fn count(&self, judgement: Judgement) -> u32 {
        self.counts[judgement as usize]
    }
}

/// Life bar that starts full and moves by a fixed delta per judgement.
#[derive(Debug, Clone)]
pub struct StandardHealth {
    value: f64,
}

impl StandardHealth {
    pub fn new() -> Self {
        Self { value: 1.0 }
    }

    pub fn delta(judgement: Judgement) -> f64 {
        match judgement {
            Judgement::Marvelous | Judgement::Perfect => 0.008,
            Judgement::Great => 0.004,
            Judgement::Good => 0.0,
            Judgement::Okay => -0.05,
            Judgement::Miss => -0.10,
        }
    }
}

impl Default for StandardHealth {
    fn default() -> Self {
        Self::new()
    }
}

impl Health for StandardHealth {
    fn on_judge(&mut self, _note: &Note, judgement: Judgement) {
        self.value = (self.value + Self::delta(judgement)).clamp(0.0, 1.0);
    }

    fn value(&self) -> f64 {
        self.value
    }
}
