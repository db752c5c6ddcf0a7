use rhein_schema::Judgement;
use serde::{Deserialize, Serialize};

use crate::error::WindowsError;

pub const DEFAULT_MARVELOUS: i32 = 21;
pub const DEFAULT_PERFECT: i32 = 42;
pub const DEFAULT_GREAT: i32 = 83;
pub const DEFAULT_GOOD: i32 = 104;
pub const DEFAULT_OKAY: i32 = 125;
pub const DEFAULT_MISS: i32 = 166;

/// Judgement thresholds in milliseconds (half-width, applied to |deviation|).
///
/// Immutable once built; `Copy` so every thread can hold its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindows", into = "RawWindows")]
pub struct TimingWindows {
    marvelous: i32,
    perfect: i32,
    great: i32,
    good: i32,
    okay: i32,
    miss: i32,
    is_default: bool,
}

impl TimingWindows {
    pub const DEFAULT: TimingWindows = TimingWindows::offset_from_default([0, 0, 0, 0, 0, 0]);
    pub const CHILL: TimingWindows = TimingWindows::offset_from_default([1, 2, 3, 4, 5, 6]);
    pub const LENIENT: TimingWindows = TimingWindows::offset_from_default([2, 4, 6, 8, 10, 12]);
    pub const TIGHT: TimingWindows = TimingWindows::offset_from_default([-1, -2, -3, -4, -5, -6]);
    pub const STRICT: TimingWindows =
        TimingWindows::offset_from_default([-2, -4, -6, -8, -10, -12]);

    pub fn new(
        marvelous: i32,
        perfect: i32,
        great: i32,
        good: i32,
        okay: i32,
        miss: i32,
    ) -> Result<Self, WindowsError> {
        let bounds = [marvelous, perfect, great, good, okay, miss];
        if marvelous < 0 {
            return Err(WindowsError::Negative(marvelous));
        }
        if let Some(i) = bounds.windows(2).position(|w| w[0] > w[1]) {
            return Err(WindowsError::Decreasing {
                tier: Judgement::ALL[i + 1],
                bound: bounds[i + 1],
                previous: bounds[i],
            });
        }
        Ok(Self::from_bounds(bounds))
    }

    const fn offset_from_default(d: [i32; 6]) -> Self {
        Self::from_bounds([
            DEFAULT_MARVELOUS + d[0],
            DEFAULT_PERFECT + d[1],
            DEFAULT_GREAT + d[2],
            DEFAULT_GOOD + d[3],
            DEFAULT_OKAY + d[4],
            DEFAULT_MISS + d[5],
        ])
    }

    const fn from_bounds(b: [i32; 6]) -> Self {
        Self {
            marvelous: b[0],
            perfect: b[1],
            great: b[2],
            good: b[3],
            okay: b[4],
            miss: b[5],
            is_default: b[0] == DEFAULT_MARVELOUS
                && b[1] == DEFAULT_PERFECT
                && b[2] == DEFAULT_GREAT
                && b[3] == DEFAULT_GOOD
                && b[4] == DEFAULT_OKAY
                && b[5] == DEFAULT_MISS,
        }
    }

    pub fn marvelous(&self) -> i32 {
        self.marvelous
    }

    pub fn perfect(&self) -> i32 {
        self.perfect
    }

    pub fn great(&self) -> i32 {
        self.great
    }

    pub fn good(&self) -> i32 {
        self.good
    }

    pub fn okay(&self) -> i32 {
        self.okay
    }

    pub fn miss(&self) -> i32 {
        self.miss
    }

    /// Only reported to rankings; judging ignores it.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn bound(&self, judgement: Judgement) -> i32 {
        match judgement {
            Judgement::Marvelous => self.marvelous,
            Judgement::Perfect => self.perfect,
            Judgement::Great => self.great,
            Judgement::Good => self.good,
            Judgement::Okay => self.okay,
            Judgement::Miss => self.miss,
        }
    }

    pub fn classify(&self, deviation_ms: i32) -> Judgement {
        let d = deviation_ms.unsigned_abs();
        Judgement::ALL[..5]
            .iter()
            .copied()
            .find(|j| d <= self.bound(*j) as u32)
            .unwrap_or(Judgement::Miss)
    }

    pub fn hittable(&self, deviation_ms: i32) -> bool {
        deviation_ms.unsigned_abs() <= self.miss as u32
    }

    /// Late side only: an early press never expires a note.
    pub fn too_late(&self, deviation_ms: i32) -> bool {
        deviation_ms > self.miss
    }
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowsPreset {
    #[default]
    Default,
    Chill,
    Lenient,
    Tight,
    Strict,
}

impl WindowsPreset {
    pub fn windows(self) -> TimingWindows {
        match self {
            WindowsPreset::Default => TimingWindows::DEFAULT,
            WindowsPreset::Chill => TimingWindows::CHILL,
            WindowsPreset::Lenient => TimingWindows::LENIENT,
            WindowsPreset::Tight => TimingWindows::TIGHT,
            WindowsPreset::Strict => TimingWindows::STRICT,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawWindows {
    marvelous: i32,
    perfect: i32,
    great: i32,
    good: i32,
    okay: i32,
    miss: i32,
}

impl TryFrom<RawWindows> for TimingWindows {
    type Error = WindowsError;

    fn try_from(r: RawWindows) -> Result<Self, Self::Error> {
        TimingWindows::new(r.marvelous, r.perfect, r.great, r.good, r.okay, r.miss)
    }
}

impl From<TimingWindows> for RawWindows {
    fn from(w: TimingWindows) -> Self {
        Self {
            marvelous: w.marvelous,
            perfect: w.perfect,
            great: w.great,
            good: w.good,
            okay: w.okay,
            miss: w.miss,
        }
    }
}
