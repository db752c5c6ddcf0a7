use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart type id used by the mania rulesets.
pub const MANIA_CHART_TYPE: i32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chart {
    #[serde(rename = "type", default)]
    pub kind: i32,
    #[serde(default)]
    pub name: Option<String>,
    pub bpm: f64,
    /// Offset in milliseconds applied to the song position.
    #[serde(default)]
    pub offset_ms: i32,
    pub notes: Vec<ChartNote>,
    #[serde(default)]
    pub events: Vec<ChartEvent>,
}

impl Chart {
    pub fn new(bpm: f64) -> Self {
        Self {
            kind: MANIA_CHART_TYPE,
            name: None,
            bpm,
            offset_ms: 0,
            notes: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn lane_count(&self) -> usize {
        self.notes
            .iter()
            .map(|n| n.lane as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Beat of the last note end (hold tails included).
    pub fn last_beat(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.beat + n.length)
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartNote {
    #[serde(rename = "type")]
    pub lane: u32,
    pub beat: f64,
    /// Hold length in beats, 0 for taps.
    #[serde(default)]
    pub length: f64,
}

impl ChartNote {
    pub fn tap(lane: u32, beat: f64) -> Self {
        Self {
            lane,
            beat,
            length: 0.0,
        }
    }

    pub fn hold(lane: u32, beat: f64, length: f64) -> Self {
        Self { lane, beat, length }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartEvent {
    #[serde(rename = "type")]
    pub kind: i32,
    pub beat: f64,
    pub value: EventValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventValue {
    Number(f64),
    Text(String),
}

impl EventValue {
    /// Numeric payloads win over text, so "1.5" becomes `Number(1.5)`.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => EventValue::Number(n),
            _ => EventValue::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            EventValue::Number(n) => Some(*n),
            EventValue::Text(_) => None,
        }
    }
}

impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventValue::Number(n) => write!(f, "{n}"),
            EventValue::Text(s) => f.write_str(s),
        }
    }
}

/// Accuracy tiers, worst first so that `Ord` means "better than".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgement {
    Miss,
    Okay,
    Good,
    Great,
    Perfect,
    Marvelous,
}

impl Judgement {
    pub const ALL: [Judgement; 6] = [
        Judgement::Marvelous,
        Judgement::Perfect,
        Judgement::Great,
        Judgement::Good,
        Judgement::Okay,
        Judgement::Miss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Judgement::Marvelous => "MARV",
            Judgement::Perfect => "PERF",
            Judgement::Great => "GREAT",
            Judgement::Good => "GOOD",
            Judgement::Okay => "OKAY",
            Judgement::Miss => "MISS",
        }
    }
}

impl fmt::Display for Judgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub lane: u32,
    pub beat: f64,
    pub judgement: Judgement,
    /// Signed milliseconds, absent for notes that scrolled past the miss window.
    pub deviance_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub chart_type: i32,
    pub bpm: f64,
    pub mods: Vec<i32>,
    pub ranked: bool,
    pub default_windows: bool,
    pub hits: Vec<HitRecord>,
    pub score: u64,
    pub max_combo: u32,
    pub accuracy: f64,
}

impl PlayRecord {
    pub fn count(&self, judgement: Judgement) -> usize {
        self.hits.iter().filter(|h| h.judgement == judgement).count()
    }
}
