use rhein_schema::{ChartEvent, Judgement};

use crate::gameplay::judge::JudgmentResult;
use crate::gameplay::scoring::{Health, Scorer, StandardHealth, StandardScorer};
use crate::input::events::KeyCode;
use crate::mods::SessionParams;

/// What a game variant plugs into [`Gamemode`](crate::gameplay::Gamemode).
///
/// Every hook except the first four has a no-op default, so a minimal ruleset
/// only names itself, its key count, its bindings and its scoring.
pub trait Ruleset: Send + 'static {
    type Scorer: Scorer;
    type Health: Health;

    fn name(&self) -> &str;

    fn keys(&self) -> usize;

    /// Key bound to `lane`; an unbound lane is never pressed.
    fn binding(&self, lane: usize) -> Option<KeyCode>;

    fn scorer(&self) -> Self::Scorer;

    fn health(&self) -> Self::Health;

    /// Judgements at or below this break the combo.
    fn break_threshold(&self) -> Judgement {
        Judgement::Miss
    }

    /// Called once after mods were applied.
    fn setup(&mut self, _params: &SessionParams) {}

    /// Called once when the clock starts.
    fn start(&mut self) {}

    /// Called at the end of every tick with that tick's judgements.
    fn update(&mut self, _position: f64, _results: &[JudgmentResult]) {}

    fn on_event(&mut self, _event: &ChartEvent) {}

    /// Ends the session at the end of the current tick.
    fn should_stop(&self) -> bool {
        false
    }
}

/// Vertical-scroll keyboard mode with one binding per lane.
#[derive(Debug, Clone, PartialEq)]
pub struct Mania {
    name: String,
    bindings: Vec<KeyCode>,
}

impl Mania {
    pub fn new(bindings: Vec<KeyCode>) -> Self {
        Self {
            name: format!("Mania{}k", bindings.len()),
            bindings,
        }
    }

    /// D F J K.
    pub fn four_key() -> Self {
        Self::new(vec![KeyCode::D, KeyCode::F, KeyCode::J, KeyCode::K])
    }

    /// S D F Space J K L.
    pub fn seven_key() -> Self {
        Self::new(vec![
            KeyCode::S,
            KeyCode::D,
            KeyCode::F,
            KeyCode::SPACE,
            KeyCode::J,
            KeyCode::K,
            KeyCode::L,
        ])
    }

    pub fn bindings(&self) -> &[KeyCode] {
        &self.bindings
    }
}

impl Default for Mania {
    fn default() -> Self {
        Self::four_key()
    }
}

impl Ruleset for Mania {
    type Scorer = StandardScorer;
    type Health = StandardHealth;

    fn name(&self) -> &str {
        &self.name
    }

    fn keys(&self) -> usize {
        self.bindings.len()
    }

    fn binding(&self, lane: usize) -> Option<KeyCode> {
        self.bindings.get(lane).copied()
    }

    fn scorer(&self) -> StandardScorer {
        StandardScorer::new(self.break_threshold())
    }

    fn health(&self) -> StandardHealth {
        StandardHealth::new()
    }

    fn on_event(&mut self, event: &ChartEvent) {
        log::debug!("{}: event {} at beat {} ({})", self.name, event.kind, event.beat, event.value);
    }
}
