pub mod control;
pub mod gamemode;
pub mod judge;
pub mod lane;
pub mod ruleset;
pub mod scoring;
pub mod timing;

pub use control::SessionControl;
pub use gamemode::{Gamemode, Tick, TickHooks};
pub use judge::{JudgeMachine, JudgmentResult};
pub use lane::Lane;
pub use ruleset::{Mania, Ruleset};
pub use scoring::{Health, Scorer, StandardHealth, StandardScorer};
pub use timing::{TimingWindows, WindowsPreset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Created,
    Configured,
    Ready,
    Running,
    Stopped,
}
