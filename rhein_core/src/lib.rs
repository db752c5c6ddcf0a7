pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod mods;
pub mod time;

pub use config::{ModSpec, SessionConfig, WindowsConfig};
pub use engine::{Engine, SessionOptions};
pub use error::{ModError, SessionError, SetupError, WindowsError};
pub use gameplay::{Gamemode, Mania, Phase, Ruleset, TickHooks, TimingWindows, WindowsPreset};
