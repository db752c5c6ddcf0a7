use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::SessionOptions;
use crate::error::ModError;
use crate::gameplay::ruleset::Mania;
use crate::gameplay::timing::{TimingWindows, WindowsPreset};
use crate::input::events::KeyCode;
use crate::mods::{
    ChillTimingMod, CustomSpeedMod, LenientTimingMod, Mod, ModList, NoFailMod, StrictTimingMod,
    TightTimingMod, X055Mod, X070Mod, X080Mod, X085Mod, X110Mod, X130Mod, X160Mod, X170Mod,
    X200Mod,
};

/// Everything a host can choose before a session starts.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub windows: WindowsConfig,
    pub mods: Vec<ModSpec>,
    /// One key per lane. Empty means the four-key default.
    pub bindings: Vec<KeyCode>,
    /// Added to the chart offset, in milliseconds.
    pub offset_ms: i32,
    pub stop_when_finished: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            windows: WindowsConfig::default(),
            mods: Vec::new(),
            bindings: Vec::new(),
            offset_ms: 0,
            stop_when_finished: true,
        }
    }
}

impl SessionConfig {
    pub fn timing_windows(&self) -> TimingWindows {
        match &self.windows {
            WindowsConfig::Preset(p) => p.windows(),
            WindowsConfig::Custom(w) => *w,
        }
    }

    pub fn mod_list(&self) -> ModList {
        self.mods.iter().map(ModSpec::build).collect()
    }

    /// No hooks; a host that wants them sets them on the result.
    pub fn options(&self) -> SessionOptions {
        SessionOptions {
            offset_ms: self.offset_ms,
            stop_when_finished: self.stop_when_finished,
            ..Default::default()
        }
    }

    pub fn ruleset(&self) -> Mania {
        if self.bindings.is_empty() {
            Mania::four_key()
        } else {
            Mania::new(self.bindings.clone())
        }
    }
}

/// Either a preset name or six explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowsConfig {
    Preset(WindowsPreset),
    Custom(TimingWindows),
}

impl Default for WindowsConfig {
    fn default() -> Self {
        WindowsConfig::Preset(WindowsPreset::Default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModSpec {
    NoFail,
    Chill,
    Lenient,
    Tight,
    Strict,
    Speed { rate: f64 },
}

impl ModSpec {
    /// Catalogue rates map to their own mod, anything else is a custom speed.
    pub fn build(&self) -> Box<dyn Mod> {
        match *self {
            ModSpec::NoFail => Box::new(NoFailMod),
            ModSpec::Chill => Box::new(ChillTimingMod),
            ModSpec::Lenient => Box::new(LenientTimingMod),
            ModSpec::Tight => Box::new(TightTimingMod),
            ModSpec::Strict => Box::new(StrictTimingMod),
            ModSpec::Speed { rate } => speed_mod(rate),
        }
    }
}

fn speed_mod(rate: f64) -> Box<dyn Mod> {
    const CATALOGUE: [f64; 9] = [
        X055Mod::SPEED,
        X070Mod::SPEED,
        X080Mod::SPEED,
        X085Mod::SPEED,
        X110Mod::SPEED,
        X130Mod::SPEED,
        X160Mod::SPEED,
        X170Mod::SPEED,
        X200Mod::SPEED,
    ];
    match CATALOGUE.iter().position(|s| (s - rate).abs() < 1e-9) {
        Some(0) => Box::new(X055Mod),
        Some(1) => Box::new(X070Mod),
        Some(2) => Box::new(X080Mod),
        Some(3) => Box::new(X085Mod),
        Some(4) => Box::new(X110Mod),
        Some(5) => Box::new(X130Mod),
        Some(6) => Box::new(X160Mod),
        Some(7) => Box::new(X170Mod),
        Some(8) => Box::new(X200Mod),
        _ => Box::new(CustomSpeedMod::new(rate)),
    }
}

/// Accepts `nofail`, `chill`, `lenient`, `tight`, `strict` and `x<rate>`
/// (`x1.3`, `x0.55`), case-insensitively.
impl FromStr for ModSpec {
    type Err = ModError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let spec = match lower.as_str() {
            "nofail" | "nf" => ModSpec::NoFail,
            "chill" => ModSpec::Chill,
            "lenient" => ModSpec::Lenient,
            "tight" => ModSpec::Tight,
            "strict" => ModSpec::Strict,
            other => {
                let rate = other
                    .strip_prefix('x')
                    .and_then(|r| r.parse::<f64>().ok())
                    .ok_or_else(|| ModError::Unknown(s.to_string()))?;
                ModSpec::Speed { rate }
            }
        };
        Ok(spec)
    }
}
