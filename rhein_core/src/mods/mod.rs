//! Gameplay modifiers.
//!
//! A mod is applied once at setup and touches exactly one of the
//! [`SessionParams`] fields. Built-in mods never overlap, so list order does
//! not matter for them; custom mods must keep to the same rule.

mod speed;
mod timing;

use std::any::{Any, TypeId};
use std::fmt;

pub use speed::{
    CustomSpeedMod, X055Mod, X070Mod, X080Mod, X085Mod, X110Mod, X130Mod, X160Mod, X170Mod,
    X200Mod,
};
pub use timing::{ChillTimingMod, LenientTimingMod, StrictTimingMod, TightTimingMod};

use crate::error::{ModError, SetupError};
use crate::gameplay::timing::TimingWindows;

/// What mods are allowed to change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParams {
    pub windows: TimingWindows,
    pub speed: f64,
    /// Whether health reaching zero ends the session.
    pub fail_enabled: bool,
}

impl SessionParams {
    pub fn new(windows: TimingWindows) -> Self {
        Self {
            windows,
            speed: 1.0,
            fail_enabled: true,
        }
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self::new(TimingWindows::DEFAULT)
    }
}

pub trait Mod: Any + Send + Sync + fmt::Debug {
    /// Leaderboard id.
    fn id(&self) -> i32;

    fn name(&self) -> &'static str;

    /// Cheat mods make a play unranked.
    fn cheat(&self) -> bool {
        true
    }

    fn apply(&self, params: &mut SessionParams) -> Result<(), ModError>;
}

/// Two mods are the same kind iff they are the same concrete type.
pub fn same_kind(a: &dyn Mod, b: &dyn Mod) -> bool {
    kind_of(a) == kind_of(b)
}

fn kind_of(m: &dyn Mod) -> TypeId {
    Any::type_id(m)
}

#[derive(Debug)]
pub struct NoFailMod;

impl Mod for NoFailMod {
    fn id(&self) -> i32 {
        0
    }

    fn name(&self) -> &'static str {
        "NoFail"
    }

    fn apply(&self, params: &mut SessionParams) -> Result<(), ModError> {
        params.fail_enabled = false;
        Ok(())
    }
}

/// Ordered, duplicate-free list of mods.
#[derive(Debug, Default)]
pub struct ModList {
    mods: Vec<Box<dyn Mod>>,
}

impl ModList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false and drops `m` if a mod of the same kind is already listed.
    pub fn push(&mut self, m: Box<dyn Mod>) -> bool {
        if self.mods.iter().any(|have| same_kind(have.as_ref(), m.as_ref())) {
            log::warn!("duplicate mod {} ignored", m.name());
            return false;
        }
        self.mods.push(m);
        true
    }

    pub fn with(mut self, m: impl Mod) -> Self {
        self.push(Box::new(m));
        self
    }

    pub fn contains<M: Mod>(&self) -> bool {
        self.mods.iter().any(|m| kind_of(m.as_ref()) == TypeId::of::<M>())
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Mod> {
        self.mods.iter().map(|m| m.as_ref())
    }

    pub fn ids(&self) -> Vec<i32> {
        self.mods.iter().map(|m| m.id()).collect()
    }

    pub fn ranked(&self) -> bool {
        !self.mods.iter().any(|m| m.cheat())
    }

    /// Runs every mod once, in list order. The first failure aborts.
    pub fn apply_all(&self, params: &mut SessionParams) -> Result<(), SetupError> {
        for m in &self.mods {
            m.apply(params).map_err(|source| SetupError::Mod {
                name: m.name(),
                source,
            })?;
            log::debug!("applied mod {} (id {})", m.name(), m.id());
        }
        Ok(())
    }
}

impl FromIterator<Box<dyn Mod>> for ModList {
    fn from_iter<I: IntoIterator<Item = Box<dyn Mod>>>(iter: I) -> Self {
        let mut list = ModList::new();
        for m in iter {
            list.push(m);
        }
        list
    }
}
