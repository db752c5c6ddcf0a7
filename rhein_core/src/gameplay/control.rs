use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use atomic_float::AtomicF64;

/// State shared between the simulation thread and the host.
///
/// The host only cancels and posts temp-sync positions. Telemetry is written by
/// the simulation thread alone, once per tick.
#[derive(Debug)]
pub struct SessionControl {
    running: AtomicBool,
    cancelled: AtomicBool,
    // NaN = empty
    temp_sync: AtomicF64,
    position: AtomicF64,
    beat: AtomicF64,
    health: AtomicF64,
    combo: AtomicU32,
    score: AtomicU64,
}

impl SessionControl {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            temp_sync: AtomicF64::new(f64::NAN),
            position: AtomicF64::new(0.0),
            beat: AtomicF64::new(0.0),
            health: AtomicF64::new(1.0),
            combo: AtomicU32::new(0),
            score: AtomicU64::new(0),
        }
    }

    /// Marks the session running unless it was cancelled first.
    pub fn begin(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return false;
        }
        self.running.store(true, Ordering::Release);
        true
    }

    /// Host side stop. Takes effect at the next tick boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.running.store(false, Ordering::Release);
    }

    pub fn finish(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Overrides the position used by the next tick. A later post replaces an
    /// unconsumed one.
    pub fn post_temp_sync(&self, position: f64) {
        self.temp_sync.store(position, Ordering::Release);
    }

    pub fn take_temp_sync(&self) -> Option<f64> {
        let pos = self.temp_sync.swap(f64::NAN, Ordering::AcqRel);
        (!pos.is_nan()).then_some(pos)
    }

    pub fn publish(&self, position: f64, beat: f64, health: f64, combo: u32, score: u64) {
        self.position.store(position, Ordering::Release);
        self.beat.store(beat, Ordering::Release);
        self.health.store(health, Ordering::Release);
        self.combo.store(combo, Ordering::Release);
        self.score.store(score, Ordering::Release);
    }

    pub fn position(&self) -> f64 {
        self.position.load(Ordering::Acquire)
    }

    pub fn beat(&self) -> f64 {
        self.beat.load(Ordering::Acquire)
    }

    pub fn health(&self) -> f64 {
        self.health.load(Ordering::Acquire)
    }

    pub fn combo(&self) -> u32 {
        self.combo.load(Ordering::Acquire)
    }

    pub fn score(&self) -> u64 {
        self.score.load(Ordering::Acquire)
    }
}

impl Default for SessionControl {
    fn default() -> Self {
        Self::new()
    }
}
