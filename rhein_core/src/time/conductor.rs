use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use atomic_float::AtomicF64;
use parking_lot::Mutex;

/// Monotonic seconds. Shared between the simulation and host threads.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Externally driven time, for replays, simulations and tests.
#[derive(Debug, Clone)]
pub struct ManualTime {
    seconds: Arc<AtomicF64>,
}

impl ManualTime {
    pub fn new(start: f64) -> Self {
        Self {
            seconds: Arc::new(AtomicF64::new(start)),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.store(seconds, Ordering::Release);
    }

    pub fn advance(&self, seconds: f64) {
        self.seconds.fetch_add(seconds, Ordering::AcqRel);
    }
}

impl Default for ManualTime {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> f64 {
        self.seconds.load(Ordering::Acquire)
    }
}

/// Song-position clock.
///
/// `position = elapsed * speed + offset + sync_offset`, all in seconds.
/// Speed and offset are fixed at setup; the simulation thread starts and stops
/// the clock, the host may only move `sync_offset` through [`Conductor::sync`].
pub struct Conductor {
    source: Arc<dyn TimeSource>,
    // NaN until started / while running
    started_at: AtomicF64,
    stopped_at: AtomicF64,
    speed: AtomicF64,
    offset: AtomicF64,
    sync_offset: AtomicF64,
    sync_lock: Mutex<()>,
}

impl Conductor {
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        Self {
            source,
            started_at: AtomicF64::new(f64::NAN),
            stopped_at: AtomicF64::new(f64::NAN),
            speed: AtomicF64::new(1.0),
            offset: AtomicF64::new(0.0),
            sync_offset: AtomicF64::new(0.0),
            sync_lock: Mutex::new(()),
        }
    }

    pub fn configure(&self, speed: f64, offset: f64) {
        self.speed.store(speed, Ordering::Release);
        self.offset.store(offset, Ordering::Release);
    }

    pub fn start(&self) {
        self.stopped_at.store(f64::NAN, Ordering::Release);
        self.started_at.store(self.source.now(), Ordering::Release);
    }

    /// Freezes the clock; a second call keeps the first stop time.
    pub fn stop(&self) {
        if self.is_running() {
            self.stopped_at.store(self.source.now(), Ordering::Release);
        }
    }

    pub fn is_started(&self) -> bool {
        !self.started_at.load(Ordering::Acquire).is_nan()
    }

    pub fn is_running(&self) -> bool {
        self.is_started() && self.stopped_at.load(Ordering::Acquire).is_nan()
    }

    /// Unscaled seconds since `start`, 0 before it.
    pub fn elapsed(&self) -> f64 {
        let started = self.started_at.load(Ordering::Acquire);
        if started.is_nan() {
            return 0.0;
        }
        let stopped = self.stopped_at.load(Ordering::Acquire);
        let end = if stopped.is_nan() {
            self.source.now()
        } else {
            stopped
        };
        (end - started).max(0.0)
    }

    pub fn speed(&self) -> f64 {
        self.speed.load(Ordering::Acquire)
    }

    pub fn sync_offset(&self) -> f64 {
        self.sync_offset.load(Ordering::Acquire)
    }

    pub fn position(&self) -> f64 {
        self.elapsed() * self.speed()
            + self.offset.load(Ordering::Acquire)
            + self.sync_offset()
    }

    /// Shifts the clock so that it reads `position` right now, without
    /// restarting it. Returns the applied delta.
    pub fn sync(&self, position: f64) -> f64 {
        let _guard = self.sync_lock.lock();
        let delta = position - self.position();
        self.sync_offset.fetch_add(delta, Ordering::AcqRel);
        delta
    }
}

impl std::fmt::Debug for Conductor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conductor")
            .field("elapsed", &self.elapsed())
            .field("speed", &self.speed())
            .field("sync_offset", &self.sync_offset())
            .finish()
    }
}
