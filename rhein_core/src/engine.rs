use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use rhein_schema::{Chart, PlayRecord};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::gameplay::control::SessionControl;
use crate::gameplay::ruleset::Ruleset;
use crate::gameplay::timing::TimingWindows;
use crate::gameplay::{Gamemode, TickHooks};
use crate::input::{InputQueue, InputSender};
use crate::mods::ModList;
use crate::time::{Conductor, MonotonicTime, TimeSource};

/// Per-session settings that are not mods.
#[derive(Debug)]
pub struct SessionOptions {
    /// Host or user offset in milliseconds, on top of the chart offset.
    pub offset_ms: i32,
    pub stop_when_finished: bool,
    pub hooks: TickHooks,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            offset_ms: 0,
            stop_when_finished: true,
            hooks: TickHooks::default(),
        }
    }
}

struct Session {
    control: Arc<SessionControl>,
    conductor: Arc<Conductor>,
    input: InputSender,
    thread: JoinHandle<PlayRecord>,
}

/// Owns at most one live session and the thread that simulates it.
///
/// Every method takes `&self`; an `Engine` can sit in an `Arc` shared by the
/// host's input, render and audio threads.
pub struct Engine {
    time: Arc<dyn TimeSource>,
    slot: Mutex<Option<Session>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(MonotonicTime::new()))
    }

    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self {
            time,
            slot: Mutex::new(None),
        }
    }

    /// Starts a `Mania` session as described by `config`.
    pub fn run(&self, chart: Chart, config: &SessionConfig) -> Result<InputSender, SessionError> {
        self.run_with(
            config.ruleset(),
            chart,
            config.timing_windows(),
            config.mod_list(),
            config.options(),
        )
    }

    /// Sets the session up on the calling thread, so setup errors come back
    /// here and nothing is spawned. Returns the sender for key events.
    pub fn run_with<R: Ruleset>(
        &self,
        ruleset: R,
        chart: Chart,
        windows: TimingWindows,
        mods: ModList,
        options: SessionOptions,
    ) -> Result<InputSender, SessionError> {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|s| !s.thread.is_finished()) {
            return Err(SessionError::AlreadyRunning);
        }
        if let Some(old) = slot.take() {
            // finished on its own and never stopped; its record is dropped
            let _ = old.thread.join();
        }

        let mut gamemode = Gamemode::with_time_source(ruleset, chart, self.time.clone());
        let queue = InputQueue::new();
        let input = queue.sender();
        gamemode.set_input(Box::new(queue));
        gamemode.set_offset_ms(options.offset_ms);
        gamemode.set_stop_when_finished(options.stop_when_finished);
        gamemode.set_hooks(options.hooks);
        gamemode.setup(windows, mods)?;

        let control = gamemode.control().clone();
        let conductor = gamemode.conductor().clone();
        let thread = thread::Builder::new()
            .name("rhein-sim".into())
            .spawn(move || {
                if let Err(e) = gamemode.run() {
                    log::error!("session aborted: {e}");
                }
                gamemode.record()
            })?;

        *slot = Some(Session {
            control,
            conductor,
            input: input.clone(),
            thread,
        });
        Ok(input)
    }

    /// True while the simulation thread is alive and not cancelled.
    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .is_some_and(|s| !s.control.is_cancelled() && !s.thread.is_finished())
    }

    /// Cancels the session, waits for the simulation thread to exit and
    /// returns what was played. `None` if there was no session, which also
    /// makes a second call a no-op.
    pub fn stop(&self) -> Option<PlayRecord> {
        let session = self.slot.lock().take()?;
        session.control.cancel();
        session.conductor.stop();
        match session.thread.join() {
            Ok(record) => Some(record),
            Err(_) => {
                log::error!("simulation thread panicked");
                None
            }
        }
    }

    /// See [`Gamemode::sync`]. Accepted from `run` until the session stops,
    /// including before the simulation thread has started the clock.
    pub fn sync(&self, position: f64) -> Option<f64> {
        let slot = self.slot.lock();
        let session = slot.as_ref()?;
        let stopped = session.conductor.is_started() && !session.conductor.is_running();
        if stopped || session.control.is_cancelled() || session.thread.is_finished() {
            return None;
        }
        Some(session.conductor.sync(position))
    }

    /// See [`Gamemode::temp_sync`]. Returns false without a session.
    pub fn temp_sync(&self, position: f64) -> bool {
        match self.slot.lock().as_ref() {
            Some(s) => {
                s.control.post_temp_sync(position);
                true
            }
            None => false,
        }
    }

    pub fn input(&self) -> Option<InputSender> {
        self.slot.lock().as_ref().map(|s| s.input.clone())
    }

    pub fn position(&self) -> Option<f64> {
        self.read(|c| c.position())
    }

    pub fn beat(&self) -> Option<f64> {
        self.read(|c| c.beat())
    }

    pub fn health(&self) -> Option<f64> {
        self.read(|c| c.health())
    }

    pub fn combo(&self) -> Option<u32> {
        self.read(|c| c.combo())
    }

    pub fn score(&self) -> Option<u64> {
        self.read(|c| c.score())
    }

    fn read<T>(&self, f: impl FnOnce(&SessionControl) -> T) -> Option<T> {
        self.slot.lock().as_ref().map(|s| f(&s.control))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(session) = self.slot.get_mut().take() {
            session.control.cancel();
            let _ = session.thread.join();
        }
    }
}
