use std::collections::VecDeque;
use std::sync::Arc;

use rhein_schema::{Chart, ChartEvent, HitRecord, PlayRecord};

use crate::chart::{self, Note};
use crate::error::SetupError;
use crate::gameplay::control::SessionControl;
use crate::gameplay::judge::{JudgeMachine, JudgmentResult};
use crate::gameplay::ruleset::Ruleset;
use crate::gameplay::scoring::{Health, Scorer};
use crate::gameplay::timing::TimingWindows;
use crate::gameplay::Phase;
use crate::input::{InputHandler, NoInput};
use crate::mods::{ModList, SessionParams};
use crate::time::{Conductor, MonotonicTime, TimeSource};

/// What the host sees after every tick.
#[derive(Debug, Clone, Copy)]
pub struct Tick<'a> {
    pub position: f64,
    pub beat: f64,
    pub results: &'a [JudgmentResult],
}

type PreUpdateFn = Box<dyn FnMut(f64) + Send>;
type UpdateFn = Box<dyn FnMut(&Tick<'_>) + Send>;

/// Host callbacks run on the simulation thread. `pre_update` gets the tick's
/// position before input is read; `update` runs once judging, events and
/// telemetry for the tick are done.
#[derive(Default)]
pub struct TickHooks {
    pub pre_update: Option<PreUpdateFn>,
    pub update: Option<UpdateFn>,
}

impl std::fmt::Debug for TickHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHooks")
            .field("pre_update", &self.pre_update.is_some())
            .field("update", &self.update.is_some())
            .finish()
    }
}

/// Drives one play of one chart under a [`Ruleset`].
///
/// Lifecycle: `Created -> setup -> Configured -> ready -> Ready -> process ->
/// Running -> stop -> Stopped`. `stop` is accepted from any phase.
pub struct Gamemode<R: Ruleset> {
    ruleset: R,
    phase: Phase,
    chart: Chart,
    params: SessionParams,
    mods: ModList,
    judge: JudgeMachine,
    events: VecDeque<ChartEvent>,
    scorer: R::Scorer,
    health: R::Health,
    input: Box<dyn InputHandler>,
    hooks: TickHooks,
    conductor: Arc<Conductor>,
    control: Arc<SessionControl>,
    hits: Vec<HitRecord>,
    position: f64,
    failed: bool,
    stop_when_finished: bool,
    offset_ms: i32,
}

impl<R: Ruleset> Gamemode<R> {
    pub fn new(ruleset: R, chart: Chart) -> Self {
        Self::with_time_source(ruleset, chart, Arc::new(MonotonicTime::new()))
    }

    pub fn with_time_source(ruleset: R, chart: Chart, time: Arc<dyn TimeSource>) -> Self {
        let judge = JudgeMachine::new(ruleset.keys(), TimingWindows::DEFAULT);
        let scorer = ruleset.scorer();
        let health = ruleset.health();
        Self {
            ruleset,
            phase: Phase::Created,
            chart,
            params: SessionParams::default(),
            mods: ModList::new(),
            judge,
            events: VecDeque::new(),
            scorer,
            health,
            input: Box::new(NoInput),
            hooks: TickHooks::default(),
            conductor: Arc::new(Conductor::new(time)),
            control: Arc::new(SessionControl::new()),
            hits: Vec::new(),
            position: 0.0,
            failed: false,
            stop_when_finished: true,
            offset_ms: 0,
        }
    }

    pub fn set_input(&mut self, input: Box<dyn InputHandler>) {
        self.input = input;
    }

    /// Defaults to true: the session stops by itself once every note and
    /// event has been consumed.
    pub fn set_stop_when_finished(&mut self, stop: bool) {
        self.stop_when_finished = stop;
    }

    pub fn set_hooks(&mut self, hooks: TickHooks) {
        self.hooks = hooks;
    }

    /// Host offset in milliseconds, added to the chart's own offset. Read by
    /// `setup`.
    pub fn set_offset_ms(&mut self, offset_ms: i32) {
        self.offset_ms = offset_ms;
    }

    /// Applies mods, validates the chart and moves its notes into the lanes.
    ///
    /// Nothing is changed when this fails.
    pub fn setup(&mut self, windows: TimingWindows, mods: ModList) -> Result<(), SetupError> {
        if self.phase != Phase::Created {
            return Err(SetupError::WrongPhase(self.phase));
        }

        let mut params = SessionParams::new(windows);
        mods.apply_all(&mut params)?;
        chart::validate(&self.chart, self.ruleset.keys())?;

        let notes = std::mem::take(&mut self.chart.notes);
        let mut judge = JudgeMachine::new(self.ruleset.keys(), params.windows);
        judge.load(notes.iter().map(Note::from));

        let mut events = std::mem::take(&mut self.chart.events);
        events.sort_by(|a, b| a.beat.total_cmp(&b.beat));

        let offset_ms = f64::from(self.chart.offset_ms) + f64::from(self.offset_ms);
        self.conductor.configure(params.speed, offset_ms / 1000.0);
        self.ruleset.setup(&params);
        self.scorer = self.ruleset.scorer();
        self.health = self.ruleset.health();
        self.judge = judge;
        self.events = events.into();
        self.params = params;
        self.mods = mods;
        self.phase = Phase::Configured;

        log::info!(
            "{} configured: {} notes, bpm {}, speed {}, mods {:?}",
            self.ruleset.name(),
            self.judge.remaining(),
            self.chart.bpm,
            self.params.speed,
            self.mods.ids()
        );
        Ok(())
    }

    /// Starts the clock. A session cancelled before this point goes straight
    /// to `Stopped`.
    pub fn ready(&mut self) -> Result<(), SetupError> {
        if self.phase != Phase::Configured {
            return Err(SetupError::WrongPhase(self.phase));
        }
        if !self.control.begin() {
            log::info!("{} cancelled before start", self.ruleset.name());
            self.stop();
            return Ok(());
        }
        self.conductor.start();
        self.ruleset.start();
        self.phase = Phase::Ready;
        log::info!("{} started", self.ruleset.name());
        Ok(())
    }

    /// One simulation tick. Returns the judgements it produced, in lane order.
    ///
    /// A no-op outside `Ready` / `Running`. A host cancel seen here stops the
    /// session before anything is judged.
    pub fn process(&mut self) -> Vec<JudgmentResult> {
        if !matches!(self.phase, Phase::Ready | Phase::Running) {
            return Vec::new();
        }
        if !self.control.is_running() {
            self.stop();
            return Vec::new();
        }
        self.phase = Phase::Running;

        let position = self
            .control
            .take_temp_sync()
            .unwrap_or_else(|| self.conductor.position());
        self.position = position;
        log::trace!("tick at {position:.4}s");

        if let Some(f) = self.hooks.pre_update.as_mut() {
            f(position);
        }
        self.input.update();
        let bpm = self.chart.bpm;
        let ruleset = &self.ruleset;
        let input = &self.input;
        let results = self.judge.process_tick(position, bpm, |lane| {
            ruleset.binding(lane).is_some_and(|key| input.key_down(key))
        });

        for r in &results {
            self.scorer.on_judge(&r.note, r.judgement);
            self.health.on_judge(&r.note, r.judgement);
            log::debug!(
                "lane {} beat {}: {} ({:?} ms)",
                r.lane,
                r.note.beat,
                r.judgement,
                r.deviance_ms
            );
            self.hits.push(HitRecord {
                lane: r.lane as u32,
                beat: r.note.beat,
                judgement: r.judgement,
                deviance_ms: r.note.deviance().map(|s| s * 1000.0),
            });
        }

        let beat = self.beat();
        while self.events.front().is_some_and(|e| e.beat <= beat) {
            if let Some(event) = self.events.pop_front() {
                self.ruleset.on_event(&event);
            }
        }

        self.ruleset.update(position, &results);
        self.control.publish(
            position,
            beat,
            self.health.value(),
            self.scorer.combo(),
            self.scorer.score(),
        );
        if let Some(f) = self.hooks.update.as_mut() {
            f(&Tick {
                position,
                beat,
                results: &results,
            });
        }

        if self.params.fail_enabled && self.health.is_depleted() {
            log::info!("{} failed at {position:.3}s", self.ruleset.name());
            self.failed = true;
            self.stop();
        } else if self.ruleset.should_stop() || (self.stop_when_finished && self.is_finished()) {
            self.stop();
        }

        results
    }

    /// Runs `ready` and then ticks until stopped.
    pub fn run(&mut self) -> Result<(), SetupError> {
        self.ready()?;
        while self.phase != Phase::Stopped {
            self.process();
            std::thread::yield_now();
        }
        Ok(())
    }

    /// Moves the clock so that it reads `position` now. Returns the applied
    /// delta, or `None` before `setup` and after `stop`.
    ///
    /// Between `setup` and `ready` the clock reads its offset, so the delta
    /// carries over to the start.
    pub fn sync(&self, position: f64) -> Option<f64> {
        if matches!(self.phase, Phase::Created | Phase::Stopped) {
            log::warn!("sync to {position} ignored in phase {:?}", self.phase);
            return None;
        }
        Some(self.conductor.sync(position))
    }

    /// The next tick uses `position` instead of the clock.
    pub fn temp_sync(&self, position: f64) {
        self.control.post_temp_sync(position);
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.control.finish();
        self.conductor.stop();
        self.phase = Phase::Stopped;
        log::info!(
            "{} stopped: score {}, max combo {}, accuracy {:.2}%",
            self.ruleset.name(),
            self.scorer.score(),
            self.scorer.max_combo(),
            self.scorer.accuracy()
        );
    }

    /// Every note judged and every event dispatched.
    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Created && self.judge.is_empty() && self.events.is_empty()
    }

    pub fn record(&self) -> PlayRecord {
        PlayRecord {
            chart_type: self.chart.kind,
            bpm: self.chart.bpm,
            mods: self.mods.ids(),
            ranked: self.mods.ranked(),
            default_windows: self.params.windows.is_default(),
            hits: self.hits.clone(),
            score: self.scorer.score(),
            max_combo: self.scorer.max_combo(),
            accuracy: self.scorer.accuracy(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Position used by the last tick, in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn beat(&self) -> f64 {
        self.position * self.chart.bpm / 60.0
    }

    pub fn bpm(&self) -> f64 {
        self.chart.bpm
    }

    pub fn speed(&self) -> f64 {
        self.params.speed
    }

    pub fn health(&self) -> f64 {
        self.health.value()
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn windows(&self) -> &TimingWindows {
        &self.params.windows
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn mods(&self) -> &ModList {
        &self.mods
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn judge(&self) -> &JudgeMachine {
        &self.judge
    }

    pub fn ruleset(&self) -> &R {
        &self.ruleset
    }

    pub fn scorer(&self) -> &R::Scorer {
        &self.scorer
    }

    pub fn conductor(&self) -> &Arc<Conductor> {
        &self.conductor
    }

    pub fn control(&self) -> &Arc<SessionControl> {
        &self.control
    }
}
