use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Context;
use rhein_core::gameplay::{Gamemode, JudgmentResult, Mania, Phase, Ruleset};
use rhein_core::input::events::KeyCode;
use rhein_core::input::{InputQueue, InputSender};
use rhein_core::time::ManualTime;
use rhein_core::SessionConfig;
use rhein_schema::{Chart, Judgement, PlayRecord};

/// Simulated clock step.
const TICK: f64 = 0.001;

/// Extra song time after the last note, covers the miss window of any
/// preset.
const TAIL: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Judged {
    pub position: f64,
    pub lane: usize,
    pub judgement: Judgement,
    pub deviance_ms: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub ruleset: String,
    pub judged: Vec<Judged>,
    pub record: PlayRecord,
    pub failed: bool,
    pub health: f64,
}

/// Plays `chart` by pressing every note's key on a manual clock, so the
/// output is the same on every run.
pub fn run_simulation(chart: Chart, config: &SessionConfig, jitter_ms: u32) -> anyhow::Result<Outcome> {
    let ruleset = ruleset_for(config, &chart);
    let mut plan = press_plan(&chart, ruleset.keys(), jitter_ms);
    let last_time = chart.last_beat() * 60.0 / chart.bpm;
    let offset = (f64::from(chart.offset_ms) + f64::from(config.offset_ms)) / 1000.0;

    let time = ManualTime::new(0.0);
    let mut gm = Gamemode::with_time_source(ruleset, chart, Arc::new(time.clone()));
    let queue = InputQueue::new();
    let input = queue.sender();
    gm.set_input(Box::new(queue));
    gm.set_offset_ms(config.offset_ms);
    gm.setup(config.timing_windows(), config.mod_list())
        .context("session setup failed")?;
    gm.ready().context("session start failed")?;

    let bindings: Vec<Option<KeyCode>> = (0..gm.ruleset().keys())
        .map(|lane| gm.ruleset().binding(lane))
        .collect();
    let max_ticks = ((last_time + TAIL - offset).max(0.0) / gm.speed() / TICK).ceil() as u64 + 1;

    let mut judged = Vec::new();
    let mut ticks = 0u64;
    while gm.phase() != Phase::Stopped && ticks < max_ticks {
        time.advance(TICK);
        ticks += 1;

        let position = gm.conductor().position();
        for (lane, queue) in plan.iter_mut().enumerate() {
            if queue.front().is_some_and(|&at| at <= position) {
                queue.pop_front();
                if let Some(key) = bindings[lane] {
                    tap(&input, key, position);
                }
            }
        }

        let results = gm.process();
        judged.extend(results.iter().map(|r| to_judged(gm.position(), r)));
    }
    gm.stop();

    Ok(Outcome {
        ruleset: gm.ruleset().name().to_string(),
        judged,
        record: gm.record(),
        failed: gm.is_failed(),
        health: gm.health(),
    })
}

pub fn print_report(outcome: &Outcome) {
    println!("Simulation ({})", outcome.ruleset);
    println!("Position(s) | Lane | Judgement | Deviance");
    println!("------------|------|-----------|---------");
    for j in &outcome.judged {
        let dev = match j.deviance_ms {
            Some(ms) => format!("{ms:+} ms"),
            None => "-".to_string(),
        };
        println!(
            "{:>11.3} | {:>4} | {:<9} | {}",
            j.position,
            j.lane,
            j.judgement.label(),
            dev
        );
    }

    let record = &outcome.record;
    println!();
    for judgement in Judgement::ALL {
        println!("{:<6} {}", judgement.label(), record.count(judgement));
    }
    println!("score     {}", record.score);
    println!("max combo {}", record.max_combo);
    println!("accuracy  {:.2}%", record.accuracy);
    println!("health    {:.3}", outcome.health);
    println!("mods      {:?}", record.mods);
    println!("ranked    {}", record.ranked);
    if outcome.failed {
        println!("FAILED");
    }
}

fn ruleset_for(config: &SessionConfig, chart: &Chart) -> Mania {
    if !config.bindings.is_empty() {
        return config.ruleset();
    }
    match chart.lane_count() {
        0..=4 => Mania::four_key(),
        5..=7 => Mania::seven_key(),
        // no keyboard layout, any distinct codes will do for autoplay
        n => Mania::new((0..n as u32).map(|i| KeyCode(0x100 + i)).collect()),
    }
}

/// Per lane, the song positions at which autoplay presses.
fn press_plan(chart: &Chart, keys: usize, jitter_ms: u32) -> Vec<VecDeque<f64>> {
    let mut plan = vec![VecDeque::new(); keys];
    for (i, note) in chart.notes.iter().enumerate() {
        if let Some(lane) = plan.get_mut(note.lane as usize) {
            lane.push_back(note.beat * 60.0 / chart.bpm + jitter(i, jitter_ms));
        }
    }
    plan
}

/// Deterministic spread in `[-jitter_ms, +jitter_ms]` milliseconds.
fn jitter(i: usize, jitter_ms: u32) -> f64 {
    const PATTERN: [f64; 5] = [0.0, 1.0, -1.0, 0.5, -0.5];
    PATTERN[i % PATTERN.len()] * f64::from(jitter_ms) / 1000.0
}

fn tap(input: &InputSender, key: KeyCode, at: f64) {
    if !(input.press(key, at) && input.release(key, at)) {
        log::warn!("input queue closed, dropping press at {at:.3}s");
    }
}

fn to_judged(position: f64, r: &JudgmentResult) -> Judged {
    Judged {
        position,
        lane: r.lane,
        judgement: r.judgement,
        deviance_ms: r.deviance_ms,
    }
}
