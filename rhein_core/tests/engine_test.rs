use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rhein_core::chart::{Chart, ChartNote, Judgement};
use rhein_core::config::{ModSpec, SessionConfig};
use rhein_core::error::{SessionError, SetupError};
use rhein_core::gameplay::{Mania, TickHooks, TimingWindows};
use rhein_core::input::events::KeyCode;
use rhein_core::mods::ModList;
use rhein_core::time::ManualTime;
use rhein_core::{Engine, SessionOptions};

fn long_chart() -> Chart {
    let mut chart = Chart::new(120.0);
    chart.notes = vec![ChartNote::tap(0, 0.0), ChartNote::tap(1, 1000.0)];
    chart
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn test_run_hit_stop() {
    let time = ManualTime::new(0.0);
    let engine = Engine::with_time_source(Arc::new(time.clone()));

    let input = engine.run(long_chart(), &SessionConfig::default()).unwrap();
    assert!(engine.is_running());

    input.press(KeyCode::D, 0.0);
    input.release(KeyCode::D, 0.0);
    assert!(wait_until(|| engine.combo() == Some(1)));
    assert_eq!(engine.score(), Some(320));

    let record = engine.stop().expect("session record");
    assert_eq!(record.hits.len(), 1);
    assert_eq!(record.hits[0].judgement, Judgement::Marvelous);
    assert!(record.default_windows);

    assert!(!engine.is_running());
    assert!(engine.stop().is_none());
    assert_eq!(engine.position(), None);
}

#[test]
fn test_second_run_is_rejected() {
    let engine = Engine::with_time_source(Arc::new(ManualTime::new(0.0)));
    engine.run(long_chart(), &SessionConfig::default()).unwrap();

    let err = engine.run(long_chart(), &SessionConfig::default()).unwrap_err();
    assert!(matches!(err, SessionError::AlreadyRunning));

    engine.stop();
    assert!(engine.run(long_chart(), &SessionConfig::default()).is_ok());
    engine.stop();
}

#[test]
fn test_setup_errors_surface_before_spawning() {
    let engine = Engine::new();
    let config = SessionConfig {
        mods: vec![ModSpec::Speed { rate: -1.0 }],
        ..Default::default()
    };

    let err = engine.run(long_chart(), &config).unwrap_err();
    assert!(matches!(err, SessionError::Setup(SetupError::Mod { .. })));
    assert!(!engine.is_running());
    assert!(engine.stop().is_none());
}

#[test]
fn test_sync_and_temp_sync_reach_the_session() {
    let time = ManualTime::new(0.0);
    let engine = Engine::with_time_source(Arc::new(time.clone()));

    assert_eq!(engine.sync(1.0), None);
    assert!(!engine.temp_sync(1.0));

    engine.run(long_chart(), &SessionConfig::default()).unwrap();
    // accepted right away, whether or not the clock has started yet
    let delta = engine.sync(5.0).expect("live session");
    assert!((delta - 5.0).abs() < 1e-9);
    assert!(wait_until(|| engine.position().is_some_and(|p| (p - 5.0).abs() < 1e-9)));
    time.set(2.0);

    let delta = engine.sync(3.0).expect("running clock");
    assert!((delta + 4.0).abs() < 1e-9);
    assert!(wait_until(|| engine.position().is_some_and(|p| (p - 3.0).abs() < 1e-9)));
    assert!(wait_until(|| engine.beat().is_some_and(|b| (b - 6.0).abs() < 1e-9)));

    assert!(engine.temp_sync(7.0));
    engine.stop();
    assert_eq!(engine.sync(1.0), None);
}

#[test]
fn test_run_with_options_applies_offset_and_hooks() {
    let time = ManualTime::new(0.0);
    let engine = Engine::with_time_source(Arc::new(time.clone()));
    let pre = Arc::new(AtomicUsize::new(0));
    let judged = Arc::new(AtomicUsize::new(0));

    let options = SessionOptions {
        offset_ms: 500,
        hooks: TickHooks {
            pre_update: Some(Box::new({
                let pre = pre.clone();
                move |_| {
                    pre.fetch_add(1, Ordering::SeqCst);
                }
            })),
            update: Some(Box::new({
                let judged = judged.clone();
                move |tick| {
                    judged.fetch_add(tick.results.len(), Ordering::SeqCst);
                }
            })),
        },
        ..Default::default()
    };
    let mut chart = long_chart();
    chart.notes[0].beat = 1.0;
    let input = engine
        .run_with(Mania::four_key(), chart, TimingWindows::DEFAULT, ModList::new(), options)
        .unwrap();

    // 0.5 s of offset puts the beat-1 note on the clock's start
    assert!(wait_until(|| engine.position().is_some_and(|p| (p - 0.5).abs() < 1e-9)));
    input.press(KeyCode::D, 0.0);
    input.release(KeyCode::D, 0.0);
    assert!(wait_until(|| judged.load(Ordering::SeqCst) == 1));
    assert!(pre.load(Ordering::SeqCst) > 0);

    let record = engine.stop().unwrap();
    assert_eq!(record.hits[0].judgement, Judgement::Marvelous);
}

#[test]
fn test_finished_session_can_be_replaced() {
    let engine = Engine::with_time_source(Arc::new(ManualTime::new(10.0)));
    let mut chart = Chart::new(120.0);
    chart.notes = vec![ChartNote::tap(0, 0.0)];

    // Starts at 10 s on a note at 0 s: missed on the first tick, then done
    engine.run(chart.clone(), &SessionConfig::default()).unwrap();
    assert!(wait_until(|| !engine.is_running()));
    assert_eq!(engine.health(), Some(0.9));

    assert!(engine.run(chart, &SessionConfig::default()).is_ok());
    let record = engine.stop().unwrap();
    assert_eq!(record.count(Judgement::Miss), 1);
}
