use rhein_core::input::events::{InputEvent, KeyCode};
use rhein_core::input::{InputHandler, InputHooks, InputQueue, NoInput};
use std::thread;

#[test]
fn test_events_from_another_thread_reach_the_snapshot() {
    let mut queue = InputQueue::new();
    let sender = queue.sender();

    let handle = thread::spawn(move || {
        assert!(sender.press(KeyCode::D, 1.0));
        assert!(sender.send(InputEvent::press(KeyCode::K, 1.2)));
    });
    handle.join().unwrap();

    queue.update();
    assert!(queue.key_down(KeyCode::D));
    assert!(queue.key_down(KeyCode::K));
    assert!(!queue.key_down(KeyCode::F));
}

#[test]
fn test_events_apply_in_send_order() {
    let mut queue = InputQueue::new();
    let sender = queue.sender();

    // release before press: the release is for a key that is not held
    sender.send(InputEvent::release(KeyCode::SPACE, 10.0));
    sender.send(InputEvent::press(KeyCode::SPACE, 11.0));
    queue.update();
    assert!(queue.key_down(KeyCode::SPACE));
    assert!(!queue.key_up(KeyCode::SPACE));
    assert!(queue.key_held(KeyCode::SPACE));
}

#[test]
fn test_update_builds_tick_snapshot() {
    let mut queue = InputQueue::new();
    let sender = queue.sender();

    sender.press(KeyCode::F, 0.0);
    queue.update();
    assert!(queue.key_down(KeyCode::F));
    assert!(queue.key_held(KeyCode::F));
    assert!(!queue.key_up(KeyCode::F));

    // Nothing new: still held, no longer "down"
    queue.update();
    assert!(!queue.key_down(KeyCode::F));
    assert!(queue.key_held(KeyCode::F));

    // Host key repeat is not a new press
    sender.press(KeyCode::F, 0.1);
    queue.update();
    assert!(!queue.key_down(KeyCode::F));

    sender.release(KeyCode::F, 0.2);
    queue.update();
    assert!(queue.key_up(KeyCode::F));
    assert!(!queue.key_held(KeyCode::F));
}

#[test]
fn test_tap_within_one_tick_counts_as_down() {
    let mut queue = InputQueue::new();
    let sender = queue.sender();

    sender.press(KeyCode::J, 0.0);
    sender.release(KeyCode::J, 0.001);
    queue.update();

    assert!(queue.key_down(KeyCode::J));
    assert!(queue.key_up(KeyCode::J));
    assert!(!queue.key_held(KeyCode::J));
}

#[test]
fn test_sender_reports_dropped_queue() {
    let queue = InputQueue::new();
    let sender = queue.sender();
    drop(queue);

    assert!(!sender.press(KeyCode::K, 0.0));
}

#[test]
fn test_missing_handlers_answer_false() {
    let mut none = NoInput;
    none.update();
    assert!(!none.key_down(KeyCode::D));
    assert!(!none.key_held(KeyCode::D));

    let mut hooks = InputHooks {
        key_down: Some(Box::new(|k| k == KeyCode::D)),
        ..Default::default()
    };
    hooks.update();
    assert!(hooks.key_down(KeyCode::D));
    assert!(!hooks.key_down(KeyCode::F));
    assert!(!hooks.key_up(KeyCode::D));
}
