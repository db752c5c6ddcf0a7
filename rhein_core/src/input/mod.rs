pub mod events;

use std::collections::HashSet;

use self::events::{InputEvent, KeyCode};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Key state as seen by the simulation thread. `update` is called once at the
/// start of every tick, before any key is queried.
///
/// Every query defaults to `false`, so a host that never wires input still
/// gets a running session where every note scrolls to Miss.
pub trait InputHandler: Send {
    fn update(&mut self) {}

    /// Pressed during the last `update` window.
    fn key_down(&self, _key: KeyCode) -> bool {
        false
    }

    /// Released during the last `update` window.
    fn key_up(&self, _key: KeyCode) -> bool {
        false
    }

    fn key_held(&self, _key: KeyCode) -> bool {
        false
    }
}

/// The unregistered handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputHandler for NoInput {}

/// Channel-backed input: any thread pushes events through an [`InputSender`],
/// the simulation thread folds them into a per-tick snapshot.
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
    down: HashSet<KeyCode>,
    up: HashSet<KeyCode>,
    held: HashSet<KeyCode>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            down: HashSet::new(),
            up: HashSet::new(),
            held: HashSet::new(),
        }
    }

    /// Returns a sender handle for the host thread.
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler for InputQueue {
    fn update(&mut self) {
        self.down.clear();
        self.up.clear();
        while let Ok(event) = self.receiver.try_recv() {
            if event.pressed {
                // key repeat from the host is not a new press
                if self.held.insert(event.key) {
                    self.down.insert(event.key);
                }
            } else if self.held.remove(&event.key) {
                self.up.insert(event.key);
            }
        }
    }

    fn key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    fn key_up(&self, key: KeyCode) -> bool {
        self.up.contains(&key)
    }

    fn key_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}

#[derive(Debug, Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Returns false once the session owning the queue is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn press(&self, key: KeyCode, timestamp: f64) -> bool {
        self.send(InputEvent::press(key, timestamp))
    }

    pub fn release(&self, key: KeyCode, timestamp: f64) -> bool {
        self.send(InputEvent::release(key, timestamp))
    }
}

type KeyFn = Box<dyn Fn(KeyCode) -> bool + Send>;

/// Callback-registration input, for hosts that already poll their own
/// keyboard state. Unset callbacks answer `false`.
#[derive(Default)]
pub struct InputHooks {
    pub on_update: Option<Box<dyn FnMut() + Send>>,
    pub key_down: Option<KeyFn>,
    pub key_up: Option<KeyFn>,
    pub key_held: Option<KeyFn>,
}

impl InputHandler for InputHooks {
    fn update(&mut self) {
        if let Some(f) = self.on_update.as_mut() {
            f();
        }
    }

    fn key_down(&self, key: KeyCode) -> bool {
        self.key_down.as_ref().is_some_and(|f| f(key))
    }

    fn key_up(&self, key: KeyCode) -> bool {
        self.key_up.as_ref().is_some_and(|f| f(key))
    }

    fn key_held(&self, key: KeyCode) -> bool {
        self.key_held.as_ref().is_some_and(|f| f(key))
    }
}
