//! Thread-safe queue for submitting sketcher actions.
//!
//! [`ActionQueue`] uses interior mutability ([`Mutex`]) so that code
//! holding only a shared reference to the session — tool handlers,
//! shortcut dispatch — can still enqueue actions. The session drains
//! the queue and executes actions through
//! [`ActionHistory`](super::ActionHistory) in submission order.

use std::fmt;
use std::sync::Mutex;

use super::action::SketchAction;

/// A thread-safe queue of pending [`SketchAction`]s.
///
/// [`push()`](Self::push) only requires `&self`, so read-only contexts
/// can submit edits without touching the graph or the history.
pub struct ActionQueue {
    queue: Mutex<Vec<Box<dyn SketchAction>>>,
}

impl ActionQueue {
    /// Creates a new empty action queue.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Enqueues an action. Callable from `&self` thanks to interior
    /// mutability.
    pub fn push(&self, action: Box<dyn SketchAction>) {
        self.queue.lock().unwrap().push(action);
    }

    /// Drains all queued actions, returning them in submission order.
    pub fn drain(&self) -> Vec<Box<dyn SketchAction>> {
        std::mem::take(&mut *self.queue.lock().unwrap())
    }

    /// Returns `true` if there are no queued actions.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.queue.lock().unwrap().len();
        f.debug_struct("ActionQueue")
            .field("pending", &len)
            .finish()
    }
}
