//! Transient notifications
//!
//! Short status messages ("Added to cart: Meals") layered over the page. Toasts stack in call
//! order with no limit and no deduplication, stay visible for their duration, fade, then remove
//! themselves.

use std::{
    collections::VecDeque,
    fmt::Debug,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{runtime::Handle, time::Instant};
use tracing::{debug, info};

/// Visible time used when the caller doesn't ask for one.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2_000);

/// Fade-out time after a toast's duration elapses, before it is removed.
pub const FADE_OUT: Duration = Duration::from_millis(220);

/// Most messages kept in a stack's history; older ones are dropped first.
pub const HISTORY_LIMIT: usize = 64;

/// Something that can show a transient message to the donor.
pub trait Notifier: Debug + Send + Sync {
    /// Show `message` for `duration`.
    fn notify_for(&self, message: &str, duration: Duration);

    /// How long [`Notifier::notify`] shows messages for.
    fn default_duration(&self) -> Duration {
        DEFAULT_TOAST_DURATION
    }

    /// Show `message` for the default duration.
    fn notify(&self, message: &str) {
        self.notify_for(message, self.default_duration());
    }
}

/// Where a toast is in its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    /// Fully shown.
    Visible,

    /// Fading out; removed once the fade completes.
    Leaving,

    /// Gone.
    Expired,
}

/// A single notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    id: u64,
    message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Toast {
    /// The message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Lifetime phase at `now`.
    pub fn phase(&self, now: Instant) -> ToastPhase {
        let elapsed = now.saturating_duration_since(self.shown_at);

        if elapsed < self.duration {
            ToastPhase::Visible
        } else if elapsed < self.duration + FADE_OUT {
            ToastPhase::Leaving
        } else {
            ToastPhase::Expired
        }
    }
}

/// Fixed-position toast container.
///
/// When created inside a tokio runtime each toast schedules its own removal; otherwise expired
/// toasts are dropped whenever the stack is read.
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: Arc<Mutex<Vec<Toast>>>,
    history: Arc<Mutex<VecDeque<String>>>,
    next_id: Arc<AtomicU64>,
    default_duration: Duration,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastStack {
    /// Create an empty stack showing toasts for `default_duration` unless told otherwise.
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Arc::default(),
            history: Arc::default(),
            next_id: Arc::default(),
            default_duration,
        }
    }

    /// Toasts still on screen, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.prune();

        lock(&self.toasts).clone()
    }

    /// Messages still on screen, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .map(|toast| toast.message)
            .collect()
    }

    /// Recent messages, oldest first, including ones already removed from screen.
    ///
    /// Holds at most [`HISTORY_LIMIT`] messages.
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).iter().cloned().collect()
    }

    /// Drain the history, returning the messages recorded since the last drain.
    pub fn take_history(&self) -> Vec<String> {
        lock(&self.history).drain(..).collect()
    }

    /// Drop toasts whose fade has completed.
    pub fn prune(&self) {
        let now = Instant::now();

        lock(&self.toasts).retain(|toast| toast.phase(now) != ToastPhase::Expired);
    }

    fn remove(&self, id: u64) {
        lock(&self.toasts).retain(|toast| toast.id != id);
    }
}

impl Notifier for ToastStack {
    fn notify_for(&self, message: &str, duration: Duration) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        info!(toast = id, text = message, "notify");

        lock(&self.toasts).push(Toast {
            id,
            message: message.to_string(),
            shown_at: Instant::now(),
            duration,
        });
        {
            let mut history = lock(&self.history);

            if history.len() == HISTORY_LIMIT {
                history.pop_front();
            }

            history.push_back(message.to_string());
        }

        if let Ok(handle) = Handle::try_current() {
            let stack = self.clone();

            handle.spawn(async move {
                tokio::time::sleep(duration + FADE_OUT).await;
                stack.remove(id);
            });
        } else {
            debug!(toast = id, "no runtime; toast will be pruned on read");
        }
    }

    fn default_duration(&self) -> Duration {
        self.default_duration
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
