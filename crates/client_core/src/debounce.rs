//! Trailing-edge debounce for search input.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tracing::debug;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds at most one pending timer. Replacing the timer aborts the previous
/// one and dropping the slot aborts whatever is still pending.
#[derive(Default)]
pub struct DebounceSlot {
    pending: Option<JoinHandle<()>>,
}

impl DebounceSlot {
    pub fn replace(&mut self, timer: JoinHandle<()>) {
        if let Some(previous) = self.pending.replace(timer) {
            previous.abort();
        }
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Coalesces keystrokes into one settled search value per quiet period.
///
/// A settled value equal to the search key last sent to the server is
/// swallowed, so typing and then restoring the same text does not refetch.
/// Fetches issued outside the debouncer report their key through
/// [`SearchDebouncer::record_sent`], so clearing a key that reached the
/// server through a sort or page change still emits the empty value.
pub struct SearchDebouncer {
    window: Duration,
    slot: Mutex<DebounceSlot>,
    last_sent: Arc<Mutex<String>>,
    emissions: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (emissions, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            window,
            slot: Mutex::new(DebounceSlot::default()),
            last_sent: Arc::new(Mutex::new(String::new())),
            emissions,
        };
        (debouncer, rx)
    }

    /// Notes the search key of a fetch that was actually issued.
    pub fn record_sent(&self, key: &str) {
        *self.last_sent.lock().unwrap_or_else(PoisonError::into_inner) = key.trim().to_string();
    }

    /// Records a raw text change. Must be called inside a tokio runtime.
    pub fn push(&self, value: impl Into<String>) {
        let value = value.into();
        let last_sent = Arc::clone(&self.last_sent);
        let emissions = self.emissions.clone();
        let deadline = Instant::now() + self.window;
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let settled = value.trim().to_string();
            {
                let mut last = last_sent.lock().unwrap_or_else(PoisonError::into_inner);
                if *last == settled {
                    debug!(search = %settled, "search settled on unchanged value");
                    return;
                }
                *last = settled.clone();
            }
            let _ = emissions.send(settled);
        });
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(timer);
    }

    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_pending()
    }
}
