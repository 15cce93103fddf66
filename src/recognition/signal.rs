use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// One-shot completion latch.
///
/// The session's terminal events (`Canceled`, `SessionStopped`) race to
/// fire this; only the first firing matters. The waiting caller suspends
/// exactly once and is released by whichever terminal event arrives
/// first. Clones share the same latch.
#[derive(Clone, Default)]
pub struct CompletionSignal {
    inner: Arc<SignalInner>,
}

#[derive(Default)]
struct SignalInner {
    fired: AtomicBool,
    notify: Notify,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the latch. Returns true only for the first call; later calls
    /// are no-ops.
    pub fn fire(&self) -> bool {
        let first = !self.inner.fired.swap(true, Ordering::SeqCst);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// Suspend until the latch fires. Returns immediately if it already
    /// has.
    pub async fn wait(&self) {
        // Register interest before checking the flag so a fire between
        // the check and the await is not lost.
        let notified = self.inner.notify.notified();
        if self.inner.fired.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }
}
