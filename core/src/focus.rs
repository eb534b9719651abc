use std::sync::Arc;
use tokio::sync::Notify;

/// Injected stand-in for the window focus event: the embedding surface
/// calls [`FocusSignal::focus_gained`] whenever the app regains the
/// foreground, and the notifier's poller wakes up for an immediate
/// evaluation instead of waiting for the next interval tick.
#[derive(Clone, Default)]
pub struct FocusSignal {
    inner: Arc<Notify>,
}

impl FocusSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_gained(&self) {
        self.inner.notify_one();
    }

    pub async fn wait(&self) {
        self.inner.notified().await;
    }
}
