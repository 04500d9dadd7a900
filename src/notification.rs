use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// A short message shown over the current screen until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

/// Queue of transient notifications.
///
/// Messages arrive through a channel so that callbacks running on other
/// threads can post them; `poll` moves them onto the screen.
pub struct Toasts {
    inbox: Receiver<String>,
    outbox: Sender<String>,
    visible: VecDeque<Toast>,
    duration: Duration,
}

impl Toasts {
    pub fn new(duration: Duration) -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            inbox,
            outbox,
            visible: VecDeque::new(),
            duration,
        }
    }

    /// Handle for posting messages from anywhere.
    pub fn notifier(&self) -> Sender<String> {
        self.outbox.clone()
    }

    /// Takes pending messages and drops the ones that have expired.
    pub fn poll(&mut self, now: Instant) {
        loop {
            match self.inbox.try_recv() {
                Ok(message) => {
                    log::info!("Notification: {}", message);
                    self.visible.push_back(Toast {
                        message,
                        expires_at: now + self.duration,
                    });
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.visible.retain(|toast| toast.expires_at > now);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.visible.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
