//! Progress reporting towards the presentation layer.
//!
//! The engine never renders anything itself. It pushes short status texts and
//! a progress fraction into a [`ProgressSink`], which a GUI or CLI shell
//! consumes on its own thread.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Progress of the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// Known progress in `[0, 1]`.
    Fraction(f64),
    /// Total size unknown; show a busy indicator.
    Indeterminate,
}

impl Progress {
    /// Build a fraction clamped to `[0, 1]`.
    ///
    /// Returns `Indeterminate` when `total` is zero.
    pub fn of(done: u64, total: u64) -> Self {
        if total == 0 {
            return Self::Indeterminate;
        }
        Self::Fraction((done as f64 / total as f64).clamp(0.0, 1.0))
    }

    /// The fraction, if known.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Self::Fraction(f) => Some(*f),
            Self::Indeterminate => None,
        }
    }
}

/// A single progress event, as delivered over a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Human-readable status line.
    Text(String),
    /// Progress of the current step.
    Progress(Progress),
}

/// Receiver of progress updates.
///
/// Implementations must not block: the worker calls these synchronously in
/// the middle of downloads and extraction.
pub trait ProgressSink: Send + Sync {
    /// Report a human-readable status line.
    fn text(&self, message: &str);

    /// Report progress of the current step.
    fn progress(&self, progress: Progress);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn text(&self, _message: &str) {}

    fn progress(&self, _progress: Progress) {}
}

/// Fire-and-forget sink backed by an unbounded channel.
///
/// Sends never block and never fail loudly; if the receiving side has gone
/// away the update is dropped.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    /// Create a connected sink/receiver pair.
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn text(&self, message: &str) {
        let _ = self.tx.send(ProgressEvent::Text(message.to_string()));
    }

    fn progress(&self, progress: Progress) {
        let _ = self.tx.send(ProgressEvent::Progress(progress));
    }
}

/// Sink that records every event, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingProgress {
    events: std::sync::Mutex<Vec<ProgressEvent>>,
}

#[cfg(test)]
impl RecordingProgress {
    pub(crate) fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn fractions(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Progress(p) => p.fraction(),
                ProgressEvent::Text(_) => None,
            })
            .collect()
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Text(t) => Some(t),
                ProgressEvent::Progress(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl ProgressSink for RecordingProgress {
    fn text(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Text(message.to_string()));
    }

    fn progress(&self, progress: Progress) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Progress(progress));
    }
}
