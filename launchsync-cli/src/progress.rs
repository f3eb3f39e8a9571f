//! Terminal rendering of sync progress.
//!
//! A single `indicatif` bar shows the latest status text. Known fractions
//! drive the bar; an indeterminate report switches it to a spinner until the
//! next fraction arrives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use launchsync::manager::{Progress, ProgressEvent, ProgressSink};
use tokio::sync::mpsc::UnboundedReceiver;

/// Bar resolution; fractions are mapped onto `0..=SCALE`.
const SCALE: u64 = 1000;

const SPINNER_TICK: Duration = Duration::from_millis(100);

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {wide_msg}";

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Renders progress events on stderr.
pub struct ProgressRenderer {
    bar: ProgressBar,
    spinning: AtomicBool,
}

impl ProgressRenderer {
    /// Renderer drawing to stderr.
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(SCALE))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(bar_style());
        Self {
            bar,
            spinning: AtomicBool::new(false),
        }
    }

    /// Apply one event.
    pub fn handle(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Text(text) => self.text(&text),
            ProgressEvent::Progress(progress) => self.progress(progress),
        }
    }

    /// Render events until the sender side closes, then clear the bar.
    pub fn drain(self, events: &mut UnboundedReceiver<ProgressEvent>) {
        while let Some(event) = events.blocking_recv() {
            self.handle(event);
        }
        self.finish();
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    fn is_spinning(&self) -> bool {
        self.spinning.load(Ordering::Relaxed)
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressRenderer {
    fn text(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn progress(&self, progress: Progress) {
        match progress {
            Progress::Fraction(fraction) => {
                if self.spinning.swap(false, Ordering::Relaxed) {
                    self.bar.disable_steady_tick();
                    self.bar.set_style(bar_style());
                }
                self.bar
                    .set_position((fraction.clamp(0.0, 1.0) * SCALE as f64).round() as u64);
            }
            Progress::Indeterminate => {
                if !self.spinning.swap(true, Ordering::Relaxed) {
                    self.bar.set_style(spinner_style());
                    self.bar.enable_steady_tick(SPINNER_TICK);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchsync::manager::ChannelProgress;

    fn hidden() -> ProgressRenderer {
        ProgressRenderer::with_bar(ProgressBar::hidden())
    }

    #[test]
    fn test_fraction_sets_position() {
        let renderer = hidden();
        renderer.progress(Progress::Fraction(0.25));
        assert_eq!(renderer.bar.position(), 250);

        renderer.progress(Progress::Fraction(1.0));
        assert_eq!(renderer.bar.position(), SCALE);
    }

    #[test]
    fn test_indeterminate_toggles_spinner() {
        let renderer = hidden();
        renderer.progress(Progress::Indeterminate);
        assert!(renderer.is_spinning());

        renderer.progress(Progress::Fraction(0.5));
        assert!(!renderer.is_spinning());
        assert_eq!(renderer.bar.position(), 500);
    }

    #[test]
    fn test_text_sets_message() {
        let renderer = hidden();
        renderer.handle(ProgressEvent::Text("Verifying files...".to_string()));
        assert_eq!(renderer.bar.message(), "Verifying files...");
    }

    #[test]
    fn test_drain_ends_when_sender_drops() {
        let (sink, mut events) = ChannelProgress::channel();
        sink.text("Extracting: a.txt");
        sink.progress(Progress::Fraction(1.0));
        drop(sink);

        hidden().drain(&mut events);
        assert!(events.try_recv().is_err());
    }
}
