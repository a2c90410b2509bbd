use std::sync::Mutex;

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::Serialize;
use tokio::sync::broadcast;

use super::context::RunResult;

/// What a run tells its caller. `Completed` is always the last event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ExtractionEvent {
    /// Percentage of input paths started, 0..=100.
    Progress(u8),
    LogLine(String),
    Completed(RunResult),
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ExtractionEvent);

    fn log(&self, line: String) {
        self.report(ExtractionEvent::LogLine(line));
    }
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ExtractionEvent) {}
}

/// Forwards events to a channel read by another thread.
pub struct ChannelProgress {
    sender: Sender<ExtractionEvent>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<ExtractionEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, event: ExtractionEvent) {
        // A caller that stopped listening doesn't stop the run
        let _ = self.sender.send(event);
    }
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct CollectingProgress {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ExtractionEvent::LogLine(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ExtractionEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for CollectingProgress {
    fn report(&self, event: ExtractionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimestampedEvent {
    pub timestamp: DateTime<Utc>,
    pub event: ExtractionEvent,
}

/// Fans run events out to any number of async subscribers.
#[derive(Clone)]
pub struct BroadcastProgress {
    sender: broadcast::Sender<TimestampedEvent>,
}

impl BroadcastProgress {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimestampedEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastProgress {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ExtractionEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(TimestampedEvent {
            timestamp: Utc::now(),
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_progress_delivers_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let progress = ChannelProgress::new(tx);

        progress.report(ExtractionEvent::Progress(0));
        progress.log("Processing: /a".to_string());

        assert!(matches!(rx.recv().unwrap(), ExtractionEvent::Progress(0)));
        match rx.recv().unwrap() {
            ExtractionEvent::LogLine(line) => assert_eq!(line, "Processing: /a"),
            other => panic!("Expected log line, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_progress_survives_dropped_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        ChannelProgress::new(tx).log("nobody listens".to_string());
    }

    #[test]
    fn test_collecting_progress_helpers() {
        let progress = CollectingProgress::new();
        progress.report(ExtractionEvent::Progress(50));
        progress.log("Copied: a.png".to_string());
        progress.report(ExtractionEvent::Progress(100));

        assert_eq!(progress.progress_values(), vec![50, 100]);
        assert_eq!(progress.log_lines(), vec!["Copied: a.png"]);
        assert_eq!(progress.events().len(), 3);
    }

    #[test]
    fn test_broadcast_send_receive() {
        let progress = BroadcastProgress::new(10);
        let mut receiver = progress.subscribe();

        progress.report(ExtractionEvent::Progress(42));

        let received = receiver.try_recv().unwrap();
        assert!(matches!(received.event, ExtractionEvent::Progress(42)));
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(ExtractionEvent::LogLine("hi".to_string())).unwrap();
        assert_eq!(json["type"], "log_line");
        assert_eq!(json["data"], "hi");

        let json = serde_json::to_value(ExtractionEvent::Progress(7)).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["data"], 7);
    }
}
