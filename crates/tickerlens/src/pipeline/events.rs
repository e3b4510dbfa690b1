//! Stage progress events
//!
//! The pipeline reports progress as an ordered stream of events over an
//! unbounded channel. Per stage the stream is monotonic: Running first,
//! then Done on success or Skipped when disabled; a stage that errors the
//! run stays at Running. Consumers that lag or disappear never block the
//! pipeline; sends onto a closed channel are ignored.

use tokio::sync::mpsc::UnboundedSender;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Router,
    Technical,
    Fundamental,
    News,
    Macro,
    Investment,
}

impl Stage {
    /// Display label for status UIs
    pub fn label(self) -> &'static str {
        match self {
            Self::Router => "Router",
            Self::Technical => "Technical",
            Self::Fundamental => "Fundamental",
            Self::News => "News",
            Self::Macro => "Macro",
            Self::Investment => "Investment",
        }
    }

    /// All stages in display order
    pub fn all() -> [Self; 6] {
        [
            Self::Router,
            Self::Technical,
            Self::Fundamental,
            Self::News,
            Self::Macro,
            Self::Investment,
        ]
    }
}

/// Stage lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Running,
    Done,
    Skipped,
}

/// One progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEvent {
    pub stage: Stage,
    pub status: StageStatus,
}

/// Write side of the progress channel
///
/// `Progress::none()` makes all sends no-ops, for headless runs.
#[derive(Clone)]
pub struct Progress {
    sender: Option<UnboundedSender<StageEvent>>,
}

impl Progress {
    /// Progress reporting over a channel
    pub fn new(sender: UnboundedSender<StageEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// No-op progress for headless runs
    pub fn none() -> Self {
        Self { sender: None }
    }

    /// Mark a stage running
    pub fn running(&self, stage: Stage) {
        self.send(stage, StageStatus::Running);
    }

    /// Mark a stage done
    pub fn done(&self, stage: Stage) {
        self.send(stage, StageStatus::Done);
    }

    /// Mark a stage skipped
    pub fn skipped(&self, stage: Stage) {
        self.send(stage, StageStatus::Skipped);
    }

    fn send(&self, stage: Stage, status: StageStatus) {
        if let Some(sender) = &self.sender {
            // A departed consumer is not an error
            let _ = sender.send(StageEvent { stage, status });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let progress = Progress::new(tx);

        progress.running(Stage::Router);
        progress.done(Stage::Router);
        progress.skipped(Stage::News);

        assert_eq!(
            rx.try_recv().unwrap(),
            StageEvent {
                stage: Stage::Router,
                status: StageStatus::Running
            }
        );
        assert_eq!(rx.try_recv().unwrap().status, StageStatus::Done);
        assert_eq!(rx.try_recv().unwrap().status, StageStatus::Skipped);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let progress = Progress::new(tx);
        // Must not panic
        progress.running(Stage::Router);
    }

    #[test]
    fn test_none_progress_is_noop() {
        Progress::none().done(Stage::Investment);
    }
}
