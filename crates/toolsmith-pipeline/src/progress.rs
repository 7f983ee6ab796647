//! Progress fan-out
//!
//! Broadcasts pipeline progress to every currently-connected observer.
//! Delivery is best-effort and at-most-once per observer per event: late
//! subscribers never see past events, lagging subscribers drop events, and a
//! send never blocks or fails the publisher.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use toolsmith_store::RequestId;

/// One step of progress for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub step: Stage,
    pub progress: u8,
    pub message: String,
}

/// Frame tag; the wire protocol only carries progress frames today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    #[default]
    Progress,
}

/// The frame pushed to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    pub request_id: RequestId,
    pub progress: ProgressUpdate,
}

impl ProgressEvent {
    #[must_use]
    pub fn new(request_id: RequestId, progress: ProgressUpdate) -> Self {
        Self {
            kind: FrameKind::Progress,
            request_id,
            progress,
        }
    }
}

/// Broadcast group for progress events
#[derive(Debug)]
pub struct ProgressBus {
    tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressBus {
    /// Create a bus; `capacity` bounds how far an observer may lag before
    /// dropping events
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Join the broadcast group; receives only events published after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }

    /// Deliver an event to every connected observer
    ///
    /// Never blocks and never errors: with no observers the event is simply
    /// dropped.
    pub fn publish(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of currently-connected observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u64, stage: Stage, progress: u8) -> ProgressEvent {
        ProgressEvent::new(
            RequestId(id),
            ProgressUpdate {
                step: stage,
                progress,
                message: stage.message().to_string(),
            },
        )
    }

    #[tokio::test]
    async fn publish_without_observers_is_fine() {
        let bus = ProgressBus::new(8);
        bus.publish(event(1, Stage::Analyzing, 20));
        assert_eq!(bus.observer_count(), 0);
    }

    #[tokio::test]
    async fn observers_receive_published_events() {
        let bus = ProgressBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(event(1, Stage::Analyzing, 20));

        assert_eq!(a.recv().await.unwrap().request_id, RequestId(1));
        assert_eq!(b.recv().await.unwrap().progress.step, Stage::Analyzing);
    }

    #[tokio::test]
    async fn late_subscribers_get_no_replay() {
        let bus = ProgressBus::new(8);
        bus.publish(event(1, Stage::Analyzing, 20));

        let mut rx = bus.subscribe();
        bus.publish(event(1, Stage::Planning, 40));

        assert_eq!(rx.recv().await.unwrap().progress.step, Stage::Planning);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn frame_serializes_with_wire_field_names() {
        let frame = event(3, Stage::Generating, 70);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["requestId"], serde_json::json!(3));
        assert_eq!(json["progress"]["step"], "generating");
        assert_eq!(json["progress"]["progress"], 70);
    }
}
