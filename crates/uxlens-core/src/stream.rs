//! Per-request progress stream
//!
//! One producer (the orchestrator task) and one consumer (the HTTP response
//! or the CLI). The stream moves `Open -> progress* -> result | error ->
//! Closed`; a terminal event closes it, and nothing is delivered after that.
//! A consumer that went away is logged, never reported back to the producer.

use crate::error::Error;
use crate::types::{Step, StreamEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, warn};

/// Receives progress notifications from the orchestrator
pub trait ProgressReporter: Send {
    /// Report that `step` has started
    fn progress(&mut self, step: Step, message: &str);
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn progress(&mut self, _step: Step, _message: &str) {}
}

/// Lifecycle of a [`ProgressStream`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Open,
    Closed,
}

/// Consumer half of a progress stream
pub type EventStream = UnboundedReceiverStream<StreamEvent>;

/// Producer half of a progress stream
#[derive(Debug)]
pub struct ProgressStream {
    sender: Option<mpsc::UnboundedSender<StreamEvent>>,
    disconnected: bool,
}

impl ProgressStream {
    /// Create a connected producer/consumer pair
    pub fn channel() -> (Self, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(tx),
                disconnected: false,
            },
            UnboundedReceiverStream::new(rx),
        )
    }

    /// Current state
    pub fn state(&self) -> StreamState {
        if self.sender.is_some() {
            StreamState::Open
        } else {
            StreamState::Closed
        }
    }

    /// Emit the terminal result and close
    pub fn result(&mut self, document: Value) {
        self.send(StreamEvent::Result(document));
        self.close();
    }

    /// Emit the terminal error and close
    pub fn error(&mut self, error: &Error) {
        self.send(StreamEvent::error(error));
        self.close();
    }

    /// Close the stream; later calls are no-ops
    pub fn close(&mut self) {
        if self.sender.take().is_some() {
            debug!("Progress stream closed");
        }
    }

    fn send(&mut self, event: StreamEvent) {
        let Some(sender) = &self.sender else {
            debug!(event = event_kind(&event), "Dropping event sent after close");
            return;
        };

        if sender.send(event).is_err() {
            if self.disconnected {
                debug!("Stream consumer gone; event dropped");
            } else {
                warn!("Stream consumer disconnected; continuing without delivery");
                self.disconnected = true;
            }
        }
    }
}

impl ProgressReporter for ProgressStream {
    fn progress(&mut self, step: Step, message: &str) {
        self.send(StreamEvent::progress(step, message));
    }
}

impl Drop for ProgressStream {
    fn drop(&mut self) {
        self.close();
    }
}

fn event_kind(event: &StreamEvent) -> &'static str {
    match event {
        StreamEvent::Progress(_) => "progress",
        StreamEvent::Result(_) => "result",
        StreamEvent::Error(_) => "error",
    }
}
