#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for officetpl
//!
//! Library crates never print or log directly. They emit domain events
//! through [`EventEmitter`]; the CLI drains the channel and routes each
//! event to `tracing` under its log channel.
//!
//! ## Architecture
//!
//! - **Domain-driven events**: grouped by the part of a run that produced them
//! - **Named channels**: every event maps to one [`EventSource`] channel
//! - **Metadata envelope**: [`EventMessage`] pairs an event with [`EventMeta`]

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, AuthorEvent, BackupEvent, CopyEvent, CopyStage, FailureContext, GeneralEvent,
    InstallEvent, MruEvent, PathsEvent, PlatformEvent, PlatformOperation, UninstallEvent,
};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// An event together with its metadata envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from its level and channel
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel. Usable without a running async runtime.
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Implemented by the raw [`EventSender`] and by any context that holds one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Hook for adding labels or a correlation id before an event is sent
    fn enrich_event_meta(&self, _event: &AppEvent, _meta: &mut EventMeta) {}

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let mut meta = EventMeta::new(event.log_level(), event.event_source());
        self.enrich_event_meta(&event, &mut meta);
        self.emit_with_meta(meta, event);
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a debug log event with context
    fn emit_debug_with_context(
        &self,
        message: impl Into<String>,
        context: std::collections::HashMap<String, String>,
    ) {
        self.emit(AppEvent::General(GeneralEvent::debug_with_context(
            message, context,
        )));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    /// Emit an error event with details
    fn emit_error_with_details(&self, message: impl Into<String>, details: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error_with_details(
            message, details,
        )));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed<E: officetpl_errors::UserFacingError + ?Sized>(
        &self,
        operation: impl Into<String>,
        error: &E,
    ) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            failure: FailureContext::from_error(error),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Emitter that discards everything, for callers without a channel
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmitter;

impl EventEmitter for NullEmitter {
    fn event_sender(&self) -> Option<&EventSender> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officetpl_errors::InstallError;

    #[test]
    fn sender_wraps_events_in_metadata() {
        let (tx, mut rx) = channel();
        tx.emit_warning("close Office and retry");
        let err = InstallError::SourceMissing {
            path: "Normal.dotx".into(),
        };
        tx.emit_operation_failed("install", &err);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.meta.level, EventLevel::Warn);
        assert_eq!(first.meta.source, EventSource::GENERAL);

        let second = rx.try_recv().unwrap();
        match second.event {
            AppEvent::General(GeneralEvent::OperationFailed { failure, .. }) => {
                assert_eq!(failure.code.as_deref(), Some("install.source_missing"));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(second.meta.level, EventLevel::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit_debug("nobody listening");
        NullEmitter.emit_error("also ignored");
    }
}
