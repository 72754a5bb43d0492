//! Event routing from the operations channel to the log

use crate::logging::log_event_with_tracing;
use officetpl_config::{LogChannel, LogChannels};
use officetpl_events::{EventLevel, EventMessage};

/// Decides which events reach the log for this run
pub struct EventHandler {
    channels: LogChannels,
    /// `--debug` logs every event regardless of channel selection
    log_everything: bool,
    warnings: usize,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(channels: LogChannels, log_everything: bool) -> Self {
        Self {
            channels,
            log_everything,
            warnings: 0,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: &EventMessage) {
        if message.meta.level >= EventLevel::Warn {
            self.warnings += 1;
        }
        if self.should_log(message) {
            log_event_with_tracing(message);
        }
    }

    /// Whether `message` passes the channel selection
    pub fn should_log(&self, message: &EventMessage) -> bool {
        if self.log_everything || message.event.is_summary() {
            return true;
        }
        let channel =
            LogChannel::from_name(message.meta.source.as_str()).unwrap_or(LogChannel::General);
        self.channels
            .allows(channel, message.meta.level >= EventLevel::Warn)
    }

    /// Number of warnings and errors seen so far
    pub fn warnings(&self) -> usize {
        self.warnings
    }
}
