//! Integration tests for the event system

use officetpl_events::*;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Default)]
struct TestEmitter {
    messages: Mutex<Vec<EventMessage>>,
}

impl TestEmitter {
    fn drain(&self) -> Vec<EventMessage> {
        let mut guard = self.messages.lock().expect("messages lock poisoned");
        guard.drain(..).collect()
    }
}

impl EventEmitter for TestEmitter {
    fn event_sender(&self) -> Option<&EventSender> {
        None
    }

    fn enrich_event_meta(&self, _event: &AppEvent, meta: &mut EventMeta) {
        meta.correlation_id = Some("run-42".to_string());
    }

    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        let mut guard = self.messages.lock().expect("messages lock poisoned");
        guard.push(EventMessage::new(meta, event));
    }
}

#[test]
fn test_custom_emitter_receives_enriched_meta() {
    let emitter = TestEmitter::default();
    emitter.emit(AppEvent::Backup(BackupEvent::Created {
        target: PathBuf::from("/t/Normal.dotx"),
        backup: PathBuf::from("/t/Backups/2024.01.02.0304 - Normal.dotx"),
    }));
    emitter.emit(AppEvent::Platform(PlatformEvent::Skipped {
        operation: PlatformOperation::CloseApps,
        reason: "not Windows".into(),
    }));

    let messages = emitter.drain();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].meta.source, EventSource::BACKUP);
    assert_eq!(messages[0].meta.correlation_id.as_deref(), Some("run-42"));
    assert_eq!(messages[1].meta.source, EventSource::CLOSE_APPS);
    assert_eq!(messages[1].meta.level, EventLevel::Info);
}

#[test]
fn test_message_round_trips_through_json() {
    let message = EventMessage::from_event(AppEvent::Mru(MruEvent::KeyCleared {
        key: "Software\\Microsoft\\Office\\16.0\\Word\\Recent Templates\\File MRU".into(),
        removed: 2,
        kept: 3,
    }));
    let json = serde_json::to_string(&message).unwrap();
    let back: EventMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back.meta.event_id, message.meta.event_id);
    assert!(matches!(
        back.event,
        AppEvent::Mru(MruEvent::KeyCleared { removed: 2, kept: 3, .. })
    ));
}
