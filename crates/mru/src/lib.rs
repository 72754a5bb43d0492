#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Recent-templates (MRU) registry lists
//!
//! Office keeps one `File MRU` key per application and version, optionally
//! under `ADAL_*` / `LIVEID_*` account subkeys. Every discovered key gets the
//! same update independently; a failure on one key is reported and the
//! remaining keys are still processed.

use officetpl_errors::RegistryError;
use officetpl_events::{AppEvent, EventEmitter, FailureContext, MruEvent};
use officetpl_platform::RegistryStore;
use officetpl_types::mru::{extract_path, is_item_value, same_path};
use officetpl_types::{normalize_path, MruEntry, MruList, MruValueName, OfficeApp, OFFICE_VERSIONS};
use std::collections::BTreeMap;
use std::path::Path;

const ACCOUNT_PREFIXES: [&str; 2] = ["ADAL_", "LIVEID_"];

fn recent_templates_key(version: &str, app: OfficeApp) -> String {
    format!(
        r"Software\Microsoft\Office\{version}\{}\Recent Templates",
        app.registry_name()
    )
}

/// MRU maintenance over a registry store
pub struct MruStore<'a> {
    registry: &'a dyn RegistryStore,
}

impl<'a> MruStore<'a> {
    #[must_use]
    pub fn new(registry: &'a dyn RegistryStore) -> Self {
        Self { registry }
    }

    /// Whether a registry backs this store
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.registry.is_available()
    }

    /// `File MRU` keys for `app`, account subkeys before the plain key of each
    /// version, without duplicates
    #[must_use]
    pub fn find_mru_paths(&self, app: OfficeApp) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for version in OFFICE_VERSIONS {
            let base = recent_templates_key(version, app);
            for sub in self.registry.subkeys(&base).unwrap_or_default() {
                let upper = sub.to_uppercase();
                if ACCOUNT_PREFIXES.iter().any(|prefix| upper.starts_with(prefix)) {
                    keys.push(format!(r"{base}\{sub}\File MRU"));
                }
            }
            keys.push(format!(r"{base}\File MRU"));
        }
        let mut unique: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            if !unique.iter().any(|seen| seen.eq_ignore_ascii_case(&key)) {
                unique.push(key);
            }
        }
        unique
    }

    /// Entries stored under `key`, ordered by their `Item` index
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be enumerated.
    pub fn read_entries(&self, key: &str) -> Result<Vec<MruEntry>, RegistryError> {
        let mut items = Vec::new();
        let mut metadata = BTreeMap::new();
        for (name, value) in self.registry.values(key)? {
            match MruValueName::parse(&name) {
                Some(MruValueName::Item(index)) => items.push((index, value)),
                Some(MruValueName::Metadata(index)) => {
                    metadata.insert(index, value);
                }
                None => {}
            }
        }
        items.sort_by_key(|(index, _)| *index);
        Ok(items
            .into_iter()
            .map(|(index, item)| MruEntry {
                index,
                metadata: metadata.get(&index).cloned(),
                item,
            })
            .collect())
    }

    /// Put `path` at the front of every MRU list of `app`.
    ///
    /// Returns the number of keys updated.
    pub fn write_entry<E: EventEmitter + ?Sized>(
        &self,
        app: OfficeApp,
        path: &Path,
        emitter: &E,
    ) -> usize {
        if !self.is_available() {
            emitter.emit(AppEvent::Mru(MruEvent::Unavailable { app }));
            return 0;
        }
        let path = normalize_path(&path.to_string_lossy())
            .to_string_lossy()
            .into_owned();
        let keys = self.find_mru_paths(app);
        emitter.emit(AppEvent::Mru(MruEvent::UpdateStarted {
            app,
            path: path.clone(),
            keys: keys.clone(),
        }));

        let mut updated = 0;
        for key in &keys {
            match self.write_key(key, &path, emitter) {
                Ok(()) => {
                    updated += 1;
                    emitter.emit(AppEvent::Mru(MruEvent::KeyUpdated {
                        key: key.clone(),
                        path: path.clone(),
                    }));
                }
                Err(err) => emitter.emit(AppEvent::Mru(MruEvent::KeyFailed {
                    key: key.clone(),
                    failure: FailureContext::from_error(&err),
                })),
            }
        }
        updated
    }

    fn write_key<E: EventEmitter + ?Sized>(
        &self,
        key: &str,
        path: &str,
        emitter: &E,
    ) -> Result<(), RegistryError> {
        self.registry.create_key(key)?;
        let existing = self.read_entries(key)?;
        let mut list = MruList::from_paths(existing.iter().filter_map(MruEntry::path));
        list.push_front(path);

        let encoded = list.encode();
        let mut written = Vec::with_capacity(encoded.len() * 2);
        for (offset, ((item, metadata), entry)) in encoded.iter().zip(list.iter()).enumerate() {
            let index = offset + 1;
            let item_name = MruValueName::item(index);
            let metadata_name = MruValueName::metadata(index);
            self.registry.set_string(key, &item_name, item)?;
            self.registry.set_string(key, &metadata_name, metadata)?;
            emitter.emit(AppEvent::Mru(MruEvent::EntryWritten {
                key: key.to_string(),
                index,
                path: entry.to_string(),
            }));
            written.push(item_name);
            written.push(metadata_name);
        }

        // Drop leftovers beyond the rewritten range
        for (name, _) in self.registry.values(key)? {
            if is_item_value(&name) && !written.iter().any(|w| w.eq_ignore_ascii_case(&name)) {
                self.registry.delete_value(key, &name)?;
            }
        }
        Ok(())
    }

    /// Remove every entry whose path matches one of `targets` from all MRU
    /// lists of `app`, keeping the survivors' stored strings and order.
    ///
    /// Returns the number of keys rewritten.
    pub fn rewrite_excluding<E: EventEmitter + ?Sized>(
        &self,
        app: OfficeApp,
        targets: &[String],
        emitter: &E,
    ) -> usize {
        if !self.is_available() {
            emitter.emit(AppEvent::Mru(MruEvent::Unavailable { app }));
            return 0;
        }
        let keys = self.find_mru_paths(app);
        emitter.emit(AppEvent::Mru(MruEvent::ClearStarted {
            app,
            targets: targets.to_vec(),
            keys: keys.clone(),
        }));

        let mut cleared = 0;
        for key in &keys {
            match self.rewrite_key(key, targets) {
                Ok((removed, kept)) => {
                    cleared += 1;
                    emitter.emit(AppEvent::Mru(MruEvent::KeyCleared {
                        key: key.clone(),
                        removed,
                        kept,
                    }));
                }
                Err(err) => emitter.emit(AppEvent::Mru(MruEvent::KeyFailed {
                    key: key.clone(),
                    failure: FailureContext::from_error(&err),
                })),
            }
        }
        cleared
    }

    fn rewrite_key(&self, key: &str, targets: &[String]) -> Result<(usize, usize), RegistryError> {
        let entries = self.read_entries(key)?;

        for (name, _) in self.registry.values(key)? {
            if is_item_value(&name) {
                self.registry.delete_value(key, &name)?;
            }
        }

        let (removed, survivors): (Vec<_>, Vec<_>) = entries.into_iter().partition(|entry| {
            extract_path(&entry.item)
                .is_some_and(|path| targets.iter().any(|target| same_path(&path, target)))
        });

        for (offset, entry) in survivors.iter().enumerate() {
            let index = offset + 1;
            self.registry
                .set_string(key, &MruValueName::item(index), &entry.item)?;
            if let Some(metadata) = entry.metadata.as_deref().filter(|m| !m.is_empty()) {
                self.registry
                    .set_string(key, &MruValueName::metadata(index), metadata)?;
            }
        }
        Ok((removed.len(), survivors.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officetpl_events::NullEmitter;
    use officetpl_platform::{MemoryRegistry, NullRegistry};
    use officetpl_types::mru::{encode_item, encode_metadata};
    use proptest::prelude::*;

    const WORD_KEY: &str = r"Software\Microsoft\Office\16.0\Word\Recent Templates\File MRU";

    fn item_paths(store: &MruStore<'_>, key: &str) -> Vec<String> {
        store
            .read_entries(key)
            .unwrap()
            .iter()
            .filter_map(MruEntry::path)
            .collect()
    }

    #[test]
    fn account_subkeys_come_first() {
        let registry = MemoryRegistry::new();
        registry
            .create_key(r"Software\Microsoft\Office\16.0\Word\Recent Templates\adal_abc\File MRU")
            .unwrap();
        registry
            .create_key(r"Software\Microsoft\Office\16.0\Word\Recent Templates\Other")
            .unwrap();
        let store = MruStore::new(&registry);
        let keys = store.find_mru_paths(OfficeApp::Word);
        assert_eq!(keys.len(), 5);
        assert_eq!(
            keys[0],
            r"Software\Microsoft\Office\16.0\Word\Recent Templates\adal_abc\File MRU"
        );
        assert_eq!(keys[1], WORD_KEY);
        assert!(keys[4].contains(r"\12.0\"));
    }

    #[test]
    fn write_moves_path_to_front() {
        let registry = MemoryRegistry::new();
        registry
            .set_string(WORD_KEY, "Item 1", &encode_item(r"C:\T\Old.dotx"))
            .unwrap();
        registry
            .set_string(WORD_KEY, "Item 2", &encode_item(r"C:\T\Normal.dotx"))
            .unwrap();
        let store = MruStore::new(&registry);

        let updated = store.write_entry(OfficeApp::Word, Path::new(r"c:\t\normal.dotx"), &NullEmitter);
        assert_eq!(updated, 4);
        assert_eq!(
            item_paths(&store, WORD_KEY),
            vec![r"c:\t\normal.dotx".to_string(), r"C:\T\Old.dotx".to_string()]
        );
        assert_eq!(
            registry.read_string(WORD_KEY, "Item Metadata 2").unwrap(),
            Some(encode_metadata(r"C:\T\Old.dotx"))
        );
    }

    #[test]
    fn write_caps_list_and_clears_leftovers() {
        let registry = MemoryRegistry::new();
        for i in 1..=12 {
            registry
                .set_string(WORD_KEY, &format!("Item {i}"), &encode_item(&format!("/t/{i}.dotx")))
                .unwrap();
        }
        let store = MruStore::new(&registry);
        store.write_entry(OfficeApp::Word, Path::new("/t/new.dotx"), &NullEmitter);

        let paths = item_paths(&store, WORD_KEY);
        assert_eq!(paths.len(), 10);
        assert_eq!(paths[0], "/t/new.dotx");
        assert_eq!(registry.read_string(WORD_KEY, "Item 11").unwrap(), None);
    }

    #[test]
    fn exclusion_keeps_original_strings() {
        let registry = MemoryRegistry::new();
        registry.set_string(WORD_KEY, "Item 3", "raw*/keep/b.dotx").unwrap();
        registry.set_string(WORD_KEY, "Item Metadata 3", "<meta b>").unwrap();
        registry.set_string(WORD_KEY, "Item 1", "raw*/drop/Normal.dotx").unwrap();
        registry.set_string(WORD_KEY, "Item 2", "raw*/keep/a.dotx").unwrap();
        registry.set_string(WORD_KEY, "Max Display", "25").unwrap();
        let store = MruStore::new(&registry);

        let cleared = store.rewrite_excluding(
            OfficeApp::Word,
            &["/DROP/normal.dotx".to_string()],
            &NullEmitter,
        );
        assert_eq!(cleared, 4);
        assert_eq!(
            registry.read_string(WORD_KEY, "Item 1").unwrap().as_deref(),
            Some("raw*/keep/a.dotx")
        );
        assert_eq!(
            registry.read_string(WORD_KEY, "Item 2").unwrap().as_deref(),
            Some("raw*/keep/b.dotx")
        );
        assert_eq!(registry.read_string(WORD_KEY, "Item Metadata 1").unwrap(), None);
        assert_eq!(
            registry.read_string(WORD_KEY, "Item Metadata 2").unwrap().as_deref(),
            Some("<meta b>")
        );
        assert_eq!(registry.read_string(WORD_KEY, "Item 3").unwrap(), None);
        assert_eq!(
            registry.read_string(WORD_KEY, "Max Display").unwrap().as_deref(),
            Some("25")
        );
    }

    #[test]
    fn unavailable_registry_is_skipped() {
        let store = MruStore::new(&NullRegistry);
        let (tx, mut rx) = officetpl_events::channel();
        assert_eq!(store.write_entry(OfficeApp::Excel, Path::new("/x.xltx"), &tx), 0);
        assert!(matches!(
            rx.try_recv().unwrap().event,
            AppEvent::Mru(MruEvent::Unavailable {
                app: OfficeApp::Excel
            })
        ));
    }

    /// Memory registry that refuses writes and deletes under one key
    struct FailingKey {
        inner: MemoryRegistry,
        key: &'static str,
    }

    impl FailingKey {
        fn refuse(&self, key: &str, name: &str) -> Result<(), RegistryError> {
            if key.eq_ignore_ascii_case(self.key) {
                Err(RegistryError::ValueWriteFailed {
                    key: key.to_string(),
                    name: name.to_string(),
                    message: "access denied".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl RegistryStore for FailingKey {
        fn read_string(&self, key: &str, name: &str) -> Result<Option<String>, RegistryError> {
            self.inner.read_string(key, name)
        }

        fn values(&self, key: &str) -> Result<Vec<(String, String)>, RegistryError> {
            self.inner.values(key)
        }

        fn subkeys(&self, key: &str) -> Result<Vec<String>, RegistryError> {
            self.inner.subkeys(key)
        }

        fn create_key(&self, key: &str) -> Result<(), RegistryError> {
            self.inner.create_key(key)
        }

        fn set_string(&self, key: &str, name: &str, value: &str) -> Result<(), RegistryError> {
            self.refuse(key, name)?;
            self.inner.set_string(key, name, value)
        }

        fn delete_value(&self, key: &str, name: &str) -> Result<(), RegistryError> {
            self.refuse(key, name)?;
            self.inner.delete_value(key, name)
        }
    }

    fn key_failures(rx: &mut officetpl_events::EventReceiver) -> Vec<String> {
        let mut failed = Vec::new();
        while let Ok(message) = rx.try_recv() {
            if let AppEvent::Mru(MruEvent::KeyFailed { key, .. }) = message.event {
                failed.push(key);
            }
        }
        failed
    }

    #[test]
    fn failed_key_does_not_stop_other_writes() {
        let registry = FailingKey {
            inner: MemoryRegistry::new(),
            key: WORD_KEY,
        };
        let store = MruStore::new(&registry);
        let (tx, mut rx) = officetpl_events::channel();

        let updated = store.write_entry(OfficeApp::Word, Path::new("/t/Letter.dotx"), &tx);
        assert_eq!(updated, 3);
        assert_eq!(key_failures(&mut rx), vec![WORD_KEY.to_string()]);
        assert!(item_paths(&store, WORD_KEY).is_empty());
        let older = r"Software\Microsoft\Office\15.0\Word\Recent Templates\File MRU";
        assert_eq!(item_paths(&store, older), vec!["/t/Letter.dotx".to_string()]);
    }

    #[test]
    fn failed_key_does_not_stop_other_clears() {
        let older = r"Software\Microsoft\Office\15.0\Word\Recent Templates\File MRU";
        let inner = MemoryRegistry::new();
        for key in [WORD_KEY, older] {
            inner.set_string(key, "Item 1", &encode_item("/t/Letter.dotx")).unwrap();
            inner.set_string(key, "Item 2", &encode_item("/t/Keep.dotx")).unwrap();
        }
        let registry = FailingKey {
            inner,
            key: WORD_KEY,
        };
        let store = MruStore::new(&registry);
        let (tx, mut rx) = officetpl_events::channel();

        let cleared = store.rewrite_excluding(OfficeApp::Word, &["/t/Letter.dotx".to_string()], &tx);
        assert_eq!(cleared, 3);
        assert_eq!(key_failures(&mut rx), vec![WORD_KEY.to_string()]);
        assert_eq!(item_paths(&store, older), vec!["/t/Keep.dotx".to_string()]);
        assert_eq!(item_paths(&store, WORD_KEY).len(), 2);
    }

    proptest! {
        #[test]
        fn repeated_writes_keep_lists_bounded(
            writes in proptest::collection::vec("[a-f]{1,2}", 1..25),
        ) {
            let registry = MemoryRegistry::new();
            let store = MruStore::new(&registry);
            for name in &writes {
                let path = format!("/t/{name}.dotx");
                store.write_entry(OfficeApp::Word, Path::new(&path), &NullEmitter);
            }

            let paths = item_paths(&store, WORD_KEY);
            prop_assert!(paths.len() <= 10);
            let last = format!("/t/{}.dotx", writes[writes.len() - 1]);
            prop_assert_eq!(&paths[0], &last);
            let item_values = registry
                .values(WORD_KEY)
                .unwrap()
                .into_iter()
                .filter(|(name, _)| is_item_value(name))
                .count();
            prop_assert_eq!(item_values, paths.len() * 2);
        }
    }
}
