//! Current-user registry access behind a small key/value interface
//!
//! Key paths are relative to `HKEY_CURRENT_USER` and use `\` separators.
//! Only string values are surfaced; values of other types are skipped.

use officetpl_errors::RegistryError;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Key/value store with list semantics over current-user registry keys
pub trait RegistryStore: Send + Sync {
    /// Whether a real store backs this instance
    fn is_available(&self) -> bool {
        true
    }

    /// Read a string value. A missing key or value yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key exists but cannot be read.
    fn read_string(&self, key: &str, name: &str) -> Result<Option<String>, RegistryError>;

    /// String values under `key` in store order. A missing key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the key exists but cannot be enumerated.
    fn values(&self, key: &str) -> Result<Vec<(String, String)>, RegistryError>;

    /// Names of the direct subkeys of `key`. A missing key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the key exists but cannot be enumerated.
    fn subkeys(&self, key: &str) -> Result<Vec<String>, RegistryError>;

    /// Create `key` and any missing ancestors
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be created.
    fn create_key(&self, key: &str) -> Result<(), RegistryError>;

    /// Write a string value, creating the key when needed
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set_string(&self, key: &str, name: &str, value: &str) -> Result<(), RegistryError>;

    /// Delete a value. Deleting a missing value is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be deleted.
    fn delete_value(&self, key: &str, name: &str) -> Result<(), RegistryError>;
}

/// Registry for the current host: the Windows registry on Windows, [`NullRegistry`] elsewhere
#[must_use]
pub fn default_registry() -> Arc<dyn RegistryStore> {
    #[cfg(windows)]
    {
        Arc::new(WindowsRegistry::new())
    }
    #[cfg(not(windows))]
    {
        Arc::new(NullRegistry)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim_matches('\\').to_string()
}

/// Store used where no registry exists; every call reports [`RegistryError::Unavailable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRegistry;

impl RegistryStore for NullRegistry {
    fn is_available(&self) -> bool {
        false
    }

    fn read_string(&self, _key: &str, _name: &str) -> Result<Option<String>, RegistryError> {
        Err(RegistryError::Unavailable)
    }

    fn values(&self, _key: &str) -> Result<Vec<(String, String)>, RegistryError> {
        Err(RegistryError::Unavailable)
    }

    fn subkeys(&self, _key: &str) -> Result<Vec<String>, RegistryError> {
        Err(RegistryError::Unavailable)
    }

    fn create_key(&self, _key: &str) -> Result<(), RegistryError> {
        Err(RegistryError::Unavailable)
    }

    fn set_string(&self, _key: &str, _name: &str, _value: &str) -> Result<(), RegistryError> {
        Err(RegistryError::Unavailable)
    }

    fn delete_value(&self, _key: &str, _name: &str) -> Result<(), RegistryError> {
        Err(RegistryError::Unavailable)
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryKey {
    name: String,
    values: Vec<(String, String)>,
}

/// In-memory store with registry semantics: case-insensitive key and value
/// names, values kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: Mutex<BTreeMap<String, MemoryKey>>,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, MemoryKey>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_key(keys: &mut BTreeMap<String, MemoryKey>, key: &str) {
        let key = normalize_key(key);
        let mut path = String::new();
        for part in key.split('\\').filter(|part| !part.is_empty()) {
            if !path.is_empty() {
                path.push('\\');
            }
            path.push_str(part);
            keys.entry(path.to_lowercase()).or_insert_with(|| MemoryKey {
                name: path.clone(),
                values: Vec::new(),
            });
        }
    }

    /// Whether `key` exists
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(&normalize_key(key).to_lowercase())
    }
}

impl RegistryStore for MemoryRegistry {
    fn read_string(&self, key: &str, name: &str) -> Result<Option<String>, RegistryError> {
        let keys = self.lock();
        Ok(keys
            .get(&normalize_key(key).to_lowercase())
            .and_then(|entry| {
                entry
                    .values
                    .iter()
                    .find(|(value_name, _)| value_name.eq_ignore_ascii_case(name))
            })
            .map(|(_, value)| value.clone()))
    }

    fn values(&self, key: &str) -> Result<Vec<(String, String)>, RegistryError> {
        let keys = self.lock();
        Ok(keys
            .get(&normalize_key(key).to_lowercase())
            .map(|entry| entry.values.clone())
            .unwrap_or_default())
    }

    fn subkeys(&self, key: &str) -> Result<Vec<String>, RegistryError> {
        let prefix = format!("{}\\", normalize_key(key).to_lowercase());
        let keys = self.lock();
        Ok(keys
            .iter()
            .filter_map(|(lower, entry)| {
                let rest = lower.strip_prefix(&prefix)?;
                if rest.is_empty() || rest.contains('\\') {
                    return None;
                }
                entry.name.rsplit('\\').next().map(str::to_string)
            })
            .collect())
    }

    fn create_key(&self, key: &str) -> Result<(), RegistryError> {
        let mut keys = self.lock();
        Self::insert_key(&mut keys, key);
        Ok(())
    }

    fn set_string(&self, key: &str, name: &str, value: &str) -> Result<(), RegistryError> {
        let mut keys = self.lock();
        Self::insert_key(&mut keys, key);
        let lower = normalize_key(key).to_lowercase();
        let Some(entry) = keys.get_mut(&lower) else {
            return Err(RegistryError::KeyOpenFailed {
                key: key.to_string(),
                message: "empty key path".to_string(),
            });
        };
        match entry
            .values
            .iter_mut()
            .find(|(value_name, _)| value_name.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.to_string(),
            None => entry.values.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn delete_value(&self, key: &str, name: &str) -> Result<(), RegistryError> {
        let mut keys = self.lock();
        if let Some(entry) = keys.get_mut(&normalize_key(key).to_lowercase()) {
            entry
                .values
                .retain(|(value_name, _)| !value_name.eq_ignore_ascii_case(name));
        }
        Ok(())
    }
}

#[cfg(windows)]
pub use windows::WindowsRegistry;

#[cfg(windows)]
mod windows {
    use super::{normalize_key, RegistryStore};
    use officetpl_errors::RegistryError;
    use std::io;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_ALL_ACCESS, KEY_READ};
    use winreg::types::FromRegValue;
    use winreg::RegKey;

    /// `HKEY_CURRENT_USER` through `winreg`
    #[derive(Debug)]
    pub struct WindowsRegistry {
        root: RegKey,
    }

    impl WindowsRegistry {
        #[must_use]
        pub fn new() -> Self {
            Self {
                root: RegKey::predef(HKEY_CURRENT_USER),
            }
        }

        fn open(&self, key: &str, flags: u32) -> Result<Option<RegKey>, RegistryError> {
            match self.root.open_subkey_with_flags(normalize_key(key), flags) {
                Ok(handle) => Ok(Some(handle)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(RegistryError::KeyOpenFailed {
                    key: key.to_string(),
                    message: err.to_string(),
                }),
            }
        }

        fn open_for_write(&self, key: &str) -> Result<RegKey, RegistryError> {
            self.root
                .create_subkey_with_flags(normalize_key(key), KEY_ALL_ACCESS)
                .map(|(handle, _)| handle)
                .map_err(|err| RegistryError::KeyOpenFailed {
                    key: key.to_string(),
                    message: err.to_string(),
                })
        }
    }

    impl Default for WindowsRegistry {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RegistryStore for WindowsRegistry {
        fn read_string(&self, key: &str, name: &str) -> Result<Option<String>, RegistryError> {
            let Some(handle) = self.open(key, KEY_READ)? else {
                return Ok(None);
            };
            match handle.get_value::<String, _>(name) {
                Ok(value) => Ok(Some(value)),
                Err(_) => Ok(None),
            }
        }

        fn values(&self, key: &str) -> Result<Vec<(String, String)>, RegistryError> {
            let Some(handle) = self.open(key, KEY_READ)? else {
                return Ok(Vec::new());
            };
            let mut values = Vec::new();
            for entry in handle.enum_values() {
                let (name, raw) = entry.map_err(|err| RegistryError::KeyOpenFailed {
                    key: key.to_string(),
                    message: err.to_string(),
                })?;
                if let Ok(value) = String::from_reg_value(&raw) {
                    values.push((name, value));
                }
            }
            Ok(values)
        }

        fn subkeys(&self, key: &str) -> Result<Vec<String>, RegistryError> {
            let Some(handle) = self.open(key, KEY_READ)? else {
                return Ok(Vec::new());
            };
            handle
                .enum_keys()
                .collect::<io::Result<Vec<_>>>()
                .map_err(|err| RegistryError::KeyOpenFailed {
                    key: key.to_string(),
                    message: err.to_string(),
                })
        }

        fn create_key(&self, key: &str) -> Result<(), RegistryError> {
            self.open_for_write(key).map(|_| ())
        }

        fn set_string(&self, key: &str, name: &str, value: &str) -> Result<(), RegistryError> {
            let handle = self.open_for_write(key)?;
            handle
                .set_value(name, &value)
                .map_err(|err| RegistryError::ValueWriteFailed {
                    key: key.to_string(),
                    name: name.to_string(),
                    message: err.to_string(),
                })
        }

        fn delete_value(&self, key: &str, name: &str) -> Result<(), RegistryError> {
            let Some(handle) = self.open(key, KEY_ALL_ACCESS)? else {
                return Ok(());
            };
            match handle.delete_value(name) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(RegistryError::ValueDeleteFailed {
                    key: key.to_string(),
                    name: name.to_string(),
                    message: err.to_string(),
                }),
            }
        }
    }
}
