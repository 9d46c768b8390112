use std::sync::RwLock;

use domains::{Settings, SettingsProvider};

/// Settings held in memory, seeded from configuration.
///
/// Readers always get the current value; `replace` swaps it for everyone.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    current: RwLock<Settings>,
}

impl InMemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RwLock::new(settings),
        }
    }

    pub fn replace(&self, settings: Settings) {
        match self.current.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}

impl SettingsProvider for InMemorySettings {
    fn settings(&self) -> Settings {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
