//! The single settings record.

use tally_core::Settings;

use crate::documents::{DocumentKey, DocumentStore, WriteOutcome};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    docs: DocumentStore,
}

impl SettingsStore {
    pub fn new(docs: DocumentStore) -> Self {
        SettingsStore { docs }
    }

    /// Current settings; fields missing from the stored record take defaults.
    pub async fn settings(&self) -> Settings {
        self.docs.load(DocumentKey::Settings, Settings::default).await
    }

    pub async fn set_settings(&self, settings: &Settings) -> WriteOutcome {
        self.docs.save(DocumentKey::Settings, settings).await
    }
}
