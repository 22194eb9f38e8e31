//! Name-to-token lookup over the installed voices.

use std::collections::BTreeMap;

use crate::backend::{BackendError, SpeechBackend};

/// Installed voices keyed by their description.
///
/// Owns every token it holds. Tokens are released by [`release_all`] or,
/// on any other exit path, when the registry is dropped.
///
/// [`release_all`]: VoiceRegistry::release_all
#[derive(Debug)]
pub struct VoiceRegistry<T> {
    voices: BTreeMap<String, T>,
}

impl<T> VoiceRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            voices: BTreeMap::new(),
        }
    }

    /// Fill the registry from the backend's voices category.
    ///
    /// A voice whose description cannot be read is released and skipped.
    /// Only a failure to enumerate the category itself is returned. When two
    /// voices share a description the later one wins.
    ///
    /// # Returns
    /// The number of voices now registered.
    pub fn enumerate<B>(&mut self, backend: &B) -> Result<usize, BackendError>
    where
        B: SpeechBackend<Token = T>,
    {
        for token in backend.voice_tokens()? {
            match backend.describe(&token) {
                Ok(name) => {
                    tracing::debug!(voice = %name, "Registered voice");
                    if self.voices.insert(name.clone(), token).is_some() {
                        tracing::debug!(voice = %name, "Replaced voice with duplicate name");
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping voice without description");
                }
            }
        }

        Ok(self.voices.len())
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.voices.get(name)
    }

    /// All registered names in lexicographic order.
    pub fn list_names(&self) -> Vec<&str> {
        self.voices.keys().map(String::as_str).collect()
    }

    /// Number of registered voices.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Whether no voice was registered.
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Release every held token.
    ///
    /// # Returns
    /// The number of tokens released.
    pub fn release_all(self) -> usize {
        let released = self.voices.len();
        drop(self.voices);
        tracing::debug!(released, "Released voice tokens");
        released
    }
}

impl<T> Default for VoiceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
