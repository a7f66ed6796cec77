// SPDX-License-Identifier: MPL-2.0
//! Shared translation namespaces.
//!
//! Two buckets per language: `texts` for translated strings and
//! `identifiers` for the secondary identifier mapping. The loaded resource
//! scripts populate them; this crate only pre-creates empty buckets for the
//! non-selected languages so a later "is this language loaded" probe never
//! hits a missing key. Buckets are add-only: once created they are never
//! replaced or removed.

use crate::lang::AVAILABLE_LANGS;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

type Bucket = HashMap<String, String>;

/// Process-wide shared registry instance.
static SHARED: LazyLock<Arc<TranslationRegistry>> =
    LazyLock::new(|| Arc::new(TranslationRegistry::default()));

/// Returns the process-wide registry the loaded resource scripts write into.
#[must_use]
pub fn shared() -> Arc<TranslationRegistry> {
    Arc::clone(&SHARED)
}

#[derive(Debug, Default)]
pub struct TranslationRegistry {
    texts: RwLock<HashMap<String, Bucket>>,
    identifiers: RwLock<HashMap<String, Bucket>>,
}

impl TranslationRegistry {
    /// Pre-creates empty buckets for every supported language except the
    /// active one. Existing buckets are left untouched.
    pub fn seed_placeholders(&self, active: &str) {
        let mut texts = self.texts.write().unwrap();
        let mut identifiers = self.identifiers.write().unwrap();
        for lang in AVAILABLE_LANGS {
            if lang != active {
                texts.entry(lang.to_string()).or_default();
                identifiers.entry(lang.to_string()).or_default();
            }
        }
    }

    /// Whether a text bucket exists for the given language, populated or
    /// not.
    #[must_use]
    pub fn has_language(&self, lang: &str) -> bool {
        self.texts.read().unwrap().contains_key(lang)
    }

    /// Languages with at least a placeholder bucket, in no particular
    /// order.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.texts.read().unwrap().keys().cloned().collect()
    }

    pub fn insert_text(&self, lang: &str, key: impl Into<String>, value: impl Into<String>) {
        self.texts
            .write()
            .unwrap()
            .entry(lang.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    #[must_use]
    pub fn text(&self, lang: &str, key: &str) -> Option<String> {
        self.texts.read().unwrap().get(lang)?.get(key).cloned()
    }

    pub fn insert_identifier(&self, lang: &str, key: impl Into<String>, value: impl Into<String>) {
        self.identifiers
            .write()
            .unwrap()
            .entry(lang.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    #[must_use]
    pub fn identifier(&self, lang: &str, key: &str) -> Option<String> {
        self.identifiers.read().unwrap().get(lang)?.get(key).cloned()
    }

    /// Number of entries in a language's text bucket, `None` if the bucket
    /// does not exist.
    #[must_use]
    pub fn text_count(&self, lang: &str) -> Option<usize> {
        self.texts.read().unwrap().get(lang).map(Bucket::len)
    }
}
