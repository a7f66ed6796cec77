// SPDX-License-Identifier: MPL-2.0
//! Language resolution for the control panel.
//!
//! The active language is decided fresh on every call from three signals,
//! first match wins: an explicit `lang` URL parameter, the numeric
//! preference attribute on the panel header, and finally the locale
//! reported by the hosting environment. Resolution never fails: every
//! malformed or out-of-range input defers to the next tier.

use crate::page::PageEnv;
use unic_langid::LanguageIdentifier;

/// Language used when nothing else matches.
pub const DEFAULT_LANG: &str = "en";

/// Languages the panel ships catalogs for. Order matters: the numeric
/// preference attribute indexes into this list after an `"auto"` sentinel
/// is prepended at position 0.
pub const AVAILABLE_LANGS: [&str; 2] = ["de", "en"];

/// Query parameter that forces a language, e.g. `?lang=de`.
pub const LANG_QUERY_PARAM: &str = "lang";

/// Attribute on the panel header carrying the stored preference index.
pub const LANG_ATTRIBUTE: &str = "lang";

/// Checks whether a given language code is supported.
///
/// Useful with untrusted inputs such as URL parameters.
#[must_use]
pub fn is_supported(lang: &str) -> bool {
    AVAILABLE_LANGS.contains(&lang)
}

/// Returns the supported language matching the environment's reported
/// locale, or [`DEFAULT_LANG`] when the locale is absent, malformed, or not
/// supported.
///
/// Only the primary subtag is considered: `"de-DE"` counts as `"de"`.
pub fn browser_lang<E: PageEnv + ?Sized>(env: &E) -> &'static str {
    let Some(raw) = env.locale() else {
        return DEFAULT_LANG;
    };

    // Some platforms report underscore-separated locales like "de_DE".
    let normalized = raw.trim().replace('_', "-");
    let Ok(locale) = normalized.parse::<LanguageIdentifier>() else {
        return DEFAULT_LANG;
    };

    let primary = locale.language.as_str();
    AVAILABLE_LANGS
        .iter()
        .find(|lang| **lang == primary)
        .copied()
        .unwrap_or(DEFAULT_LANG)
}

/// Resolves the active language, first match wins:
///
/// 1. A supported `lang` URL parameter.
/// 2. The header preference attribute, a 1-based index into
///    [`AVAILABLE_LANGS`] (`"0"` means "auto" and defers, as does anything
///    absent, malformed, or out of range).
/// 3. The environment locale via [`browser_lang`].
pub fn resolve<E: PageEnv + ?Sized>(env: &E) -> &'static str {
    if let Some(param) = env.query_param(LANG_QUERY_PARAM) {
        if let Some(lang) = AVAILABLE_LANGS.iter().find(|lang| **lang == param).copied() {
            return lang;
        }
    }

    if let Some(marker) = env.page_attribute(LANG_ATTRIBUTE) {
        if let Ok(index) = marker.trim().parse::<usize>() {
            if (1..=AVAILABLE_LANGS.len()).contains(&index) {
                return AVAILABLE_LANGS[index - 1];
            }
        }
    }

    browser_lang(env)
}
