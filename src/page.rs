// SPDX-License-Identifier: MPL-2.0
//! Capability surface between the loader and the hosting document.
//!
//! The loader never talks to a browser directly. Everything it needs from
//! the page (environment signals, the document lifecycle phase, and script
//! injection) is expressed through the traits in this module, so resolution
//! and loading stay testable with scripted fixtures.

use futures_util::future::BoxFuture;

/// Charset declared on every resource request. The translation catalogs are
/// legacy single-byte encoded assets.
pub const SCRIPT_CHARSET: &str = "ISO-8859-1";

/// Lifecycle phase of the hosting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPhase {
    /// The document is still being parsed; markup can be spliced into the
    /// parse stream.
    Parsing,
    /// Parsing is done but subresources are still loading.
    Interactive,
    /// The document has finished loading.
    Complete,
}

impl DocumentPhase {
    #[must_use]
    pub fn is_parsing(self) -> bool {
        matches!(self, DocumentPhase::Parsing)
    }
}

/// Unified "attempt settled" event for a script load. Load and error
/// notifications collapse into one outcome; the loader treats both the same
/// for sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    Loaded,
    Failed,
}

/// One script-inclusion request: the resource URL plus the charset the
/// request must declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub url: String,
    pub charset: &'static str,
}

impl ScriptRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            charset: SCRIPT_CHARSET,
        }
    }

    /// Renders the inline script-inclusion directive emitted in parser-time
    /// mode.
    #[must_use]
    pub fn to_markup(&self) -> String {
        format!(
            r#"<script type="text/javascript" charset="{}" src="{}"></script>"#,
            self.charset, self.url
        )
    }
}

/// Read-only environment signals used for language resolution.
pub trait PageEnv {
    /// The locale reported by the hosting environment, e.g. `"de-DE"`.
    fn locale(&self) -> Option<String>;

    /// A parameter from the page URL's query string.
    fn query_param(&self, key: &str) -> Option<String>;

    /// An attribute read from the designated page element (the panel
    /// header).
    fn page_attribute(&self, name: &str) -> Option<String>;
}

/// A document the loader can inject scripts into.
pub trait DocumentHost: PageEnv + Send + Sync {
    fn phase(&self) -> DocumentPhase;

    /// Whether markup can be spliced into the parse stream at all. Hosts
    /// without that primitive return `false` and always get the sequential
    /// fallback.
    fn supports_markup_injection(&self) -> bool {
        true
    }

    /// Splices markup directly into the document's parse stream.
    ///
    /// Only called while [`DocumentPhase::Parsing`]: outside the parsing
    /// phase this primitive can implicitly reopen and wipe the document.
    fn write_markup(&self, markup: &str);

    /// Appends a script element and resolves once it has loaded or failed.
    fn append_script(&self, request: &ScriptRequest) -> BoxFuture<'static, ScriptOutcome>;
}
