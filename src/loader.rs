// SPDX-License-Identifier: MPL-2.0
//! One-shot loading of the per-language translation resource scripts.
//!
//! The loader resolves the active language once, builds the ordered resource
//! URL list, and dispatches it through one of two strategies:
//!
//! - **Parser-time**: while the document is still being parsed, one inline
//!   script-inclusion directive per resource is spliced into the parse
//!   stream. The host's parser preserves execution order, so the completion
//!   signal settles immediately after the burst of writes.
//! - **Fallback**: after parsing, script elements are appended one at a
//!   time; the next resource is requested only once the previous one has
//!   loaded or failed. A failed resource is skipped, never retried, and
//!   never fails the signal.
//!
//! Both strategies avoid synchronous network requests on the UI thread, and
//! the parser-time path is guarded by the document phase: splicing markup
//! into a finished document can wipe it.

use crate::lang;
use crate::page::{DocumentHost, DocumentPhase, ScriptOutcome, ScriptRequest};
use crate::registry::{self, TranslationRegistry};
use futures_util::future::{self, BoxFuture, Shared};
use futures_util::FutureExt;
use std::sync::{Arc, OnceLock};
use tokio::sync::oneshot;

/// Path prefix the per-language resource directories live under.
pub const RESOURCE_BASE_PATH: &str = "/webui/js/lang";

/// The translation catalogs, in load order. Later catalogs may build on
/// earlier ones when consumed by the panel, so the order is kept stable, but
/// no dependency between them is enforced here.
pub const RESOURCE_MANIFEST: [&str; 12] = [
    "translate.lang.js",
    "translate.lang.extension.js",
    "translate.lang.deviceDescription.js",
    "translate.lang.group.js",
    "translate.lang.system.js",
    "translate.lang.channelDescription.js",
    "translate.lang.help.js",
    "translate.lang.option.js",
    "translate.lang.label.js",
    "translate.lang.stringtable.js",
    "translate.lang.diagram.js",
    "translate.lang.notTranslated.js",
];

/// Settle-once completion signal for the resource load. Clones all observe
/// the same settlement; awaiting after settlement completes immediately.
pub type LoadSignal = Shared<BoxFuture<'static, ()>>;

/// Dispatches the language resources for one page lifetime.
///
/// The first [`ensure_loaded`](Self::ensure_loaded) call does all the work;
/// every later call returns the same signal without touching the document
/// again.
pub struct ResourceLoader {
    base_path: String,
    registry: Arc<TranslationRegistry>,
    signal: OnceLock<LoadSignal>,
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader {
    /// Creates a loader over the default base path and the process-wide
    /// registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_path: RESOURCE_BASE_PATH.to_string(),
            registry: registry::shared(),
            signal: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<TranslationRegistry>) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Ensures the resource scripts for the resolved language are
    /// dispatched, returning the completion signal.
    ///
    /// Idempotent: only the first call for this loader resolves the
    /// language, seeds the registry placeholders, and injects scripts.
    pub fn ensure_loaded<H>(&self, host: Arc<H>) -> LoadSignal
    where
        H: DocumentHost + 'static,
    {
        self.signal.get_or_init(|| self.dispatch(host)).clone()
    }

    fn dispatch<H>(&self, host: Arc<H>) -> LoadSignal
    where
        H: DocumentHost + 'static,
    {
        let active = lang::resolve(host.as_ref());
        self.registry.seed_placeholders(active);

        let requests = self.manifest_requests(active);
        tracing::debug!(
            language = active,
            resources = requests.len(),
            "dispatching language resources"
        );

        if host.phase() == DocumentPhase::Parsing && host.supports_markup_injection() {
            // The parser executes the scripts in document order; from the
            // loader's point of view dispatch is already done.
            for request in &requests {
                host.write_markup(&request.to_markup());
            }
            return future::ready(()).boxed().shared();
        }

        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(async move {
            for request in requests {
                match host.append_script(&request).await {
                    ScriptOutcome::Loaded => {
                        tracing::debug!(url = %request.url, "language resource loaded");
                    }
                    ScriptOutcome::Failed => {
                        tracing::warn!(url = %request.url, "language resource failed to load");
                    }
                }
            }
            let _ = done_tx.send(());
        });
        done_rx.map(|_| ()).boxed().shared()
    }

    fn manifest_requests(&self, active: &str) -> Vec<ScriptRequest> {
        RESOURCE_MANIFEST
            .iter()
            .map(|resource| ScriptRequest::new(format!("{}/{}/{}", self.base_path, active, resource)))
            .collect()
    }
}

static PAGE_LOADER: OnceLock<ResourceLoader> = OnceLock::new();

/// Process-wide entry point: dispatches the language resources once per
/// page lifetime and hands back the shared completion signal.
pub fn ensure_resources_loaded<H>(host: Arc<H>) -> LoadSignal
where
    H: DocumentHost + 'static,
{
    PAGE_LOADER
        .get_or_init(ResourceLoader::default)
        .ensure_loaded(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageEnv;
    use std::sync::Mutex;

    #[derive(Default)]
    struct AttemptLog {
        issued: Vec<String>,
        settled: usize,
    }

    /// Scripted document host that records every markup write and script
    /// attempt, and asserts strict sequencing of the fallback loop.
    struct FakeDocument {
        phase: DocumentPhase,
        markup_allowed: bool,
        lang_param: Option<&'static str>,
        fail_indexes: Vec<usize>,
        stream: Mutex<Vec<String>>,
        log: Arc<Mutex<AttemptLog>>,
    }

    impl FakeDocument {
        fn new(phase: DocumentPhase) -> Self {
            Self {
                phase,
                markup_allowed: true,
                lang_param: Some("de"),
                fail_indexes: Vec::new(),
                stream: Mutex::new(Vec::new()),
                log: Arc::new(Mutex::new(AttemptLog::default())),
            }
        }

        fn failing_at(mut self, indexes: &[usize]) -> Self {
            self.fail_indexes = indexes.to_vec();
            self
        }

        fn without_markup_injection(mut self) -> Self {
            self.markup_allowed = false;
            self
        }

        fn issued(&self) -> Vec<String> {
            self.log.lock().unwrap().issued.clone()
        }

        fn stream(&self) -> Vec<String> {
            self.stream.lock().unwrap().clone()
        }
    }

    impl PageEnv for FakeDocument {
        fn locale(&self) -> Option<String> {
            None
        }

        fn query_param(&self, key: &str) -> Option<String> {
            (key == lang::LANG_QUERY_PARAM)
                .then_some(self.lang_param)
                .flatten()
                .map(str::to_string)
        }

        fn page_attribute(&self, _name: &str) -> Option<String> {
            None
        }
    }

    impl DocumentHost for FakeDocument {
        fn phase(&self) -> DocumentPhase {
            self.phase
        }

        fn supports_markup_injection(&self) -> bool {
            self.markup_allowed
        }

        fn write_markup(&self, markup: &str) {
            self.stream.lock().unwrap().push(markup.to_string());
        }

        fn append_script(&self, request: &ScriptRequest) -> BoxFuture<'static, ScriptOutcome> {
            let log = Arc::clone(&self.log);
            let outcome = {
                let mut log = log.lock().unwrap();
                assert_eq!(
                    log.issued.len(),
                    log.settled,
                    "a request was issued before the previous one settled"
                );
                let index = log.issued.len();
                log.issued.push(request.url.clone());
                if self.fail_indexes.contains(&index) {
                    ScriptOutcome::Failed
                } else {
                    ScriptOutcome::Loaded
                }
            };
            Box::pin(async move {
                log.lock().unwrap().settled += 1;
                outcome
            })
        }
    }

    fn expected_urls(base: &str, active: &str) -> Vec<String> {
        RESOURCE_MANIFEST
            .iter()
            .map(|resource| format!("{base}/{active}/{resource}"))
            .collect()
    }

    fn test_loader() -> ResourceLoader {
        ResourceLoader::new().with_registry(Arc::new(TranslationRegistry::default()))
    }

    #[tokio::test]
    async fn fallback_loads_every_resource_in_manifest_order() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Complete));
        test_loader().ensure_loaded(Arc::clone(&host)).await;

        assert_eq!(host.issued(), expected_urls(RESOURCE_BASE_PATH, "de"));
        assert!(host.stream().is_empty());
    }

    #[tokio::test]
    async fn failed_resource_does_not_abort_or_reorder_the_sequence() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Complete).failing_at(&[2]));
        test_loader().ensure_loaded(Arc::clone(&host)).await;

        assert_eq!(host.issued(), expected_urls(RESOURCE_BASE_PATH, "de"));
        assert_eq!(host.log.lock().unwrap().settled, RESOURCE_MANIFEST.len());
    }

    #[tokio::test]
    async fn repeated_calls_dispatch_only_once() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Complete));
        let loader = test_loader();

        let first = loader.ensure_loaded(Arc::clone(&host));
        let second = loader.ensure_loaded(Arc::clone(&host));
        first.await;
        second.await;

        assert_eq!(host.issued().len(), RESOURCE_MANIFEST.len());

        // Still settled, still no new work, after the fact.
        loader.ensure_loaded(Arc::clone(&host)).await;
        assert_eq!(host.issued().len(), RESOURCE_MANIFEST.len());
    }

    #[test]
    fn parser_time_emits_all_markup_before_settling() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Parsing));
        let signal = test_loader().ensure_loaded(Arc::clone(&host));

        // Already settled: dispatch was a synchronous burst of writes.
        assert_eq!(signal.now_or_never(), Some(()));

        let expected: Vec<String> = expected_urls(RESOURCE_BASE_PATH, "de")
            .into_iter()
            .map(|url| ScriptRequest::new(url).to_markup())
            .collect();
        assert_eq!(host.stream(), expected);
        assert!(host.issued().is_empty());
    }

    #[tokio::test]
    async fn parsing_without_markup_injection_uses_fallback() {
        let host = Arc::new(
            FakeDocument::new(DocumentPhase::Parsing).without_markup_injection(),
        );
        test_loader().ensure_loaded(Arc::clone(&host)).await;

        assert!(host.stream().is_empty());
        assert_eq!(host.issued().len(), RESOURCE_MANIFEST.len());
    }

    #[tokio::test]
    async fn interactive_documents_use_fallback() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Interactive));
        test_loader().ensure_loaded(Arc::clone(&host)).await;

        assert!(host.stream().is_empty());
        assert_eq!(host.issued().len(), RESOURCE_MANIFEST.len());
    }

    #[tokio::test]
    async fn placeholders_are_seeded_for_non_selected_languages() {
        let registry = Arc::new(TranslationRegistry::default());
        let loader = ResourceLoader::new().with_registry(Arc::clone(&registry));
        let host = Arc::new(FakeDocument::new(DocumentPhase::Complete));
        loader.ensure_loaded(host).await;

        assert!(!registry.has_language("de"));
        assert_eq!(registry.text_count("en"), Some(0));
    }

    #[tokio::test]
    async fn urls_follow_the_base_lang_file_scheme() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Complete));
        test_loader().ensure_loaded(Arc::clone(&host)).await;

        let issued = host.issued();
        assert_eq!(issued[0], "/webui/js/lang/de/translate.lang.js");
        assert_eq!(issued[1], "/webui/js/lang/de/translate.lang.extension.js");
    }

    #[tokio::test]
    async fn custom_base_path_is_honored() {
        let host = Arc::new(FakeDocument::new(DocumentPhase::Complete));
        test_loader()
            .with_base_path("/panel/lang")
            .ensure_loaded(Arc::clone(&host))
            .await;

        assert_eq!(host.issued(), expected_urls("/panel/lang", "de"));
    }
}
