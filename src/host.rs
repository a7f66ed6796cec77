// SPDX-License-Identifier: MPL-2.0
//! Directory-backed document host.
//!
//! [`LocalPage`] stands in for the hosting page when the loader runs outside
//! a browser: environment signals are scripted (the locale defaults to the
//! system locale), markup writes are captured into an in-memory parse
//! stream, and appended scripts are probed against a local copy of the web
//! root. The CLI harness and the integration tests run against it.

use crate::page::{DocumentHost, DocumentPhase, PageEnv, ScriptOutcome, ScriptRequest};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One recorded script attempt, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAttempt {
    pub url: String,
    pub outcome: ScriptOutcome,
}

pub struct LocalPage {
    phase: DocumentPhase,
    locale: Option<String>,
    query: HashMap<String, String>,
    attributes: HashMap<String, String>,
    web_root: Option<PathBuf>,
    stream: Mutex<Vec<String>>,
    attempts: Arc<Mutex<Vec<ScriptAttempt>>>,
}

impl LocalPage {
    /// Creates a page in the given lifecycle phase, reporting the system
    /// locale.
    #[must_use]
    pub fn new(phase: DocumentPhase) -> Self {
        Self {
            phase,
            locale: sys_locale::get_locale(),
            query: HashMap::new(),
            attributes: HashMap::new(),
            web_root: None,
            stream: Mutex::new(Vec::new()),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Overrides the reported locale; `None` simulates an environment that
    /// reports no locale at all.
    #[must_use]
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Serves resource probes from a local directory: a request for
    /// `/webui/js/lang/de/x.js` checks `<root>/webui/js/lang/de/x.js`.
    /// Without a root every probe reports success.
    #[must_use]
    pub fn with_web_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.web_root = Some(root.into());
        self
    }

    /// Markup spliced into the parse stream so far, in write order.
    #[must_use]
    pub fn parse_stream(&self) -> Vec<String> {
        self.stream.lock().unwrap().clone()
    }

    /// Script attempts so far, in dispatch order.
    #[must_use]
    pub fn attempts(&self) -> Vec<ScriptAttempt> {
        self.attempts.lock().unwrap().clone()
    }
}

impl PageEnv for LocalPage {
    fn locale(&self) -> Option<String> {
        self.locale.clone()
    }

    fn query_param(&self, key: &str) -> Option<String> {
        self.query.get(key).cloned()
    }

    fn page_attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

impl DocumentHost for LocalPage {
    fn phase(&self) -> DocumentPhase {
        self.phase
    }

    fn write_markup(&self, markup: &str) {
        self.stream.lock().unwrap().push(markup.to_string());
    }

    fn append_script(&self, request: &ScriptRequest) -> BoxFuture<'static, ScriptOutcome> {
        let attempts = Arc::clone(&self.attempts);
        let url = request.url.clone();
        let probe = self
            .web_root
            .as_ref()
            .map(|root| root.join(url.trim_start_matches('/')));
        Box::pin(async move {
            let outcome = match &probe {
                Some(path) if path.is_file() => ScriptOutcome::Loaded,
                Some(_) => ScriptOutcome::Failed,
                None => ScriptOutcome::Loaded,
            };
            attempts.lock().unwrap().push(ScriptAttempt {
                url,
                outcome,
            });
            outcome
        })
    }
}
