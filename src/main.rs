// SPDX-License-Identifier: MPL-2.0
use lang_bootstrap::error::{Error, Result};
use lang_bootstrap::host::LocalPage;
use lang_bootstrap::loader::ResourceLoader;
use lang_bootstrap::page::{DocumentPhase, ScriptOutcome};
use lang_bootstrap::{config, lang};
use std::path::PathBuf;
use std::sync::Arc;

struct Flags {
    phase: Option<String>,
    lang: Option<String>,
    marker: Option<String>,
    locale: Option<String>,
    root: Option<String>,
    base_path: Option<String>,
}

fn parse_phase(raw: Option<&str>) -> Result<DocumentPhase> {
    match raw {
        None | Some("complete") => Ok(DocumentPhase::Complete),
        Some("interactive") => Ok(DocumentPhase::Interactive),
        Some("parsing") => Ok(DocumentPhase::Parsing),
        Some(other) => Err(Error::Args(format!(
            "unknown phase '{other}' (expected parsing, interactive, or complete)"
        ))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        phase: args.opt_value_from_str("--phase")?,
        lang: args.opt_value_from_str("--lang")?,
        marker: args.opt_value_from_str("--marker")?,
        locale: args.opt_value_from_str("--locale")?,
        root: args.opt_value_from_str("--root")?,
        base_path: args.opt_value_from_str("--base-path")?,
    };

    let settings = config::load().unwrap_or_default();
    let phase = parse_phase(flags.phase.as_deref())?;

    let mut page = LocalPage::new(phase);
    if let Some(locale) = flags.locale {
        page = page.with_locale(Some(locale));
    }
    if let Some(value) = flags.lang {
        page = page.with_query_param(lang::LANG_QUERY_PARAM, value);
    }
    if let Some(marker) = flags.marker {
        page = page.with_attribute(lang::LANG_ATTRIBUTE, marker);
    }
    if let Some(root) = flags.root.map(PathBuf::from).or(settings.web_root) {
        page = page.with_web_root(root);
    }

    let mut loader = ResourceLoader::new();
    if let Some(base_path) = flags.base_path.or(settings.base_path) {
        loader = loader.with_base_path(base_path);
    }

    let page = Arc::new(page);
    println!("Resolved language: {}", lang::resolve(page.as_ref()));

    loader.ensure_loaded(Arc::clone(&page)).await;

    if phase.is_parsing() {
        println!("Parse stream:");
        for markup in page.parse_stream() {
            println!("  {markup}");
        }
    } else {
        println!("Script attempts:");
        for attempt in page.attempts() {
            let outcome = match attempt.outcome {
                ScriptOutcome::Loaded => "loaded",
                ScriptOutcome::Failed => "failed",
            };
            println!("  {} {}", outcome, attempt.url);
        }
    }

    Ok(())
}
