// SPDX-License-Identifier: MPL-2.0
//! Configuration for the CLI harness, loaded from and saved to a
//! `settings.toml` file.
//!
//! Only harness concerns live here: where the local web root sits and which
//! base path the resource URLs are built under. Language selection is never
//! configured; it is resolved from the page environment on every load.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "LangBootstrap";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base path prefix for resource URLs; the built-in default is used
    /// when absent.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Directory holding a local copy of the web root, used to probe
    /// whether a requested resource actually exists.
    #[serde(default)]
    pub web_root: Option<PathBuf>,
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
