use std::{collections::HashMap, fmt, fs, io, path::Path, str::FromStr};

use anyhow::{bail, Context};
use shared::domain::SortSelection;

use crate::fetcher::{
    CatalogEndpoints, DEFAULT_LIST_URL, DEFAULT_SEARCH_PARAM, DEFAULT_SEARCH_URL,
};

pub const DEFAULT_SETTINGS_FILE: &str = "catalog.toml";

/// Which of the two catalog views to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Server order, no sort control.
    Plain,
    /// Keeps the last collection and orders it by price.
    #[default]
    Sortable,
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "sortable" => Ok(Self::Sortable),
            other => bail!("unknown view mode '{other}' (expected 'plain' or 'sortable')"),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Sortable => "sortable",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub list_url: String,
    pub search_url: String,
    pub search_param: String,
    pub view_mode: ViewMode,
    pub sort_selection: SortSelection,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.into(),
            search_url: DEFAULT_SEARCH_URL.into(),
            search_param: DEFAULT_SEARCH_PARAM.into(),
            view_mode: ViewMode::default(),
            sort_selection: SortSelection::default(),
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> CatalogEndpoints {
        CatalogEndpoints {
            list_url: self.list_url.clone(),
            search_url: self.search_url.clone(),
            search_param: self.search_param.clone(),
        }
    }
}

/// Defaults, then the settings file, then environment overrides.
///
/// Without an explicit `path`, a missing `catalog.toml` is not an error.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(file) {
        Ok(raw) => apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", file.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && path.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", file.display()))
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub(crate) fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("list_url") {
        settings.list_url = v.clone();
    }
    if let Some(v) = file_cfg.get("search_url") {
        settings.search_url = v.clone();
    }
    if let Some(v) = file_cfg.get("search_param") {
        settings.search_param = v.clone();
    }
    if let Some(v) = file_cfg.get("view_mode") {
        settings.view_mode = v.parse()?;
    }
    if let Some(v) = file_cfg.get("sort_selection") {
        settings.sort_selection = SortSelection::new(v.clone());
    }
    Ok(())
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let pick = |short: &str, app: &str| lookup(app).or_else(|| lookup(short));

    if let Some(v) = pick("CATALOG_LIST_URL", "APP__LIST_URL") {
        settings.list_url = v;
    }
    if let Some(v) = pick("CATALOG_SEARCH_URL", "APP__SEARCH_URL") {
        settings.search_url = v;
    }
    if let Some(v) = lookup("APP__SEARCH_PARAM") {
        settings.search_param = v;
    }
    if let Some(v) = pick("CATALOG_VIEW_MODE", "APP__VIEW_MODE") {
        settings.view_mode = v
            .parse()
            .context("invalid view mode in environment")?;
    }
    if let Some(v) = pick("CATALOG_SORT", "APP__SORT_SELECTION") {
        settings.sort_selection = SortSelection::new(v);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
