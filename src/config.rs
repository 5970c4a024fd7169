use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::{LoadOptions, DRUCKER_METRICS};

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Startup settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub description_path: PathBuf,
    pub name_column: String,
    pub required_metrics: Vec<String>,
    pub default_highlight: String,
    pub default_x_axis: String,
    pub default_y_axis: String,
    /// Metrics listed in the hover tooltip, after the entity name.
    pub tooltip_metrics: Vec<String>,
    pub window_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/drucker_rankings_2017.csv.gz"),
            description_path: PathBuf::from("data/description.html"),
            name_column: "Company".to_string(),
            required_metrics: DRUCKER_METRICS.iter().map(|m| m.to_string()).collect(),
            default_highlight: "Weyerhaeuser".to_string(),
            default_x_axis: "Ranking".to_string(),
            default_y_axis: "Customer Satisfaction".to_string(),
            tooltip_metrics: vec!["Ranking".to_string(), "EFFECTIVENESS".to_string()],
            window_title: "Drucker Company Rankings".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            name_column: self.name_column.clone(),
            required_metrics: self.required_metrics.clone(),
        }
    }
}

/// Read the static description shown above the controls.
///
/// The source is HTML; tags are dropped and a few entities decoded, since the
/// panel renders plain text. A missing file yields `None`.
pub fn load_description(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(html) => Some(strip_markup(&html)),
        Err(e) => {
            log::warn!("No description loaded from {}: {e}", path.display());
            None
        }
    }
}

fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "default_highlight": "Apple", "required_metrics": [] }"#)
            .unwrap();

        let config = DashboardConfig::load_or_default(&path).unwrap();
        assert_eq!(config.default_highlight, "Apple");
        assert!(config.load_options().required_metrics.is_empty());
        assert_eq!(config.default_x_axis, "Ranking");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(DashboardConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn markup_is_stripped() {
        let html = "<div>\n  <h1>Drucker &amp; Co</h1>\n  <p>Scores <b>2017</b></p>\n</div>";
        assert_eq!(strip_markup(html), "Drucker & Co\nScores 2017");
    }

    #[test]
    fn missing_description_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_description(&dir.path().join("description.html")).is_none());
    }
}
