//! Site configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::widget::WidgetInstance;

/// Site-wide configuration, loaded from `site.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public domain name of the site, e.g. "example.org"
    pub domain: String,

    /// Languages the site is published in, in menu order
    pub languages: Vec<String>,

    /// Language served at the site root
    pub main_language: String,

    /// Language used when a translation is missing
    pub default_language: String,

    /// Name of the home page
    pub home_page: String,

    /// Pre-render pages to fixed output instead of serving them dynamically
    pub static_export: bool,

    /// Root folder of the site; holds the `assets/` tier
    pub site_root: PathBuf,

    /// Folder containing one package folder per widget type
    pub widgets_dir: PathBuf,

    /// Markup dictionary file name inside a widget package
    pub markup_dict_filename: String,

    /// URL prefix of site-level assets
    pub assets_url_prefix: String,

    /// URL prefix of widget-package assets
    pub widgets_url_prefix: String,

    /// Candidate widths for responsive images in static export mode
    pub image_widths: Vec<u32>,

    /// Widget types rendered into the page head
    pub head_widgets: Vec<String>,

    /// Per-widget settings, one table per widget type
    pub settings: toml::Table,

    /// Pages known to the site
    pub pages: Vec<PageEntry>,

    /// Widgets placed on every page
    pub widgets: Vec<WidgetInstance>,
}

/// A page declared in the site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    /// Page name, unique within the site
    pub name: String,

    /// Marks the home page
    #[serde(default)]
    pub home: bool,

    /// Page title keyed by language
    #[serde(default)]
    pub titles: BTreeMap<String, String>,

    /// Page-specific settings
    #[serde(default)]
    pub settings: toml::Table,
}

impl PageEntry {
    /// Page with no title or settings
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            home: false,
            titles: BTreeMap::new(),
            settings: toml::Table::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut home = PageEntry::new("index");
        home.home = true;
        home.titles.insert("en".to_string(), "Home".to_string());

        Self {
            domain: "localhost".to_string(),
            languages: vec!["en".to_string()],
            main_language: "en".to_string(),
            default_language: "en".to_string(),
            home_page: "index".to_string(),
            static_export: false,
            site_root: PathBuf::from("."),
            widgets_dir: PathBuf::from("widgets"),
            markup_dict_filename: "markup.json".to_string(),
            assets_url_prefix: "assets".to_string(),
            widgets_url_prefix: "widgets".to_string(),
            image_widths: vec![480, 960, 1920],
            head_widgets: Vec::new(),
            settings: toml::Table::new(),
            pages: vec![home],
            widgets: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from the default location or create it
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            info!(path = %config_path.display(), "Created default site config");
            Ok(config)
        }
    }

    /// Load configuration from an explicit file
    ///
    /// Relative `site_root` and `widgets_dir` are resolved against the
    /// folder containing the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }

        config.validate().context("Invalid site configuration")?;
        debug!(path = %path.display(), languages = ?config.languages, "Loaded site config");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a file, creating parent folders
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("site-widget").join("site.toml"))
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> ConfigResult<()> {
        if self.languages.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one language is required".to_string(),
            ));
        }

        for (field, lang) in [
            ("main_language", &self.main_language),
            ("default_language", &self.default_language),
        ] {
            if !self.languages.contains(lang) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} '{}' is not one of {:?}",
                    field, lang, self.languages
                )));
            }
        }

        if self.image_widths.iter().any(|w| *w == 0) {
            return Err(ConfigError::InvalidValue(
                "image_widths must be non-zero".to_string(),
            ));
        }

        if self.markup_dict_filename.is_empty() {
            return Err(ConfigError::InvalidValue(
                "markup_dict_filename must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Widgets that are enabled in configuration
    pub fn enabled_widgets(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.widgets.iter().filter(|w| w.enabled)
    }

    /// Folder holding site-level assets
    pub fn site_assets_dir(&self) -> PathBuf {
        self.site_root.join("assets")
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.site_root.is_relative() {
            self.site_root = base.join(&self.site_root);
        }
        if self.widgets_dir.is_relative() {
            self.widgets_dir = self.site_root.join(&self.widgets_dir);
        }
    }
}

/// Convert a TOML table into an ordered JSON object
pub fn table_to_json(table: &toml::Table) -> serde_json::Map<String, serde_json::Value> {
    table
        .iter()
        .map(|(k, v)| (k.clone(), toml_to_json(v)))
        .collect()
}

fn toml_to_json(value: &toml::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => Value::from(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(t) => Value::Object(table_to_json(t)),
    }
}
