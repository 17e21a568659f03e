//! Renderer collaborator
//!
//! The renderer owns page state, language state and site settings. Widgets
//! never talk to it directly; the facade in [`crate::widget::WidgetBase`]
//! forwards to the narrow [`Renderer`] trait defined here.
//!
//! [`SiteRenderer`] is the filesystem-backed implementation driven by a
//! [`SiteConfig`]. One instance serves one language of one render pass.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{table_to_json, SiteConfig};
use crate::error::{FacadeError, Result};
use crate::i18n::select_translation;
use crate::widget::{Widget, WidgetIdentity};

/// Location of a widget type's package on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetPackage {
    /// Package root folder
    pub root_folder: PathBuf,
    /// Markup dictionary file name, relative to the root folder
    pub markup_dict_filename: String,
}

impl WidgetPackage {
    /// Full path of the markup dictionary
    pub fn markup_dict_path(&self) -> PathBuf {
        self.root_folder.join(&self.markup_dict_filename)
    }
}

/// Rendering-state service consumed by the widget facade
pub trait Renderer: Send + Sync {
    /// Read a JSON or TOML file whose top level is a mapping
    fn read_structured_file(&self, path: &Path) -> Result<Map<String, Value>>;

    /// Pick the text for `lang` (or the active language) out of a raw value
    fn localize(&self, value: &Value, lang: Option<&str>) -> String;

    /// Resolve the package of a widget type
    fn load_widget_package(&self, identity: &WidgetIdentity) -> Result<WidgetPackage>;

    /// Settings of one widget type
    fn widget_settings(&self, identity: &WidgetIdentity) -> Map<String, Value>;

    /// Language of the current render pass
    fn current_language(&self) -> &str;

    /// All published languages, in menu order
    fn available_languages(&self) -> &[String];

    /// Language served at the site root
    fn main_language(&self) -> &str;

    /// Fallback language for missing translations
    fn default_language(&self) -> &str;

    /// Whether pages are pre-rendered to fixed output
    fn is_static_rendering(&self) -> bool;

    /// Widget types rendered into the page head
    fn head_widgets(&self) -> &[String];

    /// Domain the site is published under
    fn domain_name(&self) -> &str;

    /// Candidate widths for responsive images
    fn image_widths(&self) -> &[u32];
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    markup: Option<String>,
}

const PACKAGE_MANIFEST: &str = "package.toml";

/// Renderer backed by a [`SiteConfig`] and the widget packages on disk
pub struct SiteRenderer {
    current_language: String,
    languages: Vec<String>,
    main_language: String,
    default_language: String,
    static_export: bool,
    head_widgets: Vec<String>,
    domain: String,
    image_widths: Vec<u32>,
    widgets_dir: PathBuf,
    markup_dict_filename: String,
    settings: Map<String, Value>,
}

impl SiteRenderer {
    /// Create a renderer for the main language
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            current_language: config.main_language.clone(),
            languages: config.languages.clone(),
            main_language: config.main_language.clone(),
            default_language: config.default_language.clone(),
            static_export: config.static_export,
            head_widgets: config.head_widgets.clone(),
            domain: config.domain.clone(),
            image_widths: config.image_widths.clone(),
            widgets_dir: config.widgets_dir.clone(),
            markup_dict_filename: config.markup_dict_filename.clone(),
            settings: table_to_json(&config.settings),
        }
    }

    /// Switch the render pass to another language
    ///
    /// Unknown languages are accepted; lookups then fall back to the default
    /// language.
    pub fn with_language(mut self, lang: &str) -> Self {
        if !self.languages.iter().any(|l| l == lang) {
            warn!(lang = %lang, available = ?self.languages, "Rendering unpublished language");
        }
        self.current_language = lang.to_string();
        self
    }

    /// Refresh parameters the client must watch for a widget
    ///
    /// Only widgets that emit client code can trigger a refresh, so the list
    /// is empty otherwise even when the widget declared one.
    pub fn client_refresh_params(widget: &dyn Widget) -> &[String] {
        if widget.js_code().is_none() {
            return &[];
        }
        widget.base().refresh_params().unwrap_or(&[])
    }

    fn parse_structured(path: &Path, content: &str) -> Result<Map<String, Value>> {
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let data_error = |message: String| FacadeError::Data {
            path: path.to_path_buf(),
            message,
        };

        if is_toml {
            let table: toml::Table =
                toml::from_str(content).map_err(|e| data_error(e.to_string()))?;
            Ok(table_to_json(&table))
        } else {
            match serde_json::from_str(content).map_err(|e| data_error(e.to_string()))? {
                Value::Object(map) => Ok(map),
                _ => Err(data_error("expected a mapping".to_string())),
            }
        }
    }
}

impl Renderer for SiteRenderer {
    fn read_structured_file(&self, path: &Path) -> Result<Map<String, Value>> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FacadeError::not_found(path)
            } else {
                FacadeError::Io(e)
            }
        })?;

        debug!(path = %path.display(), "Read structured file");
        Self::parse_structured(path, &content)
    }

    fn localize(&self, value: &Value, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or(&self.current_language);
        select_translation(value, lang, &self.default_language)
    }

    fn load_widget_package(&self, identity: &WidgetIdentity) -> Result<WidgetPackage> {
        let root_folder = identity.package_dir(&self.widgets_dir)?;

        let manifest_path = root_folder.join(PACKAGE_MANIFEST);
        let manifest = if manifest_path.is_file() {
            let content = std::fs::read_to_string(&manifest_path)?;
            toml::from_str::<PackageManifest>(&content).map_err(|e| FacadeError::Data {
                path: manifest_path.clone(),
                message: e.to_string(),
            })?
        } else {
            PackageManifest::default()
        };

        let markup_dict_filename = manifest
            .markup
            .unwrap_or_else(|| self.markup_dict_filename.clone());

        debug!(
            widget = %identity,
            root = %root_folder.display(),
            markup = %markup_dict_filename,
            "Loaded widget package"
        );

        Ok(WidgetPackage {
            root_folder,
            markup_dict_filename,
        })
    }

    fn widget_settings(&self, identity: &WidgetIdentity) -> Map<String, Value> {
        match self.settings.get(identity.as_str()) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    fn current_language(&self) -> &str {
        &self.current_language
    }

    fn available_languages(&self) -> &[String] {
        &self.languages
    }

    fn main_language(&self) -> &str {
        &self.main_language
    }

    fn default_language(&self) -> &str {
        &self.default_language
    }

    fn is_static_rendering(&self) -> bool {
        self.static_export
    }

    fn head_widgets(&self) -> &[String] {
        &self.head_widgets
    }

    fn domain_name(&self) -> &str {
        &self.domain
    }

    fn image_widths(&self) -> &[u32] {
        &self.image_widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer_in(dir: &Path) -> SiteRenderer {
        let mut config = SiteConfig::default();
        config.languages = vec!["en".to_string(), "de".to_string()];
        config.widgets_dir = dir.to_path_buf();
        config.settings = toml::from_str("[Gallery]\ncolumns = 3\n").unwrap();
        SiteRenderer::new(&config)
    }

    #[test]
    fn test_missing_package_is_misconfigured() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());
        let result = renderer.load_widget_package(&WidgetIdentity::new("Nope"));
        assert!(matches!(result, Err(FacadeError::MisconfiguredWidget(id)) if id == "Nope"));
    }

    #[test]
    fn test_package_manifest_overrides_markup_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Gallery");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join(PACKAGE_MANIFEST), "markup = \"texts.toml\"\n").unwrap();

        let package = renderer_in(dir.path())
            .load_widget_package(&WidgetIdentity::new("Gallery"))
            .unwrap();
        assert_eq!(package.markup_dict_path(), root.join("texts.toml"));
    }

    #[test]
    fn test_read_structured_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("m.json");
        let toml_path = dir.path().join("m.toml");
        std::fs::write(&json_path, r#"{"title": {"en": "Hi"}}"#).unwrap();
        std::fs::write(&toml_path, "[title]\nen = \"Hi\"\n").unwrap();

        let renderer = renderer_in(dir.path());
        let expected = json!({ "title": { "en": "Hi" } });
        assert_eq!(
            Value::Object(renderer.read_structured_file(&json_path).unwrap()),
            expected
        );
        assert_eq!(
            Value::Object(renderer.read_structured_file(&toml_path).unwrap()),
            expected
        );
    }

    #[test]
    fn test_read_structured_errors() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());

        let missing = renderer.read_structured_file(&dir.path().join("absent.json"));
        assert!(missing.unwrap_err().is_not_found());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            renderer.read_structured_file(&broken),
            Err(FacadeError::Data { .. })
        ));
    }

    #[test]
    fn test_read_structured_rejects_non_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());

        for (name, content) in [("list.json", r#"["caption"]"#), ("text.json", r#""just a string""#)] {
            let path = dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            match renderer.read_structured_file(&path) {
                Err(FacadeError::Data { path: p, message }) => {
                    assert_eq!(p, path);
                    assert_eq!(message, "expected a mapping");
                }
                other => panic!("Expected Data error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_package_outside_widgets_dir_is_misconfigured() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("widgets")).unwrap();
        std::fs::create_dir_all(dir.path().join("other")).unwrap();
        let renderer = renderer_in(&dir.path().join("widgets"));

        let result = renderer.load_widget_package(&WidgetIdentity::new("../other"));
        assert!(matches!(result, Err(FacadeError::MisconfiguredWidget(id)) if id == "../other"));
    }

    #[test]
    fn test_localize_uses_current_language() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path()).with_language("de");
        let value = json!({ "en": "Photo", "de": "Foto" });
        assert_eq!(renderer.localize(&value, None), "Foto");
        assert_eq!(renderer.localize(&value, Some("en")), "Photo");
        assert_eq!(renderer.localize(&value, Some("fr")), "Photo");
    }

    #[test]
    fn test_widget_settings_are_namespaced() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());
        let settings = renderer.widget_settings(&WidgetIdentity::new("Gallery"));
        assert_eq!(settings["columns"], json!(3));
        assert!(renderer
            .widget_settings(&WidgetIdentity::new("TextBlock"))
            .is_empty());
    }
}
