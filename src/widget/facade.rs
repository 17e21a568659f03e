//! The widget facade
//!
//! [`WidgetBase`] is embedded by every widget. It reads rendering context,
//! resolves assets over two tiers and looks up localized text in the
//! widget's markup dictionary. All lookups are scoped by the identity stored
//! at construction, never by the type that happens to call them.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::context::RenderContext;
use crate::error::Result;
use crate::pages::{PageRecord, RenderedElement};

use super::image::ImageSource;
use super::traits::WidgetIdentity;

/// Base state and accessors shared by all widgets
pub struct WidgetBase {
    ctx: Arc<RenderContext>,
    identity: WidgetIdentity,
    refresh_params: Option<Vec<String>>,
}

impl WidgetBase {
    /// Create the facade for a widget of type `identity`
    pub fn new(ctx: Arc<RenderContext>, identity: impl Into<WidgetIdentity>) -> Self {
        Self {
            ctx,
            identity: identity.into(),
            refresh_params: None,
        }
    }

    /// Widget type the lookups are scoped to
    pub fn identity(&self) -> &WidgetIdentity {
        &self.identity
    }

    /// Render context of the current pass
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    // === Settings ===

    /// Widget settings, or the value of one setting
    ///
    /// With `None` the whole map is returned. An unset key yields an empty
    /// array so callers can iterate without checking for presence.
    pub fn settings(&self, key: Option<&str>) -> Value {
        let settings = self.ctx.renderer().widget_settings(&self.identity);
        match key {
            None => Value::Object(settings),
            Some(key) => settings
                .get(key)
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        }
    }

    /// Settings of the page being rendered
    pub fn page_settings(&self) -> Map<String, Value> {
        self.current_page_info()
            .map(|page| page.settings.clone())
            .unwrap_or_default()
    }

    // === Refresh parameters ===

    /// Parameters whose client-side change requires a page re-render
    ///
    /// `None` means the widget never declared any; `Some(&[])` means it
    /// declared an empty set.
    pub fn refresh_params(&self) -> Option<&[String]> {
        self.refresh_params.as_deref()
    }

    /// Declare the refresh parameters; only the first call takes effect
    pub fn set_refresh_params<I, S>(&mut self, params: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.refresh_params.is_some() {
            warn!(widget = %self.identity, "Refresh parameters already set, ignoring");
            return;
        }
        let params: Vec<String> = params.into_iter().map(Into::into).collect();
        debug!(widget = %self.identity, params = ?params, "Refresh parameters declared");
        self.refresh_params = Some(params);
    }

    // === Rendering context ===

    /// Widget types rendered into the page head
    pub fn head_widgets(&self) -> &[String] {
        self.ctx.renderer().head_widgets()
    }

    /// Language of the current render pass
    pub fn current_language(&self) -> &str {
        self.ctx.renderer().current_language()
    }

    /// All published languages
    pub fn available_languages(&self) -> &[String] {
        self.ctx.renderer().available_languages()
    }

    /// Language served at the site root
    pub fn main_language(&self) -> &str {
        self.ctx.renderer().main_language()
    }

    /// Fallback language for missing translations
    pub fn default_language(&self) -> &str {
        self.ctx.renderer().default_language()
    }

    /// Name of the home page
    pub fn home_page_name(&self) -> Option<&str> {
        self.ctx.pages().home_page_name()
    }

    /// Whether pages are pre-rendered to fixed output
    pub fn is_static_rendering(&self) -> bool {
        self.ctx.renderer().is_static_rendering()
    }

    /// Domain the site is published under
    pub fn domain_name(&self) -> &str {
        self.ctx.renderer().domain_name()
    }

    /// Name of the page being rendered
    pub fn current_page(&self) -> &str {
        self.ctx.current_page()
    }

    /// Metadata of a page by name
    pub fn page_info(&self, name: &str) -> Option<&PageRecord> {
        self.ctx.pages().page_info(Some(name), false)
    }

    fn current_page_info(&self) -> Option<&PageRecord> {
        self.page_info(self.current_page())
    }

    /// Title of the current page in the active language
    pub fn page_title(&self) -> String {
        let Some(page) = self.current_page_info() else {
            return String::new();
        };
        let titles = Value::Object(
            page.titles
                .iter()
                .map(|(lang, title)| (lang.clone(), Value::String(title.clone())))
                .collect(),
        );
        self.localize(&titles, None)
    }

    /// Elements of an already-rendered page in the active language
    pub fn prerendered(&self, page: &str, selector: &str) -> Vec<&RenderedElement> {
        self.ctx
            .prerenderer()
            .query(page, self.current_language(), selector)
    }

    // === Localization ===

    /// Localized text for `name` from this widget's markup dictionary
    ///
    /// Returns `default` untouched when the dictionary has no `name` entry.
    /// A missing or unreadable dictionary, or a widget without a package, is
    /// an error.
    pub fn get_text(&self, name: &str, default: &str) -> Result<String> {
        let renderer = self.ctx.renderer();
        let package = renderer.load_widget_package(&self.identity)?;
        let dictionary = renderer.read_structured_file(&package.markup_dict_path())?;

        match dictionary.get(name) {
            Some(value) => Ok(renderer.localize(value, None)),
            None => {
                debug!(widget = %self.identity, key = %name, "Markup key absent, using default");
                Ok(default.to_string())
            }
        }
    }

    /// Pick the text for `lang`, or the active language, out of a raw value
    pub fn localize(&self, value: &Value, lang: Option<&str>) -> String {
        self.ctx.renderer().localize(value, lang)
    }

    // === Assets ===

    /// URL of an asset
    ///
    /// With `advance` set, only this widget's package is searched; otherwise
    /// only the site-level assets are. There is no fallback between the two.
    pub fn make_asset_url(&self, asset: &str, advance: bool) -> Result<String> {
        let assets = self.ctx.assets();
        if advance {
            assets.make_widget_asset_url(asset, &self.identity)
        } else {
            assets.make_asset_url(asset, &self.identity)
        }
    }

    /// Filesystem path of an asset inside `folder` of the selected tier
    pub fn asset_path(&self, asset: &str, folder: &str, widget_asset: bool) -> Result<PathBuf> {
        let name = Self::asset_name(asset, folder);
        let assets = self.ctx.assets();
        if widget_asset {
            assets.widget_asset_path(&name, &self.identity)
        } else {
            assets.asset_path(&name, &self.identity)
        }
    }

    /// Raw contents of an asset inside `folder` of the selected tier
    pub fn file_contents(&self, asset: &str, folder: &str, widget_asset: bool) -> Result<Vec<u8>> {
        let name = Self::asset_name(asset, folder);
        let assets = self.ctx.assets();
        if widget_asset {
            assets.widget_asset_contents(&name, &self.identity)
        } else {
            assets.asset_contents(&name, &self.identity)
        }
    }

    fn asset_name(asset: &str, folder: &str) -> String {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            asset.to_string()
        } else {
            format!("{}/{}", folder, asset)
        }
    }

    /// Responsive source for an image URL in static export mode
    ///
    /// Outside static export the URL comes back unchanged.
    pub fn enable_image_optimization(&self, asset_url: &str) -> ImageSource {
        let renderer = self.ctx.renderer();
        if !renderer.is_static_rendering() || renderer.image_widths().is_empty() {
            return ImageSource::Raw(asset_url.to_string());
        }
        ImageSource::responsive(asset_url, renderer.image_widths())
    }
}
