//! Image gallery widgets
//!
//! [`BaseGallery`] renders a grid of site images. [`Gallery`] builds on it,
//! ships its own package (hero image, texts, script) and declares `columns`
//! as a refresh parameter.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::debug;

use super::facade::WidgetBase;
use super::registry::DynWidgetFactory;
use super::traits::{escape_html, Widget, WidgetIdentity};
use crate::context::RenderContext;
use crate::error::Result;

const DEFAULT_COLUMNS: i64 = 3;

/// Grid of site-level images
pub struct BaseGallery {
    base: WidgetBase,
    images: Vec<String>,
    columns: u32,
}

impl BaseGallery {
    /// Widget type name
    pub const IDENTITY: &'static str = "BaseGallery";

    /// Gallery of site-level `images`
    pub fn new(ctx: Arc<RenderContext>, images: Vec<String>, columns: u32) -> Self {
        Self::with_identity(ctx, Self::IDENTITY, images, columns)
    }

    /// Build a gallery whose lookups are scoped to another widget type
    pub fn with_identity(
        ctx: Arc<RenderContext>,
        identity: impl Into<WidgetIdentity>,
        images: Vec<String>,
        columns: u32,
    ) -> Self {
        Self {
            base: WidgetBase::new(ctx, identity),
            images,
            columns: columns.max(1),
        }
    }

    /// Image names, relative to the site assets
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Grid columns, at least one
    pub fn columns(&self) -> u32 {
        self.columns
    }

    fn render_grid(&self) -> Result<String> {
        let caption = self.base.get_text("caption", "Untitled")?;
        let mut html = format!(
            "<div class=\"gallery\" data-columns=\"{}\">",
            self.columns
        );

        for image in &self.images {
            let url = self.base.make_asset_url(image, false)?;
            let source = self.base.enable_image_optimization(&url);
            let src = source.fallback_url().unwrap_or(url.as_str()).to_string();
            html.push_str("<figure><img src=\"");
            html.push_str(&escape_html(&src));
            html.push('"');
            if self.base.is_static_rendering() {
                html.push_str(" srcset=\"");
                html.push_str(&escape_html(&source.to_attribute()));
                html.push('"');
            }
            html.push_str(" alt=\"");
            html.push_str(&escape_html(image));
            html.push_str("\"><figcaption>");
            html.push_str(&escape_html(&caption));
            html.push_str("</figcaption></figure>");
        }

        html.push_str("</div>");
        Ok(html)
    }
}

impl Widget for BaseGallery {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn render(&self) -> Result<String> {
        self.render_grid()
    }
}

/// Gallery with a hero image and client-side column switching
pub struct Gallery {
    inner: BaseGallery,
    hero: Option<String>,
}

impl Gallery {
    /// Widget type name
    pub const IDENTITY: &'static str = "Gallery";

    /// Gallery with an optional hero image from its own package
    pub fn new(
        ctx: Arc<RenderContext>,
        images: Vec<String>,
        columns: u32,
        hero: Option<String>,
    ) -> Self {
        let mut inner = BaseGallery::with_identity(ctx, Self::IDENTITY, images, columns);
        inner.base.set_refresh_params(["columns"]);
        Self { inner, hero }
    }

    /// Hero image name
    pub fn hero(&self) -> Option<&str> {
        self.hero.as_deref()
    }
}

impl Widget for Gallery {
    fn base(&self) -> &WidgetBase {
        &self.inner.base
    }

    fn render(&self) -> Result<String> {
        let mut html = String::new();
        if let Some(hero) = &self.hero {
            let url = self.inner.base.make_asset_url(hero, true)?;
            html.push_str("<img class=\"gallery-hero\" src=\"");
            html.push_str(&escape_html(&url));
            html.push_str("\">");
        }
        html.push_str(&self.inner.render_grid()?);
        Ok(html)
    }

    fn js_code(&self) -> Option<String> {
        Some(format!(
            "document.querySelectorAll('.gallery').forEach(g => g.style.setProperty('--columns', g.dataset.columns || '{}'));",
            self.inner.columns
        ))
    }
}

fn images_from_config(config: &toml::Table) -> anyhow::Result<Vec<String>> {
    match config.get("images") {
        None => Ok(Vec::new()),
        Some(value) => value
            .as_array()
            .context("'images' must be an array")?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .context("'images' entries must be strings")
            })
            .collect(),
    }
}

fn columns_from_config(config: &toml::Table) -> anyhow::Result<u32> {
    let columns = match config.get("columns") {
        None => DEFAULT_COLUMNS,
        Some(value) => value.as_integer().context("'columns' must be an integer")?,
    };
    if !(1..=12).contains(&columns) {
        bail!("'columns' must be between 1 and 12, got {}", columns);
    }
    Ok(columns as u32)
}

fn gallery_default_config() -> toml::Table {
    let mut config = toml::Table::new();
    config.insert("images".to_string(), toml::Value::Array(Vec::new()));
    config.insert("columns".to_string(), toml::Value::Integer(DEFAULT_COLUMNS));
    config
}

/// Factory for BaseGallery
pub struct BaseGalleryFactory;

impl DynWidgetFactory for BaseGalleryFactory {
    fn widget_type(&self) -> &'static str {
        BaseGallery::IDENTITY
    }

    fn create(
        &self,
        ctx: Arc<RenderContext>,
        config: &toml::Table,
    ) -> anyhow::Result<Box<dyn Widget>> {
        let images = images_from_config(config)?;
        let columns = columns_from_config(config)?;
        debug!(images = images.len(), columns, "Creating BaseGallery");
        Ok(Box::new(BaseGallery::new(ctx, images, columns)))
    }

    fn default_config(&self) -> toml::Table {
        gallery_default_config()
    }

    fn validate_config(&self, config: &toml::Table) -> anyhow::Result<()> {
        images_from_config(config)?;
        columns_from_config(config)?;
        Ok(())
    }
}

/// Factory for Gallery
pub struct GalleryFactory;

impl DynWidgetFactory for GalleryFactory {
    fn widget_type(&self) -> &'static str {
        Gallery::IDENTITY
    }

    fn create(
        &self,
        ctx: Arc<RenderContext>,
        config: &toml::Table,
    ) -> anyhow::Result<Box<dyn Widget>> {
        let images = images_from_config(config)?;
        let columns = columns_from_config(config)?;
        let hero = config
            .get("hero")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        debug!(
            images = images.len(),
            columns,
            hero = ?hero,
            "Creating Gallery"
        );

        Ok(Box::new(Gallery::new(ctx, images, columns, hero)))
    }

    fn default_config(&self) -> toml::Table {
        gallery_default_config()
    }

    fn validate_config(&self, config: &toml::Table) -> anyhow::Result<()> {
        images_from_config(config)?;
        columns_from_config(config)?;
        if let Some(hero) = config.get("hero") {
            hero.as_str().context("'hero' must be a string")?;
        }
        Ok(())
    }
}
