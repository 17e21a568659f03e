//! Rendering context shared by the widgets of one render pass
//!
//! A context bundles the collaborator services for one page in one language.
//! Pages rendered concurrently each get their own context; nothing here is
//! process-global.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::assets::{AssetManager, FsAssetManager};
use crate::config::SiteConfig;
use crate::pages::{InMemoryPageIndex, InMemoryPreRenderer, PageIndex, PreRenderer};
use crate::renderer::{Renderer, SiteRenderer};

/// Collaborator services for one page in one language
pub struct RenderContext {
    renderer: Arc<dyn Renderer>,
    assets: Arc<dyn AssetManager>,
    pages: Arc<dyn PageIndex>,
    prerenderer: Arc<dyn PreRenderer>,
    current_page: String,
}

impl RenderContext {
    /// Bundle services for `current_page`, with no pre-rendered pages
    pub fn new(
        renderer: Arc<dyn Renderer>,
        assets: Arc<dyn AssetManager>,
        pages: Arc<dyn PageIndex>,
        current_page: &str,
    ) -> Self {
        Self {
            renderer,
            assets,
            pages,
            prerenderer: Arc::new(InMemoryPreRenderer::new()),
            current_page: current_page.to_string(),
        }
    }

    /// Attach a view of already-rendered pages
    pub fn with_prerenderer(mut self, prerenderer: Arc<dyn PreRenderer>) -> Self {
        self.prerenderer = prerenderer;
        self
    }

    /// Build a context from configuration using the filesystem-backed services
    ///
    /// `lang` defaults to the main language.
    pub fn from_config(config: &SiteConfig, page: &str, lang: Option<&str>) -> Result<Arc<Self>> {
        config.validate().context("Invalid site configuration")?;

        let pages = InMemoryPageIndex::from_config(config);
        pages
            .page_info(Some(page), false)
            .with_context(|| format!("Unknown page: '{}'", page))?;

        let mut renderer = SiteRenderer::new(config);
        if let Some(lang) = lang {
            renderer = renderer.with_language(lang);
        }

        debug!(
            page = %page,
            lang = %renderer.current_language(),
            "Created render context"
        );

        Ok(Arc::new(Self::new(
            Arc::new(renderer),
            Arc::new(FsAssetManager::new(config)),
            Arc::new(pages),
            page,
        )))
    }

    /// Rendering state
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Asset storage
    pub fn assets(&self) -> &dyn AssetManager {
        self.assets.as_ref()
    }

    /// Page metadata
    pub fn pages(&self) -> &dyn PageIndex {
        self.pages.as_ref()
    }

    /// Already-rendered pages
    pub fn prerenderer(&self) -> &dyn PreRenderer {
        self.prerenderer.as_ref()
    }

    /// Name of the page being rendered
    pub fn current_page(&self) -> &str {
        &self.current_page
    }
}
