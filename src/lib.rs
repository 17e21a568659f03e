//! Site Widget Library
//!
//! This library provides the base facade every widget of a multi-page,
//! multi-language site extends. It exposes modules for configuration,
//! the collaborator services (renderer, assets, pages), localization and
//! the widget facade itself.

#![warn(missing_docs)]

pub mod assets;
pub mod config;
pub mod context;
pub mod error;
pub mod i18n;
pub mod legacy;
pub mod pages;
pub mod renderer;
pub mod widget;

// Re-export commonly used types
pub use assets::{AssetManager, FsAssetManager};
pub use config::{PageEntry, SiteConfig};
pub use context::RenderContext;
pub use error::{ConfigError, FacadeError};
pub use i18n::select_translation;
pub use legacy::LegacyWidgetApi;
pub use pages::{
    InMemoryPageIndex, InMemoryPreRenderer, PageIndex, PageRecord, PreRenderer, RenderedElement,
};
pub use renderer::{Renderer, SiteRenderer, WidgetPackage};
pub use widget::{
    BaseGallery, DynWidgetFactory, Gallery, ImageSource, SrcSetCandidate, TextBlock, Widget,
    WidgetBase, WidgetIdentity, WidgetInstance, WidgetRegistry,
};
