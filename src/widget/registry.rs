//! Widget registry for dynamic widget creation
//!
//! This module provides the infrastructure for registering and creating widgets
//! dynamically based on configuration. It supports:
//!
//! - Type-erased widget factories
//! - Registration of built-in and custom widgets
//! - Creation of widgets from TOML configuration

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::gallery::{BaseGalleryFactory, GalleryFactory};
use super::text_block::TextBlockFactory;
use super::traits::Widget;
use crate::context::RenderContext;

/// Type-erased widget factory trait
///
/// This trait allows storing different widget factories in a single collection
/// without knowing the concrete types at compile time.
pub trait DynWidgetFactory: Send + Sync {
    /// The widget identity this factory creates (e.g., "Gallery")
    fn widget_type(&self) -> &'static str;

    /// Create a new widget instance bound to a render context
    fn create(&self, ctx: Arc<RenderContext>, config: &toml::Table) -> Result<Box<dyn Widget>>;

    /// Get default configuration for this widget type
    fn default_config(&self) -> toml::Table;

    /// Validate configuration before creating widget
    fn validate_config(&self, config: &toml::Table) -> Result<()>;
}

/// Registry for widget factories
pub struct WidgetRegistry {
    factories: HashMap<&'static str, Arc<dyn DynWidgetFactory>>,
}

impl WidgetRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with all built-in widgets registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(BaseGalleryFactory);
        registry.register(GalleryFactory);
        registry.register(TextBlockFactory);

        info!(
            widget_types = ?registry.widget_types(),
            "Widget registry initialized with built-in widgets"
        );

        registry
    }

    /// Register a widget factory
    pub fn register<F: DynWidgetFactory + 'static>(&mut self, factory: F) {
        let widget_type = factory.widget_type();
        debug!(widget_type = %widget_type, "Registering widget factory");
        self.factories.insert(widget_type, Arc::new(factory));
    }

    /// Check if a widget type is registered
    pub fn has_widget(&self, widget_type: &str) -> bool {
        self.factories.contains_key(widget_type)
    }

    /// Get all registered widget types, sorted
    pub fn widget_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.factories.keys().copied().collect();
        types.sort_unstable();
        types
    }

    fn factory(&self, widget_type: &str) -> Result<&Arc<dyn DynWidgetFactory>> {
        self.factories.get(widget_type).with_context(|| {
            format!(
                "Unknown widget type: '{}'. Available types: {:?}",
                widget_type,
                self.widget_types()
            )
        })
    }

    /// Create a widget from configuration
    pub fn create(
        &self,
        widget_type: &str,
        ctx: Arc<RenderContext>,
        config: &toml::Table,
    ) -> Result<Box<dyn Widget>> {
        let factory = self.factory(widget_type)?;

        factory
            .validate_config(config)
            .with_context(|| format!("Invalid configuration for widget type '{}'", widget_type))?;

        factory
            .create(ctx, config)
            .with_context(|| format!("Failed to create widget of type '{}'", widget_type))
    }

    /// Create a widget with default configuration
    pub fn create_default(
        &self,
        widget_type: &str,
        ctx: Arc<RenderContext>,
    ) -> Result<Box<dyn Widget>> {
        let factory = self.factory(widget_type)?;
        let config = factory.default_config();
        factory.create(ctx, &config)
    }

    /// Get default configuration for a widget type
    pub fn default_config(&self, widget_type: &str) -> Result<toml::Table> {
        Ok(self.factory(widget_type)?.default_config())
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ============================================================================
// Widget Instance Configuration
// ============================================================================

/// Configuration for a single widget instance
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WidgetInstance {
    /// Widget identity (e.g., "Gallery", "TextBlock")
    #[serde(rename = "type")]
    pub widget_type: String,

    /// Whether this widget is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Optional unique identifier for this instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Widget-specific configuration
    #[serde(default)]
    pub config: toml::Table,
}

fn default_true() -> bool {
    true
}

impl WidgetInstance {
    /// Create a new widget instance configuration
    pub fn new(widget_type: &str) -> Self {
        Self {
            widget_type: widget_type.to_string(),
            enabled: true,
            id: None,
            config: toml::Table::new(),
        }
    }

    /// Create with specific configuration
    pub fn with_config(widget_type: &str, config: toml::Table) -> Self {
        Self {
            widget_type: widget_type.to_string(),
            enabled: true,
            id: None,
            config,
        }
    }

    /// Get a unique identifier for this instance
    pub fn instance_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.widget_type.clone())
    }
}
