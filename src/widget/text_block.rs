//! Text block widget
//!
//! Shows one entry of its markup dictionary, localized for the current
//! language.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::debug;

use super::facade::WidgetBase;
use super::registry::DynWidgetFactory;
use super::traits::{escape_html, Widget};
use crate::context::RenderContext;
use crate::error::Result;

/// Localized text paragraph
pub struct TextBlock {
    base: WidgetBase,
    text_key: String,
    fallback: String,
}

impl TextBlock {
    /// Widget type name
    pub const IDENTITY: &'static str = "TextBlock";

    /// Block showing `text_key`, or `fallback` when the key is absent
    pub fn new(ctx: Arc<RenderContext>, text_key: &str, fallback: &str) -> Self {
        Self {
            base: WidgetBase::new(ctx, Self::IDENTITY),
            text_key: text_key.to_string(),
            fallback: fallback.to_string(),
        }
    }

    /// The localized text, or the fallback when the key is not in the
    /// dictionary
    pub fn text(&self) -> Result<String> {
        self.base.get_text(&self.text_key, &self.fallback)
    }
}

impl Widget for TextBlock {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn render(&self) -> Result<String> {
        Ok(format!(
            "<p class=\"text-block\" lang=\"{}\">{}</p>",
            escape_html(self.base.current_language()),
            escape_html(&self.text()?)
        ))
    }
}

/// Factory for TextBlock
pub struct TextBlockFactory;

impl DynWidgetFactory for TextBlockFactory {
    fn widget_type(&self) -> &'static str {
        TextBlock::IDENTITY
    }

    fn create(
        &self,
        ctx: Arc<RenderContext>,
        config: &toml::Table,
    ) -> anyhow::Result<Box<dyn Widget>> {
        let text_key = config
            .get("text_key")
            .and_then(|v| v.as_str())
            .unwrap_or("text");

        let fallback = config
            .get("fallback")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        debug!(text_key = %text_key, "Creating TextBlock");

        Ok(Box::new(TextBlock::new(ctx, text_key, fallback)))
    }

    fn default_config(&self) -> toml::Table {
        let mut config = toml::Table::new();
        config.insert(
            "text_key".to_string(),
            toml::Value::String("text".to_string()),
        );
        config.insert("fallback".to_string(), toml::Value::String(String::new()));
        config
    }

    fn validate_config(&self, config: &toml::Table) -> anyhow::Result<()> {
        if let Some(key) = config.get("text_key") {
            let key = key.as_str().context("'text_key' must be a string")?;
            if key.is_empty() {
                bail!("'text_key' must not be empty");
            }
        }
        if let Some(fallback) = config.get("fallback") {
            fallback.as_str().context("'fallback' must be a string")?;
        }
        Ok(())
    }
}
