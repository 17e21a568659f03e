//! Widget trait system for extensible widget development
//!
//! Every widget embeds a [`WidgetBase`] and implements [`Widget`]. The facade
//! methods live on `WidgetBase` and cannot be overridden; the trait only
//! carries the hooks a widget is expected to customize.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{FacadeError, Result};

use super::facade::WidgetBase;

/// Concrete type name of a widget, e.g. `Gallery`
///
/// Used as the namespace key for packages, assets and settings. A widget
/// built on top of another passes its own identity, so lookups resolve
/// against its own package rather than its parent's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetIdentity(String);

impl WidgetIdentity {
    /// Wrap a widget type name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The type name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package folder of this widget type under `widgets_dir`
    ///
    /// The name must be a single plain path component and the folder must
    /// exist; otherwise the widget is misconfigured.
    pub fn package_dir(&self, widgets_dir: &Path) -> Result<PathBuf> {
        let mut components = Path::new(&self.0).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single {
            return Err(FacadeError::MisconfiguredWidget(self.0.clone()));
        }

        let dir = widgets_dir.join(&self.0);
        if !dir.is_dir() {
            return Err(FacadeError::MisconfiguredWidget(self.0.clone()));
        }
        Ok(dir)
    }
}

impl fmt::Display for WidgetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetIdentity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Core trait that all widgets must implement
pub trait Widget: Send {
    /// The embedded facade
    fn base(&self) -> &WidgetBase;

    /// Widget type identity
    fn identity(&self) -> &WidgetIdentity {
        self.base().identity()
    }

    /// Produce the widget's markup fragment
    fn render(&self) -> Result<String>;

    /// Client-side script emitted by the widget
    ///
    /// Refresh parameters only take effect for widgets returning `Some`.
    fn js_code(&self) -> Option<String> {
        None
    }

    /// Stylesheet emitted by the widget
    fn css_code(&self) -> Option<String> {
        None
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
