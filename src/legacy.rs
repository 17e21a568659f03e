//! Deprecated widget accessors
//!
//! Older widgets call these names. They forward to [`WidgetBase`] and will
//! be removed together with the last widget using them; new code should call
//! the facade directly.

#![allow(deprecated)]

use crate::error::Result;
use crate::widget::WidgetBase;

/// Old-style accessor names on the widget facade
pub trait LegacyWidgetApi {
    /// Active language
    #[deprecated(note = "use WidgetBase::current_language")]
    fn get_lang(&self) -> &str;

    /// Published languages
    #[deprecated(note = "use WidgetBase::available_languages")]
    fn get_langs(&self) -> &[String];

    /// Current page name
    #[deprecated(note = "use WidgetBase::current_page")]
    fn get_current_page_name(&self) -> &str;

    /// URL of a widget-package asset
    #[deprecated(note = "use WidgetBase::make_asset_url with advance = true")]
    fn get_widget_asset_url(&self, asset: &str) -> Result<String>;

    /// Whether static export is on
    #[deprecated(note = "use WidgetBase::is_static_rendering")]
    fn is_export_mode(&self) -> bool;
}

impl LegacyWidgetApi for WidgetBase {
    fn get_lang(&self) -> &str {
        self.current_language()
    }

    fn get_langs(&self) -> &[String] {
        self.available_languages()
    }

    fn get_current_page_name(&self) -> &str {
        self.current_page()
    }

    fn get_widget_asset_url(&self, asset: &str) -> Result<String> {
        self.make_asset_url(asset, true)
    }

    fn is_export_mode(&self) -> bool {
        self.is_static_rendering()
    }
}
