//! Asset manager collaborator
//!
//! Assets live in two tiers:
//!
//! - the site tier, `<site_root>/assets/`, shared by every widget
//! - the widget tier, `<widgets_dir>/<Identity>/assets/`, shipped with a
//!   widget package
//!
//! The [`AssetManager`] trait exposes one method per tier and view (URL,
//! filesystem path, contents). Choosing the tier is the facade's job.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

use crate::config::SiteConfig;
use crate::error::{FacadeError, Result};
use crate::widget::WidgetIdentity;

/// Physical asset storage and URL generation
pub trait AssetManager: Send + Sync {
    /// URL of a site-level asset
    fn make_asset_url(&self, asset: &str, widget: &WidgetIdentity) -> Result<String>;

    /// URL of an asset shipped in the widget's package
    fn make_widget_asset_url(&self, asset: &str, widget: &WidgetIdentity) -> Result<String>;

    /// Filesystem path of a site-level asset
    fn asset_path(&self, asset: &str, widget: &WidgetIdentity) -> Result<PathBuf>;

    /// Filesystem path of an asset shipped in the widget's package
    fn widget_asset_path(&self, asset: &str, widget: &WidgetIdentity) -> Result<PathBuf>;

    /// Raw contents of a site-level asset
    fn asset_contents(&self, asset: &str, widget: &WidgetIdentity) -> Result<Vec<u8>> {
        read_asset(&self.asset_path(asset, widget)?)
    }

    /// Raw contents of an asset shipped in the widget's package
    fn widget_asset_contents(&self, asset: &str, widget: &WidgetIdentity) -> Result<Vec<u8>> {
        read_asset(&self.widget_asset_path(asset, widget)?)
    }
}

fn read_asset(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FacadeError::not_found(path)
        } else {
            FacadeError::Io(e)
        }
    })
}

/// Characters escaped inside one URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Asset manager over the site folder layout
#[derive(Debug, Clone)]
pub struct FsAssetManager {
    site_assets_dir: PathBuf,
    widgets_dir: PathBuf,
    assets_url_prefix: String,
    widgets_url_prefix: String,
}

impl FsAssetManager {
    /// Asset manager for the folders and URL prefixes of `config`
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            site_assets_dir: config.site_assets_dir(),
            widgets_dir: config.widgets_dir.clone(),
            assets_url_prefix: config.assets_url_prefix.trim_matches('/').to_string(),
            widgets_url_prefix: config.widgets_url_prefix.trim_matches('/').to_string(),
        }
    }

    fn widget_assets_dir(&self, widget: &WidgetIdentity) -> Result<PathBuf> {
        Ok(widget.package_dir(&self.widgets_dir)?.join("assets"))
    }

    /// Join an asset name under a tier root, requiring the file to exist
    fn locate(root: &Path, asset: &str) -> Result<PathBuf> {
        let relative = Path::new(asset);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if asset.is_empty() || escapes {
            return Err(FacadeError::ResourceNotFound(asset.to_string()));
        }

        let path = root.join(relative);
        if !path.is_file() {
            return Err(FacadeError::not_found(&path));
        }
        Ok(path)
    }

    /// URL under `prefix`; every segment of `path` is percent-encoded
    fn url_for(prefix: &str, path: &[&str]) -> String {
        let mut url = String::from("/");
        if !prefix.is_empty() {
            url.push_str(prefix);
            url.push('/');
        }
        let segments: Vec<String> = path
            .iter()
            .flat_map(|part| part.split('/'))
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect();
        url.push_str(&segments.join("/"));
        url
    }
}

impl AssetManager for FsAssetManager {
    fn make_asset_url(&self, asset: &str, widget: &WidgetIdentity) -> Result<String> {
        Self::locate(&self.site_assets_dir, asset)?;
        let url = Self::url_for(&self.assets_url_prefix, &[asset]);
        debug!(widget = %widget, asset = %asset, url = %url, "Site asset URL");
        Ok(url)
    }

    fn make_widget_asset_url(&self, asset: &str, widget: &WidgetIdentity) -> Result<String> {
        Self::locate(&self.widget_assets_dir(widget)?, asset)?;
        let url = Self::url_for(&self.widgets_url_prefix, &[widget.as_str(), asset]);
        debug!(widget = %widget, asset = %asset, url = %url, "Widget asset URL");
        Ok(url)
    }

    fn asset_path(&self, asset: &str, _widget: &WidgetIdentity) -> Result<PathBuf> {
        Self::locate(&self.site_assets_dir, asset)
    }

    fn widget_asset_path(&self, asset: &str, widget: &WidgetIdentity) -> Result<PathBuf> {
        Self::locate(&self.widget_assets_dir(widget)?, asset)
    }
}
