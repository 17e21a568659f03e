// Site Widget inspector
// Builds the widgets configured for one page and reports how they resolve

use anyhow::{bail, Result};
use std::path::PathBuf;

use site_widget::{RenderContext, SiteConfig, SiteRenderer, WidgetRegistry};

const USAGE: &str = "usage: site-widget [config.toml] <page> [lang]";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, page, lang) = match args.as_slice() {
        [page] => (SiteConfig::load()?, page.as_str(), None),
        [path, page] if path.ends_with(".toml") => {
            (SiteConfig::load_from(&PathBuf::from(path))?, page.as_str(), None)
        }
        [page, lang] => (SiteConfig::load()?, page.as_str(), Some(lang.as_str())),
        [path, page, lang] => (
            SiteConfig::load_from(&PathBuf::from(path))?,
            page.as_str(),
            Some(lang.as_str()),
        ),
        _ => bail!(USAGE),
    };

    tracing::info!(page = %page, lang = ?lang, domain = %config.domain, "Inspecting page");

    let ctx = RenderContext::from_config(&config, page, lang)?;
    let registry = WidgetRegistry::with_builtins();

    for instance in config.enabled_widgets() {
        let widget = match registry.create(&instance.widget_type, ctx.clone(), &instance.config) {
            Ok(widget) => widget,
            Err(e) => {
                tracing::error!(widget = %instance.instance_id(), error = %e, "Failed to create widget");
                continue;
            }
        };

        let refresh = SiteRenderer::client_refresh_params(widget.as_ref());
        println!(
            "{} ({}): js={} refresh={:?}",
            instance.instance_id(),
            widget.identity(),
            widget.js_code().is_some(),
            refresh
        );

        match widget.render() {
            Ok(html) => println!("  {}", html),
            Err(e) => tracing::warn!(widget = %widget.identity(), error = %e, "Render failed"),
        }
    }

    Ok(())
}
