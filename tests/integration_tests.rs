//! Integration tests for the site widget facade
//!
//! These tests build a small site on disk and check how widgets resolve
//! text, assets and refresh parameters through the facade.

use std::path::Path;
use std::sync::Arc;

use site_widget::widget::{BaseGallery, Gallery, TextBlock, Widget, WidgetBase};
use site_widget::{
    FacadeError, PageEntry, RenderContext, SiteConfig, SiteRenderer, WidgetInstance,
    WidgetRegistry,
};

fn write(path: &Path, contents: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn site_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.domain = "example.org".to_string();
    config.languages = vec!["en".to_string(), "de".to_string(), "fr".to_string()];
    config.site_root = root.to_path_buf();
    config.widgets_dir = root.join("widgets");
    config.pages.push(PageEntry::new("about"));

    write(&root.join("assets/hero.png"), b"site hero");
    write(&root.join("assets/one.jpg"), b"one");
    write(&root.join("widgets/Gallery/assets/hero.png"), b"gallery hero");
    write(&root.join("widgets/BaseGallery/assets/hero.png"), b"base hero");
    write(
        &root.join("widgets/Gallery/markup.json"),
        br#"{"more": {"en": "More", "de": "Mehr"}}"#,
    );
    write(
        &root.join("widgets/BaseGallery/markup.json"),
        br#"{"caption": {"en": "Base caption"}}"#,
    );
    write(
        &root.join("widgets/TextBlock/markup.json"),
        br#"{"welcome": {"en": "Welcome", "de": "Willkommen"}}"#,
    );

    config
}

fn context(config: &SiteConfig, lang: &str) -> Arc<RenderContext> {
    RenderContext::from_config(config, "index", Some(lang)).unwrap()
}

#[test]
fn test_absent_text_key_returns_default_in_every_language() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());

    for lang in ["en", "de", "fr"] {
        let base = WidgetBase::new(context(&config, lang), "Gallery");
        assert_eq!(base.get_text("caption", "Untitled").unwrap(), "Untitled");
        assert_eq!(base.get_text("missing", "").unwrap(), "");
    }
}

#[test]
fn test_missing_translation_falls_back_to_default_language() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());

    let base = WidgetBase::new(context(&config, "fr"), "Gallery");
    assert_eq!(base.get_text("more", "x").unwrap(), "More");

    let base = WidgetBase::new(context(&config, "de"), "Gallery");
    assert_eq!(base.get_text("more", "x").unwrap(), "Mehr");
}

#[test]
fn test_subclass_uses_its_own_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let ctx = context(&config, "en");

    let base = BaseGallery::new(ctx.clone(), Vec::new(), 3);
    let gallery = Gallery::new(ctx, Vec::new(), 3, None);

    assert_eq!(
        base.base().get_text("caption", "Untitled").unwrap(),
        "Base caption"
    );
    assert_eq!(
        gallery.base().get_text("caption", "Untitled").unwrap(),
        "Untitled"
    );
}

#[test]
fn test_missing_dictionary_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    std::fs::create_dir_all(dir.path().join("widgets/Empty")).unwrap();

    let base = WidgetBase::new(context(&config, "en"), "Empty");
    let err = base.get_text("anything", "d").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_broken_dictionary_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    write(&dir.path().join("widgets/Broken/markup.json"), b"{ nope");

    let base = WidgetBase::new(context(&config, "en"), "Broken");
    assert!(matches!(
        base.get_text("anything", "d"),
        Err(FacadeError::Data { .. })
    ));
}

#[test]
fn test_non_mapping_dictionary_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let markup = dir.path().join("widgets/Gallery/markup.json");

    for content in [r#"["caption"]"#, r#""just a string""#] {
        write(&markup, content.as_bytes());
        let base = WidgetBase::new(context(&config, "en"), "Gallery");
        assert!(matches!(
            base.get_text("caption", "Untitled"),
            Err(FacadeError::Data { .. })
        ));
    }
}

#[test]
fn test_unpackaged_widget_assets_are_misconfigured() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let base = WidgetBase::new(context(&config, "en"), "Slider");

    assert!(matches!(
        base.get_text("caption", "Untitled"),
        Err(FacadeError::MisconfiguredWidget(_))
    ));
    assert!(matches!(
        base.make_asset_url("hero.png", true),
        Err(FacadeError::MisconfiguredWidget(id)) if id == "Slider"
    ));
    assert_eq!(
        base.make_asset_url("hero.png", false).unwrap(),
        "/assets/hero.png"
    );

    let escaping = WidgetBase::new(context(&config, "en"), "../widgets/Gallery");
    assert!(matches!(
        escaping.file_contents("hero.png", "", true),
        Err(FacadeError::MisconfiguredWidget(_))
    ));
}

#[test]
fn test_asset_tiers_are_disjoint() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let base = WidgetBase::new(context(&config, "en"), "Gallery");

    assert_eq!(
        base.make_asset_url("hero.png", true).unwrap(),
        "/widgets/Gallery/hero.png"
    );
    assert_eq!(
        base.make_asset_url("hero.png", false).unwrap(),
        "/assets/hero.png"
    );
    assert_eq!(base.file_contents("hero.png", "", true).unwrap(), b"gallery hero");
    assert_eq!(base.file_contents("hero.png", "", false).unwrap(), b"site hero");
}

#[test]
fn test_no_fallback_between_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let base = WidgetBase::new(context(&config, "en"), "Gallery");

    // only in the site tier
    assert!(base.make_asset_url("one.jpg", true).unwrap_err().is_not_found());
    // only in widget tiers
    std::fs::remove_file(dir.path().join("assets/hero.png")).unwrap();
    assert!(base.make_asset_url("hero.png", false).unwrap_err().is_not_found());
    assert!(base.asset_path("hero.png", "", false).unwrap_err().is_not_found());
}

#[test]
fn test_subclass_assets_resolve_against_own_package() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let ctx = context(&config, "en");

    let gallery = Gallery::new(ctx.clone(), Vec::new(), 3, Some("hero.png".to_string()));
    assert_eq!(
        gallery.base().make_asset_url("hero.png", true).unwrap(),
        "/widgets/Gallery/hero.png"
    );
    assert_eq!(
        gallery.base().file_contents("hero.png", "", true).unwrap(),
        b"gallery hero"
    );

    let base = BaseGallery::new(ctx, Vec::new(), 3);
    assert_eq!(
        base.base().make_asset_url("hero.png", true).unwrap(),
        "/widgets/BaseGallery/hero.png"
    );
}

#[test]
fn test_refresh_params_preserved_and_gated_by_js() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let ctx = context(&config, "en");

    let mut base = WidgetBase::new(ctx.clone(), "Gallery");
    assert!(base.refresh_params().is_none());
    base.set_refresh_params(vec!["color".to_string(), "size".to_string()]);
    assert_eq!(
        base.refresh_params().unwrap(),
        &["color".to_string(), "size".to_string()]
    );

    let gallery = Gallery::new(ctx.clone(), Vec::new(), 2, None);
    assert_eq!(
        SiteRenderer::client_refresh_params(&gallery),
        &["columns".to_string()]
    );

    // declared but no client code: renderer ignores the list
    struct Silent(WidgetBase);
    impl Widget for Silent {
        fn base(&self) -> &WidgetBase {
            &self.0
        }
        fn render(&self) -> site_widget::error::Result<String> {
            Ok(String::new())
        }
    }
    let mut silent = WidgetBase::new(ctx, "Silent");
    silent.set_refresh_params(["color"]);
    let silent = Silent(silent);
    assert_eq!(silent.base().refresh_params().unwrap().len(), 1);
    assert!(SiteRenderer::client_refresh_params(&silent).is_empty());
}

#[test]
fn test_gallery_render() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());

    let gallery = Gallery::new(
        context(&config, "en"),
        vec!["one.jpg".to_string()],
        2,
        Some("hero.png".to_string()),
    );
    let html = gallery.render().unwrap();

    assert!(html.contains("src=\"/widgets/Gallery/hero.png\""));
    assert!(html.contains("src=\"/assets/one.jpg\""));
    assert!(html.contains("<figcaption>Untitled</figcaption>"));
    assert!(html.contains("data-columns=\"2\""));
    assert!(!html.contains("srcset"));
}

#[test]
fn test_gallery_render_static_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = site_config(dir.path());
    config.static_export = true;
    config.image_widths = vec![320, 640];

    let gallery = BaseGallery::new(context(&config, "en"), vec!["one.jpg".to_string()], 2);
    let html = gallery.render().unwrap();

    assert!(html.contains("src=\"/assets/one.jpg?w=320\""));
    assert!(html.contains("srcset=\"/assets/one.jpg?w=320 320w, /assets/one.jpg?w=640 640w\""));
}

#[test]
fn test_gallery_render_missing_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());

    let gallery = Gallery::new(context(&config, "en"), vec!["nope.jpg".to_string()], 2, None);
    assert!(gallery.render().unwrap_err().is_not_found());
}

#[test]
fn test_text_block_render() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());

    let block = TextBlock::new(context(&config, "de"), "welcome", "Hi");
    assert_eq!(
        block.render().unwrap(),
        "<p class=\"text-block\" lang=\"de\">Willkommen</p>"
    );

    let block = TextBlock::new(context(&config, "de"), "absent", "Hi <you>");
    assert_eq!(block.text().unwrap(), "Hi <you>");
    assert!(block.render().unwrap().contains("Hi &lt;you&gt;"));
}

#[test]
fn test_registry_builds_configured_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = site_config(dir.path());

    let mut gallery = toml::Table::new();
    gallery.insert("columns".to_string(), toml::Value::Integer(4));
    config
        .widgets
        .push(WidgetInstance::with_config("Gallery", gallery));
    config.widgets.push(WidgetInstance::new("TextBlock"));
    let mut disabled = WidgetInstance::new("BaseGallery");
    disabled.enabled = false;
    config.widgets.push(disabled);

    let registry = WidgetRegistry::with_builtins();
    let ctx = context(&config, "en");
    let widgets: Vec<_> = config
        .enabled_widgets()
        .map(|instance| {
            registry
                .create(&instance.widget_type, ctx.clone(), &instance.config)
                .unwrap()
        })
        .collect();

    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0].identity().as_str(), "Gallery");
    assert!(widgets[0].render().unwrap().contains("data-columns=\"4\""));
    assert_eq!(widgets[1].identity().as_str(), "TextBlock");
}

#[test]
fn test_config_file_round_trip_with_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = site_config(dir.path());
    config.widgets.push(WidgetInstance::new("TextBlock"));
    config.settings = toml::from_str("[Gallery]\ncolumns = 2\n").unwrap();

    let path = dir.path().join("site.toml");
    config.save_to(&path).unwrap();
    let loaded = SiteConfig::load_from(&path).unwrap();

    assert_eq!(loaded.widgets.len(), 1);
    assert_eq!(loaded.pages.len(), 2);
    assert_eq!(loaded.languages, config.languages);

    let base = WidgetBase::new(context(&loaded, "en"), "Gallery");
    assert_eq!(base.settings(Some("columns")), serde_json::json!(2));
}
