//! Page index and pre-rendered page collaborators

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::config::{table_to_json, SiteConfig};

/// Metadata of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Page name
    pub name: String,
    /// Whether this is the home page
    pub is_home: bool,
    /// Title keyed by language
    pub titles: BTreeMap<String, String>,
    /// Page-specific settings
    pub settings: Map<String, Value>,
}

impl PageRecord {
    /// Page with no title or settings
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_home: false,
            titles: BTreeMap::new(),
            settings: Map::new(),
        }
    }
}

/// Read access to the page graph
pub trait PageIndex: Send + Sync {
    /// Look up a page by name, or the home page when `name` is `None` and
    /// `is_home` is set
    fn page_info(&self, name: Option<&str>, is_home: bool) -> Option<&PageRecord>;

    /// Name of the home page, if one is marked
    fn home_page_name(&self) -> Option<&str> {
        self.page_info(None, true).map(|page| page.name.as_str())
    }
}

/// Page index held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryPageIndex {
    pages: Vec<PageRecord>,
}

impl InMemoryPageIndex {
    /// Index over `pages`
    pub fn new(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }

    /// Build the index from configured pages
    ///
    /// The page named by `home_page` is the home page even when no entry sets
    /// `home = true`.
    pub fn from_config(config: &SiteConfig) -> Self {
        let pages = config
            .pages
            .iter()
            .map(|entry| PageRecord {
                name: entry.name.clone(),
                is_home: entry.home || entry.name == config.home_page,
                titles: entry.titles.clone(),
                settings: table_to_json(&entry.settings),
            })
            .collect();
        Self::new(pages)
    }
}

impl PageIndex for InMemoryPageIndex {
    fn page_info(&self, name: Option<&str>, is_home: bool) -> Option<&PageRecord> {
        match name {
            Some(name) => self.pages.iter().find(|page| page.name == name),
            None if is_home => self.pages.iter().find(|page| page.is_home),
            None => None,
        }
    }
}

/// One element of a pre-rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedElement {
    /// Tag name
    pub tag: String,
    /// `id` attribute
    pub id: Option<String>,
    /// `class` attribute entries
    pub classes: Vec<String>,
    /// Text content
    pub text: String,
}

impl RenderedElement {
    /// Element without id or classes
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            text: text.to_string(),
        }
    }

    /// Set the `id` attribute
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add a class
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Match a simple selector: `tag`, `#id` or `.class`
    pub fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            self.tag.eq_ignore_ascii_case(selector)
        }
    }
}

/// Queryable view of pages that were already rendered
pub trait PreRenderer: Send + Sync {
    /// Elements of `page` in `lang` matching `selector`, in document order
    fn query(&self, page: &str, lang: &str, selector: &str) -> Vec<&RenderedElement>;
}

/// Pre-rendered pages held in memory
#[derive(Debug, Default)]
pub struct InMemoryPreRenderer {
    pages: HashMap<(String, String), Vec<RenderedElement>>,
}

impl InMemoryPreRenderer {
    /// Empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the rendered elements of a page
    pub fn insert(&mut self, page: &str, lang: &str, elements: Vec<RenderedElement>) {
        self.pages
            .insert((page.to_string(), lang.to_string()), elements);
    }
}

impl PreRenderer for InMemoryPreRenderer {
    fn query(&self, page: &str, lang: &str, selector: &str) -> Vec<&RenderedElement> {
        self.pages
            .get(&(page.to_string(), lang.to_string()))
            .map(|elements| elements.iter().filter(|e| e.matches(selector)).collect())
            .unwrap_or_default()
    }
}
