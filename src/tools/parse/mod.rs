//! Document Parser
//!
//! Thin wrapper over `scraper::Html` with BeautifulSoup-style lookups
//! (tag / id / class) and a pretty-printed snapshot for auditing.

mod tests;
mod utils;

use scraper::{ElementRef, Html, Selector};
use utils::*;

/// A parsed HTML page.
///
/// Not `Send`: parse, query and drop it between awaits.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw page content. Blank input is rejected since there is nothing
    /// to extract from it.
    pub fn parse(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Err("page content is empty".into());
        }
        Ok(Self {
            html: Html::parse_document(content),
        })
    }

    /// First element matching the query, in document order.
    pub fn find(&self, query: &Query) -> Option<ElementRef<'_>> {
        find_within(self.html.root_element(), query)
    }

    /// Every element matching the query, in document order.
    pub fn find_all(&self, query: &Query) -> Vec<ElementRef<'_>> {
        find_all_within(self.html.root_element(), query)
    }

    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// Indented, one-node-per-line rendering of the whole tree.
    pub fn prettify(&self) -> String {
        prettify_html(&self.html)
    }
}

/// Element query by tag name, id and/or class. Unset parts match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Query<'q> {
    tag: Option<&'q str>,
    id: Option<&'q str>,
    class: Option<&'q str>,
}

impl<'q> Query<'q> {
    pub fn tag(name: &'q str) -> Self {
        Self {
            tag: Some(name),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &'q str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn class(mut self, class: &'q str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn matches(&self, element: &ElementRef) -> bool {
        let el = element.value();
        if let Some(tag) = self.tag {
            if !el.name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = self.id {
            if el.id() != Some(id) {
                return false;
            }
        }
        if let Some(class) = self.class {
            if !el.classes().any(|c| c == class) {
                return false;
            }
        }
        true
    }
}

/// First descendant of `scope` (itself included) matching the query.
pub fn find_within<'a>(scope: ElementRef<'a>, query: &Query) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| query.matches(el))
}

pub fn find_all_within<'a>(scope: ElementRef<'a>, query: &Query) -> Vec<ElementRef<'a>> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| query.matches(el))
        .collect()
}

/// Text of an element with every string stripped and empty ones dropped,
/// concatenated without a separator.
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
