//! Typed queries over a parsed HTML page.
//!
//! Every extractor selects nodes through [`Query`] instead of building CSS
//! selector strings at the call site.

use scraper::{ElementRef, Html, Selector};

/// Attribute constraint applied after the tag selector matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrFilter {
    /// Every whitespace-separated token must be one of the element's classes.
    Class(String),
    /// The attribute must be present with exactly this value.
    Equals(String, String),
}

impl AttrFilter {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        match self {
            AttrFilter::Class(tokens) => tokens
                .split_whitespace()
                .all(|token| value.classes().any(|class| class == token)),
            AttrFilter::Equals(name, expected) => value.attr(name) == Some(expected.as_str()),
        }
    }
}

/// Tag name plus attribute filters, e.g. `span[itemprop=price].product-price`.
#[derive(Debug, Clone)]
pub struct Query {
    selector: Option<Selector>,
    filters: Vec<AttrFilter>,
}

impl Query {
    pub fn tag(tag: &'static str) -> Self {
        Self {
            selector: Selector::parse(tag).ok(),
            filters: Vec::new(),
        }
    }

    pub fn class(mut self, classes: &str) -> Self {
        self.filters.push(AttrFilter::Class(classes.to_string()));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.filters
            .push(AttrFilter::Equals(name.to_string(), value.to_string()));
        self
    }

    fn accepts(&self, element: &ElementRef<'_>) -> bool {
        self.filters.iter().all(|filter| filter.matches(element))
    }
}

/// An HTML page parsed into a navigable tree.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All matching nodes in document order.
    pub fn find_all(&self, query: &Query) -> Vec<Node<'_>> {
        match &query.selector {
            Some(selector) => self
                .html
                .select(selector)
                .filter(|el| query.accepts(el))
                .map(Node)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn find_first(&self, query: &Query) -> Option<Node<'_>> {
        let selector = query.selector.as_ref()?;
        self.html
            .select(selector)
            .find(|el| query.accepts(el))
            .map(Node)
    }
}

/// A matched element, borrowed from its [`ParsedDocument`].
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Concatenated descendant text, trimmed.
    pub fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Descendants of this node matching `query`, in document order.
    pub fn find_all(&self, query: &Query) -> Vec<Node<'a>> {
        match &query.selector {
            Some(selector) => self
                .0
                .select(selector)
                .filter(|el| query.accepts(el))
                .map(Node)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn find_first(&self, query: &Query) -> Option<Node<'a>> {
        let selector = query.selector.as_ref()?;
        self.0.select(selector).find(|el| query.accepts(el)).map(Node)
    }
}
