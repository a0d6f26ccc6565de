//! XML data model

use indexmap::IndexMap;

use crate::xml::name::QName;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attributes: IndexMap<QName, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Element {
    pub fn new(name: impl Into<QName>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Element holding a single text node; empty text yields an empty element
    pub fn with_text(name: impl Into<QName>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<QName>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    pub fn push(&mut self, child: Self) {
        self.children.push(Content::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Content::Text(text));
        }
    }

    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(Content::Comment(comment.into()));
    }

    /// True if any direct child is a text node
    pub fn has_text(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, Content::Text(_)))
    }
}

impl Extend<Element> for Element {
    fn extend<T: IntoIterator<Item = Element>>(&mut self, iter: T) {
        self.children.extend(iter.into_iter().map(Content::Element));
    }
}
