//! Typed navigation over parsed trees
//!
//! Every lookup comes in two flavours: an `Option`-returning one for
//! optional structure and a `require_*` one that turns absence into a
//! structure error naming the missing piece.

use crate::error::{Error, ErrorKind, Result};
use crate::xml::{Content, Document, Element, Name};

/// Element and attribute lookups by expanded name
pub trait Query {
    /// The element lookups start from
    fn context(&self) -> &Element;

    /// First child element with the given name
    fn find_child<'n>(&self, name: impl Into<Name<'n>>) -> Option<&Element> {
        let name = name.into();
        self.context().elements().find(|e| e.name.matches(name))
    }

    /// Attribute value by name
    fn attribute<'n>(&self, name: impl Into<Name<'n>>) -> Option<&str> {
        let name = name.into();
        self.context()
            .attributes
            .iter()
            .find(|(key, _)| key.matches(name))
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of every descendant text node, in document order
    fn value(&self) -> String {
        let mut text = String::new();
        collect_text(self.context(), &mut text);
        text
    }

    fn require_child<'n>(&self, name: impl Into<Name<'n>>) -> Result<&Element> {
        let name = name.into();
        self.find_child(name).ok_or_else(|| {
            Error::from(ErrorKind::MissingElement {
                parent: self.context().name.to_string(),
                name: name.to_string(),
            })
        })
    }

    fn require_attribute<'n>(&self, name: impl Into<Name<'n>>) -> Result<&str> {
        let name = name.into();
        self.attribute(name).ok_or_else(|| {
            Error::from(ErrorKind::MissingAttribute {
                element: self.context().name.to_string(),
                name: name.to_string(),
            })
        })
    }

    /// Inner text of a required child element
    fn child_value<'n>(&self, name: impl Into<Name<'n>>) -> Result<String> {
        self.require_child(name).map(|child| child.value())
    }

    /// Required attribute parsed into `T`
    fn parse_attribute<'n, T: std::str::FromStr>(
        &self,
        name: impl Into<Name<'n>>,
    ) -> Result<T> {
        let name = name.into();
        let raw = self.require_attribute(name)?;
        raw.trim().parse().map_err(|_| {
            Error::from(ErrorKind::InvalidValue {
                name: name.to_string(),
                value: raw.to_string(),
            })
        })
    }
}

impl Query for Element {
    fn context(&self) -> &Self {
        self
    }
}

impl Query for Document {
    fn context(&self) -> &Element {
        &self.root
    }
}

impl Element {
    /// Direct child elements
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct child elements with the given name
    pub fn elements_named<'a>(
        &'a self,
        name: impl Into<Name<'a>> + 'a,
    ) -> impl Iterator<Item = &'a Self> + 'a {
        let name = name.into();
        self.elements().filter(move |e| e.name.matches(name))
    }

    /// Text of the direct comment children
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match child {
            Content::Comment(comment) => Some(comment.as_str()),
            _ => None,
        })
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Content::Text(text) => out.push_str(text),
            Content::Element(element) => collect_text(element, out),
            Content::Comment(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::from_xml_str;

    const NS: &str = "urn:test";

    fn sample() -> Result<Document> {
        from_xml_str(
            r#"<root xmlns:t="urn:test" id="7">
                <a>Hello<!-- skip --></a>
                <b t:kind="x"><c>World</c></b>
                <a>again</a>
            </root>"#,
        )
    }

    #[test]
    fn test_find_child_and_elements_named() -> Result<()> {
        let doc = sample()?;
        assert_eq!(doc.find_child("b").map(|b| b.value()), Some("World".to_string()));
        assert_eq!(doc.root.elements_named("a").count(), 2);
        assert!(doc.find_child("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_value_concatenates_descendants() -> Result<()> {
        let doc = sample()?;
        assert_eq!(doc.value(), "HelloWorldagain");
        Ok(())
    }

    #[test]
    fn test_namespaced_attribute() -> Result<()> {
        let doc = sample()?;
        let b = doc.require_child("b")?;
        assert_eq!(b.attribute(Name::ns(NS, "kind")), Some("x"));
        assert_eq!(b.attribute("kind"), None);
        Ok(())
    }

    #[test]
    fn test_require_reports_missing_pieces() -> Result<()> {
        let doc = sample()?;
        let err = doc.require_child("FullAddress").err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MissingElement {
                parent: "root".to_string(),
                name: "FullAddress".to_string(),
            })
        );
        assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::Structure));

        let err = doc.require_attribute("Id").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MissingAttribute { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_parse_attribute() -> Result<()> {
        let doc = sample()?;
        let id: i32 = doc.parse_attribute("id")?;
        assert_eq!(id, 7);

        let b = doc.require_child("b")?;
        let parsed: Result<i32> = b.parse_attribute(Name::ns(NS, "kind"));
        let err = parsed.err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::InvalidValue { value, .. }) if value == "x"
        ));
        Ok(())
    }

    #[test]
    fn test_comments() -> Result<()> {
        let doc = sample()?;
        let a = doc.require_child("a")?;
        assert_eq!(a.comments().collect::<Vec<_>>(), vec![" skip "]);
        Ok(())
    }
}
