//! Qualified names and namespace scoping

use std::fmt;

/// Namespace bound to the reserved `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// Namespace of `xmlns` declaration attributes
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// An element or attribute name as written in a document, with its resolved namespace.
///
/// Equality and hashing include the prefix, so two attributes that differ only
/// in prefix are still distinct map keys. Lookups go through [`QName::matches`],
/// which compares expanded names and ignores the prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    prefix: Option<String>,
    local: String,
    namespace: Option<String>,
}

impl QName {
    /// Unqualified name in no namespace
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
            namespace: None,
        }
    }

    pub fn new(
        prefix: Option<String>,
        local: impl Into<String>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            prefix,
            local: local.into(),
            namespace,
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Borrowed expanded name
    pub fn expanded(&self) -> Name<'_> {
        Name {
            namespace: self.namespace(),
            local: &self.local,
        }
    }

    /// Compare expanded names
    pub fn matches(&self, name: Name<'_>) -> bool {
        self.expanded() == name
    }

    /// True for `xmlns` and `xmlns:*` declaration attributes
    pub fn is_namespace_declaration(&self) -> bool {
        self.namespace() == Some(XMLNS_NAMESPACE)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl From<&str> for QName {
    fn from(local: &str) -> Self {
        Self::local(local)
    }
}

/// Expanded name used to look elements and attributes up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Name<'a> {
    pub namespace: Option<&'a str>,
    pub local: &'a str,
}

impl<'a> Name<'a> {
    pub const fn ns(namespace: &'a str, local: &'a str) -> Self {
        Self {
            namespace: Some(namespace),
            local,
        }
    }
}

impl<'a> From<&'a str> for Name<'a> {
    fn from(local: &'a str) -> Self {
        Self {
            namespace: None,
            local,
        }
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(self.local),
        }
    }
}

/// Split `prefix:local` into its parts
pub(crate) fn split_qualified(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

/// Stack of in-scope prefix bindings while walking a document
#[derive(Debug, Default)]
pub(crate) struct NamespaceScope {
    /// `None` prefix is the default namespace; an empty uri undeclares it
    bindings: Vec<(Option<String>, String)>,
}

impl NamespaceScope {
    pub(crate) fn depth(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn declare(&mut self, prefix: Option<String>, uri: String) {
        self.bindings.push((prefix, uri));
    }

    pub(crate) fn truncate(&mut self, depth: usize) {
        self.bindings.truncate(depth);
    }

    /// Resolve a prefix; `Ok(None)` means no namespace, `Err(())` means undeclared
    pub(crate) fn resolve(&self, prefix: Option<&str>) -> Result<Option<String>, ()> {
        match prefix {
            Some("xml") => return Ok(Some(XML_NAMESPACE.to_string())),
            Some("xmlns") => return Ok(Some(XMLNS_NAMESPACE.to_string())),
            _ => {}
        }

        let bound = self
            .bindings
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri);

        match (prefix, bound) {
            (_, Some(uri)) if uri.is_empty() => Ok(None),
            (_, Some(uri)) => Ok(Some(uri.clone())),
            (None, None) => Ok(None),
            (Some(_), None) => Err(()),
        }
    }
}
