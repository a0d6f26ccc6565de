//! XML serialization

use crate::xml::model::{Content, Element};
use crate::xml::name::QName;

/// Configuration options for serializing a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_spaces: usize,
    /// Write everything on one line with no indentation
    pub compact: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_spaces: 2,
            compact: false,
        }
    }
}

impl FormatConfig {
    pub const fn compact() -> Self {
        Self {
            indent_spaces: 0,
            compact: true,
        }
    }
}

/// Serialize an element with the default (indented) layout
pub fn to_string(element: &Element) -> String {
    to_string_with(element, &FormatConfig::default())
}

/// Serialize an element with an explicit layout
///
/// Namespace declarations missing for a prefix or default namespace used in
/// the tree are added on the element that first needs them, so a subtree
/// copied out of its parent document still parses back.
pub fn to_string_with(element: &Element, config: &FormatConfig) -> String {
    let mut writer = Writer {
        output: String::new(),
        config,
        bindings: Vec::new(),
    };
    writer.write_element(element, 0, config.compact);
    writer.output
}

struct Writer<'c> {
    output: String,
    config: &'c FormatConfig,
    /// In-scope `(prefix, uri)` bindings; `None` is the default namespace
    bindings: Vec<(Option<String>, String)>,
}

impl Writer<'_> {
    fn write_element(&mut self, element: &Element, depth: usize, inline: bool) {
        let scope_depth = self.bindings.len();
        for (name, uri) in &element.attributes {
            if name.is_namespace_declaration() {
                let prefix = name.prefix().map(|_| name.local_name().to_string());
                self.bindings.push((prefix, uri.clone()));
            }
        }

        let mut missing = Vec::new();
        missing.extend(self.bind(&element.name, true));
        for name in element.attributes.keys() {
            missing.extend(self.bind(name, false));
        }

        self.output.push('<');
        self.output.push_str(&element.name.to_string());

        for (prefix, uri) in &missing {
            self.output.push_str(" xmlns");
            if let Some(prefix) = prefix {
                self.output.push(':');
                self.output.push_str(prefix);
            }
            self.output.push_str("=\"");
            escape_attribute(uri, &mut self.output);
            self.output.push('"');
        }

        for (name, value) in &element.attributes {
            self.output.push(' ');
            self.output.push_str(&name.to_string());
            self.output.push_str("=\"");
            escape_attribute(value, &mut self.output);
            self.output.push('"');
        }

        if element.children.is_empty() {
            self.output.push_str(" />");
        } else {
            self.output.push('>');

            // mixed content is written as-is, indentation would change its text
            let inline = inline || element.has_text();
            for child in &element.children {
                if !inline {
                    self.newline(depth + 1);
                }
                self.write_content(child, depth + 1, inline);
            }
            if !inline {
                self.newline(depth);
            }

            self.output.push_str("</");
            self.output.push_str(&element.name.to_string());
            self.output.push('>');
        }

        self.bindings.truncate(scope_depth);
    }

    /// Binding `name` needs that is not in scope yet; it is in scope afterwards.
    ///
    /// Unprefixed attributes never take the default namespace, and the
    /// reserved `xml`/`xmlns` prefixes are never declared.
    fn bind(&mut self, name: &QName, is_element: bool) -> Option<(Option<String>, String)> {
        let prefix = name.prefix();
        if matches!(prefix, Some("xml" | "xmlns")) || (prefix.is_none() && !is_element) {
            return None;
        }
        // a prefix can't be undeclared, only rebound
        if prefix.is_some() && name.namespace().is_none() {
            return None;
        }

        let wanted = name.namespace().unwrap_or_default();
        let current = self
            .bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound.as_deref() == prefix)
            .map_or("", |(_, uri)| uri.as_str());
        if current == wanted {
            return None;
        }

        let binding = (prefix.map(str::to_string), wanted.to_string());
        self.bindings.push(binding.clone());
        Some(binding)
    }

    fn write_content(&mut self, content: &Content, depth: usize, inline: bool) {
        match content {
            Content::Element(element) => self.write_element(element, depth, inline),
            Content::Text(text) => escape_text(text, &mut self.output),
            Content::Comment(comment) => {
                self.output.push_str("<!--");
                self.output.push_str(comment);
                self.output.push_str("-->");
            }
        }
    }

    fn newline(&mut self, depth: usize) {
        self.output.push('\n');
        let width = depth.saturating_mul(self.config.indent_spaces);
        self.output.extend(std::iter::repeat(' ').take(width));
    }
}

fn escape_text(input: &str, output: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(ch),
        }
    }
}

fn escape_attribute(input: &str, output: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\n' => output.push_str("&#xA;"),
            '\r' => output.push_str("&#xD;"),
            '\t' => output.push_str("&#x9;"),
            _ => output.push(ch),
        }
    }
}
