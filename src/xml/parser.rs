//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::config::Config;
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Document, Element};
use crate::xml::name::{split_qualified, NamespaceScope, QName, XMLNS_NAMESPACE};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    scope: NamespaceScope,
}

/// Attribute as written, before namespace resolution
struct RawAttribute {
    name: String,
    value: String,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new XML parser with custom limits
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            scope: NamespaceScope::default(),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let size = self.cursor.remaining().len();
        if self.config.max_size > 0 && size > self.config.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::empty(),
            ));
        }

        if self.cursor.starts_with(b"\xEF\xBB\xBF") {
            self.cursor.advance_by(3);
        }

        self.skip_misc()?;
        if self.cursor.starts_with(b"<!DOCTYPE") {
            self.skip_doctype()?;
            self.skip_misc()?;
        }

        if self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::UnexpectedEof));
        }

        let root = self.parse_element(1)?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.invalid_here("content after root element"));
        }

        Ok(Document { root })
    }

    /// Skip whitespace, comments and processing instructions outside the root
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else {
                return Ok(());
            }
        }
    }

    /// Skip a DOCTYPE, including its internal subset. Brackets inside quoted
    /// literals and comments do not count.
    fn skip_doctype(&mut self) -> Result<()> {
        let mut subset_depth = 0usize;
        while let Some(b) = self.cursor.current() {
            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }
            self.cursor.advance();
            match b {
                b'"' | b'\'' => self.skip_until(&[b])?,
                b'[' => subset_depth += 1,
                b']' => subset_depth = subset_depth.saturating_sub(1),
                b'>' if subset_depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_element(&mut self, depth: u16) -> Result<Element> {
        if self.config.max_depth > 0 && depth > self.config.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }

        let start = self.cursor.position();
        self.expect_byte(b'<')?;
        let raw_name = self.parse_name()?;
        let raw_attributes = self.parse_attributes()?;

        let scope_depth = self.scope.depth();
        let element = self.resolve_element(&raw_name, raw_attributes, Span::at(start));
        let mut element = match element {
            Ok(element) => element,
            Err(err) => {
                self.scope.truncate(scope_depth);
                return Err(err);
            }
        };

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.scope.truncate(scope_depth);
            return Ok(element);
        }

        self.expect_byte(b'>')?;
        self.parse_content(&raw_name, &mut element, depth)?;
        self.scope.truncate(scope_depth);

        Ok(element)
    }

    fn parse_content(&mut self, raw_name: &str, element: &mut Element, depth: u16) -> Result<()> {
        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != raw_name {
                    return Err(self.error_here(ErrorKind::MismatchedTag {
                        expected: raw_name.to_string(),
                        found: close_name,
                    }));
                }
                self.cursor.skip_whitespace();
                return self.expect_byte(b'>');
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                let comment = self.take_until(b"-->")?;
                element.children.push(Content::Comment(comment));
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                let text = normalize_newlines(&self.take_until(b"]]>")?);
                append_text(element, text);
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element(depth.saturating_add(1))?;
                element.children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof));
            }

            if let Some(text) = self.parse_text()? {
                append_text(element, text);
            }
        }
    }

    /// Bind the element's namespace declarations and resolve its names
    fn resolve_element(
        &mut self,
        raw_name: &str,
        raw_attributes: Vec<RawAttribute>,
        span: Span,
    ) -> Result<Element> {
        for attr in &raw_attributes {
            match split_qualified(&attr.name) {
                (None, "xmlns") => self.scope.declare(None, attr.value.clone()),
                (Some("xmlns"), prefix) => {
                    self.scope
                        .declare(Some(prefix.to_string()), attr.value.clone());
                }
                _ => {}
            }
        }

        let (prefix, local) = split_qualified(raw_name);
        let namespace = self.resolve_prefix(prefix, span)?;
        let name = QName::new(prefix.map(str::to_string), local, namespace);

        let mut attributes = IndexMap::with_capacity(raw_attributes.len());
        for attr in raw_attributes {
            let qname = match split_qualified(&attr.name) {
                (None, "xmlns") => QName::new(None, "xmlns", Some(XMLNS_NAMESPACE.to_string())),
                // unprefixed attributes are never in the default namespace
                (None, local) => QName::local(local),
                (Some(prefix), local) => {
                    let namespace = self.resolve_prefix(Some(prefix), span)?;
                    QName::new(Some(prefix.to_string()), local, namespace)
                }
            };

            let duplicate = attributes
                .keys()
                .any(|existing: &QName| existing.matches(qname.expanded()));
            if duplicate {
                return Err(Error::new(
                    ErrorKind::DuplicateAttribute { name: attr.name },
                    span,
                ));
            }
            attributes.insert(qname, attr.value);
        }

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn resolve_prefix(&self, prefix: Option<&str>, span: Span) -> Result<Option<String>> {
        self.scope.resolve(prefix).map_err(|()| {
            Error::new(
                ErrorKind::UndeclaredPrefix {
                    prefix: prefix.unwrap_or_default().to_string(),
                },
                span,
            )
        })
    }

    fn parse_attributes(&mut self) -> Result<Vec<RawAttribute>> {
        let mut attrs: Vec<RawAttribute> = Vec::new();

        loop {
            let had_space = matches!(self.cursor.current(), Some(b' ' | b'\t' | b'\r' | b'\n'));
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.invalid_here("expected whitespace before attribute"));
                }
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.iter().any(|attr| attr.name == name) {
                return Err(self.error_here(ErrorKind::DuplicateAttribute { name }));
            }
            attrs.push(RawAttribute { name, value });
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.invalid_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = self.bytes_to_string(raw)?;
                let text = text.replace(['\t', '\n', '\r'], " ");
                return self.decode_entities(&text);
            }
            if b == b'<' {
                return Err(self.invalid_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.bytes_to_string(raw)?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        let text = self.decode_entities(&normalize_newlines(&text))?;
        Ok(Some(text))
    }

    fn parse_name(&mut self) -> Result<String> {
        let Some(first) = self.cursor.current() else {
            return Err(self.error_here(ErrorKind::UnexpectedEof));
        };
        if !is_name_start(first) {
            return Err(self.invalid_here("expected name"));
        }

        let start = self.cursor.pos();
        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_string(raw)
    }

    /// Consume input up to and including `pattern`, returning what came before it
    fn take_until(&mut self, pattern: &[u8]) -> Result<String> {
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return self.bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        self.take_until(pattern).map(|_| ())
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.cursor.current() {
            Some(b) if b == expected => {
                self.cursor.advance();
                Ok(())
            }
            Some(_) => Err(self.invalid_here(&format!("expected '{}'", char::from(expected)))),
            None => Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| self.error_here(ErrorKind::InvalidUtf8))
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        if !input.contains('&') {
            return Ok(input.to_string());
        }

        let mut result = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(amp) = rest.find('&') {
            let (before, after) = rest.split_at(amp);
            result.push_str(before);

            let after = after.get(1..).unwrap_or_default();
            let Some(semi) = after.find(';') else {
                return Err(self.error_here(ErrorKind::InvalidEntity {
                    entity: after.to_string(),
                }));
            };
            let (entity, tail) = after.split_at(semi);

            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric_entity(entity),
            };
            match decoded {
                Some(ch) => result.push(ch),
                None => {
                    return Err(self.error_here(ErrorKind::InvalidEntity {
                        entity: entity.to_string(),
                    }));
                }
            }

            rest = tail.get(1..).unwrap_or_default();
        }
        result.push_str(rest);

        Ok(result)
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }

    fn invalid_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::at(self.cursor.position()),
            message,
        )
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Adjacent text (plain and CDATA) becomes one node; empty text is not stored
fn append_text(element: &mut Element, text: String) {
    match element.children.last_mut() {
        Some(Content::Text(previous)) => previous.push_str(&text),
        _ => element.push_text(text),
    }
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
