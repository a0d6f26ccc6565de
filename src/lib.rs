//! xtree: small declarative transforms over XML trees
//!
//! This crate provides:
//! - A namespace-aware XML parser producing an owned [`Element`] tree
//! - Typed lookups through the [`Query`] trait
//! - A deterministic writer with indented and compact layouts
//! - A set of independent, stateless transforms (grouping, filtering,
//!   renaming, sorting, joining) that each go from text to text, integers or
//!   a sequence of ids
//!
//! # Quick Start
//!
//! ```
//! use xtree::{from_xml_str, Query};
//! # fn main() -> Result<(), xtree::Error> {
//! let doc = from_xml_str(r#"<root><channel id="3"><name>news</name></channel></root>"#)?;
//! let channel = doc.require_child("channel")?;
//! assert_eq!(channel.attribute("id"), Some("3"));
//! assert_eq!(channel.child_value("name")?, "news");
//!
//! let ids = xtree::find_channel_ids(
//!     r#"<root><channel id="7"><subscriber/><subscriber/><!--DELETE--></channel></root>"#,
//! )?;
//! assert_eq!(ids, vec![7]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorCategory, ErrorKind, Pos, Result, Span};

pub mod xml;
pub use xml::{
    Config, Content, Document, Element, FormatConfig, Name, Parser as XmlParser, QName,
};

pub mod query;
pub use query::Query;

pub mod transform;
pub use transform::{JoinPolicy, Operation, Options, Output};

pub use transform::channels::find_channel_ids;
pub use transform::concatenation::concatenated_text;
pub use transform::contacts::replace_customers_with_contacts;
pub use transform::customers_csv::customers_from_csv;
pub use transform::flatten::flatten;
pub use transform::hierarchy::create_hierarchy;
pub use transform::orders::orders_value;
pub use transform::purchase_orders::purchase_orders;
pub use transform::sorting::sort_customers;

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<Document> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<Document> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Parse XML with custom limits
pub fn from_xml_str_with_config(s: &str, config: Config) -> Result<Document> {
    let mut parser = XmlParser::with_config(s.as_bytes(), config);
    parser.parse()
}

/// Serialize an element with two-space indentation
pub fn to_xml_string(element: &Element) -> String {
    xml::to_string(element)
}
