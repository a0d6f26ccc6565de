//! Single-line re-serialization

use tracing::instrument;

use crate::error::Result;
use crate::transform::Options;
use crate::xml::{self, FormatConfig};

/// Re-serialize a document without indentation or line breaks
///
/// ```
/// let flat = xtree::flatten("<root>\n  <element>something</element>\n</root>")?;
/// assert_eq!(flat, "<root><element>something</element></root>");
/// # Ok::<(), xtree::Error>(())
/// ```
pub fn flatten(xml: &str) -> Result<String> {
    flatten_with(xml, &Options::default())
}

/// Only the parser limits of `options` apply; the layout is always compact
#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn flatten_with(xml: &str, options: &Options) -> Result<String> {
    let doc = options.parse(xml)?;
    Ok(xml::to_string_with(&doc.root, &FormatConfig::compact()))
}
