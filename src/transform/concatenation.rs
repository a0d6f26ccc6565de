//! Inner text of a whole document

use tracing::instrument;

use crate::error::Result;
use crate::query::Query;
use crate::transform::Options;

/// Concatenate every text node of the document, depth-first, without separators
///
/// ```
/// let text = xtree::concatenated_text("<root><a>Hello</a><b>World</b></root>")?;
/// assert_eq!(text, "HelloWorld");
/// # Ok::<(), xtree::Error>(())
/// ```
pub fn concatenated_text(xml: &str) -> Result<String> {
    concatenated_text_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn concatenated_text_with(xml: &str, options: &Options) -> Result<String> {
    Ok(options.parse(xml)?.value())
}
