//! Rename the children of the root to `contact`

use tracing::instrument;

use crate::error::Result;
use crate::transform::Options;
use crate::xml::Element;

/// Replace every `customer` under the root with a `contact` holding the same content
///
/// ```
/// let xml = "<root><customer><name>A</name></customer></root>";
/// assert_eq!(
///     xtree::replace_customers_with_contacts(xml)?,
///     "<root>\n  <contact>\n    <name>A</name>\n  </contact>\n</root>"
/// );
/// # Ok::<(), xtree::Error>(())
/// ```
pub fn replace_customers_with_contacts(xml: &str) -> Result<String> {
    replace_customers_with_contacts_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn replace_customers_with_contacts_with(xml: &str, options: &Options) -> Result<String> {
    let doc = options.parse(xml)?;
    Ok(options.write(&rename_children(&doc.root, "contact")))
}

/// Copy of `root` whose child elements are renamed to `name`.
///
/// Only the root's name survives: its attributes are dropped along with any
/// text or comment sitting directly under it, and so are the attributes of
/// the renamed children. Child content is copied deeply. Namespace bindings
/// the copied content still needs are restored by the writer.
pub fn rename_children(root: &Element, name: &str) -> Element {
    let mut output = Element::new(root.name.clone());
    output.extend(root.elements().map(|child| Element {
        children: child.children.clone(),
        ..Element::new(name)
    }));
    output
}
