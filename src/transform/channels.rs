//! Channels flagged for deletion

use tracing::{debug, instrument};

use crate::error::Result;
use crate::query::Query;
use crate::transform::Options;
use crate::xml::Element;

/// Comment text that flags a channel for deletion
pub const DELETE_MARKER: &str = "DELETE";

/// Ids of channels with more than one subscriber and a `DELETE` comment
pub fn find_channel_ids(xml: &str) -> Result<Vec<i32>> {
    find_channel_ids_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn find_channel_ids_with(xml: &str, options: &Options) -> Result<Vec<i32>> {
    let doc = options.parse(xml)?;
    let ids = marked_channel_ids(&doc.root)?;
    debug!(channels = ids.len(), "found channels marked for deletion");
    Ok(ids)
}

/// A channel qualifies with at least two `subscriber` children and a direct
/// comment reading exactly `DELETE`. Only qualifying channels need an `id`.
pub fn marked_channel_ids(root: &Element) -> Result<Vec<i32>> {
    root.elements_named("channel")
        .filter(|channel| is_marked(channel))
        .map(|channel| -> Result<i32> { channel.parse_attribute("id") })
        .collect()
}

fn is_marked(channel: &Element) -> bool {
    channel.elements_named("subscriber").nth(1).is_some()
        && channel.comments().any(|comment| comment == DELETE_MARKER)
}
