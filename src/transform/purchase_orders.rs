//! Purchase orders shipping to a given state

use tracing::{debug, instrument};

use crate::error::Result;
use crate::query::Query;
use crate::transform::Options;
use crate::xml::{Element, Name};

/// Namespace of the purchase order vocabulary
pub const ADVENTURE_WORKS_NS: &str = "http://www.adventure-works.com";

const SHIPPING: &str = "Shipping";
const NEW_YORK: &str = "NY";

fn aw(local: &str) -> Name<'_> {
    Name::ns(ADVENTURE_WORKS_NS, local)
}

/// Comma-separated numbers of the orders with a shipping address in NY
pub fn purchase_orders(xml: &str) -> Result<String> {
    purchase_orders_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn purchase_orders_with(xml: &str, options: &Options) -> Result<String> {
    let doc = options.parse(xml)?;
    let numbers = order_numbers(&doc.root, SHIPPING, NEW_YORK)?;
    debug!(matches = numbers.len(), "selected purchase orders");
    Ok(numbers.join(","))
}

/// `PurchaseOrderNumber` of every order having an address of `address_type` in `state`
pub fn order_numbers<'a>(
    root: &'a Element,
    address_type: &str,
    state: &str,
) -> Result<Vec<&'a str>> {
    let mut numbers = Vec::new();
    for order in root.elements_named(aw("PurchaseOrder")) {
        if has_address(order, address_type, state)? {
            numbers.push(order.require_attribute(aw("PurchaseOrderNumber"))?);
        }
    }
    Ok(numbers)
}

/// Addresses are checked in order; the first match ends the scan
fn has_address(order: &Element, address_type: &str, state: &str) -> Result<bool> {
    for address in order.elements_named(aw("Address")) {
        if address.require_attribute(aw("Type"))? == address_type
            && address.child_value(aw("State"))? == state
        {
            return Ok(true);
        }
    }
    Ok(false)
}
