//! Order customers by country, then city

use tracing::{debug, instrument};

use crate::error::Result;
use crate::query::Query;
use crate::transform::Options;
use crate::xml::Element;

/// Sort the `Customers` elements of a document by `FullAddress/Country`, then `FullAddress/City`
pub fn sort_customers(xml: &str) -> Result<String> {
    sort_customers_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn sort_customers_with(xml: &str, options: &Options) -> Result<String> {
    let doc = options.parse(xml)?;
    let sorted = sort_by_country_and_city(&doc.root)?;
    Ok(options.write(&sorted))
}

/// `Root` holding copies of the `Customers` children of `root` in sorted order.
///
/// Keys compare ordinally and the sort is stable. Every customer's keys are
/// read before sorting, so a single incomplete address fails the whole call.
pub fn sort_by_country_and_city(root: &Element) -> Result<Element> {
    let mut keyed = root
        .elements_named("Customers")
        .map(|customer| sort_key(customer).map(|(country, city)| (country, city, customer)))
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|(country_a, city_a, _), (country_b, city_b, _)| {
        country_a.cmp(country_b).then_with(|| city_a.cmp(city_b))
    });
    debug!(customers = keyed.len(), "sorted customers");

    let mut output = Element::new("Root");
    output.extend(keyed.into_iter().map(|(_, _, customer)| customer.clone()));
    Ok(output)
}

fn sort_key(customer: &Element) -> Result<(String, String)> {
    let address = customer.require_child("FullAddress")?;
    Ok((address.child_value("Country")?, address.child_value("City")?))
}
