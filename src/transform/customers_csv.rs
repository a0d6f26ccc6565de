//! Build a customer tree from CSV lines

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::transform::Options;
use crate::xml::Element;

/// Fields per customer line
pub const FIELD_COUNT: usize = 10;

/// One CSV line split into its customer fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    fields: [&'a str; FIELD_COUNT],
}

impl<'a> Record<'a> {
    /// Split a line on commas. Quoting is not supported.
    ///
    /// `number` is the 1-based position of the line among non-empty lines
    /// and is only used for error reporting.
    pub fn parse(line: &'a str, number: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').collect();
        let found = fields.len();
        let fields = <[&str; FIELD_COUNT]>::try_from(fields).map_err(|_| {
            Error::from(ErrorKind::FieldCount {
                record: number,
                expected: FIELD_COUNT,
                found,
            })
        })?;
        Ok(Self { fields })
    }

    pub fn customer_id(&self) -> &'a str {
        let [id, ..] = self.fields;
        id
    }

    pub fn to_element(&self) -> Element {
        let [id, company, contact, title, phone, address, city, region, postal_code, country] =
            self.fields;

        Element::new("Customer")
            .attr("CustomerID", id)
            .child(Element::with_text("CompanyName", company))
            .child(Element::with_text("ContactName", contact))
            .child(Element::with_text("ContactTitle", title))
            .child(Element::with_text("Phone", phone))
            .child(
                Element::new("FullAddress")
                    .child(Element::with_text("Address", address))
                    .child(Element::with_text("City", city))
                    .child(Element::with_text("Region", region))
                    .child(Element::with_text("PostalCode", postal_code))
                    .child(Element::with_text("Country", country)),
            )
    }
}

/// Non-empty lines of a CSV text; both `\r` and `\n` separate lines
pub fn lines(csv: &str) -> impl Iterator<Item = &str> {
    csv.split(['\r', '\n']).filter(|line| !line.is_empty())
}

/// Convert CSV customer lines into an XML customer document
pub fn customers_from_csv(csv: &str) -> Result<String> {
    customers_from_csv_with(csv, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = csv.len()))]
pub fn customers_from_csv_with(csv: &str, options: &Options) -> Result<String> {
    let root = customers_tree(csv)?;
    Ok(options.write(&root))
}

/// `Root` with one `Customer` per non-empty line
pub fn customers_tree(csv: &str) -> Result<Element> {
    let mut root = Element::new("Root");
    for (index, line) in lines(csv).enumerate() {
        let record = Record::parse(line, index + 1)?;
        root.push(record.to_element());
    }
    debug!(customers = root.children.len(), "materialized customers");
    Ok(root)
}
