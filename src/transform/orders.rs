//! Total value of orders joined against a product catalog

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::query::Query;
use crate::transform::Options;
use crate::xml::Element;

/// What to do with an order naming a product the catalog does not list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JoinPolicy {
    /// Inner join: the order contributes nothing
    #[default]
    Inner,
    /// The whole computation fails with [`ErrorKind::UnmatchedProduct`]
    Strict,
}

/// Sum of product values over all orders, dropping unmatched orders
pub fn orders_value(xml: &str) -> Result<i64> {
    orders_value_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len(), policy = ?options.join))]
pub fn orders_value_with(xml: &str, options: &Options) -> Result<i64> {
    let doc = options.parse(xml)?;
    total_value(&doc.root, options.join)
}

/// Join `Orders/Order/product` text against `products/*[@Id]` and sum `@Value`.
///
/// Products sharing an `Id` each contribute to every order naming it.
/// A product's `Value` is only read when some order references it.
pub fn total_value(root: &Element, policy: JoinPolicy) -> Result<i64> {
    let catalog = catalog(root)?;

    let mut total: i64 = 0;
    let mut unmatched = 0usize;
    for orders in root.elements_named("Orders") {
        for order in orders.elements_named("Order") {
            let key = order.child_value("product")?;
            let Some(products) = catalog.get(key.as_str()) else {
                if policy == JoinPolicy::Strict {
                    return Err(Error::from(ErrorKind::UnmatchedProduct { key }));
                }
                unmatched += 1;
                continue;
            };

            for product in products {
                let value: i64 = product.parse_attribute("Value")?;
                total = total.checked_add(value).ok_or_else(|| {
                    Error::from(ErrorKind::InvalidValue {
                        name: "orders total".to_string(),
                        value: format!("{total} + {value}"),
                    })
                })?;
            }
        }
    }

    if unmatched > 0 {
        warn!(unmatched, "dropped orders with no matching product");
    }
    debug!(total, "computed orders value");
    Ok(total)
}

/// Products of the first `products` element, grouped by `Id`
fn catalog(root: &Element) -> Result<HashMap<&str, Vec<&Element>>> {
    let mut catalog: HashMap<&str, Vec<&Element>> = HashMap::new();
    for product in root.require_child("products")?.elements() {
        let id = product.require_attribute("Id")?;
        catalog.entry(id).or_default().push(product);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    const ORDERS: &str = r#"<Root>
  <Orders>
    <Order><product>A1</product></Order>
    <Order><product>B2</product></Order>
  </Orders>
  <Orders>
    <Order><product>A1</product></Order>
    <Order><product>ZZ</product></Order>
  </Orders>
  <products>
    <product Id="A1" Value="10"/>
    <product Id="B2" Value="5"/>
    <product Id="C3" Value="oops"/>
  </products>
</Root>"#;

    fn strict() -> Options {
        Options {
            join: JoinPolicy::Strict,
            ..Options::default()
        }
    }

    #[test]
    fn test_sum_drops_unmatched_orders() -> Result<()> {
        assert_eq!(orders_value(ORDERS)?, 25);
        Ok(())
    }

    #[test]
    fn test_strict_policy_rejects_unmatched_orders() {
        let err = orders_value_with(ORDERS, &strict()).err();
        assert_eq!(
            err.as_ref().map(|e| e.kind().clone()),
            Some(ErrorKind::UnmatchedProduct { key: "ZZ".to_string() })
        );
        assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::Structure));
    }

    #[test]
    fn test_no_orders_sum_to_zero() -> Result<()> {
        assert_eq!(orders_value("<Root><products/></Root>")?, 0);
        assert_eq!(orders_value("<Root><Orders/><products/></Root>")?, 0);
        assert_eq!(orders_value_with("<Root><products/></Root>", &strict())?, 0);
        Ok(())
    }

    #[test]
    fn test_duplicate_ids_each_contribute() -> Result<()> {
        let xml = r#"<Root><Orders><Order><product>A</product></Order></Orders><products><p Id="A" Value="2"/><p Id="A" Value="3"/></products></Root>"#;
        assert_eq!(orders_value(xml)?, 5);
        Ok(())
    }

    #[test]
    fn test_missing_catalog_fails() {
        let err = orders_value("<Root><Orders/></Root>").err();
        assert!(matches!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MissingElement { name, .. }) if name == "products"
        ));
    }

    #[test]
    fn test_referenced_value_must_be_integer() {
        let xml = r#"<Root><Orders><Order><product>C3</product></Order></Orders><products><product Id="C3" Value="oops"/></products></Root>"#;
        assert!(matches!(
            orders_value(xml).err().map(|e| e.kind().clone()),
            Some(ErrorKind::InvalidValue { value, .. }) if value == "oops"
        ));
    }

    #[test]
    fn test_order_without_product_fails() {
        let xml = "<Root><Orders><Order/></Orders><products/></Root>";
        assert!(orders_value(xml).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let xml = format!(
            r#"<Root><Orders><Order><product>A</product></Order><Order><product>A</product></Order></Orders><products><p Id="A" Value="{}"/></products></Root>"#,
            i64::MAX
        );
        assert!(orders_value(&xml).is_err());
    }
}
