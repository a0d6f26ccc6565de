//! Group `Data` records by their `Category`

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::query::Query;
use crate::transform::Options;
use crate::xml::Element;

/// Group the `Data` children of an XML document by category
///
/// ```
/// let xml = "<Root><Data><Category>A</Category><Quantity>3</Quantity><Price>24.50</Price></Data></Root>";
/// let grouped = xtree::create_hierarchy(xml)?;
/// assert!(grouped.starts_with("<Root>\n  <Group ID=\"A\">"));
/// # Ok::<(), xtree::Error>(())
/// ```
pub fn create_hierarchy(xml: &str) -> Result<String> {
    create_hierarchy_with(xml, &Options::default())
}

#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn create_hierarchy_with(xml: &str, options: &Options) -> Result<String> {
    let doc = options.parse(xml)?;
    let grouped = group_by_category(&doc.root)?;
    Ok(options.write(&grouped))
}

/// Build `Root/Group[@ID]/Data` from the `Data` children of `root`.
///
/// Groups appear in first-occurrence order of their category and keep the
/// relative order of their members.
pub fn group_by_category(root: &Element) -> Result<Element> {
    let mut groups: IndexMap<String, Element> = IndexMap::new();

    for data in root.elements_named("Data") {
        let category = data.child_value("Category")?;
        let member = Element::new("Data")
            .child(data.require_child("Quantity")?.clone())
            .child(data.require_child("Price")?.clone());

        groups
            .entry(category)
            .or_insert_with_key(|id| Element::new("Group").attr("ID", id.as_str()))
            .push(member);
    }

    debug!(groups = groups.len(), "grouped data by category");

    let mut output = Element::new("Root");
    output.extend(groups.into_values());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, ErrorKind};
    use crate::from_xml_str;
    use crate::xml::Name;

    fn data(category: &str, quantity: &str, price: &str) -> String {
        format!(
            "<Data><Category>{category}</Category><Quantity>{quantity}</Quantity><Price>{price}</Price></Data>"
        )
    }

    #[test]
    fn test_groups_in_first_occurrence_order() -> Result<()> {
        let xml = format!(
            "<Root>{}{}{}{}</Root>",
            data("B", "1", "10"),
            data("A", "2", "20"),
            data("B", "3", "30"),
            data("C", "4", "40"),
        );
        let grouped = group_by_category(&from_xml_str(&xml)?.root)?;

        let ids: Vec<&str> = grouped
            .elements()
            .filter_map(|group| group.attribute("ID"))
            .collect();
        assert_eq!(ids, vec!["B", "A", "C"]);

        let b = grouped.require_child("Group")?;
        let quantities: Vec<String> = b
            .elements_named("Data")
            .map(|d| d.child_value("Quantity"))
            .collect::<Result<_>>()?;
        assert_eq!(quantities, vec!["1", "3"]);
        Ok(())
    }

    #[test]
    fn test_output_layout() -> Result<()> {
        let xml = format!("<Root>{}</Root>", data("A", "3", "24.50"));
        assert_eq!(
            create_hierarchy(&xml)?,
            "<Root>\n  <Group ID=\"A\">\n    <Data>\n      <Quantity>3</Quantity>\n      <Price>24.50</Price>\n    </Data>\n  </Group>\n</Root>"
        );
        Ok(())
    }

    #[test]
    fn test_category_is_the_only_grouped_field() -> Result<()> {
        let xml = format!("<Root>{}</Root>", data("A", "1", "2"));
        let grouped = group_by_category(&from_xml_str(&xml)?.root)?;
        let member = grouped.require_child("Group")?.require_child("Data")?;
        assert!(member.find_child("Category").is_none());
        Ok(())
    }

    #[test]
    fn test_no_data_gives_empty_root() -> Result<()> {
        assert_eq!(create_hierarchy("<Root><Other/></Root>")?, "<Root />");
        Ok(())
    }

    #[test]
    fn test_missing_price_is_structure_error() {
        let err = create_hierarchy(
            "<Root><Data><Category>A</Category><Quantity>1</Quantity></Data></Root>",
        )
        .err();
        assert_eq!(err.as_ref().map(|e| e.category()), Some(ErrorCategory::Structure));
        assert!(matches!(
            err.as_ref().map(|e| e.kind()),
            Some(ErrorKind::MissingElement { name, .. }) if name == "Price"
        ));
    }

    #[test]
    fn test_prefixed_attributes_survive_reparse() -> Result<()> {
        let xml = r#"<Root xmlns:x="urn:x"><Data><Category>A</Category><Quantity x:unit="kg">3</Quantity><Price>1</Price></Data></Root>"#;
        let reparsed = from_xml_str(&create_hierarchy(xml)?)?;

        let quantity = reparsed
            .require_child("Group")?
            .require_child("Data")?
            .require_child("Quantity")?;
        assert_eq!(quantity.attribute(Name::ns("urn:x", "unit")), Some("kg"));
        assert_eq!(quantity.value(), "3");
        Ok(())
    }
}
