//! Property-based tests for the XML tree and the transforms
//!
//! These tests use proptest to verify:
//! 1. Writer stability: write(tree) -> parse -> write == write(tree)
//! 2. Grouping partitions every record into exactly one group
//! 3. CSV materialization puts field 0 and field 9 where they belong
//! 4. Sorting by country and city is ordered and stable

#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use proptest::collection::vec;
use proptest::prelude::*;
use xtree::xml::{to_string_with, FormatConfig};
use xtree::{from_xml_str, to_xml_string, Element, Query};

/// Strategy for element and attribute names
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_.-]{0,8}".prop_filter("reserved xml prefix", |name| {
        !name.to_ascii_lowercase().starts_with("xml")
    })
}

/// Strategy for text that survives parsing unchanged (not whitespace-only)
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9<>&\"' ,.]{0,12}[a-zA-Z0-9<>&]"
}

/// Strategy for field values that contain no separators
fn arb_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .()-]{0,10}"
}

/// Strategy for element trees without mixed content
fn arb_element() -> impl Strategy<Value = Element> {
    let leaf = (arb_name(), proptest::option::of(arb_text())).prop_map(|(name, text)| match text {
        Some(text) => Element::with_text(name.as_str(), text),
        None => Element::new(name.as_str()),
    });

    leaf.prop_recursive(4, 48, 6, |inner| {
        (
            arb_name(),
            proptest::collection::btree_map(arb_name(), arb_text(), 0..3),
            vec(inner, 0..6),
        )
            .prop_map(|(name, attrs, children)| {
                let mut element = Element::new(name.as_str());
                for (key, value) in attrs {
                    element = element.attr(key.as_str(), value);
                }
                element.extend(children);
                element
            })
    })
}

fn customer(index: usize, country: &str, city: &str) -> String {
    format!(
        "<Customers CustomerID=\"c{index}\"><FullAddress><Country>{country}</Country><City>{city}</City></FullAddress></Customers>"
    )
}

proptest! {
    /// Writing a parsed tree gives back the same text, in both layouts
    #[test]
    fn writer_output_is_stable(element in arb_element()) {
        for config in [FormatConfig::default(), FormatConfig::compact()] {
            let written = to_string_with(&element, &config);
            let reparsed = from_xml_str(&written).unwrap();
            prop_assert_eq!(to_string_with(&reparsed.root, &config), written);
        }
    }

    /// Parsing the writer's output yields the tree that was written
    #[test]
    fn parse_recovers_written_tree(element in arb_element()) {
        let reparsed = from_xml_str(&to_xml_string(&element)).unwrap();
        prop_assert_eq!(reparsed.root, element);
    }

    /// Group count equals distinct categories and every record lands in one group
    #[test]
    fn grouping_partitions_records(categories in vec("[A-D]", 0..20)) {
        let body: String = categories
            .iter()
            .enumerate()
            .map(|(i, c)| format!("<Data><Category>{c}</Category><Quantity>{i}</Quantity><Price>1</Price></Data>"))
            .collect();
        let grouped = from_xml_str(&xtree::create_hierarchy(&format!("<Root>{body}</Root>")).unwrap()).unwrap();

        let mut distinct = categories.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(grouped.root.elements_named("Group").count(), distinct.len());

        let mut seen: Vec<usize> = Vec::new();
        for group in grouped.root.elements_named("Group") {
            let id = group.attribute("ID").unwrap();
            for data in group.elements_named("Data") {
                let index: usize = data.child_value("Quantity").unwrap().parse().unwrap();
                prop_assert_eq!(categories[index].as_str(), id);
                seen.push(index);
            }
        }
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..categories.len()).collect::<Vec<_>>());
    }

    /// CustomerID is field 0 and FullAddress/Country is field 9
    #[test]
    fn csv_fields_land_in_place(fields in vec(arb_field(), 10)) {
        let line = fields.join(",");
        let root = from_xml_str(&xtree::customers_from_csv(&line).unwrap()).unwrap().root;
        let customer = root.require_child("Customer").unwrap();

        prop_assert_eq!(customer.attribute("CustomerID"), Some(fields[0].as_str()));
        let country = customer.require_child("FullAddress").unwrap().child_value("Country").unwrap();
        prop_assert_eq!(country.trim(), fields[9].trim());
    }

    /// Output is ordered by (country, city) and ties keep document order
    #[test]
    fn sort_is_ordered_and_stable(keys in vec(("[A-C]", "[x-z]"), 0..16)) {
        let body: String = keys
            .iter()
            .enumerate()
            .map(|(i, (country, city))| customer(i, country, city))
            .collect();
        let sorted = from_xml_str(&xtree::sort_customers(&format!("<Root>{body}</Root>")).unwrap()).unwrap();

        let order: Vec<usize> = sorted
            .root
            .elements_named("Customers")
            .map(|c| c.attribute("CustomerID").unwrap()[1..].parse().unwrap())
            .collect();

        let mut expected: Vec<usize> = (0..keys.len()).collect();
        expected.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        prop_assert_eq!(order, expected);
    }
}
