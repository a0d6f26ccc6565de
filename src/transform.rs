//! Tree transforms
//!
//! Each submodule is one self-contained operation. They all follow the same
//! shape: a tree-level function working on an already parsed [`Element`], a
//! text-level function using default [`Options`], and a `_with` variant
//! taking explicit options.

pub mod channels;
pub mod concatenation;
pub mod contacts;
pub mod customers_csv;
pub mod flatten;
pub mod hierarchy;
pub mod orders;
pub mod purchase_orders;
pub mod sorting;

use std::fmt;

use crate::error::Result;
use crate::xml::{self, Config, Document, Element, FormatConfig, Parser};

pub use orders::JoinPolicy;

/// Parser limits, output layout and join policy shared by all operations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub parser: Config,
    pub format: FormatConfig,
    pub join: JoinPolicy,
}

impl Options {
    pub fn parse(&self, input: &str) -> Result<Document> {
        Parser::with_config(input.as_bytes(), self.parser).parse()
    }

    pub fn write(&self, element: &Element) -> String {
        xml::to_string_with(element, &self.format)
    }
}

/// Result of running an [`Operation`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Text(String),
    Ids(Vec<i32>),
    Number(i64),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Ids(ids) => {
                let lines: Vec<String> = ids.iter().map(i32::to_string).collect();
                f.write_str(&lines.join("\n"))
            }
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Every transform the crate offers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Hierarchy,
    PurchaseOrders,
    CustomersFromCsv,
    Concatenation,
    Contacts,
    Channels,
    SortCustomers,
    OrdersValue,
    Flatten,
}

impl Operation {
    pub const ALL: [Self; 9] = [
        Self::Hierarchy,
        Self::PurchaseOrders,
        Self::CustomersFromCsv,
        Self::Concatenation,
        Self::Contacts,
        Self::Channels,
        Self::SortCustomers,
        Self::OrdersValue,
        Self::Flatten,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Hierarchy => "hierarchy",
            Self::PurchaseOrders => "purchase-orders",
            Self::CustomersFromCsv => "customers-csv",
            Self::Concatenation => "concat",
            Self::Contacts => "contacts",
            Self::Channels => "channels",
            Self::SortCustomers => "sort-customers",
            Self::OrdersValue => "orders-value",
            Self::Flatten => "flatten",
        }
    }

    /// Run the operation with default options
    pub fn run(self, input: &str) -> Result<Output> {
        self.run_with(input, &Options::default())
    }

    pub fn run_with(self, input: &str, options: &Options) -> Result<Output> {
        let output = match self {
            Self::Hierarchy => Output::Text(hierarchy::create_hierarchy_with(input, options)?),
            Self::PurchaseOrders => {
                Output::Text(purchase_orders::purchase_orders_with(input, options)?)
            }
            Self::CustomersFromCsv => {
                Output::Text(customers_csv::customers_from_csv_with(input, options)?)
            }
            Self::Concatenation => {
                Output::Text(concatenation::concatenated_text_with(input, options)?)
            }
            Self::Contacts => {
                Output::Text(contacts::replace_customers_with_contacts_with(input, options)?)
            }
            Self::Channels => Output::Ids(channels::find_channel_ids_with(input, options)?),
            Self::SortCustomers => Output::Text(sorting::sort_customers_with(input, options)?),
            Self::OrdersValue => Output::Number(orders::orders_value_with(input, options)?),
            Self::Flatten => Output::Text(flatten::flatten_with(input, options)?),
        };
        Ok(output)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
