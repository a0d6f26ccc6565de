//! XML tree: parser, data model and writer

pub mod config;
pub mod cursor;
pub mod model;
pub mod name;
pub mod parser;
pub mod writer;

pub use config::Config;
pub use model::{Content, Document, Element};
pub use name::{Name, QName, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use parser::Parser;
pub use writer::{to_string, to_string_with, FormatConfig};
