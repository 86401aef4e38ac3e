//! Product page field extractors
//!
//! Each extractor is a pure function of one [`ParsedDocument`] and returns a
//! [`FieldSet`] with a fixed key set. Missing markup never fails the page:
//! it degrades to `Null` or empty values and is logged at debug level.

mod attributes;
mod classification;
mod description;
mod price;
mod publisher;

pub use attributes::extract_attributes;
pub use classification::extract_classification;
pub use description::extract_description;
pub use price::extract_price;
pub use publisher::{extract_publisher, split_publisher_date};

use crate::document::ParsedDocument;
use crate::fields::FieldSet;

pub const PUBLISHER: &str = "publisher";
pub const DATE: &str = "date";
pub const GENRES: &str = "genres";
pub const THEMES: &str = "themes";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const PRICE: &str = "price";

/// Runs every page extractor in merge order: publisher, classification,
/// attributes, description, price.
pub fn extract_product(doc: &ParsedDocument) -> Vec<FieldSet> {
    vec![
        extract_publisher(doc),
        extract_classification(doc),
        extract_attributes(doc),
        extract_description(doc),
        extract_price(doc),
    ]
}
