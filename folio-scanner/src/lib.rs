pub mod document;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod fields;
pub mod sitemap;

pub use document::{Node, ParsedDocument, Query};
pub use error::{ExtractError, ScanError};
pub use fetcher::{Fetcher, Headers};
pub use fields::{FieldSet, FieldValue};
pub use sitemap::{SitemapDocument, extract_urls};
