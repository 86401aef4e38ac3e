use super::{DATE, PUBLISHER};
use crate::document::{ParsedDocument, Query};
use crate::error::ExtractError;
use crate::fields::{FieldSet, FieldValue};
use tracing::debug;

/// Publisher and publication date, encoded on the page as "Publisher, Date".
pub fn extract_publisher(doc: &ParsedDocument) -> FieldSet {
    let (publisher, date) = match find_imprint(doc) {
        Ok(text) => split_publisher_date(&text),
        Err(e) => {
            debug!("{}", e);
            (None, None)
        }
    };

    FieldSet::new()
        .with(PUBLISHER, FieldValue::from_option(publisher))
        .with(DATE, FieldValue::from_option(date))
}

fn find_imprint(doc: &ParsedDocument) -> Result<String, ExtractError> {
    doc.find_first(&Query::tag("div").class("product-category-name-editorial text-muted"))
        .map(|node| node.text())
        .ok_or(ExtractError::MissingField(PUBLISHER))
}

/// Splits on the first comma. Without a comma the date is absent.
pub fn split_publisher_date(text: &str) -> (Option<String>, Option<String>) {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    match text.split_once(',') {
        Some((publisher, date)) => (non_empty(publisher), non_empty(date)),
        None => (non_empty(text), None),
    }
}
