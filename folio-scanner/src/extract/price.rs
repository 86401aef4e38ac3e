use super::PRICE;
use crate::document::{ParsedDocument, Query};
use crate::error::ExtractError;
use crate::fields::{FieldSet, FieldValue};
use tracing::debug;

pub fn extract_price(doc: &ParsedDocument) -> FieldSet {
    let price = match find_price(doc) {
        Ok(price) => FieldValue::Text(price),
        Err(e) => {
            debug!("{}", e);
            FieldValue::Null
        }
    };
    FieldSet::new().with(PRICE, price)
}

fn find_price(doc: &ParsedDocument) -> Result<String, ExtractError> {
    doc.find_first(
        &Query::tag("span")
            .attr("itemprop", "price")
            .class("product-price"),
    )
    .map(|node| node.text())
    .ok_or(ExtractError::MissingField(PRICE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{EMPTY_PAGE, FULL_PAGE};

    #[test]
    fn test_price_full_page() {
        let doc = ParsedDocument::parse(FULL_PAGE);
        let set = extract_price(&doc);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(PRICE).and_then(FieldValue::as_text), Some("21,90 €"));
    }

    #[test]
    fn test_price_needs_microformat_attribute() {
        let doc = ParsedDocument::parse(r#"<span class="product-price">9,95 €</span>"#);
        assert_eq!(find_price(&doc), Err(ExtractError::MissingField(PRICE)));
        assert_eq!(extract_price(&doc).get(PRICE), Some(&FieldValue::Null));
    }

    #[test]
    fn test_missing_price_is_null() {
        let doc = ParsedDocument::parse(EMPTY_PAGE);
        assert!(extract_price(&doc).get(PRICE).is_some_and(FieldValue::is_null));
    }
}
