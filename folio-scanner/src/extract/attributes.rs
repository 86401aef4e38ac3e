use crate::document::{ParsedDocument, Query};
use crate::error::ExtractError;
use crate::fields::{FieldSet, FieldValue};
use tracing::debug;

/// Label -> value pairs from the product data sheet.
///
/// The key set varies per product. Labels and values are paired by
/// position; surplus entries on the longer side are dropped.
pub fn extract_attributes(doc: &ParsedDocument) -> FieldSet {
    match read_data_sheet(doc) {
        Ok(set) => set,
        Err(e) => {
            debug!("{}, no attributes for this page", e);
            FieldSet::new()
        }
    }
}

fn read_data_sheet(doc: &ParsedDocument) -> Result<FieldSet, ExtractError> {
    let sheet = doc
        .find_first(&Query::tag("dl").class("caracteristicas-prod data-sheet"))
        .ok_or(ExtractError::MissingSection("data sheet"))?;

    let labels = sheet.find_all(&Query::tag("dt").class("name"));
    let values = sheet.find_all(&Query::tag("dd").class("value"));
    if labels.len() != values.len() {
        debug!(
            "data sheet has {} labels and {} values, pairing {}",
            labels.len(),
            values.len(),
            labels.len().min(values.len())
        );
    }

    let mut set = FieldSet::new();
    for (label, value) in labels.iter().zip(values.iter()) {
        let key = label.text();
        if key.is_empty() {
            continue;
        }
        set.insert(key, FieldValue::Text(value.text()));
    }
    Ok(set)
}
