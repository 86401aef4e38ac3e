use super::DESCRIPTION;
use crate::document::{ParsedDocument, Query};
use crate::error::ExtractError;
use crate::fields::{FieldSet, FieldValue};
use tracing::debug;

/// Paragraphs of the "read more" section joined with newlines.
///
/// A page without the section yields an empty description.
pub fn extract_description(doc: &ParsedDocument) -> FieldSet {
    let description = read_more_text(doc).unwrap_or_else(|e| {
        debug!("{}, using empty description", e);
        String::new()
    });
    FieldSet::new().with(DESCRIPTION, FieldValue::Text(description))
}

fn read_more_text(doc: &ParsedDocument) -> Result<String, ExtractError> {
    let section = doc
        .find_first(&Query::tag("div").class("p_leer_mas p_leer_mas_prod"))
        .ok_or(ExtractError::MissingSection(DESCRIPTION))?;

    let paragraphs: Vec<String> = section
        .find_all(&Query::tag("p"))
        .iter()
        .map(|p| p.text())
        .collect();
    Ok(paragraphs.join("\n"))
}
