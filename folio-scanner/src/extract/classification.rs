use super::{GENRES, THEMES, TITLE};
use crate::document::{ParsedDocument, Query};
use crate::error::ExtractError;
use crate::fields::{FieldSet, FieldValue};
use indexmap::IndexSet;
use tracing::debug;

/// Genre tags (level 2), theme tags (level 3) and the page title.
pub fn extract_classification(doc: &ParsedDocument) -> FieldSet {
    let title = match find_title(doc) {
        Ok(title) => FieldValue::Text(title),
        Err(e) => {
            debug!("{}", e);
            FieldValue::Null
        }
    };

    FieldSet::new()
        .with(GENRES, FieldValue::List(distinct_tags(doc, "tag_lvl2")))
        .with(THEMES, FieldValue::List(distinct_tags(doc, "tag_lvl3")))
        .with(TITLE, title)
}

fn find_title(doc: &ParsedDocument) -> Result<String, ExtractError> {
    doc.find_first(&Query::tag("h1").class("h1 page-title"))
        .map(|node| node.text())
        .ok_or(ExtractError::MissingField(TITLE))
}

/// Tag labels with duplicates collapsed, first occurrence wins the position.
fn distinct_tags(doc: &ParsedDocument, class: &str) -> Vec<String> {
    let labels: IndexSet<String> = doc
        .find_all(&Query::tag("a").class(class))
        .iter()
        .map(|node| node.text())
        .filter(|label| !label.is_empty())
        .collect();
    labels.into_iter().collect()
}
