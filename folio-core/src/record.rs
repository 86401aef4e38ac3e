//! Record assembly: merging per-extractor field sets into one flat row.

use folio_scanner::{FieldSet, FieldValue};
use serde::Serialize;

/// All fields extracted for one product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: FieldSet,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Left-to-right merge: start from the first set, then every later set
/// inserts or overwrites its keys. On collision the later set wins.
pub fn assemble<I>(fieldsets: I) -> Record
where
    I: IntoIterator<Item = FieldSet>,
{
    let mut fields = FieldSet::new();
    for set in fieldsets {
        fields.extend(set);
    }
    Record { fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_empty() {
        assert!(assemble(Vec::new()).is_empty());
    }

    #[test]
    fn test_later_set_wins() {
        let first = FieldSet::new()
            .with("title", FieldValue::text("Rayuela"))
            .with("price", FieldValue::text("10,00 €"));
        let second = FieldSet::new().with("price", FieldValue::text("21,90 €"));

        let record = assemble(vec![first, second]);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("price"), Some(&FieldValue::text("21,90 €")));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["title", "price"]);
    }

    #[test]
    fn test_later_null_still_overwrites() {
        let first = FieldSet::new().with("date", FieldValue::text("2020"));
        let second = FieldSet::new().with("date", FieldValue::Null);
        assert_eq!(assemble(vec![first, second]).get("date"), Some(&FieldValue::Null));
    }
}
