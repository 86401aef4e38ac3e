use folio_core::assemble;
use folio_scanner::ParsedDocument;
use folio_scanner::extract::extract_product;

const PAGE: &str = r#"<html><body>
  <div class="product-category-name-editorial text-muted">Random House, 2020-09-03</div>
  <h1 class="h1 page-title">El infinito en un junco</h1>
  <a class="tag_lvl2">Ensayo</a>
  <a class="tag_lvl3">Historia del libro</a>
  <dl class="caracteristicas-prod data-sheet">
    <dt class="name">ISBN</dt><dd class="value">978-84-17552-26-8</dd>
    <dt class="name">ISBN</dt><dd class="value">978-84-17552-27-5</dd>
  </dl>
  <span class="product-price" itemprop="price">22,90 €</span>
</body></html>"#;

#[test]
fn test_assemble_is_deterministic() {
    let doc = ParsedDocument::parse(PAGE);
    let first = assemble(extract_product(&doc));
    let second = assemble(extract_product(&doc));

    assert_eq!(first, second);
    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_assembled_record_keys_are_unique() {
    let doc = ParsedDocument::parse(PAGE);
    let record = assemble(extract_product(&doc));

    let mut keys: Vec<&str> = record.keys().collect();
    let total = keys.len();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), total);
    assert_eq!(
        record.get("ISBN").and_then(|v| v.as_text()),
        Some("978-84-17552-27-5")
    );
    assert_eq!(record.get("description").and_then(|v| v.as_text()), Some(""));
}
