//! Sitemap XML parsing

use crate::error::{Result, ScanError};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Parsed sitemap: either a `<urlset>` of pages or a `<sitemapindex>` of
/// child sitemaps. Element names are matched by local name, so prefixed
/// namespaces (`<sm:url>`) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `<url><loc>` values in document order
    pub urls: Vec<String>,
    /// `<sitemap><loc>` values in document order
    pub sitemaps: Vec<String>,
}

impl SitemapDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut doc = SitemapDocument::default();
        let mut buf = Vec::new();
        let mut parent: Option<(Parent, usize)> = None;
        let mut depth = 0usize;
        let mut in_loc = false;
        let mut loc = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    depth += 1;
                    match e.local_name().as_ref() {
                        b"url" if parent.is_none() => parent = Some((Parent::Url, depth)),
                        b"sitemap" if parent.is_none() => {
                            parent = Some((Parent::Sitemap, depth))
                        }
                        // only the entry's own <loc>, not <image:loc> and friends
                        b"loc" if parent.is_some_and(|(_, d)| d + 1 == depth) => {
                            in_loc = true;
                            loc.clear();
                        }
                        _ => {}
                    }
                }
                Ok(Event::Text(e)) if in_loc => {
                    let text = e
                        .unescape()
                        .map_err(|e| ScanError::Parse(format!("sitemap text: {}", e)))?;
                    loc.push_str(&text);
                }
                Ok(Event::CData(e)) if in_loc => {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(Event::End(e)) => {
                    match e.local_name().as_ref() {
                        b"loc" if in_loc => {
                            in_loc = false;
                            let value = loc.trim().to_string();
                            if !value.is_empty() {
                                match parent {
                                    Some((Parent::Url, _)) => doc.urls.push(value),
                                    Some((Parent::Sitemap, _)) => doc.sitemaps.push(value),
                                    None => {}
                                }
                            }
                        }
                        b"url" | b"sitemap" if parent.is_some_and(|(_, d)| d == depth) => {
                            parent = None
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ScanError::Parse(format!(
                        "XML error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if in_loc || parent.is_some() {
            return Err(ScanError::Parse("sitemap ended inside an entry".to_string()));
        }

        Ok(doc)
    }

    pub fn is_index(&self) -> bool {
        self.urls.is_empty() && !self.sitemaps.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Parent {
    Url,
    Sitemap,
}

/// Product page URLs listed by a sitemap, in document order.
pub fn extract_urls(doc: &SitemapDocument) -> Vec<String> {
    doc.urls.clone()
}
