//! Building engine input from stored structured documents.

use earnguide_core::{ItemsBySource, Source, StructuredDocument};
use tracing::debug;

/// Group every document's items by their source tag.
///
/// Items without a source are filed under [`Source::Transcript`]. A document's
/// `source_url` is appended to each of its items' provenance.
pub fn collect_by_source(documents: &[StructuredDocument]) -> ItemsBySource {
    let mut out = ItemsBySource::new();
    for doc in documents {
        for item in &doc.items {
            let mut item = item.clone();
            let source = item.source.unwrap_or(Source::Transcript);
            if let Some(url) = &doc.source_url {
                item.provenance.push(url.clone());
            }
            out.push(source, item);
        }
    }
    debug!(
        documents = documents.len(),
        items = out.item_count(),
        "collected structured items"
    );
    out
}
