//! Grounding context assembly.

use crate::document::Document;

const SEPARATOR: &str = "\n\n---\n\n";

/// Join retrieved documents into one context block, keeping rank order.
///
/// Callers intercept empty results before this point; an empty slice
/// yields an empty string.
pub fn assemble_context(documents: &[Document]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("[Document {}]\n{}", i + 1, doc.text))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
