//! Label/value extraction from the gateway's status pages.
//!
//! The gateway renders its status tables as `<th>Label</th><td>value</td>` rows,
//! but nothing in the markup is addressable by id or class, so fields are found by
//! their visible label text. The rule implemented by [`Page::value`]:
//!
//! 1. The anchor is the first text node, in document order, whose trimmed content
//!    equals the label exactly.
//! 2. The value is the first meaningful sibling after the anchor. When the anchor
//!    has none (the usual case, since the label is alone in its cell) the search
//!    moves up through the anchor's ancestors, up to and including the nearest
//!    `th`/`td` cell, taking the first meaningful sibling found along the way. Without
//!    an enclosing cell only the anchor's parent is tried. Elements and non-blank
//!    text nodes are meaningful; whitespace and comments are not.
//! 3. The value is the trimmed text content of that sibling and must not be empty.
//!
//! Anything else is reported as [`ScrapeError::ValueShapeUnexpected`] so markup
//! changes in a firmware update fail loudly instead of producing wrong numbers.

use scraper::{node::Node, ElementRef, Html};

use crate::error::ScrapeError;

/// A parsed status page that can be queried for several labels.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    pub fn value(&self, label: &str) -> Result<String, ScrapeError> {
        let anchor = self
            .document
            .tree
            .root()
            .descendants()
            .find(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| text.trim() == label)
            })
            .ok_or_else(|| ScrapeError::LabelNotFound {
                label: label.to_string(),
            })?;

        // Climb no further than the cell holding the label.
        let climb = anchor
            .ancestors()
            .position(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "th" | "td"))
            })
            .map_or(1, |depth| depth + 1);

        let value = anchor
            .next_siblings()
            .chain(anchor.ancestors().take(climb).flat_map(|node| node.next_siblings()))
            .find_map(|node| match node.value() {
                Node::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
                Node::Element(_) => ElementRef::wrap(node).map(|el| el.text().collect()),
                _ => None,
            })
            .map(|raw: String| raw.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ScrapeError::ValueShapeUnexpected {
                label: label.to_string(),
            })?;

        tracing::trace!(label, value = %value, "extracted field");
        Ok(value)
    }

    /// Looks up `label` and parses its value as a non-negative integer.
    pub fn counter(&self, label: &str) -> Result<u64, ScrapeError> {
        let value = self.value(label)?;
        value
            .parse()
            .map_err(|source| ScrapeError::ValueConversion {
                label: label.to_string(),
                value,
                source,
            })
    }
}

/// One-shot form of [`Page::value`].
pub fn extract_label_value(markup: &str, label: &str) -> Result<String, ScrapeError> {
    Page::parse(markup).value(label)
}
