//! XML DOM adapter wiring `roxmltree` documents into the `tree-diff` engine.
//!
//! This crate never parses itself as a general-purpose XML library; it exists to hand
//! [`roxmltree::Node`] handles and a default [`StructuralCost`] model to `tree_diff::distance`,
//! nothing more.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures loading or parsing an XML document for diffing.
#[derive(Debug, Error)]
pub enum XmlTreeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("document has no root element")]
    EmptyDocument,
}

/// Read a file into a `String`, wrapping the path into the error for diagnostics.
pub fn read_to_string(path: &Path) -> Result<String, XmlTreeError> {
    tracing::debug!(path = %path.display(), "reading document");
    fs::read_to_string(path).map_err(|source| XmlTreeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `text` into a `roxmltree::Document`.
///
/// An empty or whitespace-only document is rejected up front as [`XmlTreeError::EmptyDocument`]
/// rather than left for `roxmltree` to report as a parse error, since the engine's contract
/// treats "no root" as the degenerate-input case, not a malformed-input one.
pub fn parse(text: &str) -> Result<roxmltree::Document<'_>, XmlTreeError> {
    if text.trim().is_empty() {
        return Err(XmlTreeError::EmptyDocument);
    }
    let doc = roxmltree::Document::parse(text)?;
    tracing::debug!(root = doc.root_element().tag_name().name(), "parsed document");
    Ok(doc)
}

/// The ordered sequence of element children of `node`, matching the engine's `get_children`
/// contract: text, comment, and processing-instruction nodes are not part of the tree shape.
pub fn children<'a, 'input>(node: roxmltree::Node<'a, 'input>) -> Vec<roxmltree::Node<'a, 'input>> {
    node.children().filter(|c| c.is_element()).collect()
}

/// Direct (non-descendant) text content of an element: the concatenation of its text-node
/// children, used by [`StructuralCost::update_cost`] to detect leaf-text edits.
fn direct_text<'a, 'input>(node: roxmltree::Node<'a, 'input>) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect::<Vec<_>>()
        .join("")
}

/// A default structural cost model for XML element trees.
///
/// `insert_weight`/`remove_weight` are applied uniformly to every node (matching the engine's
/// "nonnegative integer per node" contract); `update_cost` distinguishes tag, attribute, and
/// direct-text differences rather than collapsing them to a single flag, so a CLI rendering the
/// script can say *what* changed about an updated node.
#[derive(Debug, Clone, Copy)]
pub struct StructuralCost {
    pub insert_weight: u32,
    pub remove_weight: u32,
}

impl Default for StructuralCost {
    fn default() -> Self {
        StructuralCost {
            insert_weight: 1,
            remove_weight: 1,
        }
    }
}

impl StructuralCost {
    pub fn new(insert_weight: u32, remove_weight: u32) -> Self {
        StructuralCost {
            insert_weight,
            remove_weight,
        }
    }

    pub fn insert_cost(&self, _node: roxmltree::Node<'_, '_>) -> u32 {
        self.insert_weight
    }

    pub fn remove_cost(&self, _node: roxmltree::Node<'_, '_>) -> u32 {
        self.remove_weight
    }

    /// Zero when `a` and `b` have the same tag name, the same attribute set, and the same
    /// direct text; otherwise the sum of a fixed weight per differing dimension.
    pub fn update_cost(&self, a: roxmltree::Node<'_, '_>, b: roxmltree::Node<'_, '_>) -> u32 {
        let mut cost = 0;

        if a.tag_name().name() != b.tag_name().name() {
            cost += 2;
        }

        let a_attrs: std::collections::BTreeMap<&str, &str> =
            a.attributes().map(|attr| (attr.name(), attr.value())).collect();
        let b_attrs: std::collections::BTreeMap<&str, &str> =
            b.attributes().map(|attr| (attr.name(), attr.value())).collect();
        if a_attrs != b_attrs {
            cost += 1;
        }

        if direct_text(a) != direct_text(b) {
            cost += 1;
        }

        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_document_parses() {
        let text = "<root><a/><b><c/></b></root>";
        let doc = parse(text).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "root");
        assert_eq!(children(doc.root_element()).len(), 2);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse("<root><a></root>").unwrap_err();
        assert!(matches!(err, XmlTreeError::Parse(_)));
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(matches!(parse("").unwrap_err(), XmlTreeError::EmptyDocument));
        assert!(matches!(parse("   \n\t").unwrap_err(), XmlTreeError::EmptyDocument));
    }

    #[test]
    fn update_cost_is_zero_for_identical_elements() {
        let doc_a = parse(r#"<root><item id="1">hi</item></root>"#).unwrap();
        let doc_b = parse(r#"<root><item id="1">hi</item></root>"#).unwrap();
        let cost = StructuralCost::default();
        let a_item = children(doc_a.root_element())[0];
        let b_item = children(doc_b.root_element())[0];
        assert_eq!(cost.update_cost(a_item, b_item), 0);
    }

    #[test]
    fn update_cost_is_positive_for_tag_attribute_and_text_differences() {
        let doc_a = parse(r#"<root><item id="1">hi</item></root>"#).unwrap();
        let doc_b = parse(r#"<root><other id="2">bye</other></root>"#).unwrap();
        let cost = StructuralCost::default();
        let a_item = children(doc_a.root_element())[0];
        let b_item = children(doc_b.root_element())[0];
        assert!(cost.update_cost(a_item, b_item) > 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_to_string(Path::new("/nonexistent/path/does-not-exist.xml")).unwrap_err();
        assert!(matches!(err, XmlTreeError::Io { .. }));
    }
}
