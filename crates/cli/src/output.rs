//! Rendering of a computed edit script as text or JSON.

use colored::*;
use serde::Serialize;
use tree_diff::Edit;
use xml_tree::StructuralCost;

/// A single rendered edit operation, independent of the node type used to compute it.
#[derive(Debug, Serialize)]
struct EditRecord {
    op: &'static str,
    left: Option<String>,
    right: Option<String>,
    cost: u32,
}

/// An XPath-like descriptor for `node`: the chain of tag names from the document root down to
/// `node`, with a `[k]` suffix wherever a tag repeats among its siblings.
fn describe(node: roxmltree::Node<'_, '_>) -> String {
    let mut segments = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if !n.is_element() {
            break;
        }
        let tag = n.tag_name().name();
        let index = n
            .parent_element()
            .map(|parent| {
                parent
                    .children()
                    .filter(|c| c.is_element() && c.tag_name().name() == tag)
                    .position(|c| c == n)
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        segments.push(format!("{tag}[{index}]"));
        current = n.parent_element();
    }
    segments.reverse();
    format!("/{}", segments.join("/"))
}

fn to_records(edits: &[Edit<roxmltree::Node<'_, '_>>], cost: &StructuralCost) -> Vec<EditRecord> {
    edits
        .iter()
        .map(|edit| match edit {
            Edit::Insert(n) => EditRecord {
                op: "insert",
                left: None,
                right: Some(describe(*n)),
                cost: cost.insert_cost(*n),
            },
            Edit::Remove(n) => EditRecord {
                op: "remove",
                left: Some(describe(*n)),
                right: None,
                cost: cost.remove_cost(*n),
            },
            Edit::Match(a, b) => EditRecord {
                op: "match",
                left: Some(describe(*a)),
                right: Some(describe(*b)),
                cost: 0,
            },
            Edit::Update(a, b) => EditRecord {
                op: "update",
                left: Some(describe(*a)),
                right: Some(describe(*b)),
                cost: cost.update_cost(*a, *b),
            },
        })
        .collect()
}

/// Render `edits` as one colored line per operation.
pub fn render_text(edits: &[Edit<roxmltree::Node<'_, '_>>], cost: &StructuralCost) -> String {
    let mut out = String::new();
    for record in to_records(edits, cost) {
        let line = match record.op {
            "insert" => format!("+ {}", record.right.unwrap()).green().to_string(),
            "remove" => format!("- {}", record.left.unwrap()).red().to_string(),
            "update" => format!(
                "~ {} -> {} (cost {})",
                record.left.unwrap(),
                record.right.unwrap(),
                record.cost
            )
            .yellow()
            .to_string(),
            _ => format!("= {}", record.left.unwrap()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render `edits` as a JSON array of `{op, left, right, cost}` objects.
pub fn render_json(
    edits: &[Edit<roxmltree::Node<'_, '_>>],
    cost: &StructuralCost,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_records(edits, cost))
}

/// Total cost of the script under `cost`, used for the CLI's exit-code convention.
pub fn total_cost(edits: &[Edit<roxmltree::Node<'_, '_>>], cost: &StructuralCost) -> u32 {
    to_records(edits, cost).iter().map(|r| r.cost).sum()
}
