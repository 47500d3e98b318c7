//! The edit-script algebra: lazily-combined DP cells, materialized on demand.
//!
//! A DP cell never eagerly expands into a primitive op list - it stays a small tagged
//! [`EditScript`] node referencing its predecessor cells by [`ScriptRef`] (a reference-counted
//! pointer), so building one cell from its neighbors is O(1). Only [`clone_to_list`] pays to
//! walk a chain, and it does so at most once per `(x_i, y_j)` subtree pair: the resulting
//! [`EditScript::List`] is then shared by every later cell that needs that subproblem's cost,
//! rather than re-walked.

use std::rc::Rc;

/// One primitive edit in the final, flattened script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<N> {
    Insert(N),
    Remove(N),
    Match(N, N),
    Update(N, N),
}

/// A reference-counted handle to a DP cell or intermediate script node.
pub type ScriptRef<N> = Rc<EditScript<N>>;

/// One entry of a materialized [`EditScript::List`].
///
/// A list built with `flatten_lists = false` treats any `List` it runs into as an opaque
/// unit rather than expanding it (`Nested`) - this is what keeps a subtree snapshot
/// O(cell-length) instead of O(total history).
#[derive(Debug, Clone)]
enum ListEntry<N> {
    Prim(Edit<N>),
    Nested(ScriptRef<N>),
}

/// A node of the edit-script algebra.
///
/// Every variant caches its own total cost so that reading a cell's cost never walks its
/// predecessor chain.
#[derive(Debug)]
pub enum EditScript<N> {
    Insert {
        node: N,
        cost: u32,
    },
    Remove {
        node: N,
        cost: u32,
    },
    /// The empty script has `left = right = None`, cost 0.
    Combine {
        left: Option<ScriptRef<N>>,
        right: Option<ScriptRef<N>>,
        cost: u32,
    },
    CombineUpdate {
        prefix: Option<ScriptRef<N>>,
        from: N,
        to: N,
        delta: u32,
        cost: u32,
    },
    CombineMatch {
        prefix: Option<ScriptRef<N>>,
        from: N,
        to: N,
        cost: u32,
    },
    List {
        entries: Rc<Vec<ListEntry<N>>>,
        cost: u32,
    },
}

impl<N> EditScript<N> {
    pub fn cost(&self) -> u32 {
        match self {
            EditScript::Insert { cost, .. }
            | EditScript::Remove { cost, .. }
            | EditScript::Combine { cost, .. }
            | EditScript::CombineUpdate { cost, .. }
            | EditScript::CombineMatch { cost, .. }
            | EditScript::List { cost, .. } => *cost,
        }
    }

    /// The zero-cost empty script, used to seed border cells and to reset the forest-distance
    /// scratch buffer between keyroot pairs.
    pub fn empty() -> Self {
        EditScript::Combine {
            left: None,
            right: None,
            cost: 0,
        }
    }

    pub fn insert(node: N, cost: u32) -> Self {
        EditScript::Insert { node, cost }
    }

    pub fn remove(node: N, cost: u32) -> Self {
        EditScript::Remove { node, cost }
    }

    pub fn combine(left: Option<ScriptRef<N>>, right: Option<ScriptRef<N>>) -> Self {
        let cost = left.as_deref().map_or(0, EditScript::cost) + right.as_deref().map_or(0, EditScript::cost);
        EditScript::Combine { left, right, cost }
    }

    /// `δ = 0` yields a `CombineMatch`, `δ > 0` a `CombineUpdate` - this is the only place
    /// either variant gets constructed, so the match/update split can't drift from `δ`.
    pub fn combine_update(prefix: Option<ScriptRef<N>>, from: N, to: N, delta: u32) -> Self {
        let cost = prefix.as_deref().map_or(0, EditScript::cost) + delta;
        if delta == 0 {
            EditScript::CombineMatch {
                prefix,
                from,
                to,
                cost,
            }
        } else {
            EditScript::CombineUpdate {
                prefix,
                from,
                to,
                delta,
                cost,
            }
        }
    }
}

/// Number of primitive edits `p` represents.
///
/// With `flatten_lists = false`, an embedded `List` counts as a single (opaque) entry; with
/// `true`, it recurses into the list's own entries.
pub fn count<N>(p: &ScriptRef<N>, flatten_lists: bool) -> usize {
    match &**p {
        EditScript::Insert { .. } | EditScript::Remove { .. } => 1,
        EditScript::Combine { left, right, .. } => {
            left.as_ref().map_or(0, |l| count(l, flatten_lists))
                + right.as_ref().map_or(0, |r| count(r, flatten_lists))
        }
        EditScript::CombineMatch { prefix, .. } | EditScript::CombineUpdate { prefix, .. } => {
            prefix.as_ref().map_or(0, |p| count(p, flatten_lists)) + 1
        }
        EditScript::List { entries, .. } => {
            if flatten_lists {
                entries
                    .iter()
                    .map(|e| match e {
                        ListEntry::Prim(_) => 1,
                        ListEntry::Nested(s) => count(s, true),
                    })
                    .sum()
            } else {
                1
            }
        }
    }
}

fn flatten_into<N: Copy>(p: &ScriptRef<N>, out: &mut Vec<ListEntry<N>>, flatten_lists: bool) {
    match &**p {
        EditScript::Insert { node, .. } => out.push(ListEntry::Prim(Edit::Insert(*node))),
        EditScript::Remove { node, .. } => out.push(ListEntry::Prim(Edit::Remove(*node))),
        EditScript::Combine { left, right, .. } => {
            if let Some(l) = left {
                flatten_into(l, out, flatten_lists);
            }
            if let Some(r) = right {
                flatten_into(r, out, flatten_lists);
            }
        }
        EditScript::CombineMatch {
            prefix, from, to, ..
        } => {
            if let Some(pre) = prefix {
                flatten_into(pre, out, flatten_lists);
            }
            out.push(ListEntry::Prim(Edit::Match(*from, *to)));
        }
        EditScript::CombineUpdate {
            prefix, from, to, ..
        } => {
            if let Some(pre) = prefix {
                flatten_into(pre, out, flatten_lists);
            }
            out.push(ListEntry::Prim(Edit::Update(*from, *to)));
        }
        EditScript::List { entries, .. } => {
            if flatten_lists {
                for entry in entries.iter() {
                    match entry {
                        ListEntry::Prim(edit) => out.push(ListEntry::Prim(*edit)),
                        ListEntry::Nested(nested) => flatten_into(nested, out, true),
                    }
                }
            } else {
                out.push(ListEntry::Nested(p.clone()));
            }
        }
    }
}

/// Snapshot `p` into a contiguous, immutable [`EditScript::List`].
///
/// With `flatten_lists = false` this is the per-subtree snapshot taken after every tree-case
/// DP cell (bounded by that cell's own chain length). With `true` this is the final
/// materialization at the end of [`crate::distance`].
pub fn clone_to_list<N: Copy>(p: &ScriptRef<N>, flatten_lists: bool) -> ScriptRef<N> {
    let mut entries = Vec::with_capacity(count(p, flatten_lists));
    flatten_into(p, &mut entries, flatten_lists);
    Rc::new(EditScript::List {
        cost: p.cost(),
        entries: Rc::new(entries),
    })
}

/// Extract the final, fully-flattened primitive edit sequence from a list produced by
/// `clone_to_list(_, true)`.
///
/// Panics if `list` is not a `List`, or if it still contains a `Nested` entry - both would mean
/// a caller passed something other than a fully-flattened final snapshot.
pub fn into_primitives<N: Copy>(list: &ScriptRef<N>) -> Vec<Edit<N>> {
    match &**list {
        EditScript::List { entries, .. } => entries
            .iter()
            .map(|entry| match entry {
                ListEntry::Prim(edit) => *edit,
                ListEntry::Nested(_) => {
                    unreachable!("a fully-flattened list must not contain nested entries")
                }
            })
            .collect(),
        _ => panic!("into_primitives called on a non-List script node"),
    }
}
