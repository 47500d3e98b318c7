//! The annotation pass: a single traversal producing post-order ids, leftmost-descendant
//! indices, and keyroots.

use std::rc::Rc;

/// Post-order-indexed view of a tree, as required by [`crate::distance`].
#[derive(Debug, Clone)]
pub struct AnnotatedTree<N> {
    /// Node handles in left-to-right post-order; index `i` is the node's post-order id.
    pub nodes: Vec<N>,
    /// `lmds[i]` is the post-order index of `i`'s leftmost leaf descendant.
    pub lmds: Vec<usize>,
    /// Ascending post-order indices, one per distinct `lmds` value (the max index sharing it).
    pub keyroots: Vec<usize>,
}

impl<N> AnnotatedTree<N> {
    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

/// A node's ancestor chain, nearest first, shared between siblings as a cons list so a
/// descent never pays to clone the whole chain.
struct Ancestor {
    preorder_id: usize,
    parent: Option<Rc<Ancestor>>,
}

/// Walk `root` once, producing its post-order-indexed [`AnnotatedTree`].
///
/// Uses two explicit stacks rather than recursion, so depth is bounded only by available
/// memory, not call-stack size. `get_children` may be invoked once per node; a node with no
/// children is a leaf.
pub fn annotate<N, F>(root: N, get_children: &F) -> AnnotatedTree<N>
where
    N: Copy,
    F: Fn(N) -> Vec<N>,
{
    // Descent order: each pop assigns the next pre-order id and may push children.
    let mut pending: Vec<(N, Option<Rc<Ancestor>>)> = vec![(root, None)];
    // Reverse post-order accumulator: draining this stack yields left-to-right post-order.
    let mut emission: Vec<(N, usize, Option<Rc<Ancestor>>, bool)> = Vec::new();
    let mut next_preorder = 0usize;

    while let Some((node, ancestors)) = pending.pop() {
        let preorder_id = next_preorder;
        next_preorder += 1;

        let children = get_children(node);
        let has_children = !children.is_empty();

        if has_children {
            let child_ancestors = Some(Rc::new(Ancestor {
                preorder_id,
                parent: ancestors.clone(),
            }));
            for child in children {
                pending.push((child, child_ancestors.clone()));
            }
        }

        emission.push((node, preorder_id, ancestors, has_children));
    }

    let n = emission.len();
    let mut nodes = Vec::with_capacity(n);
    let mut lmds = Vec::with_capacity(n);
    let mut provisional_lmd: Vec<Option<usize>> = vec![None; n];
    let mut keyroot_candidate: Vec<Option<usize>> = vec![None; n];

    while let Some((node, preorder_id, ancestors, has_children)) = emission.pop() {
        let i = nodes.len();

        let own_lmd = if has_children {
            provisional_lmd[preorder_id]
                .expect("an internal node's leftmost leaf is set by its first-visited descendant")
        } else {
            let mut cursor = ancestors;
            while let Some(ancestor) = cursor {
                if provisional_lmd[ancestor.preorder_id].is_none() {
                    provisional_lmd[ancestor.preorder_id] = Some(i);
                    cursor = ancestor.parent.clone();
                } else {
                    break;
                }
            }
            i
        };

        nodes.push(node);
        lmds.push(own_lmd);
        keyroot_candidate[own_lmd] = Some(i);
    }

    let mut keyroots: Vec<usize> = keyroot_candidate.into_iter().flatten().collect();
    keyroots.sort_unstable();

    AnnotatedTree {
        nodes,
        lmds,
        keyroots,
    }
}
