//! The Zhang-Shasha double dynamic program: keyroot pairs on the outside, forest distance
//! on the inside, with back-pointers through [`crate::algebra`] so the optimal script for
//! `treedists[a.size-1][b.size-1]` can be reconstructed once at the end.

use std::rc::Rc;

use crate::algebra::{clone_to_list, into_primitives, Edit, EditScript, ScriptRef};
use crate::annotate::{annotate, AnnotatedTree};
use crate::error::{Side, TreeDiffError};

/// Compute the minimum-cost edit script transforming the tree rooted at `left_root` into the
/// tree rooted at `right_root`, returned as a flattened, left-to-right post-order sequence of
/// primitive edits.
///
/// `None` for either root is the degenerate (empty tree) case and is reported as
/// [`TreeDiffError::EmptyTree`] rather than guessed at - see SPEC_FULL.md §7.
#[allow(clippy::too_many_arguments)]
pub fn distance<N, GC, IC, RC, UC>(
    left_root: Option<N>,
    right_root: Option<N>,
    get_children: GC,
    insert_cost: IC,
    remove_cost: RC,
    update_cost: UC,
) -> Result<Vec<Edit<N>>, TreeDiffError>
where
    N: Copy,
    GC: Fn(N) -> Vec<N>,
    IC: Fn(N) -> u32,
    RC: Fn(N) -> u32,
    UC: Fn(N, N) -> u32,
{
    let left_root = left_root.ok_or(TreeDiffError::EmptyTree { side: Side::Left })?;
    let right_root = right_root.ok_or(TreeDiffError::EmptyTree { side: Side::Right })?;

    let a = annotate(left_root, &get_children);
    let b = annotate(right_root, &get_children);

    tracing::debug!(a_size = a.size(), b_size = b.size(), "annotated both trees");

    let solver = Solver {
        a,
        b,
        insert_cost,
        remove_cost,
        update_cost,
    };
    let final_script = solver.run();

    tracing::debug!(cost = final_script.cost(), "distance computed");

    let flat = clone_to_list(&final_script, true);
    Ok(into_primitives(&flat))
}

struct Solver<N, IC, RC, UC> {
    a: AnnotatedTree<N>,
    b: AnnotatedTree<N>,
    insert_cost: IC,
    remove_cost: RC,
    update_cost: UC,
}

impl<N, IC, RC, UC> Solver<N, IC, RC, UC>
where
    N: Copy,
    IC: Fn(N) -> u32,
    RC: Fn(N) -> u32,
    UC: Fn(N, N) -> u32,
{
    fn tindex(&self, x: usize, y: usize) -> usize {
        x * self.b.size() + y
    }

    fn run(&self) -> ScriptRef<N> {
        let a_size = self.a.size();
        let b_size = self.b.size();

        let a_remove: Vec<ScriptRef<N>> = self
            .a
            .nodes
            .iter()
            .map(|&n| Rc::new(EditScript::remove(n, (self.remove_cost)(n))))
            .collect();
        let b_insert: Vec<ScriptRef<N>> = self
            .b
            .nodes
            .iter()
            .map(|&n| Rc::new(EditScript::insert(n, (self.insert_cost)(n))))
            .collect();

        let mut treedists: Vec<Option<ScriptRef<N>>> = vec![None; a_size * b_size];
        let empty_cell: ScriptRef<N> = Rc::new(EditScript::empty());
        let mut fd: Vec<ScriptRef<N>> = vec![empty_cell.clone(); (a_size + 1) * (b_size + 1)];

        for &i in &self.a.keyroots {
            for &j in &self.b.keyroots {
                self.fill_forest_distance(i, j, &a_remove, &b_insert, &mut fd, &mut treedists, &empty_cell);
            }
        }

        treedists[self.tindex(a_size - 1, b_size - 1)]
            .clone()
            .expect("the root pair is always resolved once every keyroot pair has run")
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_forest_distance(
        &self,
        i: usize,
        j: usize,
        a_remove: &[ScriptRef<N>],
        b_insert: &[ScriptRef<N>],
        fd: &mut [ScriptRef<N>],
        treedists: &mut [Option<ScriptRef<N>>],
        empty_cell: &ScriptRef<N>,
    ) {
        let a_lmd_i = self.a.lmds[i];
        let b_lmd_j = self.b.lmds[j];

        let m = i - a_lmd_i + 2;
        let n = j - b_lmd_j + 2;
        let ioff = a_lmd_i as isize - 1;
        let joff = b_lmd_j as isize - 1;

        let index = |x: usize, y: usize| x * n + y;

        for slot in fd.iter_mut().take(m * n) {
            *slot = empty_cell.clone();
        }

        for x in 1..m {
            let x_i = (x as isize + ioff) as usize;
            fd[index(x, 0)] = Rc::new(EditScript::combine(
                Some(fd[index(x - 1, 0)].clone()),
                Some(a_remove[x_i].clone()),
            ));
        }
        for y in 1..n {
            let y_j = (y as isize + joff) as usize;
            fd[index(0, y)] = Rc::new(EditScript::combine(
                Some(fd[index(0, y - 1)].clone()),
                Some(b_insert[y_j].clone()),
            ));
        }

        for x in 1..m {
            for y in 1..n {
                let x_i = (x as isize + ioff) as usize;
                let y_j = (y as isize + joff) as usize;

                let op1_cost = fd[index(x - 1, y)].cost() + a_remove[x_i].cost();
                let op2_cost = fd[index(x, y - 1)].cost() + b_insert[y_j].cost();

                let new_cell = if self.a.lmds[i] == self.a.lmds[x_i] && self.b.lmds[j] == self.b.lmds[y_j] {
                    // Tree case: both subforests are single subtrees.
                    let delta = (self.update_cost)(self.a.nodes[x_i], self.b.nodes[y_j]);
                    let op3_cost = fd[index(x - 1, y - 1)].cost() + delta;

                    let cell = pick_cheapest(
                        op1_cost,
                        op2_cost,
                        op3_cost,
                        || EditScript::combine(Some(fd[index(x - 1, y)].clone()), Some(a_remove[x_i].clone())),
                        || EditScript::combine(Some(fd[index(x, y - 1)].clone()), Some(b_insert[y_j].clone())),
                        || {
                            EditScript::combine_update(
                                Some(fd[index(x - 1, y - 1)].clone()),
                                self.a.nodes[x_i],
                                self.b.nodes[y_j],
                                delta,
                            )
                        },
                    );
                    let cell = Rc::new(cell);
                    treedists[self.tindex(x_i, y_j)] = Some(clone_to_list(&cell, false));
                    cell
                } else {
                    // Forest case: recurse through a previously solved subtree pair.
                    let p = (self.a.lmds[x_i] as isize - 1 - ioff) as usize;
                    let q = (self.b.lmds[y_j] as isize - 1 - joff) as usize;

                    let subproblem = treedists[self.tindex(x_i, y_j)].clone();
                    let subcost = subproblem.as_deref().map_or(0, EditScript::cost);
                    let op3_cost = fd[index(p, q)].cost() + subcost;

                    Rc::new(pick_cheapest(
                        op1_cost,
                        op2_cost,
                        op3_cost,
                        || EditScript::combine(Some(fd[index(x - 1, y)].clone()), Some(a_remove[x_i].clone())),
                        || EditScript::combine(Some(fd[index(x, y - 1)].clone()), Some(b_insert[y_j].clone())),
                        || EditScript::combine(Some(fd[index(p, q)].clone()), subproblem.clone()),
                    ))
                };

                fd[index(x, y)] = new_cell;
            }
        }
    }
}

/// Shared tie-break: strictly `op1 < op2` gates first, else `op2 < op3`; ties bias toward the
/// third (update/combine) branch. Reproduced exactly as the source computes it so edit
/// scripts stay stable across equivalent-cost choices.
fn pick_cheapest<N>(
    op1_cost: u32,
    op2_cost: u32,
    op3_cost: u32,
    op1: impl FnOnce() -> EditScript<N>,
    op2: impl FnOnce() -> EditScript<N>,
    op3: impl FnOnce() -> EditScript<N>,
) -> EditScript<N> {
    if op1_cost < op2_cost {
        if op1_cost < op3_cost {
            op1()
        } else if op2_cost < op3_cost {
            op2()
        } else {
            op3()
        }
    } else if op2_cost < op3_cost {
        op2()
    } else {
        op3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-memory labeled tree for exercising the solver directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Node(usize);

    struct Forest {
        labels: Vec<&'static str>,
        children: Vec<Vec<usize>>,
    }

    impl Forest {
        fn leaf(&mut self, label: &'static str) -> usize {
            let id = self.labels.len();
            self.labels.push(label);
            self.children.push(Vec::new());
            id
        }

        fn node(&mut self, label: &'static str, kids: Vec<usize>) -> usize {
            let id = self.labels.len();
            self.labels.push(label);
            self.children.push(kids);
            id
        }

        fn get_children(&self, n: Node) -> Vec<Node> {
            self.children[n.0].iter().map(|&c| Node(c)).collect()
        }

        fn label(&self, n: Node) -> &'static str {
            self.labels[n.0]
        }
    }

    fn unit_costs(forest: &Forest) -> (impl Fn(Node) -> u32 + '_, impl Fn(Node) -> u32 + '_, impl Fn(Node, Node) -> u32 + '_) {
        let insert = move |_: Node| 1u32;
        let remove = move |_: Node| 1u32;
        let update = move |a: Node, b: Node| {
            if forest.label(a) == forest.label(b) {
                0
            } else {
                1
            }
        };
        (insert, remove, update)
    }

    fn render(forest: &Forest, edits: &[Edit<Node>]) -> Vec<String> {
        edits
            .iter()
            .map(|e| match e {
                Edit::Insert(n) => format!("INSERT {}", forest.label(*n)),
                Edit::Remove(n) => format!("REMOVE {}", forest.label(*n)),
                Edit::Match(a, b) => format!("MATCH {}<->{}", forest.label(*a), forest.label(*b)),
                Edit::Update(a, b) => format!("UPDATE {}->{}", forest.label(*a), forest.label(*b)),
            })
            .collect()
    }

    #[test]
    fn single_node_identical() {
        let mut f = Forest {
            labels: Vec::new(),
            children: Vec::new(),
        };
        let a = f.leaf("a");
        let a2 = f.leaf("a");
        let (ins, rem, upd) = unit_costs(&f);
        let edits = distance(Some(Node(a)), Some(Node(a2)), |n| f.get_children(n), ins, rem, upd).unwrap();
        assert_eq!(render(&f, &edits), vec!["MATCH a<->a"]);
    }

    #[test]
    fn single_node_substitution() {
        let mut f = Forest {
            labels: Vec::new(),
            children: Vec::new(),
        };
        let a = f.leaf("a");
        let b = f.leaf("b");
        let (ins, rem, upd) = unit_costs(&f);
        let edits = distance(Some(Node(a)), Some(Node(b)), |n| f.get_children(n), ins, rem, upd).unwrap();
        assert_eq!(render(&f, &edits), vec!["UPDATE a->b"]);
    }

    #[test]
    fn pure_insertion() {
        let mut f = Forest {
            labels: Vec::new(),
            children: Vec::new(),
        };
        let left_a = f.leaf("a");
        let b_child = f.leaf("b");
        let right_a = f.node("a", vec![b_child]);
        let (ins, rem, upd) = unit_costs(&f);
        let edits = distance(
            Some(Node(left_a)),
            Some(Node(right_a)),
            |n| f.get_children(n),
            ins,
            rem,
            upd,
        )
        .unwrap();
        assert_eq!(render(&f, &edits), vec!["INSERT b", "MATCH a<->a"]);
    }

    #[test]
    fn pure_removal() {
        let mut f = Forest {
            labels: Vec::new(),
            children: Vec::new(),
        };
        let b_child = f.leaf("b");
        let left_a = f.node("a", vec![b_child]);
        let right_a = f.leaf("a");
        let (ins, rem, upd) = unit_costs(&f);
        let edits = distance(
            Some(Node(left_a)),
            Some(Node(right_a)),
            |n| f.get_children(n),
            ins,
            rem,
            upd,
        )
        .unwrap();
        assert_eq!(render(&f, &edits), vec!["REMOVE b", "MATCH a<->a"]);
    }

    #[test]
    fn reordered_siblings_are_not_free() {
        let mut f = Forest {
            labels: Vec::new(),
            children: Vec::new(),
        };
        let a1 = f.leaf("a");
        let b1 = f.leaf("b");
        let left_r = f.node("r", vec![a1, b1]);
        let b2 = f.leaf("b");
        let a2 = f.leaf("a");
        let right_r = f.node("r", vec![b2, a2]);
        let (ins, rem, upd) = unit_costs(&f);
        let edits = distance(
            Some(Node(left_r)),
            Some(Node(right_r)),
            |n| f.get_children(n),
            ins,
            rem,
            upd,
        )
        .unwrap();
        let total_cost: u32 = edits
            .iter()
            .map(|e| matches!(e, Edit::Update(_, _)) as u32)
            .sum();
        assert_eq!(total_cost, 2, "both siblings must be updated, order is significant");
    }

    #[test]
    fn empty_tree_is_an_error() {
        let f = Forest {
            labels: vec!["a"],
            children: vec![Vec::new()],
        };
        let (ins, rem, upd) = unit_costs(&f);
        let err = distance(None, Some(Node(0)), |n| f.get_children(n), ins, rem, upd).unwrap_err();
        assert_eq!(err, TreeDiffError::EmptyTree { side: Side::Left });
    }

    #[test]
    fn classic_zhang_shasha_example() {
        // A = f(d(a, c(b)), e)
        let mut f = Forest {
            labels: Vec::new(),
            children: Vec::new(),
        };
        let a_a = f.leaf("a");
        let a_b = f.leaf("b");
        let a_c = f.node("c", vec![a_b]);
        let a_d = f.node("d", vec![a_a, a_c]);
        let a_e = f.leaf("e");
        let a_f = f.node("f", vec![a_d, a_e]);

        // B = f(c(d(a,b)), e)
        let b_a = f.leaf("a");
        let b_b = f.leaf("b");
        let b_d = f.node("d", vec![b_a, b_b]);
        let b_c = f.node("c", vec![b_d]);
        let b_e = f.leaf("e");
        let b_f = f.node("f", vec![b_c, b_e]);

        let (ins, rem, upd) = unit_costs(&f);
        let edits = distance(Some(Node(a_f)), Some(Node(b_f)), |n| f.get_children(n), ins, rem, upd).unwrap();

        let structural: u32 = edits
            .iter()
            .filter(|e| matches!(e, Edit::Insert(_) | Edit::Remove(_)))
            .count() as u32;
        let total_cost: u32 = edits
            .iter()
            .map(|e| match e {
                Edit::Insert(_) | Edit::Remove(_) => 1,
                Edit::Update(_, _) => 1,
                Edit::Match(_, _) => 0,
            })
            .sum();
        assert_eq!(total_cost, 2);
        assert_eq!(structural, 2);

        let matches: std::collections::HashSet<&str> = edits
            .iter()
            .filter_map(|e| match e {
                Edit::Match(x, _) => Some(f.label(*x)),
                _ => None,
            })
            .collect();
        assert_eq!(
            matches,
            ["a", "b", "d", "e", "f"].into_iter().collect::<std::collections::HashSet<_>>()
        );
    }
}
