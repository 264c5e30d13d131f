use crate::{measure, Alignment, Cost, CostModel, Equivalence, Measured, Operation, Script, Step};
use crate::{TreeNode, Weight};
use std::mem;

/// An edit script that holds on to the scripts of nested comparisons instead of copying them.
#[derive(Debug)]
struct Fragment<L, W>(Vec<Piece<L, W>>);

#[derive(Debug)]
enum Piece<L, W> {
    Op(Operation<L, W>),
    Nested(Fragment<L, W>),
}

impl<L, W> Fragment<L, W> {
    fn ops(ops: Vec<Operation<L, W>>) -> impl Iterator<Item = Piece<L, W>> {
        ops.into_iter().map(Piece::Op)
    }

    /// Lays the operations out in order, depth first.
    fn flatten(mut self) -> Vec<Operation<L, W>> {
        let mut script = Vec::new();
        let mut stack = vec![mem::take(&mut self.0).into_iter()];

        while let Some(pieces) = stack.last_mut() {
            match pieces.next() {
                None => drop(stack.pop()),
                Some(Piece::Op(op)) => script.push(op),
                Some(Piece::Nested(mut f)) => stack.push(mem::take(&mut f.0).into_iter()),
            }
        }

        script
    }
}

impl<L, W> Drop for Fragment<L, W> {
    fn drop(&mut self) {
        let mut pending = mem::take(&mut self.0);
        while let Some(piece) = pending.pop() {
            if let Piece::Nested(mut f) = piece {
                pending.append(&mut f.0);
            }
        }
    }
}

/// A pair of nodes waiting on the distances between their children.
#[derive(Debug)]
struct Frame<'m, 't, L, W> {
    a: &'m Measured<'t, L>,
    b: &'m Measured<'t, L>,
    alignment: Alignment<W, Fragment<L, W>>,
}

impl<'m, 't, L, W: Weight> Frame<'m, 't, L, W> {
    fn new(costs: &CostModel<W>, a: &'m Measured<'t, L>, b: &'m Measured<'t, L>) -> Self {
        let delete = a.children().iter().map(|c| costs.erasure(c.size()));
        let insert = b.children().iter().map(|c| costs.grafting(c.size()));

        Frame {
            a,
            b,
            alignment: Alignment::new(delete.collect(), insert.collect()),
        }
    }
}

/// Picks the cheapest script for a frame whose children are all aligned, preferring to keep the
/// root over starting over when both cost the same.
fn conclude<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    frame: Frame<L, W>,
) -> (Fragment<L, W>, W)
where
    L: Clone,
    W: Weight,
    E: Equivalence<L>,
{
    let Frame { a, b, alignment } = frame;
    let root = costs.relabel(equivalence, a.tree(), b.tree());
    let (distance, steps) = alignment.finish();
    let cost = root.cost() + distance;

    if !(a.is_leaf() && b.is_leaf()) {
        let trivial = costs.erasure(a.size()) + costs.grafting(b.size());
        if trivial < cost {
            let erase = Fragment::ops(costs.erase(a.tree()));
            let graft = Fragment::ops(costs.graft(b.tree()));
            return (Fragment(erase.chain(graft).collect()), trivial);
        }
    }

    let mut pieces = vec![Piece::Op(root)];

    for step in steps {
        match step {
            Step::Pair(_, _, inner) => pieces.push(Piece::Nested(inner)),
            Step::Delete(i) => pieces.extend(Fragment::ops(costs.erase(a.children()[i].tree()))),
            Step::Insert(j) => pieces.extend(Fragment::ops(costs.graft(b.children()[j].tree()))),
        }
    }

    (Fragment(pieces), cost)
}

fn unwind<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    a: &Measured<L>,
    b: &Measured<L>,
) -> (Fragment<L, W>, W)
where
    L: Clone,
    W: Weight,
    E: Equivalence<L>,
{
    let mut stack = Vec::new();
    let mut frame = Frame::new(costs, a, b);

    loop {
        if let Some((i, j)) = frame.alignment.advance() {
            let (x, y) = (frame.a, frame.b);
            let child = Frame::new(costs, &x.children()[i], &y.children()[j]);
            stack.push(mem::replace(&mut frame, child));
            continue;
        }

        let (fragment, cost) = conclude(costs, equivalence, frame);

        match stack.pop() {
            None => return (fragment, cost),
            Some(parent) => {
                frame = parent;
                frame.alignment.resolve(cost, fragment);
            }
        }
    }
}

/// Finds the same edit script as [backtrack][crate::backtrack()], keeping pending comparisons
/// on an explicit stack rather than on the call stack.
pub(crate) fn unroll<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    a: Option<&TreeNode<L>>,
    b: Option<&TreeNode<L>>,
) -> (Script<L, W>, W)
where
    L: Clone,
    W: Weight,
    E: Equivalence<L>,
{
    if let (Some(a), Some(b)) = (a, b) {
        let (fragment, cost) = unwind(costs, equivalence, &measure(a), &measure(b));
        return (fragment.flatten().into(), cost);
    }

    let mut script = a.map_or_else(Vec::new, |a| costs.erase(a));
    script.extend(b.map_or_else(Vec::new, |b| costs.graft(b)));

    let cost = script.cost();
    (script.into(), cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backtrack, Exact, Operation, Tag};
    use assert_matches::assert_matches;
    use test_strategy::proptest;

    fn chain(depth: usize, label: char) -> TreeNode<char> {
        (0..depth).fold(TreeNode::leaf(label), |t, _| TreeNode::new(label, [t]))
    }

    #[test]
    fn a_changed_branch_is_relabeled_and_trimmed() {
        let a = TreeNode::new(
            'A',
            [
                TreeNode::new('B', [TreeNode::leaf('D')]),
                TreeNode::new('C', [TreeNode::leaf('E')]),
            ],
        );

        let b = TreeNode::new(
            'A',
            [TreeNode::new('B', [TreeNode::leaf('D')]), TreeNode::leaf('F')],
        );

        let (script, cost) = unroll(&CostModel::<u64>::default(), &Exact, Some(&a), Some(&b));

        assert_eq!(cost, 2);
        assert_matches!(
            &script[..],
            [
                Operation::Match { from: 'A', to: 'A' },
                Operation::Match { from: 'B', to: 'B' },
                Operation::Match { from: 'D', to: 'D' },
                Operation::Replace { from: 'C', to: 'F', cost: 1 },
                Operation::Delete { from: 'E', cost: 1 },
            ]
        );
    }

    #[test]
    fn empty_sides_are_deleted_then_inserted() {
        let costs = CostModel::new(1u64, 2, 1).unwrap();
        let t = TreeNode::new('A', [TreeNode::leaf('B'), TreeNode::leaf('C')]);

        assert_eq!(unroll(&costs, &Exact, Some(&t), None).1, 6);
        assert_eq!(unroll(&costs, &Exact, None, Some(&t)).1, 3);
        assert!(unroll::<char, _, _>(&costs, &Exact, None, None).0.is_empty());
    }

    #[test]
    fn deep_trees_do_not_need_a_deep_call_stack() {
        let (a, b) = (chain(3_000, 'a'), chain(3_000, 'b'));
        let costs = CostModel::new(1u64, 1, 1).unwrap();

        let (script, cost) = unroll(&costs, &Exact, Some(&a), Some(&a));
        assert_eq!(cost, 0);
        assert_eq!(script.len(), 3_001);

        let (script, cost) = unroll(&costs, &Exact, Some(&a), Some(&b));
        assert_eq!(cost, 3_001);
        assert!(script.iter().all(|op| matches!(op, Operation::Replace { .. })));

        // Dropping is still recursive.
        mem::forget((a, b));
    }

    #[test]
    fn chains_deeper_than_the_call_stack_allows_are_compared() {
        let (a, b) = (chain(60_000, 'a'), chain(60_000, 'b'));
        let costs = CostModel::new(1u64, 1, 1).unwrap();

        let (script, cost) = unroll(&costs, &Exact, Some(&a), Some(&a));
        assert_eq!(cost, 0);
        assert_eq!(script.len(), 60_001);
        assert!(script.iter().all(|op| matches!(op, Operation::Match { .. })));

        let (script, cost) = unroll(&costs, &Exact, Some(&a), Some(&b));
        assert_eq!(cost, 60_001);
        assert_eq!(script.len(), 60_001);

        mem::forget((a, b));
    }

    #[test]
    fn fragments_flatten_depth_first() {
        let op = |c| Piece::Op(Operation::<_, u64>::Delete { from: c, cost: 1 });
        let inner = Fragment(vec![op('b'), Piece::Nested(Fragment(vec![op('c')]))]);
        let fragment = Fragment(vec![op('a'), Piece::Nested(inner), op('d')]);

        let labels: String = fragment.flatten().iter().flat_map(Operation::from_label).collect();
        assert_eq!(labels, "abcd");
    }

    #[test]
    fn deeply_nested_fragments_are_dropped_without_recursion() {
        let fragment = (0..100_000).fold(Fragment::<char, u64>(Vec::new()), |f, _| {
            Fragment(vec![Piece::Nested(f)])
        });

        drop(fragment);
    }

    #[proptest]
    fn unrolling_finds_the_same_script_as_backtracking(a: TreeNode<Tag>, b: TreeNode<Tag>) {
        let costs = CostModel::new(2u64, 3, 4).unwrap();
        let (expected, cost, _) = backtrack(&costs, &Exact, Some(&a), Some(&b));
        assert_eq!(unroll(&costs, &Exact, Some(&a), Some(&b)), (expected, cost));
    }

    #[proptest]
    fn unit_costs_lead_to_the_same_script_as_backtracking(a: TreeNode<Tag>, b: TreeNode<Tag>) {
        let costs = CostModel::default();
        let (expected, cost, _) = backtrack::<_, u64, _>(&costs, &Exact, Some(&a), Some(&b));
        assert_eq!(unroll(&costs, &Exact, Some(&a), Some(&b)), (expected, cost));
    }
}
