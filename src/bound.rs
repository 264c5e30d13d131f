use crate::{measure, CostModel, Equivalence, Measured, Pruning, Script, Search, Stats};
use crate::{scale, TreeNode, Weight};

/// Starts from deleting and inserting everything, and discards every branch that cannot beat the
/// best script found so far, even if all remaining nodes were to match.
#[derive(Debug)]
pub(crate) struct BranchAndBound;

impl Pruning for BranchAndBound {
    const SEEDED: bool = true;

    /// Every script deletes as many nodes more than it inserts as `a` is larger than `b`, and
    /// vice versa.
    fn floor<L, W: Weight>(
        costs: &CostModel<W>,
        a: Option<&Measured<L>>,
        b: Option<&Measured<L>>,
    ) -> Option<W> {
        let m = a.map_or(0, Measured::size);
        let n = b.map_or(0, Measured::size);

        Some(if m > n {
            scale(costs.delete(), m - n)
        } else {
            scale(costs.insert(), n - m)
        })
    }
}

/// Finds a minimal edit script like [backtrack][crate::backtrack()], skipping the branches that
/// provably cannot lead to a cheaper one.
pub(crate) fn branch_and_bound<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    a: Option<&TreeNode<L>>,
    b: Option<&TreeNode<L>>,
) -> (Script<L, W>, W, Stats)
where
    L: Clone,
    W: Weight,
    E: Equivalence<L>,
{
    let (a, b) = (a.map(measure), b.map(measure));
    Search::<_, _, _, BranchAndBound>::new(costs, equivalence).run(a.as_ref(), b.as_ref())
}

/// Like [branch_and_bound], but discards every script that costs more than `ceiling` from the
/// start, finding nothing if no script is cheap enough.
pub(crate) fn branch_and_bound_within<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    a: Option<&TreeNode<L>>,
    b: Option<&TreeNode<L>>,
    ceiling: W,
) -> (Option<(Script<L, W>, W)>, Stats)
where
    L: Clone,
    W: Weight,
    E: Equivalence<L>,
{
    let (a, b) = (a.map(measure), b.map(measure));
    Search::<_, _, _, BranchAndBound>::new(costs, equivalence)
        .within(ceiling)
        .attempt(a.as_ref(), b.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backtrack, Cost, Exact, Operation, Tag};
    use assert_matches::assert_matches;
    use std::cell::Cell;
    use test_strategy::proptest;

    #[derive(Debug)]
    struct Counted<'c> {
        label: char,
        clones: &'c Cell<usize>,
    }

    impl Clone for Counted<'_> {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Counted { ..*self }
        }
    }

    impl PartialEq for Counted<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.label == other.label
        }
    }

    fn floor<L>(costs: &CostModel<u64>, a: Option<&TreeNode<L>>, b: Option<&TreeNode<L>>) -> u64 {
        let (a, b) = (a.map(measure), b.map(measure));
        BranchAndBound::floor(costs, a.as_ref(), b.as_ref()).unwrap()
    }

    #[test]
    fn the_floor_is_exact_against_the_empty_tree() {
        let costs = CostModel::new(2u64, 3, 5).unwrap();
        let t = TreeNode::new('a', [TreeNode::leaf('b'), TreeNode::leaf('c')]);

        assert_eq!(floor(&costs, Some(&t), None), 9);
        assert_eq!(floor(&costs, None, Some(&t)), 6);
        assert_eq!(floor::<char>(&costs, None, None), 0);
        assert_eq!(floor(&costs, Some(&t), Some(&t)), 0);
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

        let (script, cost, stats) =
            branch_and_bound(&CostModel::<u64>::default(), &Exact, Some(&a), Some(&b));

        assert_eq!(cost, 2);
        assert_eq!(script.cost(), 2);
        assert!(stats.pruned > 0);

        let edits: Vec<_> = script
            .iter()
            .filter(|op| !matches!(op, Operation::Match { .. }))
            .collect();

        assert_matches!(
            &edits[..],
            [
                Operation::Replace { from: 'C', to: 'F', cost: 1 },
                Operation::Delete { from: 'E', cost: 1 },
            ]
        );
    }

    #[test]
    fn identical_trees_prune_every_alternative() {
        let t = TreeNode::new('a', [TreeNode::leaf('b')]);
        let (script, cost, stats) =
            branch_and_bound(&CostModel::<u64>::default(), &Exact, Some(&t), Some(&t));

        assert_eq!(cost, 0);
        assert!(script.iter().all(|op| op.cost() == 0));
        assert!(stats.pruned >= 2);
    }

    #[test]
    fn pruned_branches_copy_no_labels() {
        let clones = Cell::new(0);
        let c = |label| Counted { label, clones: &clones };
        let t = TreeNode::new(c('a'), [TreeNode::leaf(c('b'))]);

        let (_, cost, stats) =
            branch_and_bound(&CostModel::<u64>::default(), &Exact, Some(&t), Some(&t));

        assert_eq!(cost, 0);
        assert!(stats.pruned >= 2);

        // The seed deletes and inserts every node, then every pair of nodes is matched once.
        assert_eq!(clones.get(), 4 * t.size());
    }

    #[test]
    fn nothing_is_found_below_the_cheapest_script() {
        let a = TreeNode::new('a', [TreeNode::leaf('b'), TreeNode::leaf('c')]);
        let b = TreeNode::new('a', [TreeNode::leaf('d')]);
        let costs = CostModel::<u64>::default();

        let (found, stats) = branch_and_bound_within(&costs, &Exact, Some(&a), Some(&b), 1);
        assert_eq!(found, None);
        assert!(stats.pruned > 0);

        let (found, _) = branch_and_bound_within(&costs, &Exact, Some(&a), Some(&b), 2);
        assert_matches!(found, Some((script, 2)) if script.cost() == 2);
    }

    #[test]
    fn a_ceiling_below_the_seed_is_not_seeded() {
        let a = TreeNode::new('a', [TreeNode::leaf('b')]);
        let b = TreeNode::new('c', [TreeNode::leaf('d')]);
        let costs = CostModel::new(1u64, 1, 3).unwrap();

        let (found, _) = branch_and_bound_within(&costs, &Exact, Some(&a), Some(&b), 3);
        assert_eq!(found, None);

        let (found, _) = branch_and_bound_within(&costs, &Exact, Some(&a), Some(&b), 4);
        assert_matches!(found, Some((_, 4)));
    }

    #[proptest]
    fn a_ceiling_only_hides_dearer_scripts(
        a: TreeNode<Tag>,
        b: TreeNode<Tag>,
        #[strategy(0..24u64)] ceiling: u64,
    ) {
        let costs = CostModel::<u64>::default();
        let (expected, distance, _) = backtrack(&costs, &Exact, Some(&a), Some(&b));
        let (found, _) = branch_and_bound_within(&costs, &Exact, Some(&a), Some(&b), ceiling);

        if distance <= ceiling {
            assert_eq!(found, Some((expected, distance)));
        } else {
            assert_eq!(found, None);
        }
    }

    #[proptest]
    fn the_floor_never_overestimates(a: TreeNode<Tag>, b: TreeNode<Tag>) {
        let costs = CostModel::new(2u64, 3, 4).unwrap();
        let (_, cost, _) = backtrack(&costs, &Exact, Some(&a), Some(&b));
        assert!(floor(&costs, Some(&a), Some(&b)) <= cost);
    }

    #[proptest]
    fn bounding_does_not_lose_optimality(a: TreeNode<Tag>, b: TreeNode<Tag>) {
        let costs = CostModel::new(2u64, 3, 4).unwrap();
        let (_, expected, _) = backtrack(&costs, &Exact, Some(&a), Some(&b));
        let (script, cost, _) = branch_and_bound(&costs, &Exact, Some(&a), Some(&b));

        assert_eq!(cost, expected);
        assert_eq!(script.cost(), cost);
    }

    #[proptest]
    fn ties_are_broken_like_backtracking(a: TreeNode<Tag>, b: TreeNode<Tag>) {
        let costs = CostModel::<u64>::default();
        let (expected, _, _) = backtrack(&costs, &Exact, Some(&a), Some(&b));
        let (script, _, _) = branch_and_bound(&costs, &Exact, Some(&a), Some(&b));
        assert_eq!(script, expected);
    }

    #[proptest]
    fn bounding_never_visits_more_pairs(a: TreeNode<Tag>, b: TreeNode<Tag>) {
        let costs = CostModel::<u64>::default();
        let (_, _, exhaustive) = backtrack(&costs, &Exact, Some(&a), Some(&b));
        let (_, _, bounded) = branch_and_bound(&costs, &Exact, Some(&a), Some(&b));
        assert!(bounded.visited <= exhaustive.visited);
    }
}
