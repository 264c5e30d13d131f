use crate::{measure, CostModel, Equivalence, Measured, Pruning, Script, Search, Stats};
use crate::{TreeNode, Weight};

/// Explores every branch that could still beat the best script found so far, keeping the first
/// of the cheapest scripts it finds.
#[derive(Debug)]
pub(crate) struct Exhaustive;

impl Pruning for Exhaustive {
    const SEEDED: bool = false;

    /// Costs never go down, so a partial script as dear as the incumbent is already beaten.
    fn floor<L, W: Weight>(
        _: &CostModel<W>,
        _: Option<&Measured<L>>,
        _: Option<&Measured<L>>,
    ) -> Option<W> {
        Some(W::default())
    }
}

/// Finds a minimal edit script by trying, at every pair of nodes, to relabel the root and align
/// the children, to delete everything on the left, and to insert everything on the right.
pub(crate) fn backtrack<L, W, E>(
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
    Search::<_, _, _, Exhaustive>::new(costs, equivalence).run(a.as_ref(), b.as_ref())
}
