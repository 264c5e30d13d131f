use crate::{align, CostModel, Equivalence, TreeNode, Weight};

/// Computes the edit distance by splitting every comparison into the comparisons of its children.
///
/// Nothing is shared between calls, so the same pair of subtrees is compared afresh every time an
/// alignment asks for it. The running time is exponential in the worst case.
pub(crate) fn decompose<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    a: Option<&TreeNode<L>>,
    b: Option<&TreeNode<L>>,
) -> W
where
    W: Weight,
    E: Equivalence<L>,
{
    let (x, y) = match (a, b) {
        (None, None) => return W::default(),
        (Some(x), None) => return costs.erasure(x.size()),
        (None, Some(y)) => return costs.grafting(y.size()),
        (Some(x), Some(y)) => (x, y),
    };

    let relabel = costs.relabeling(equivalence, x, y);

    if x.is_leaf() && y.is_leaf() {
        return relabel;
    }

    let (aligned, _) = align(
        x.children(),
        y.children(),
        |c| costs.erasure(c.size()),
        |c| costs.grafting(c.size()),
        |c, d| (decompose(costs, equivalence, Some(c), Some(d)), ()),
    );

    let erase = costs.erasure(x.size()) + decompose(costs, equivalence, None, b);
    let graft = costs.grafting(y.size()) + decompose(costs, equivalence, a, None);

    (relabel + aligned).min(erase).min(graft)
}
