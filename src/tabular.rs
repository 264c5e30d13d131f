use crate::{CostModel, Equivalence, TreeNode, Weight};
use arrayvec::ArrayVec;
use itertools::iproduct;
use pathfinding::matrix::Matrix;

/// Aligns the postorder sequences of `a` and `b`, inserting and deleting one node at a time.
///
/// Two positions may only be paired when both hold a leaf, so internal nodes are never matched
/// against one another and the result is not a tree edit distance. In particular, comparing a tree
/// against itself costs one deletion and one insertion per internal node.
pub(crate) fn tabulate<L, W, E>(
    costs: &CostModel<W>,
    equivalence: &E,
    a: Option<&TreeNode<L>>,
    b: Option<&TreeNode<L>>,
) -> W
where
    W: Weight,
    E: Equivalence<L>,
{
    let a = a.map_or_else(Vec::new, TreeNode::postorder);
    let b = b.map_or_else(Vec::new, TreeNode::postorder);
    let (m, n) = (a.len(), b.len());

    let mut table = Matrix::new(m + 1, n + 1, W::default());

    for (i, j) in iproduct!(0..=m, 0..=n) {
        let mut moves = ArrayVec::<_, 3>::new();

        if i > 0 {
            moves.push(table[(i - 1, j)] + costs.delete());
        }

        if j > 0 {
            moves.push(table[(i, j - 1)] + costs.insert());
        }

        if i > 0 && j > 0 && a[i - 1].is_leaf() && b[j - 1].is_leaf() {
            let relabel = costs.relabeling(equivalence, a[i - 1], b[j - 1]);
            moves.push(table[(i - 1, j - 1)] + relabel);
        }

        table[(i, j)] = moves.into_iter().min().unwrap_or_default();
    }

    table[(m, n)]
}
