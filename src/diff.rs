use crate::{backtrack, branch_and_bound, branch_and_bound_within, decompose, size, tabulate};
use crate::unroll;
use crate::{CostModel, Equivalence, Error, Exact, Operation, Stats, TreeNode, Weight};
use derive_more::Display;
use std::str::FromStr;
use tracing::{debug, debug_span};

/// The algorithm used to compare two trees.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display)]
pub enum Strategy {
    /// See [Solver::backtracking].
    #[display(fmt = "backtracking")]
    Backtracking,

    /// See [Solver::branch_and_bound].
    #[default]
    #[display(fmt = "branch-and-bound")]
    BranchAndBound,

    /// See [Solver::divide_and_conquer].
    #[display(fmt = "divide-and-conquer")]
    DivideAndConquer,

    /// See [Solver::tabular].
    #[display(fmt = "tabular")]
    Tabular,

    /// See [Solver::unrolled].
    #[display(fmt = "unrolled")]
    Unrolled,
}

impl Strategy {
    /// Every [Strategy], in declaration order.
    pub const ALL: [Strategy; 5] = [
        Strategy::Backtracking,
        Strategy::BranchAndBound,
        Strategy::DivideAndConquer,
        Strategy::Tabular,
        Strategy::Unrolled,
    ];

    /// Whether this strategy reports an edit script along with the cost.
    pub fn emits_script(self) -> bool {
        !matches!(self, Strategy::DivideAndConquer | Strategy::Tabular)
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|s| s.to_string() == name)
            .ok_or_else(|| Error::UnknownStrategy(name.into()))
    }
}

/// The outcome of [Solver::solve].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Report<L, W> {
    /// The [Strategy] that produced this report.
    pub strategy: Strategy,

    /// The edit distance, as computed by [strategy][Report::strategy].
    pub cost: W,

    /// Absent unless [Strategy::emits_script].
    pub script: Option<Box<[Operation<L, W>]>>,
}

/// Computes edit distances between ordered labeled trees.
///
/// A [Solver] only holds configuration, every call starts from scratch and shares no state with
/// any other call. Either tree may be empty, in which case the other is inserted or deleted whole.
#[derive(Debug, Clone)]
pub struct Solver<W = u64, E = Exact> {
    costs: CostModel<W>,
    equivalence: E,
}

impl<W: Weight> Solver<W> {
    /// A [Solver] that compares labels with [PartialEq].
    pub fn new(costs: CostModel<W>) -> Self {
        Solver {
            costs,
            equivalence: Exact,
        }
    }
}

/// Unit costs, exact labels.
impl<W: Weight + From<u8>> Default for Solver<W> {
    fn default() -> Self {
        Solver::new(CostModel::default())
    }
}

fn solved<W: Weight>(cost: W, stats: Stats) {
    let Stats {
        visited,
        pruned,
        improved,
    } = stats;

    debug!(?cost, visited, pruned, improved, "solved");
}

impl<W: Weight, E> Solver<W, E> {
    /// Replaces the predicate that decides whether two labels match.
    pub fn with_equivalence<F>(self, equivalence: F) -> Solver<W, F> {
        Solver {
            costs: self.costs,
            equivalence,
        }
    }

    /// The unit costs every strategy charges for edits.
    pub fn costs(&self) -> &CostModel<W> {
        &self.costs
    }

    /// Explores every way of relabeling, deleting and inserting nodes.
    ///
    /// Among scripts of equal cost, the first one found is kept, preferring to relabel a root
    /// over deleting it and deleting over inserting.
    pub fn backtracking<L>(
        &self,
        a: Option<&TreeNode<L>>,
        b: Option<&TreeNode<L>>,
    ) -> (Box<[Operation<L, W>]>, W)
    where
        L: Clone,
        E: Equivalence<L>,
    {
        let _span = debug_span!("backtracking", left = size(a), right = size(b)).entered();
        let (script, cost, stats) = backtrack(&self.costs, &self.equivalence, a, b);
        solved(cost, stats);
        (script, cost)
    }

    /// Like [backtracking][Solver::backtracking], but starting from the script that deletes
    /// and then inserts everything, and abandoning branches that cannot improve on the best
    /// script found so far.
    ///
    /// The cost is always the same as [backtracking][Solver::backtracking]'s.
    pub fn branch_and_bound<L>(
        &self,
        a: Option<&TreeNode<L>>,
        b: Option<&TreeNode<L>>,
    ) -> (Box<[Operation<L, W>]>, W)
    where
        L: Clone,
        E: Equivalence<L>,
    {
        let _span = debug_span!("branch-and-bound", left = size(a), right = size(b)).entered();
        let (script, cost, stats) = branch_and_bound(&self.costs, &self.equivalence, a, b);
        solved(cost, stats);
        (script, cost)
    }

    /// Like [branch_and_bound][Solver::branch_and_bound], but gives up on every script that
    /// costs more than `ceiling`, which bounds the work from the start.
    ///
    /// Returns [None] if no script costs at most `ceiling`, otherwise the same script as
    /// [backtracking][Solver::backtracking].
    pub fn branch_and_bound_within<L>(
        &self,
        a: Option<&TreeNode<L>>,
        b: Option<&TreeNode<L>>,
        ceiling: W,
    ) -> Option<(Box<[Operation<L, W>]>, W)>
    where
        L: Clone,
        E: Equivalence<L>,
    {
        let _span = debug_span!("branch-and-bound", left = size(a), right = size(b)).entered();
        let (found, stats) = branch_and_bound_within(&self.costs, &self.equivalence, a, b, ceiling);

        match &found {
            Some((_, cost)) => solved(*cost, stats),
            None => debug!(?ceiling, visited = stats.visited, pruned = stats.pruned, "exceeded"),
        }

        found
    }

    /// Computes the same cost as [backtracking][Solver::backtracking] by plain recursion,
    /// without keeping track of a script.
    ///
    /// Subtree distances are never cached, so this is exponential in the worst case.
    pub fn divide_and_conquer<L>(&self, a: Option<&TreeNode<L>>, b: Option<&TreeNode<L>>) -> W
    where
        E: Equivalence<L>,
    {
        let _span = debug_span!("divide-and-conquer", left = size(a), right = size(b)).entered();
        let cost = decompose(&self.costs, &self.equivalence, a, b);
        debug!(?cost, "solved");
        cost
    }

    /// Aligns the trees in postorder, only ever pairing leaves with leaves.
    ///
    /// This agrees with the other strategies when either tree is empty, but in general it is
    /// not a tree edit distance. Comparing a tree against itself costs one deletion and one
    /// insertion per internal node, for instance.
    pub fn tabular<L>(&self, a: Option<&TreeNode<L>>, b: Option<&TreeNode<L>>) -> W
    where
        E: Equivalence<L>,
    {
        let _span = debug_span!("tabular", left = size(a), right = size(b)).entered();
        let cost = tabulate(&self.costs, &self.equivalence, a, b);
        debug!(?cost, "solved");
        cost
    }

    /// Finds exactly the same script as [backtracking][Solver::backtracking], but keeps its
    /// progress on the heap, so that deep trees cannot overflow the stack.
    pub fn unrolled<L>(
        &self,
        a: Option<&TreeNode<L>>,
        b: Option<&TreeNode<L>>,
    ) -> (Box<[Operation<L, W>]>, W)
    where
        L: Clone,
        E: Equivalence<L>,
    {
        let _span = debug_span!("unrolled", left = size(a), right = size(b)).entered();
        let (script, cost) = unroll(&self.costs, &self.equivalence, a, b);
        debug!(?cost, "solved");
        (script, cost)
    }

    /// Compares `a` and `b` with the given [Strategy].
    pub fn solve<L>(
        &self,
        strategy: Strategy,
        a: Option<&TreeNode<L>>,
        b: Option<&TreeNode<L>>,
    ) -> Report<L, W>
    where
        L: Clone,
        E: Equivalence<L>,
    {
        let (cost, script) = match strategy {
            Strategy::Backtracking => swap(self.backtracking(a, b)),
            Strategy::BranchAndBound => swap(self.branch_and_bound(a, b)),
            Strategy::Unrolled => swap(self.unrolled(a, b)),
            Strategy::DivideAndConquer => (self.divide_and_conquer(a, b), None),
            Strategy::Tabular => (self.tabular(a, b), None),
        };

        Report {
            strategy,
            cost,
            script,
        }
    }
}

fn swap<S, W>((script, cost): (S, W)) -> (W, Option<S>) {
    (cost, Some(script))
}

/// Finds the lowest cost edit script between two trees with unit costs.
///
/// Returns the edits in the order they apply to the nodes of `a` and `b`, along with the total
/// cost.
pub fn diff<L: Clone + PartialEq>(
    a: &TreeNode<L>,
    b: &TreeNode<L>,
) -> (Box<[Operation<L, u64>]>, u64) {
    Solver::default().branch_and_bound(Some(a), Some(b))
}
