use crate::{Alignment, Cost, CostModel, Equivalence, Measured, Operation, Script, Weight};
use arrayvec::ArrayVec;
use derive_more::Add;
use std::marker::PhantomData;
use tracing::trace;

/// How much of the search space a solve went through.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Add)]
pub(crate) struct Stats {
    /// Node pairs visited, including the ones visited by nested searches over children.
    pub(crate) visited: u64,

    /// Branches discarded because they could not beat the incumbent.
    pub(crate) pruned: u64,

    /// Times the incumbent was replaced.
    pub(crate) improved: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Branch {
    Relabel,
    Erase,
    Graft,
}

fn branches<L>(a: &Measured<L>, b: &Measured<L>) -> ArrayVec<Branch, 3> {
    let mut branches = ArrayVec::new();
    branches.push(Branch::Relabel);

    if !(a.is_leaf() && b.is_leaf()) {
        branches.push(Branch::Erase);
        branches.push(Branch::Graft);
    }

    branches
}

/// Decides which partial solutions a [Search] may discard.
pub(crate) trait Pruning {
    /// Whether the incumbent starts out as the script that deletes every node and then inserts
    /// every node.
    const SEEDED: bool;

    /// A lower bound on the cost of transforming `a` into `b`, or [None] to never prune.
    fn floor<L, W: Weight>(
        costs: &CostModel<W>,
        a: Option<&Measured<L>>,
        b: Option<&Measured<L>>,
    ) -> Option<W>;
}

/// A depth-first search over the edit scripts that transform one tree into another.
///
/// The state is owned by a single call, every nested search over a pair of children gets its own.
#[derive(Debug)]
pub(crate) struct Search<'s, L, W, E, P> {
    costs: &'s CostModel<W>,
    equivalence: &'s E,
    trail: Vec<Operation<L, W>>,
    best: Option<(W, Vec<Operation<L, W>>)>,
    seeded: bool,
    ceiling: Option<W>,
    stats: Stats,
    pruning: PhantomData<P>,
}

impl<'s, L, W, E, P> Search<'s, L, W, E, P>
where
    L: Clone,
    W: Weight,
    E: Equivalence<L>,
    P: Pruning,
{
    pub(crate) fn new(costs: &'s CostModel<W>, equivalence: &'s E) -> Self {
        Search {
            costs,
            equivalence,
            trail: Vec::new(),
            best: None,
            seeded: false,
            ceiling: None,
            stats: Stats::default(),
            pruning: PhantomData,
        }
    }

    /// Discards every script that costs more than `ceiling`.
    pub(crate) fn within(mut self, ceiling: W) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Returns the cheapest script that transforms `a` into `b`, along with its cost.
    pub(crate) fn run(
        self,
        a: Option<&Measured<L>>,
        b: Option<&Measured<L>>,
    ) -> (Script<L, W>, W, Stats) {
        let (best, stats) = self.attempt(a, b);
        let (script, cost) = best.expect("an unbounded search completes at least one script");
        (script, cost, stats)
    }

    /// Like [run][Search::run], but finds nothing if every script exceeds the ceiling.
    pub(crate) fn attempt(
        mut self,
        a: Option<&Measured<L>>,
        b: Option<&Measured<L>>,
    ) -> (Option<(Script<L, W>, W)>, Stats) {
        if let (true, Some(x), Some(y)) = (P::SEEDED, a, b) {
            let trivial = self.costs.erasure(x.size()) + self.costs.grafting(y.size());
            let fits = self.ceiling.map_or(true, |c| trivial <= c);

            if fits && !(x.is_leaf() && y.is_leaf()) {
                let mut script = self.costs.erase(x.tree());
                script.extend(self.costs.graft(y.tree()));
                self.best = Some((trivial, script));
                self.seeded = true;
            }
        }

        self.visit(a, b, W::default());

        let best = self.best.map(|(cost, script)| (script.into(), cost));
        (best, self.stats)
    }

    fn visit(&mut self, a: Option<&Measured<L>>, b: Option<&Measured<L>>, cost: W) {
        if self.enter(a, b, cost) {
            self.expand(a, b, cost);
        }
    }

    fn enter(&mut self, a: Option<&Measured<L>>, b: Option<&Measured<L>>, cost: W) -> bool {
        self.stats.visited += 1;
        !self.cut(a, b, cost)
    }

    fn expand(&mut self, a: Option<&Measured<L>>, b: Option<&Measured<L>>, cost: W) {
        let costs = self.costs;
        match (a, b) {
            (None, None) => self.offer(cost, Vec::new()),
            (Some(x), None) => self.offer(cost + costs.erasure(x.size()), costs.erase(x.tree())),
            (None, Some(y)) => self.offer(cost + costs.grafting(y.size()), costs.graft(y.tree())),
            (Some(x), Some(y)) => {
                for branch in branches(x, y) {
                    self.explore(branch, x, y, cost);
                }
            }
        }
    }

    fn explore(&mut self, branch: Branch, a: &Measured<L>, b: &Measured<L>, cost: W) {
        let costs = self.costs;
        match branch {
            Branch::Relabel => self.relabel(a, b, cost),
            Branch::Erase => {
                let cost = cost + costs.erasure(a.size());
                self.descend(|| costs.erase(a.tree()), None, Some(b), cost);
            }
            Branch::Graft => {
                let cost = cost + costs.grafting(b.size());
                self.descend(|| costs.graft(b.tree()), Some(a), None, cost);
            }
        }
    }

    // The operations are only built once the branch survives the cut.
    fn descend(
        &mut self,
        ops: impl FnOnce() -> Vec<Operation<L, W>>,
        a: Option<&Measured<L>>,
        b: Option<&Measured<L>>,
        cost: W,
    ) {
        if !self.enter(a, b, cost) {
            return;
        }

        let depth = self.trail.len();
        self.trail.extend(ops());
        self.expand(a, b, cost);
        self.trail.truncate(depth);
    }

    fn relabel(&mut self, a: &Measured<L>, b: &Measured<L>, cost: W) {
        let costs = self.costs;
        let root = costs.relabel(self.equivalence, a.tree(), b.tree());
        let cost = cost + root.cost();

        if self.cut(Some(a), Some(b), cost) {
            return;
        }

        let mut alignment = Alignment::new(
            a.children().iter().map(|c| costs.erasure(c.size())).collect(),
            b.children().iter().map(|c| costs.grafting(c.size())).collect(),
        );

        while let Some((i, j)) = alignment.advance() {
            let (x, y) = (&a.children()[i], &b.children()[j]);
            let (script, distance, stats) =
                Search::<L, W, E, P>::new(costs, self.equivalence).run(Some(x), Some(y));

            self.stats = self.stats + stats;
            alignment.resolve(distance, script);
        }

        let (distance, steps) = alignment.finish();
        let mut tail = vec![root];
        costs.splice(a.tree(), b.tree(), steps, &mut tail);
        self.offer(cost + distance, tail);
    }

    fn cut(&mut self, a: Option<&Measured<L>>, b: Option<&Measured<L>>, cost: W) -> bool {
        let floor = P::floor(self.costs, a, b);
        let cut = floor.is_some_and(|f| self.exceeds(cost + f));

        if cut {
            self.stats.pruned += 1;
        }

        cut
    }

    // A seeded incumbent gives way to the first script that ties with it.
    fn exceeds(&self, cost: W) -> bool {
        match &self.best {
            None => self.ceiling.is_some_and(|c| cost > c),
            Some((best, _)) if self.seeded => cost > *best,
            Some((best, _)) => cost >= *best,
        }
    }

    fn offer(&mut self, cost: W, tail: Vec<Operation<L, W>>) {
        if self.exceeds(cost) {
            return;
        }

        trace!(?cost, "improved");

        let mut script = self.trail.clone();
        script.extend(tail);
        self.best = Some((cost, script));
        self.seeded = false;
        self.stats.improved += 1;
    }
}
