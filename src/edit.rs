use crate::{Cost, CostModel, Equivalence, Step, TreeNode, Weight};
use derive_more::Display;
use std::fmt::{self, Formatter};

/// The kind of an [Operation].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub enum OperationKind {
    #[display(fmt = "insert")]
    Insert,
    #[display(fmt = "delete")]
    Delete,
    #[display(fmt = "replace")]
    Replace,
    #[display(fmt = "match")]
    Match,
}

/// A single edit that applies to one node of the left-hand side tree, one node of the right-hand
/// side tree, or one of each.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Operation<L, W> {
    /// Insert a node labeled `to`.
    Insert { to: L, cost: W },

    /// Delete the node labeled `from`.
    Delete { from: L, cost: W },

    /// Relabel the node labeled `from` as `to`.
    Replace { from: L, to: L, cost: W },

    /// Keep the node labeled `from` as its equivalent `to`, free of charge.
    Match { from: L, to: L },
}

/// An ordered sequence of [Operation]s.
pub(crate) type Script<L, W> = Box<[Operation<L, W>]>;

impl<L, W> Operation<L, W> {
    /// What kind of edit this is, without its labels or cost.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Insert { .. } => OperationKind::Insert,
            Operation::Delete { .. } => OperationKind::Delete,
            Operation::Replace { .. } => OperationKind::Replace,
            Operation::Match { .. } => OperationKind::Match,
        }
    }

    /// The label on the left-hand side, absent for [Operation::Insert].
    pub fn from_label(&self) -> Option<&L> {
        match self {
            Operation::Insert { .. } => None,
            Operation::Delete { from, .. }
            | Operation::Replace { from, .. }
            | Operation::Match { from, .. } => Some(from),
        }
    }

    /// The label on the right-hand side, absent for [Operation::Delete].
    pub fn to_label(&self) -> Option<&L> {
        match self {
            Operation::Delete { .. } => None,
            Operation::Insert { to, .. }
            | Operation::Replace { to, .. }
            | Operation::Match { to, .. } => Some(to),
        }
    }
}

impl<L, W: Weight> Cost for Operation<L, W> {
    type Output = W;

    #[inline]
    fn cost(&self) -> Self::Output {
        match self {
            Operation::Insert { cost, .. }
            | Operation::Delete { cost, .. }
            | Operation::Replace { cost, .. } => *cost,
            Operation::Match { .. } => W::default(),
        }
    }
}

impl<L, W: Weight> Cost for [Operation<L, W>] {
    type Output = W;

    #[inline]
    fn cost(&self) -> Self::Output {
        self.iter().fold(W::default(), |w, op| w + op.cost())
    }
}

impl<L: fmt::Display, W: fmt::Display + Weight> fmt::Display for Operation<L, W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert { to, cost } => write!(f, "INSERT '{to}' (cost: {cost})"),
            Operation::Delete { from, cost } => write!(f, "DELETE '{from}' (cost: {cost})"),
            Operation::Replace { from, to, cost } => {
                write!(f, "REPLACE '{from}' -> '{to}' (cost: {cost})")
            }
            Operation::Match { from, to } => {
                write!(f, "MATCH '{from}' = '{to}' (cost: {})", W::default())
            }
        }
    }
}

impl<W: Weight> CostModel<W> {
    /// The cost of pairing the root of `a` with the root of `b`.
    pub(crate) fn relabeling<L, E: Equivalence<L>>(
        &self,
        equivalence: &E,
        a: &TreeNode<L>,
        b: &TreeNode<L>,
    ) -> W {
        if equivalence.equivalent(a.label(), b.label()) {
            W::default()
        } else {
            self.replace()
        }
    }

    pub(crate) fn relabel<L: Clone, E: Equivalence<L>>(
        &self,
        equivalence: &E,
        a: &TreeNode<L>,
        b: &TreeNode<L>,
    ) -> Operation<L, W> {
        let (from, to) = (a.label().clone(), b.label().clone());
        if equivalence.equivalent(a.label(), b.label()) {
            Operation::Match { from, to }
        } else {
            let cost = self.replace();
            Operation::Replace { from, to, cost }
        }
    }

    /// One deletion per node of `t`, in preorder.
    pub(crate) fn erase<L: Clone>(&self, t: &TreeNode<L>) -> Vec<Operation<L, W>> {
        let cost = self.delete();
        let ops = t.preorder().map(|n| Operation::Delete {
            from: n.label().clone(),
            cost,
        });

        ops.collect()
    }

    /// One insertion per node of `t`, in preorder.
    pub(crate) fn graft<L: Clone>(&self, t: &TreeNode<L>) -> Vec<Operation<L, W>> {
        let cost = self.insert();
        let ops = t.preorder().map(|n| Operation::Insert {
            to: n.label().clone(),
            cost,
        });

        ops.collect()
    }

    /// Appends the operations of an alignment between the children of `a` and `b` to `script`.
    pub(crate) fn splice<L: Clone>(
        &self,
        a: &TreeNode<L>,
        b: &TreeNode<L>,
        steps: Vec<Step<Script<L, W>>>,
        script: &mut Vec<Operation<L, W>>,
    ) {
        for step in steps {
            match step {
                Step::Pair(_, _, inner) => script.extend(inner.into_vec()),
                Step::Delete(i) => script.extend(self.erase(&a.children()[i])),
                Step::Insert(j) => script.extend(self.graft(&b.children()[j])),
            }
        }
    }
}
