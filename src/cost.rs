use crate::{Error, OperationKind};
use std::fmt::Debug;
use std::ops::Add;

/// The total cost of an [Operation][crate::Operation] or of an edit script.
pub trait Cost {
    /// The type the cost is measured in.
    type Output;

    /// Returns the cost.
    fn cost(&self) -> Self::Output;
}

/// A type whose values measure the cost of edits.
///
/// The default value of this type is assumed to be the additive identity (i.e. _zero_).
pub trait Weight: Default + Copy + Ord + Add<Output = Self> + Debug {}

impl<W: Default + Copy + Ord + Add<Output = W> + Debug> Weight for W {}

/// Adds `w` to itself `n` times.
///
/// Takes a number of additions logarithmic in `n`, by doubling `w` once per bit of `n`.
pub(crate) fn scale<W: Weight>(mut w: W, mut n: usize) -> W {
    let mut total = W::default();

    while n > 0 {
        if n & 1 == 1 {
            total = total + w;
        }

        n >>= 1;

        // The last doubling would be wasted, and might overflow.
        if n > 0 {
            w = w + w;
        }
    }

    total
}

/// The unit costs of inserting, deleting and replacing a single node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CostModel<W = u64> {
    insert: W,
    delete: W,
    replace: W,
}

impl<W: Weight> CostModel<W> {
    /// Validates and builds a [CostModel].
    ///
    /// Fails with [Error::NegativeCost] if any unit cost is below zero.
    pub fn new(insert: W, delete: W, replace: W) -> Result<Self, Error> {
        let check = |w: W, kind| {
            if w < W::default() {
                Err(Error::NegativeCost { kind })
            } else {
                Ok(w)
            }
        };

        Ok(CostModel {
            insert: check(insert, OperationKind::Insert)?,
            delete: check(delete, OperationKind::Delete)?,
            replace: check(replace, OperationKind::Replace)?,
        })
    }

    /// The cost of inserting one node.
    pub fn insert(&self) -> W {
        self.insert
    }

    /// The cost of deleting one node.
    pub fn delete(&self) -> W {
        self.delete
    }

    /// The cost of replacing the label of one node by a non-equivalent one.
    pub fn replace(&self) -> W {
        self.replace
    }

    /// The cost of deleting `size` nodes.
    pub(crate) fn erasure(&self, size: usize) -> W {
        scale(self.delete, size)
    }

    /// The cost of inserting `size` nodes.
    pub(crate) fn grafting(&self, size: usize) -> W {
        scale(self.insert, size)
    }
}

/// Every operation costs one unit.
impl<W: Weight + From<u8>> Default for CostModel<W> {
    fn default() -> Self {
        let one = W::from(1);
        CostModel {
            insert: one,
            delete: one,
            replace: one,
        }
    }
}
