use crate::OperationKind;
use thiserror::Error;

/// Errors raised while configuring a solve.
///
/// Solving itself never fails: once a [CostModel][crate::CostModel] is built, every strategy is
/// total over finite trees.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// A unit cost is below zero.
    #[error("invalid cost model: the {kind} cost must not be negative")]
    NegativeCost {
        /// The operation whose cost was rejected.
        kind: OperationKind,
    },

    /// A [Strategy][crate::Strategy] name that is not recognised.
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),
}
