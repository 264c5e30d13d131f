//! # Overview
//!
//! This crate finds the cheapest way to transform one ordered labeled tree into another, using
//! only three kinds of edits on single nodes: inserting, deleting and replacing a label by a
//! different one. The cost of each kind of edit is configurable, and so is the predicate that
//! decides whether two labels are equivalent, in which case the nodes simply match.
//!
//! Since the order of siblings is significant, comparing two nodes involves finding the best
//! order-preserving alignment of their children, a generalized version of the
//! [Levenshtein distance][levenshtein] in which the cost of pairing two children is, in turn,
//! the edit distance between them.
//!
//! Several interchangeable [Strategy]s are provided, which trade time for the ability to produce
//! an edit script or for the guarantee of not recursing deeply.
//!
//! [levenshtein]:  https://en.wikipedia.org/wiki/Levenshtein_distance
//!
//! # Example
//!
//! ```rust
//! use tree_edit_solver::*;
//! use serde_json::{json, Value};
//!
//! fn tree(value: &Value) -> TreeNode<String> {
//!     match value {
//!         Value::Object(m) => TreeNode::new(
//!             "{}".into(),
//!             m.iter().map(|(k, v)| TreeNode::new(k.clone(), [tree(v)])),
//!         ),
//!         Value::Array(a) => TreeNode::new("[]".into(), a.iter().map(tree)),
//!         v => TreeNode::leaf(v.to_string()),
//!     }
//! }
//!
//! let john = tree(&json!({
//!     "name": "John",
//!     "age": 43,
//!     "phones": [
//!         "+44 1234567",
//!         "+44 2345678"
//!     ]
//! }));
//!
//! let jane = tree(&json!({
//!     "name": "Jane",
//!     "age": 43,
//!     "phones": [
//!         "+44 1234567"
//!     ]
//! }));
//!
//! let (script, cost) = diff(&john, &jane);
//!
//! assert_eq!(cost, 2);
//!
//! let edits: Vec<_> = script
//!     .iter()
//!     .filter(|op| op.kind() != OperationKind::Match)
//!     .map(ToString::to_string)
//!     .collect();
//!
//! assert_eq!(edits, [
//!     r#"REPLACE '"John"' -> '"Jane"' (cost: 1)"#,
//!     r#"DELETE '"+44 2345678"' (cost: 1)"#,
//! ]);
//!
//! // Replacing a label costs as much as deleting and reinserting it.
//! let solver = Solver::new(CostModel::new(1, 1, 2)?);
//!
//! for strategy in [Strategy::Backtracking, Strategy::DivideAndConquer, Strategy::Unrolled] {
//!     assert_eq!(solver.solve(strategy, Some(&john), Some(&jane)).cost, 3);
//! }
//! # Ok::<_, Error>(())
//! ```

mod diff;
mod edit;
mod error;
mod tree;

pub use diff::*;
pub use edit::*;
pub use error::*;
pub use tree::*;

mod align;
mod backtrack;
mod bound;
mod cost;
mod decompose;
mod measure;
mod search;
mod tabular;
mod unrolled;

pub use cost::{Cost, CostModel, Weight};

pub(crate) use align::*;
pub(crate) use backtrack::*;
pub(crate) use bound::*;
pub(crate) use cost::scale;
pub(crate) use decompose::*;
pub(crate) use measure::*;
pub(crate) use search::*;
pub(crate) use tabular::*;
pub(crate) use unrolled::*;
