use derive_more::From;
use std::fmt::{self, Display, Formatter};
use std::iter;

/// An ordered labeled tree.
///
/// Children are kept in their left-to-right order, which is significant to every strategy.
/// A [TreeNode] is never mutated once built, so the same pair of trees may be handed to any
/// number of solves.
#[derive(Debug, Clone, Eq, PartialEq, Hash, From)]
pub struct TreeNode<L> {
    label: L,
    children: Vec<Self>,
}

impl<L> TreeNode<L> {
    /// Builds a [TreeNode] with the given children.
    pub fn new<I: IntoIterator<Item = Self>>(label: L, children: I) -> Self {
        TreeNode {
            label,
            children: children.into_iter().collect(),
        }
    }

    /// Builds a [TreeNode] without children.
    pub fn leaf(label: L) -> Self {
        Self::new(label, [])
    }

    /// Appends `child` as the new rightmost child.
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// This node's label.
    pub fn label(&self) -> &L {
        &self.label
    }

    /// This node's children, left to right.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The number of nodes in this tree, i.e. one plus the sizes of its children.
    pub fn size(&self) -> usize {
        self.preorder().count()
    }

    /// Visits the nodes root first, then each child subtree from left to right.
    pub fn preorder(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Lists the nodes children first, root last.
    pub fn postorder(&self) -> Vec<&Self> {
        let mut order = Vec::new();
        let mut stack = vec![(self, false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
            } else {
                stack.push((node, true));
                stack.extend(node.children.iter().rev().map(|c| (c, false)));
            }
        }

        order
    }
}

/// Renders the tree as an outline, one label per line, indented by depth.
impl<L: Display> Display for TreeNode<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            writeln!(f, "{:indent$}{}", "", node.label, indent = 2 * depth)?;
            stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        }

        Ok(())
    }
}

/// The number of nodes in a possibly empty tree.
pub fn size<L>(tree: Option<&TreeNode<L>>) -> usize {
    tree.map_or(0, TreeNode::size)
}

/// Decides whether two labels pair up as a match rather than as a replacement.
///
/// Any `Fn(&L, &L) -> bool` is an [Equivalence].
pub trait Equivalence<L: ?Sized> {
    /// Returns `true` if `a` and `b` are interchangeable.
    fn equivalent(&self, a: &L, b: &L) -> bool;
}

/// The default [Equivalence], which compares labels with [PartialEq].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Exact;

impl<L: PartialEq + ?Sized> Equivalence<L> for Exact {
    #[inline]
    fn equivalent(&self, a: &L, b: &L) -> bool {
        a == b
    }
}

impl<L: ?Sized, F: Fn(&L, &L) -> bool> Equivalence<L> for F {
    #[inline]
    fn equivalent(&self, a: &L, b: &L) -> bool {
        self(a, b)
    }
}


#[cfg(test)]
pub(crate) use tests::Tag;
