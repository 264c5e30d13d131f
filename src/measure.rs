use crate::TreeNode;
use std::mem;

/// A read-only view of a [TreeNode] that remembers the size of every subtree.
#[derive(Debug)]
pub(crate) struct Measured<'t, L> {
    tree: &'t TreeNode<L>,
    size: usize,
    children: Box<[Self]>,
}

impl<'t, L> Measured<'t, L> {
    #[inline]
    pub(crate) fn tree(&self) -> &'t TreeNode<L> {
        self.tree
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn children(&self) -> &[Self] {
        &self.children
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// Unlinks descendants one level at a time, so deep views don't exhaust the call stack.
impl<L> Drop for Measured<'_, L> {
    fn drop(&mut self) {
        let mut pending = mem::take(&mut self.children).into_vec();
        while let Some(mut m) = pending.pop() {
            pending.extend(mem::take(&mut m.children).into_vec());
        }
    }
}

/// Builds the [Measured] view of `t` bottom-up from its postorder sequence.
pub(crate) fn measure<L>(t: &TreeNode<L>) -> Measured<'_, L> {
    let mut done: Vec<Measured<'_, L>> = Vec::new();

    for tree in t.postorder() {
        let children: Box<[_]> = done.split_off(done.len() - tree.children().len()).into();
        let size = 1 + children.iter().map(Measured::size).sum::<usize>();
        done.push(Measured {
            tree,
            size,
            children,
        });
    }

    debug_assert_eq!(done.len(), 1);
    done.pop().expect("the postorder sequence ends at the root")
}
