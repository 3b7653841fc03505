use super::handle::Handle;
use super::size::Size;
use crate::Ordinal;

/// A single AVL node.
///
/// The node caches the heights and sizes of its *children* rather than its
/// own, so a rotation can hand a child's cached figures straight to its new
/// parent without touching the grandchildren.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    // Stale by `pending` (and by any unresolved ancestor deltas).
    key: K,
    // Handle into the value arena.
    value: Handle,
    left: Option<Handle>,
    right: Option<Handle>,
    height_left: u8,
    height_right: u8,
    size_left: Size,
    size_right: Size,
    // Delta owed to `key` and to every node below this one.
    pending: K,
}

/// Cached shape of a subtree, as seen by its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Shape {
    pub(crate) height: u8,
    pub(crate) size: Size,
}

impl Shape {
    pub(crate) const EMPTY: Self = Self {
        height: 0,
        size: Size::ZERO,
    };
}

impl<K: Ordinal> Node<K> {
    /// Creates a detached leaf.
    pub(crate) fn new(key: K, value: Handle) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height_left: 0,
            height_right: 0,
            size_left: Size::ZERO,
            size_right: Size::ZERO,
            pending: K::ZERO,
        }
    }

    /// The stored key. Only the true key once the node has been resolved.
    #[inline]
    pub(crate) fn key(&self) -> K {
        self.key
    }

    /// The key after applying this node's own delta on top of `inherited`,
    /// the sum of the unresolved deltas of every ancestor.
    #[inline]
    pub(crate) fn key_under(&self, inherited: K) -> K {
        self.key.wrapping_add(self.shift_under(inherited))
    }

    /// The delta owed to this node's children, given the deltas owed to it.
    #[inline]
    pub(crate) fn shift_under(&self, inherited: K) -> K {
        inherited.wrapping_add(self.pending)
    }

    /// Folds the pending delta into the key and hands it back so the caller
    /// can forward it to the children.
    #[inline]
    pub(crate) fn fold_pending(&mut self) -> K {
        let pending = core::mem::replace(&mut self.pending, K::ZERO);
        self.key = self.key.wrapping_add(pending);
        pending
    }

    /// Queues `delta` for this node and its whole subtree.
    #[inline]
    pub(crate) fn defer(&mut self, delta: K) {
        self.pending = self.pending.wrapping_add(delta);
    }

    /// Adds `delta` to the key of a resolved node.
    #[inline]
    pub(crate) fn shift_key(&mut self, delta: K) {
        debug_assert!(self.pending == K::ZERO, "shifting the key of an unresolved node");
        self.key = self.key.wrapping_add(delta);
    }

    /// Swaps in a new key and value handle, returning the old pair.
    pub(crate) fn replace_entry(&mut self, key: K, value: Handle) -> (K, Handle) {
        debug_assert!(self.pending == K::ZERO, "replacing the entry of an unresolved node");
        let key = core::mem::replace(&mut self.key, key);
        let value = core::mem::replace(&mut self.value, value);
        (key, value)
    }

    #[inline]
    pub(crate) fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn children(&self) -> (Option<Handle>, Option<Handle>) {
        (self.left, self.right)
    }

    #[inline]
    pub(crate) fn size_left(&self) -> usize {
        self.size_left.to_usize()
    }

    /// `height_left - height_right`.
    #[inline]
    pub(crate) fn balance(&self) -> i16 {
        i16::from(self.height_left) - i16::from(self.height_right)
    }

    /// The shape of the subtree rooted at this node.
    #[inline]
    pub(crate) fn shape(&self) -> Shape {
        Shape {
            height: self.height_left.max(self.height_right) + 1,
            size: Size::joined(self.size_left, self.size_right),
        }
    }

    pub(crate) fn left_shape(&self) -> Shape {
        Shape {
            height: self.height_left,
            size: self.size_left,
        }
    }

    pub(crate) fn right_shape(&self) -> Shape {
        Shape {
            height: self.height_right,
            size: self.size_right,
        }
    }

    /// Links `child` as the left subtree, caching its `shape`.
    #[inline]
    pub(crate) fn set_left(&mut self, child: Option<Handle>, shape: Shape) {
        self.left = child;
        self.height_left = shape.height;
        self.size_left = shape.size;
    }

    /// Links `child` as the right subtree, caching its `shape`.
    #[inline]
    pub(crate) fn set_right(&mut self, child: Option<Handle>, shape: Shape) {
        self.right = child;
        self.height_right = shape.height;
        self.size_right = shape.size;
    }
}
