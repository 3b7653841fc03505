use alloc::vec::Vec;
use core::cmp::Ordering;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Shape};
use crate::config::{Config, Duplicates};
use crate::{Ordinal, ShiftError};

/// Inline depth of the iterator stacks. An AVL tree holding `Handle::MAX`
/// nodes is never this tall, so iteration does not allocate.
const MAX_HEIGHT: usize = 64;

/// The AVL tree backing `OSAvlMap`.
///
/// Mutating operations are recursive: each frame resolves its node, recurses
/// into one child, stores the returned subtree root back into the child slot
/// and rebalances on the way out. Read-only queries walk down iteratively and
/// add up the pending deltas along the path instead of resolving them.
#[derive(Clone)]
pub(crate) struct RawOSAvlMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values, addressed by `Node::value`.
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// What `insert` does with a key that is already present.
    duplicates: Duplicates,
}

impl<K: Ordinal, V> RawOSAvlMap<K, V> {
    /// Creates a new, empty tree that keeps duplicate keys.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            duplicates: Duplicates::Keep,
        }
    }

    pub(crate) fn with_config(config: Config) -> Self {
        let capacity = config.initial_capacity();
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            duplicates: config.duplicate_policy(),
        }
    }

    /// Returns the number of entries in the tree.
    pub(crate) fn len(&self) -> usize {
        self.shape_of(self.root).size.to_usize()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) const fn duplicates(&self) -> Duplicates {
        self.duplicates
    }

    /// Clears all entries, keeping the allocated capacity.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
    }

    fn shape_of(&self, node: Option<Handle>) -> Shape {
        node.map_or(Shape::EMPTY, |handle| self.nodes.get(handle).shape())
    }

    // ─── Lazy shifts ────────────────────────────────────────────────────────

    /// Folds the node's pending delta into its key and forwards it to both
    /// children. Must run before the node is compared or restructured.
    fn resolve(&mut self, handle: Handle) {
        let node = self.nodes.get_mut(handle);
        let pending = node.fold_pending();
        if pending == K::ZERO {
            return;
        }

        let (left, right) = node.children();
        for child in [left, right].into_iter().flatten() {
            self.nodes.get_mut(child).defer(pending);
        }
    }

    fn link_left(&mut self, parent: Handle, child: Option<Handle>) {
        let shape = self.shape_of(child);
        self.nodes.get_mut(parent).set_left(child, shape);
    }

    fn link_right(&mut self, parent: Handle, child: Option<Handle>) {
        let shape = self.shape_of(child);
        self.nodes.get_mut(parent).set_right(child, shape);
    }

    // ─── Balancing ──────────────────────────────────────────────────────────

    /// Lifts the right child of `handle` above it and returns the new
    /// subtree root.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        self.resolve(handle);
        let pivot = self.nodes.get(handle).right().expect("`rotate_left()` - node has no right child!");
        self.resolve(pivot);

        let pivot_node = self.nodes.get(pivot);
        let (inner, inner_shape) = (pivot_node.left(), pivot_node.left_shape());

        let node = self.nodes.get_mut(handle);
        node.set_right(inner, inner_shape);
        let shape = node.shape();

        self.nodes.get_mut(pivot).set_left(Some(handle), shape);
        pivot
    }

    /// Lifts the left child of `handle` above it and returns the new
    /// subtree root.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        self.resolve(handle);
        let pivot = self.nodes.get(handle).left().expect("`rotate_right()` - node has no left child!");
        self.resolve(pivot);

        let pivot_node = self.nodes.get(pivot);
        let (inner, inner_shape) = (pivot_node.right(), pivot_node.right_shape());

        let node = self.nodes.get_mut(handle);
        node.set_left(inner, inner_shape);
        let shape = node.shape();

        self.nodes.get_mut(pivot).set_right(Some(handle), shape);
        pivot
    }

    /// Restores the AVL balance of `handle`, whose children are balanced and
    /// whose cached child shapes are current. Returns the new subtree root.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        let node = self.nodes.get(handle);
        let balance = node.balance();

        if balance > 1 {
            let left = node.left().expect("`rebalance()` - left-heavy node has no left child!");
            if self.nodes.get(left).balance() < 0 {
                log::trace!("rebalance: left-right rotation at {handle:?}");
                let left = self.rotate_left(left);
                self.link_left(handle, Some(left));
            } else {
                log::trace!("rebalance: right rotation at {handle:?}");
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            let right = node.right().expect("`rebalance()` - right-heavy node has no right child!");
            if self.nodes.get(right).balance() > 0 {
                log::trace!("rebalance: right-left rotation at {handle:?}");
                let right = self.rotate_right(right);
                self.link_right(handle, Some(right));
            } else {
                log::trace!("rebalance: left rotation at {handle:?}");
            }
            self.rotate_left(handle)
        } else {
            handle
        }
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Inserts an entry. Under `Duplicates::Replace` an equal key has its
    /// value swapped and the old value is returned; otherwise a new node is
    /// always added and the result is `None`.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.duplicates == Duplicates::Replace
            && let Some(handle) = self.search(key)
        {
            let slot = self.nodes.get(handle).value();
            return Some(core::mem::replace(self.values.get_mut(slot), value));
        }

        let value = self.values.alloc(value);
        let root = self.insert_at(self.root, key, value);
        self.root = Some(root);
        None
    }

    fn insert_at(&mut self, node: Option<Handle>, key: K, value: Handle) -> Handle {
        let Some(handle) = node else {
            return self.nodes.alloc(Node::new(key, value));
        };

        self.resolve(handle);
        let (node_key, left, right) = {
            let node = self.nodes.get(handle);
            (node.key(), node.left(), node.right())
        };

        // Ties go right, after the equal keys already stored.
        if key < node_key {
            let child = self.insert_at(left, key, value);
            self.link_left(handle, Some(child));
        } else {
            let child = self.insert_at(right, key, value);
            self.link_right(handle, Some(child));
        }

        self.rebalance(handle)
    }

    // ─── Removal ────────────────────────────────────────────────────────────

    /// Removes one entry with key `key`, returning it.
    pub(crate) fn remove(&mut self, key: K) -> Option<(K, V)> {
        let (root, removed) = self.remove_key_at(self.root, key);
        self.root = root;
        removed.map(|(key, value)| (key, self.values.take(value)))
    }

    /// Removes the entry at 1-indexed sorted `position`, returning it.
    pub(crate) fn remove_nth(&mut self, position: usize) -> Option<(K, V)> {
        if position == 0 || position > self.len() {
            return None;
        }

        let (root, removed) = self.remove_nth_at(self.root, position);
        self.root = root;
        removed.map(|(key, value)| (key, self.values.take(value)))
    }

    fn remove_key_at(&mut self, node: Option<Handle>, key: K) -> (Option<Handle>, Option<(K, Handle)>) {
        let Some(handle) = node else {
            return (None, None);
        };

        self.resolve(handle);
        let (node_key, left, right) = {
            let node = self.nodes.get(handle);
            (node.key(), node.left(), node.right())
        };

        let removed = match key.cmp(&node_key) {
            Ordering::Less => {
                let (child, removed) = self.remove_key_at(left, key);
                self.link_left(handle, child);
                removed
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_key_at(right, key);
                self.link_right(handle, child);
                removed
            }
            Ordering::Equal => {
                let (replacement, removed) = self.unlink(handle);
                return (replacement, Some(removed));
            }
        };

        (Some(self.rebalance(handle)), removed)
    }

    fn remove_nth_at(&mut self, node: Option<Handle>, position: usize) -> (Option<Handle>, Option<(K, Handle)>) {
        let Some(handle) = node else {
            return (None, None);
        };

        self.resolve(handle);
        let (size_left, left, right) = {
            let node = self.nodes.get(handle);
            (node.size_left(), node.left(), node.right())
        };

        let removed = match position.cmp(&(size_left + 1)) {
            Ordering::Less => {
                let (child, removed) = self.remove_nth_at(left, position);
                self.link_left(handle, child);
                removed
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_nth_at(right, position - size_left - 1);
                self.link_right(handle, child);
                removed
            }
            Ordering::Equal => {
                let (replacement, removed) = self.unlink(handle);
                return (replacement, Some(removed));
            }
        };

        (Some(self.rebalance(handle)), removed)
    }

    /// Takes the resolved node `handle` out of the tree. Returns the subtree
    /// that replaces it and the removed key and value handle.
    ///
    /// A node with two children keeps its slot: the in-order successor (the
    /// first entry of the right subtree) is removed by position and its entry
    /// moves into this node.
    fn unlink(&mut self, handle: Handle) -> (Option<Handle>, (K, Handle)) {
        match self.nodes.get(handle).children() {
            (Some(_), Some(right)) => {
                let (right, successor) = self.remove_nth_at(Some(right), 1);
                let (key, value) = successor.expect("`unlink()` - right subtree has no first entry!");
                self.link_right(handle, right);
                let removed = self.nodes.get_mut(handle).replace_entry(key, value);
                (Some(self.rebalance(handle)), removed)
            }
            (child, None) | (None, child) => {
                let node = self.nodes.take(handle);
                (child, (node.key(), node.value()))
            }
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Finds a node holding `key`.
    fn search(&self, key: K) -> Option<Handle> {
        let mut current = self.root;
        let mut inherited = K::ZERO;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(&node.key_under(inherited)) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
            inherited = node.shift_under(inherited);
        }

        None
    }

    pub(crate) fn contains_key(&self, key: K) -> bool {
        self.search(key).is_some()
    }

    pub(crate) fn get(&self, key: K) -> Option<&V> {
        let handle = self.search(key)?;
        Some(self.values.get(self.nodes.get(handle).value()))
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let handle = self.search(key)?;
        let slot = self.nodes.get(handle).value();
        Some(self.values.get_mut(slot))
    }

    /// Counts the entries whose key is strictly less than `key`.
    pub(crate) fn count_less(&self, key: K) -> usize {
        let mut current = self.root;
        let mut inherited = K::ZERO;
        let mut count = 0;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            // Equal keys may sit on either side once rotations have run, so
            // an exact match keeps descending left.
            current = if key > node.key_under(inherited) {
                count += node.size_left() + 1;
                node.right()
            } else {
                node.left()
            };
            inherited = node.shift_under(inherited);
        }

        count
    }

    /// Finds the node at 1-indexed sorted `position` and its true key.
    fn find_nth(&self, position: usize) -> Option<(K, Handle)> {
        let mut current = self.root;
        let mut inherited = K::ZERO;
        let mut remaining = position;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let size_left = node.size_left();
            current = match remaining.cmp(&(size_left + 1)) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some((node.key_under(inherited), node.value())),
                Ordering::Greater => {
                    remaining -= size_left + 1;
                    node.right()
                }
            };
            inherited = node.shift_under(inherited);
        }

        None
    }

    /// Returns the entry at 1-indexed sorted `position`.
    pub(crate) fn select(&self, position: usize) -> Option<(K, &V)> {
        if position == 0 {
            return None;
        }
        let (key, slot) = self.find_nth(position)?;
        Some((key, self.values.get(slot)))
    }

    pub(crate) fn select_mut(&mut self, position: usize) -> Option<(K, &mut V)> {
        if position == 0 {
            return None;
        }
        let (key, slot) = self.find_nth(position)?;
        Some((key, self.values.get_mut(slot)))
    }

    /// Returns the entry with the largest key not greater than `key`.
    pub(crate) fn predecessor_or_equal(&self, key: K) -> Option<(K, &V)> {
        let mut current = self.root;
        let mut inherited = K::ZERO;
        let mut candidate = None;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let node_key = node.key_under(inherited);
            current = match key.cmp(&node_key) {
                Ordering::Less => node.left(),
                Ordering::Equal => {
                    candidate = Some((node_key, node.value()));
                    break;
                }
                Ordering::Greater => {
                    candidate = Some((node_key, node.value()));
                    node.right()
                }
            };
            inherited = node.shift_under(inherited);
        }

        candidate.map(|(key, slot)| (key, self.values.get(slot)))
    }

    pub(crate) fn first_key_value(&self) -> Option<(K, &V)> {
        self.select(1)
    }

    pub(crate) fn last_key_value(&self) -> Option<(K, &V)> {
        self.select(self.len())
    }

    // ─── Bulk shift ─────────────────────────────────────────────────────────

    /// Adds `delta` to every key `>= from`.
    ///
    /// Each node on the boundary path is resolved; a node at or above the
    /// boundary takes the delta directly and queues it on its right subtree,
    /// which lies entirely above the boundary.
    pub(crate) fn shift_from(&mut self, from: K, delta: K) -> Result<(), ShiftError> {
        if delta < K::ZERO {
            log::debug!("rejecting shift of keys >= {from:?} by negative delta {delta:?}");
            return Err(ShiftError::NegativeDelta);
        }

        let Some((largest, _)) = self.last_key_value() else {
            return Ok(());
        };
        if delta == K::ZERO || largest < from {
            return Ok(());
        }
        if largest.checked_add(delta).is_none() {
            log::debug!("rejecting shift of keys >= {from:?} by {delta:?}: {largest:?} would overflow");
            return Err(ShiftError::Overflow);
        }

        log::trace!("shifting keys >= {from:?} by {delta:?}");
        let mut current = self.root;
        while let Some(handle) = current {
            self.resolve(handle);
            let node = self.nodes.get_mut(handle);

            // Equal keys can hide in the left subtree, so the boundary walk
            // continues left on a match as well.
            current = if from <= node.key() {
                node.shift_key(delta);
                let (left, right) = node.children();
                if let Some(right) = right {
                    self.nodes.get_mut(right).defer(delta);
                }
                left
            } else {
                node.right()
            };
        }

        Ok(())
    }

    pub(crate) fn iter(&self) -> RawIter<'_, K, V> {
        RawIter::new(self)
    }

    /// Moves every entry out in sorted order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let slots: Vec<(K, Handle)> = {
            let mut iter = self.iter();
            core::iter::from_fn(|| iter.next_slot()).collect()
        };
        let entries = slots.into_iter().map(|(key, slot)| (key, self.values.take(slot))).collect();
        self.clear();
        entries
    }
}

/// In-order walk over a `RawOSAvlMap`.
///
/// Both ends keep a stack of `(node, delta owed to its children)` so keys are
/// reported resolved without mutating the tree.
pub(crate) struct RawIter<'a, K, V> {
    tree: &'a RawOSAvlMap<K, V>,
    front: SmallVec<[(Handle, K); MAX_HEIGHT]>,
    back: SmallVec<[(Handle, K); MAX_HEIGHT]>,
    remaining: usize,
}

impl<'a, K: Ordinal, V> RawIter<'a, K, V> {
    fn new(tree: &'a RawOSAvlMap<K, V>) -> Self {
        let mut iter = Self {
            tree,
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root, K::ZERO);
        iter.push_right_spine(tree.root, K::ZERO);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<Handle>, mut inherited: K) {
        while let Some(handle) = current {
            let node = self.tree.nodes.get(handle);
            inherited = node.shift_under(inherited);
            self.front.push((handle, inherited));
            current = node.left();
        }
    }

    fn push_right_spine(&mut self, mut current: Option<Handle>, mut inherited: K) {
        while let Some(handle) = current {
            let node = self.tree.nodes.get(handle);
            inherited = node.shift_under(inherited);
            self.back.push((handle, inherited));
            current = node.right();
        }
    }

    /// Yields the next resolved key and its value handle from the front.
    fn next_slot(&mut self) -> Option<(K, Handle)> {
        if self.remaining == 0 {
            return None;
        }

        let (handle, shift) = self.front.pop()?;
        let node = self.tree.nodes.get(handle);
        self.push_left_spine(node.right(), shift);
        self.remaining -= 1;
        Some((node.key().wrapping_add(shift), node.value()))
    }

    fn next_back_slot(&mut self) -> Option<(K, Handle)> {
        if self.remaining == 0 {
            return None;
        }

        let (handle, shift) = self.back.pop()?;
        let node = self.tree.nodes.get(handle);
        self.push_right_spine(node.left(), shift);
        self.remaining -= 1;
        Some((node.key().wrapping_add(shift), node.value()))
    }
}

impl<K: Copy, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K: Ordinal, V> Iterator for RawIter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, slot) = self.next_slot()?;
        Some((key, self.tree.values.get(slot)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ordinal, V> DoubleEndedIterator for RawIter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (key, slot) = self.next_back_slot()?;
        Some((key, self.tree.values.get(slot)))
    }
}

impl<K: Ordinal, V> ExactSizeIterator for RawIter<'_, K, V> {}

impl<K: Ordinal, V> FusedIterator for RawIter<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use crate::raw::size::Size;
    use alloc::format;
    use alloc::string::String;
    use proptest::prelude::*;

    impl<K: Ordinal, V> RawOSAvlMap<K, V> {
        /// Checks key order, AVL balance, cached child heights and sizes,
        /// and arena accounting. Panics listing every violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut previous = None;
            let shape = self.validate_node(self.root, K::ZERO, &mut previous, &mut errors);

            let len = shape.size.to_usize();
            if self.len() != len {
                errors.push(format!("len() reports {}, tree holds {len}", self.len()));
            }
            if self.nodes.len() != len {
                errors.push(format!("node arena holds {} nodes, tree reaches {len}", self.nodes.len()));
            }
            if self.values.len() != len {
                errors.push(format!("value arena holds {} values, tree reaches {len}", self.values.len()));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        fn validate_node(
            &self,
            node: Option<Handle>,
            inherited: K,
            previous: &mut Option<K>,
            errors: &mut Vec<String>,
        ) -> Shape {
            let Some(handle) = node else {
                return Shape::EMPTY;
            };
            let node = self.nodes.get(handle);
            let shift = node.shift_under(inherited);

            let left = self.validate_node(node.left(), shift, previous, errors);

            let key = node.key_under(inherited);
            if let Some(previous) = *previous {
                let ordered = match self.duplicates {
                    Duplicates::Keep => previous <= key,
                    Duplicates::Replace => previous < key,
                };
                if !ordered {
                    errors.push(format!("key {key:?} at {handle:?} follows {previous:?}"));
                }
            }
            *previous = Some(key);

            let right = self.validate_node(node.right(), shift, previous, errors);

            if node.left_shape() != left {
                errors.push(format!("stale left shape at {handle:?}: cached {:?}, actual {left:?}", node.left_shape()));
            }
            if node.right_shape() != right {
                errors.push(format!(
                    "stale right shape at {handle:?}: cached {:?}, actual {right:?}",
                    node.right_shape()
                ));
            }
            if (i16::from(left.height) - i16::from(right.height)).abs() > 1 {
                errors.push(format!(
                    "unbalanced node at {handle:?}: left height {}, right height {}",
                    left.height, right.height
                ));
            }

            Shape {
                height: left.height.max(right.height) + 1,
                size: Size::joined(left.size, right.size),
            }
        }

        fn height(&self) -> u8 {
            self.shape_of(self.root).height
        }
    }

    fn keys(tree: &RawOSAvlMap<i32, u32>) -> Vec<i32> {
        tree.iter().map(|(key, _)| key).collect()
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveNth(usize),
        Shift(i32, i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (-300i32..300).prop_map(Op::Insert),
            3 => (-300i32..300).prop_map(Op::Remove),
            1 => any::<usize>().prop_map(Op::RemoveNth),
            2 => (-300i32..300, 0i32..40).prop_map(|(from, delta)| Op::Shift(from, delta)),
        ]
    }

    fn sorted_keys(model: &[(i32, u32)]) -> Vec<i32> {
        let mut keys: Vec<i32> = model.iter().map(|&(key, _)| key).collect();
        keys.sort_unstable();
        keys
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn operations_match_multiset_model(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
            let mut model: Vec<(i32, u32)> = Vec::new();

            for (id, op) in ops.into_iter().enumerate() {
                let id = id as u32;
                match op {
                    Op::Insert(key) => {
                        prop_assert!(tree.insert(key, id).is_none());
                        model.push((key, id));
                    }
                    Op::Remove(key) => {
                        let removed = tree.remove(key);
                        let present = model.iter().any(|&(k, _)| k == key);
                        prop_assert_eq!(removed.is_some(), present, "remove({}) returned {:?}", key, removed);
                        if let Some(entry) = removed {
                            let index = model.iter().position(|&e| e == entry);
                            prop_assert!(index.is_some(), "remove({}) returned unknown entry {:?}", key, entry);
                            model.swap_remove(index.unwrap());
                        }
                    }
                    Op::RemoveNth(which) => {
                        if model.is_empty() {
                            prop_assert!(tree.remove_nth(1).is_none());
                        } else {
                            let position = which % model.len() + 1;
                            let expected = sorted_keys(&model)[position - 1];
                            let (key, value) = tree.remove_nth(position).unwrap();
                            prop_assert_eq!(key, expected);
                            let index = model.iter().position(|&e| e == (key, value));
                            prop_assert!(index.is_some(), "remove_nth({}) returned unknown entry", position);
                            model.swap_remove(index.unwrap());
                        }
                    }
                    Op::Shift(from, delta) => {
                        prop_assert_eq!(tree.shift_from(from, delta), Ok(()));
                        for entry in &mut model {
                            if entry.0 >= from {
                                entry.0 += delta;
                            }
                        }
                    }
                }

                tree.validate_invariants();

                let mut actual: Vec<(i32, u32)> = tree.iter().map(|(key, value)| (key, *value)).collect();
                prop_assert!(actual.windows(2).all(|pair| pair[0].0 <= pair[1].0), "iteration out of order");
                actual.sort_unstable();
                let mut expected = model.clone();
                expected.sort_unstable();
                prop_assert_eq!(actual, expected);
            }
        }

        #[test]
        fn queries_match_sorted_keys(
            inserts in prop::collection::vec(-200i32..200, 1..200),
            shifts in prop::collection::vec((-200i32..200, 0i32..30), 0..20),
            probes in prop::collection::vec(-300i32..800, 1..50),
        ) {
            let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
            let mut model: Vec<i32> = Vec::new();
            for &key in &inserts {
                tree.insert(key, 0);
                model.push(key);
            }
            for &(from, delta) in &shifts {
                tree.shift_from(from, delta).unwrap();
                for key in &mut model {
                    if *key >= from {
                        *key += delta;
                    }
                }
            }
            model.sort_unstable();
            tree.validate_invariants();

            prop_assert_eq!(tree.len(), model.len());
            for &probe in &probes {
                let less = model.iter().filter(|&&key| key < probe).count();
                prop_assert_eq!(tree.count_less(probe), less, "count_less({})", probe);
                prop_assert_eq!(tree.contains_key(probe), model.contains(&probe), "contains_key({})", probe);

                let floor = model.iter().rev().find(|&&key| key <= probe).copied();
                prop_assert_eq!(tree.predecessor_or_equal(probe).map(|(key, _)| key), floor, "predecessor_or_equal({})", probe);
            }

            for (index, &key) in model.iter().enumerate() {
                let position = index + 1;
                let (selected, _) = tree.select(position).unwrap();
                prop_assert_eq!(selected, key);

                let multiplicity = model.iter().filter(|&&k| k == selected).count();
                let less = tree.count_less(selected);
                prop_assert!(less < position && position <= less + multiplicity);
            }
            prop_assert!(tree.select(0).is_none());
            prop_assert!(tree.select(model.len() + 1).is_none());
        }

        #[test]
        fn height_stays_logarithmic(count in 1usize..2000) {
            let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
            for key in 0..count as i32 {
                tree.insert(key, 0);
            }
            // 1.44 * log2(n + 2) bound for AVL trees.
            let bound = (1.45 * ((count + 2) as f64).log2()) as u8 + 1;
            prop_assert!(tree.height() <= bound, "height {} for {} keys", tree.height(), count);
        }
    }

    #[test]
    fn empty_tree_queries() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        tree.validate_invariants();

        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.count_less(0), 0);
        assert!(!tree.contains_key(0));
        assert!(tree.select(1).is_none());
        assert!(tree.predecessor_or_equal(i32::MAX).is_none());
        assert!(tree.remove(0).is_none());
        assert!(tree.remove_nth(1).is_none());
        assert_eq!(tree.shift_from(0, 5), Ok(()));
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for key in 0..1024 {
            tree.insert(key, key as u32);
            tree.validate_invariants();
        }
        assert_eq!(tree.height(), 11);

        for key in (0..1024).rev().step_by(2) {
            assert_eq!(tree.remove(key), Some((key, key as u32)));
            tree.validate_invariants();
        }
        assert_eq!(tree.len(), 512);
    }

    #[test]
    fn rotations_carry_pending_shifts() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for key in (0..64).map(|k| k * 10) {
            tree.insert(key, 0);
        }
        tree.shift_from(200, 1000).unwrap();

        // Force rotations through the partially shifted region.
        for key in 205..215 {
            tree.insert(key, 1);
            tree.validate_invariants();
        }
        for key in (0..64).map(|k| k * 10).filter(|&k| k % 20 == 0) {
            let shifted = if key >= 200 { key + 1000 } else { key };
            assert!(tree.remove(shifted).is_some(), "missing {shifted}");
            tree.validate_invariants();
        }

        let keys = keys(&tree);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(keys.contains(&1210));
        assert!(keys.contains(&205));
        assert!(!keys.contains(&1200));
        assert!(keys.contains(&190));
    }

    #[test]
    fn two_child_removal_takes_successor() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for (id, key) in [50, 30, 70, 20, 40, 60, 80].into_iter().enumerate() {
            tree.insert(key, id as u32);
        }

        assert_eq!(tree.remove(50), Some((50, 0)));
        tree.validate_invariants();
        assert_eq!(keys(&tree), [20, 30, 40, 60, 70, 80]);
        assert_eq!(tree.get(60), Some(&5));
        assert_eq!(tree.select(4), Some((60, &5)));
    }

    #[test]
    fn duplicates_keep_every_value() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for id in 0..20 {
            tree.insert(7, id);
            tree.insert(3, 100 + id);
        }
        tree.validate_invariants();

        assert_eq!(tree.len(), 40);
        assert_eq!(tree.count_less(7), 20);
        assert_eq!(tree.count_less(8), 40);

        tree.shift_from(7, 1).unwrap();
        assert_eq!(tree.count_less(8), 20);
        assert!(!tree.contains_key(7));

        let mut values: Vec<u32> = Vec::new();
        while let Some((key, value)) = tree.remove(8) {
            assert_eq!(key, 8);
            values.push(value);
            tree.validate_invariants();
        }
        values.sort_unstable();
        assert_eq!(values, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn replace_mode_updates_in_place() {
        let mut tree: RawOSAvlMap<i32, u32> =
            RawOSAvlMap::with_config(Config::new().duplicates(Duplicates::Replace));
        assert_eq!(tree.insert(1, 10), None);
        assert_eq!(tree.insert(1, 11), Some(10));
        assert_eq!(tree.insert(2, 20), None);
        tree.validate_invariants();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(1), Some(&11));
        assert_eq!(tree.duplicates(), Duplicates::Replace);
    }

    #[test]
    fn rejected_shifts_leave_tree_untouched() {
        let mut tree: RawOSAvlMap<i8, u32> = RawOSAvlMap::new();
        for key in [-100, -50, 0, 50, 100] {
            tree.insert(key, 0);
        }

        assert_eq!(tree.shift_from(0, -1), Err(ShiftError::NegativeDelta));
        assert_eq!(tree.shift_from(0, 28), Err(ShiftError::Overflow));
        let keys: Vec<i8> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, [-100, -50, 0, 50, 100]);

        // Nothing at or above the boundary, nothing can overflow.
        assert_eq!(tree.shift_from(101, 127), Ok(()));
        assert_eq!(tree.shift_from(100, 27), Ok(()));
        assert_eq!(tree.last_key_value().map(|(key, _)| key), Some(127));
    }

    #[test]
    fn wrapped_pending_deltas_resolve() {
        let mut tree: RawOSAvlMap<i8, u32> = RawOSAvlMap::new();
        for key in [-120, -110, -100, -90] {
            tree.insert(key, 0);
        }
        // Deltas queued on the right spine can sum past `i8::MAX`.
        for _ in 0..4 {
            tree.shift_from(-105, 50).unwrap();
        }
        tree.validate_invariants();
        let keys: Vec<i8> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, [-120, -110, 100, 110]);
        assert_eq!(tree.count_less(100), 2);
    }

    #[test]
    fn iterates_from_both_ends() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for key in 1..=9 {
            tree.insert(key * 10, key as u32);
        }
        tree.shift_from(50, 5).unwrap();

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 9);
        assert_eq!(iter.next(), Some((10, &1)));
        assert_eq!(iter.next_back(), Some((95, &9)));
        assert_eq!(iter.next_back(), Some((85, &8)));
        let middle: Vec<i32> = iter.clone().map(|(key, _)| key).collect();
        assert_eq!(middle, [20, 30, 40, 55, 65, 75]);
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.by_ref().count(), 6);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iterator_stacks_stay_inline_for_deep_trees() {
        let mut tree: RawOSAvlMap<u32, ()> = RawOSAvlMap::new();
        for key in 0..8192 {
            tree.insert(key, ());
        }
        tree.shift_from(4096, 1).unwrap();

        let mut iter = tree.iter();
        assert!(!iter.front.spilled() && !iter.back.spilled());
        let mut expected = 0;
        while let Some((key, ())) = iter.next() {
            assert!(!iter.front.spilled());
            assert_eq!(key, if expected < 4096 { expected } else { expected + 1 });
            expected += 1;
        }
        assert_eq!(expected, 8192);

        let last: Vec<u32> = tree.iter().rev().take(2).map(|(key, _)| key).collect();
        assert_eq!(last, [8192, 8191]);
    }

    #[test]
    fn drain_moves_entries_in_order() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for key in [5, 1, 4, 2, 3] {
            tree.insert(key, key as u32 * 10);
        }
        tree.shift_from(3, 100).unwrap();

        assert_eq!(tree.drain_to_vec(), [(1, 10), (2, 20), (103, 30), (104, 40), (105, 50)]);
        tree.validate_invariants();
        assert!(tree.is_empty());
    }

    #[test]
    fn clear_releases_entries() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::with_config(Config::new().capacity(32));
        assert!(tree.capacity() >= 32);
        for key in 0..32 {
            tree.insert(key, 0);
        }
        tree.clear();
        tree.validate_invariants();
        assert!(tree.is_empty());

        tree.insert(3, 3);
        assert_eq!(keys(&tree), [3]);
    }

    #[test]
    fn select_mut_and_get_mut_edit_values() {
        let mut tree: RawOSAvlMap<i32, u32> = RawOSAvlMap::new();
        for key in 0..10 {
            tree.insert(key, 0);
        }
        tree.shift_from(5, 10).unwrap();

        let (key, value) = tree.select_mut(7).unwrap();
        assert_eq!(key, 16);
        *value = 7;
        *tree.get_mut(0).unwrap() = 1;

        assert_eq!(tree.get(16), Some(&7));
        assert_eq!(tree.first_key_value(), Some((0, &1)));
        assert!(tree.select_mut(0).is_none());
        assert!(tree.get_mut(5).is_none());
    }
}
