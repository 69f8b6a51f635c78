//! A set over elements which can be mapped bijectively onto indices, supporting O(1) insertion,
//! removal, membership queries and access to the `i`-th element.
//!
//! # Theoretical
//! The sparse-set keeps the elements densely packed in a vector and, for every possible index,
//! the position of the corresponding element in that vector (or [`usize::MAX`] if it is not part
//! of the set). To remove an element, it is swapped with the last element of the dense vector
//! which is then popped.
//!
//! # Practical
//! Our implementation follows [\[1\]](https://hal.science/hal-01339250/document); a function
//! `mapping` should be provided which maps every element onto a unique index.
//!
//! # Bibliography
//! \[1\] V. le C. de Saint-Marcq, P. Schaus, C. Solnon, and C. Lecoutre, ‘Sparse-sets for domain
//! implementation’, in CP workshop on Techniques foR Implementing Constraint programming Systems
//! (TRICS), 2013, pp. 1–10.

use crate::bvprop_assert_moderate;
use crate::bvprop_assert_simple;

/// A set based on [\[1\]](https://hal.science/hal-01339250/document). See the module level
/// documentation for more information.
#[derive(Debug, Clone)]
pub(crate) struct SparseSet<T> {
    /// The elements which are currently in the set
    elements: Vec<T>,
    /// Stores for each index the position of the corresponding element in
    /// [`elements`][`SparseSet::elements`]
    positions: Vec<usize>,
    /// A bijective function which takes as input an element `T` and returns an index used for
    /// retrieving values from [`positions`][`SparseSet::positions`]
    mapping: fn(&T) -> usize,
}

impl<T> SparseSet<T> {
    pub(crate) fn new(mapping: fn(&T) -> usize) -> Self {
        SparseSet {
            elements: vec![],
            positions: vec![],
            mapping,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the `index`th element in the set; if `index` is larger than or equal to
    /// [`SparseSet::len`] then this method will panic.
    pub(crate) fn get(&self, index: usize) -> &T {
        bvprop_assert_simple!(index < self.elements.len());
        &self.elements[index]
    }

    pub(crate) fn contains(&self, element: &T) -> bool {
        let index = (self.mapping)(element);
        index < self.positions.len() && self.positions[index] != usize::MAX
    }

    /// Inserts the element if it is not already contained in the sparse set.
    pub(crate) fn insert(&mut self, element: T) {
        let index = (self.mapping)(&element);
        if self.positions.len() <= index {
            self.positions.resize(index + 1, usize::MAX);
        }
        if self.positions[index] == usize::MAX {
            self.positions[index] = self.elements.len();
            self.elements.push(element);
        }
    }

    /// Removes the element; if it is not in the set then this method does not perform any
    /// operations.
    pub(crate) fn remove(&mut self, element: &T) {
        if !self.contains(element) {
            return;
        }
        let index = (self.mapping)(element);
        let position = self.positions[index];
        let last = self.elements.len() - 1;
        self.elements.swap(position, last);
        self.positions[(self.mapping)(&self.elements[position])] = position;
        let _ = self.elements.pop();
        self.positions[index] = usize::MAX;

        bvprop_assert_moderate!(!self.contains(element));
    }

    pub(crate) fn clear(&mut self) {
        self.elements.clear();
        self.positions.iter_mut().for_each(|position| *position = usize::MAX);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::SparseSet;

    fn mapping_function(input: &u32) -> usize {
        *input as usize
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut sparse_set = SparseSet::new(mapping_function);
        sparse_set.insert(3);
        sparse_set.insert(3);
        sparse_set.insert(0);
        assert_eq!(sparse_set.len(), 2);
        assert!(sparse_set.contains(&3));
        assert!(!sparse_set.contains(&1));
        assert!(!sparse_set.contains(&10));
    }

    #[test]
    fn removal_keeps_other_elements_reachable() {
        let mut sparse_set = SparseSet::new(mapping_function);
        for element in [0, 1, 2] {
            sparse_set.insert(element);
        }
        sparse_set.remove(&0);
        assert_eq!(sparse_set.len(), 2);
        assert!(sparse_set.contains(&1));
        assert!(sparse_set.contains(&2));
        assert!(!sparse_set.contains(&0));

        let mut remaining = sparse_set.iter().copied().collect::<Vec<_>>();
        remaining.sort();
        assert_eq!(remaining, vec![1, 2]);
    }

    #[test]
    fn removing_all_elements_leads_to_empty_set() {
        let mut sparse_set = SparseSet::new(mapping_function);
        for element in [0, 1, 2] {
            sparse_set.insert(element);
        }
        sparse_set.remove(&1);
        sparse_set.remove(&2);
        sparse_set.remove(&0);
        sparse_set.remove(&0);
        assert!(sparse_set.is_empty());

        sparse_set.insert(2);
        assert_eq!(*sparse_set.get(0), 2);
    }
}
