//! Double-ended priority queue.
//!
//! A min-max heap stores one binary tree in a `Vec` whose levels alternate
//! between "min" levels (even depth, starting at the root) and "max" levels.
//! Every element on a min level is `<=` all of its descendants and every
//! element on a max level is `>=` all of its descendants, so the minimum is
//! the root and the maximum is one of the root's two children.
//!
//! Beam search uses it twice: once as the frontier (pop nearest) and once as
//! the bounded result set (peek and evict farthest).

use std::fmt;

/// Comparator used by [`MinMaxHeap::new_ordered`].
pub type LessFn<T> = fn(&T, &T) -> bool;

fn natural_less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

/// A binary min-max heap ordered by a strict less-than comparator.
///
/// `less` must be irreflexive and transitive. Equal elements may leave in any
/// order.
pub struct MinMaxHeap<T, C = LessFn<T>> {
    data: Vec<T>,
    less: C,
}

impl<T: PartialOrd> MinMaxHeap<T> {
    /// Empty heap ordered by `T`'s own `<`.
    pub fn new_ordered() -> Self {
        Self::new(natural_less::<T>)
    }
}

impl<T, C> MinMaxHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    pub fn new(less: C) -> Self {
        Self {
            data: Vec::new(),
            less,
        }
    }

    pub fn with_capacity(capacity: usize, less: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            less,
        }
    }

    /// Build a heap from arbitrary data in O(n).
    pub fn from_vec(data: Vec<T>, less: C) -> Self {
        let mut heap = Self { data, less };
        let n = heap.data.len();
        for i in (0..n / 2).rev() {
            heap.sift_down(i, n);
        }
        heap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn peek_max(&self) -> Option<&T> {
        self.index_of_max().map(|i| &self.data[i])
    }

    pub fn pop_min(&mut self) -> Option<T> {
        let last = self.data.len().checked_sub(1)?;
        self.data.swap(0, last);
        self.sift_down(0, last);
        self.data.pop()
    }

    pub fn pop_max(&mut self) -> Option<T> {
        let i = self.index_of_max()?;
        let last = self.data.len() - 1;
        self.data.swap(i, last);
        self.sift_down(i, last);
        self.data.pop()
    }

    /// Evict maxima until at most `len` elements remain.
    pub fn truncate(&mut self, len: usize) {
        while self.data.len() > len {
            self.pop_max();
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate in heap (not sorted) order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Consume the heap, returning its elements in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consume the heap, returning its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        while let Some(item) = self.pop_min() {
            out.push(item);
        }
        out
    }

    /// Check the min-max ordering over every node's children and
    /// grandchildren.
    pub fn is_min_max_heap(&self) -> bool {
        let n = self.data.len();
        (0..n).all(|i| {
            let left = 2 * i + 1;
            let right = left + 1;
            let on_min = is_min_level(i);
            [left, right, 2 * left + 1, 2 * left + 2, 2 * right + 1, 2 * right + 2]
                .into_iter()
                .filter(|&d| d < n)
                .all(|d| {
                    if on_min {
                        !self.less_at(d, i)
                    } else {
                        !self.less_at(i, d)
                    }
                })
        })
    }

    #[inline]
    fn less_at(&self, i: usize, j: usize) -> bool {
        (self.less)(&self.data[i], &self.data[j])
    }

    /// Whether `i` should sit above `j` in a `max` (or min) ordering.
    #[inline]
    fn precedes(&self, max: bool, i: usize, j: usize) -> bool {
        if max {
            self.less_at(j, i)
        } else {
            self.less_at(i, j)
        }
    }

    fn index_of_max(&self) -> Option<usize> {
        match self.data.len() {
            0 => None,
            n @ (1 | 2) => Some(n - 1),
            _ if self.less_at(2, 1) => Some(1),
            _ => Some(2),
        }
    }

    fn sift_up(&mut self, i: usize) {
        if i == 0 {
            return;
        }
        let parent = (i - 1) / 2;
        let on_max = !is_min_level(i);

        // An element that belongs to the other level class moves to its parent
        // and continues along that class's grandparent chain.
        if self.precedes(!on_max, i, parent) {
            self.data.swap(i, parent);
            self.climb(!on_max, parent);
        } else {
            self.climb(on_max, i);
        }
    }

    fn climb(&mut self, max: bool, mut i: usize) {
        while i > 2 {
            let grandparent = ((i - 1) / 2 - 1) / 2;
            if !self.precedes(max, i, grandparent) {
                return;
            }
            self.data.swap(i, grandparent);
            i = grandparent;
        }
    }

    /// Restore the ordering below `i`, treating only `[0, n)` as the heap.
    fn sift_down(&mut self, mut i: usize, n: usize) {
        let max = !is_min_level(i);
        while let Some(m) = self.extreme_descendant(max, i, n) {
            let parent = (m - 1) / 2;
            if parent == i {
                if self.precedes(max, m, i) {
                    self.data.swap(m, i);
                }
                return;
            }

            if !self.precedes(max, m, i) {
                return;
            }
            self.data.swap(m, i);
            if self.precedes(max, parent, m) {
                self.data.swap(parent, m);
            }
            i = m;
        }
    }

    /// Smallest (or largest, if `max`) child or grandchild of `i`.
    fn extreme_descendant(&self, max: bool, i: usize, n: usize) -> Option<usize> {
        let left = 2 * i + 1;
        if left >= n {
            return None;
        }
        let right = left + 1;

        let mut best = left;
        for j in [right, 2 * left + 1, 2 * left + 2, 2 * right + 1, 2 * right + 2] {
            if j >= n {
                break;
            }
            if !self.precedes(max, best, j) {
                best = j;
            }
        }
        Some(best)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for MinMaxHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinMaxHeap").field("data", &self.data).finish()
    }
}

impl<T: PartialOrd> Default for MinMaxHeap<T> {
    fn default() -> Self {
        Self::new_ordered()
    }
}

/// Bit length of `x`: the 1-based position of its highest set bit.
#[inline]
fn highest_set_bit(x: usize) -> u32 {
    usize::BITS - x.leading_zeros()
}

/// Depth 0, 2, 4, ... are min levels.
#[inline]
fn is_min_level(index: usize) -> bool {
    highest_set_bit(index + 1) & 1 == 1
}
