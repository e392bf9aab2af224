use std::cmp::Ordering;

use super::error::{EngineError, Result};


/// Which end of the ordering the heap hands out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOrder {
    Min,
    Max,
}

/// An array-backed binary heap with a fixed capacity.  The same code serves as a min-heap or a
/// max-heap depending on its `HeapOrder`.
#[derive(Debug, Clone)]
pub struct IndexedBinaryHeap<T> {
    items: Vec<T>,
    capacity: usize,
    order: HeapOrder,
}

impl<T: Ord> IndexedBinaryHeap<T> {
    pub fn new(capacity: usize, order: HeapOrder) -> IndexedBinaryHeap<T> {
        IndexedBinaryHeap {
            items: Vec::with_capacity(capacity),
            capacity,
            order,
        }
    }

    pub fn min_heap(capacity: usize) -> IndexedBinaryHeap<T> {
        Self::new(capacity, HeapOrder::Min)
    }

    pub fn max_heap(capacity: usize) -> IndexedBinaryHeap<T> {
        Self::new(capacity, HeapOrder::Max)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn order(&self) -> HeapOrder {
        self.order
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn insert(&mut self, elem: T) -> Result<()> {
        if self.is_full() {
            return Err(EngineError::HeapOverflow{capacity: self.capacity});
        }
        self.items.push(elem);
        self.swim(self.items.len() - 1);
        Ok(())
    }

    /// The element that `poll` would return next.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn poll(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    pub fn peek_at(&self, pos: usize) -> Option<&T> {
        self.items.get(pos)
    }

    /// Array position of an element equal to `elem`.  This is a linear scan.
    ///
    /// Equality is the element type's own: for `Scored` entries it compares scores only, so any
    /// entry with the same score matches.  Use `position_where` to match on the tagged value.
    pub fn position_of(&self, elem: &T) -> Option<usize> {
        self.position_where(|item| item == elem)
    }

    /// Array position of the first element satisfying `pred`, in array order.
    pub fn position_where<F>(&self, pred: F) -> Option<usize>
        where F: FnMut(&T) -> bool
    {
        self.items.iter().position(pred)
    }

    /// Whether an element equal to `elem` is queued.  See `position_of` for `Scored` entries.
    pub fn contains(&self, elem: &T) -> bool {
        self.position_of(elem).is_some()
    }

    /// Removes one element equal to `elem`, returning whether one was found.  For `Scored`
    /// entries this is any entry with the same score; see `remove_where`.
    pub fn remove(&mut self, elem: &T) -> bool {
        self.remove_where(|item| item == elem).is_some()
    }

    /// Removes and returns the first element satisfying `pred`.
    pub fn remove_where<F>(&mut self, pred: F) -> Option<T>
        where F: FnMut(&T) -> bool
    {
        let pos = self.position_where(pred)?;
        self.remove_at(pos)
    }

    pub fn remove_at(&mut self, pos: usize) -> Option<T> {
        if pos >= self.items.len() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(pos, last);
        let removed = self.items.pop();
        if pos < self.items.len() {
            // the element moved into pos may belong lower or higher; try sinking first.
            if self.sink(pos) == pos {
                self.swim(pos);
            }
        }
        removed
    }

    /// Iterates over the elements in array order, not priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// True if the element at `ii` should sit above the element at `jj`.
    fn outranks(&self, ii: usize, jj: usize) -> bool {
        let ordering = self.items[ii].cmp(&self.items[jj]);
        match self.order {
            HeapOrder::Min => ordering == Ordering::Less,
            HeapOrder::Max => ordering == Ordering::Greater,
        }
    }

    fn swim(&mut self, mut kk: usize) -> usize {
        while kk > 0 {
            let parent = (kk - 1) / 2;
            if !self.outranks(kk, parent) {
                break;
            }
            self.items.swap(kk, parent);
            kk = parent;
        }
        kk
    }

    fn sink(&mut self, mut kk: usize) -> usize {
        let size = self.items.len();
        loop {
            let left = 2 * kk + 1;
            if left >= size {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < size && self.outranks(right, left) {
                child = right;
            }
            if !self.outranks(child, kk) {
                break;
            }
            self.items.swap(child, kk);
            kk = child;
        }
        kk
    }
}


/// A value tagged with a score.  Entries compare by score only, using a total order over
/// floating-point scores in which NaN sorts after every number.  Two entries with equal scores
/// are equal whatever their values.
#[derive(Copy, Clone, Debug)]
pub struct Scored<K, T>(pub K, pub T);

impl<K: PartialOrd, T> PartialEq for Scored<K, T> {
    #[inline]
    fn eq(&self, other: &Scored<K, T>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd, T> Eq for Scored<K, T> {}

impl<K: PartialOrd, T> PartialOrd for Scored<K, T> {
    #[inline]
    fn partial_cmp(&self, other: &Scored<K, T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T> Ord for Scored<K, T> {
    #[inline]
    fn cmp(&self, other: &Scored<K, T>) -> Ordering {
        let a = &self.0;
        let b = &other.0;
        if a == b {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else if a > b {
            Ordering::Greater
        } else if a.ne(a) && b.ne(b) {
            // both NaN
            Ordering::Equal
        } else if a.ne(a) {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }
}
