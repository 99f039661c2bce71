use std::cmp::Ordering;

/// Min-priority queue over dense vertex indices whose keys can be lowered in place.
pub trait Frontier {
    /// Add `index` with priority `key`. Re-inserting a queued index behaves like
    /// [`Frontier::decrease_key`].
    fn insert(&mut self, index: usize, key: f64);

    /// Remove and return the index with the smallest key.
    fn extract_min(&mut self) -> Option<usize>;

    /// Lower the key of a queued index. A key that is not smaller than the queued one and
    /// indices not in the queue are ignored.
    fn decrease_key(&mut self, index: usize, key: f64);

    fn is_empty(&self) -> bool;
}

/// Binary heap that tracks where each index lives so [`Frontier::decrease_key`] is `O(log n)`.
#[derive(Debug, Default)]
pub struct IndexedMinHeap {
    heap: Vec<usize>,
    keys: Vec<f64>,
    positions: Vec<Option<usize>>,
}

impl IndexedMinHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            keys: vec![f64::INFINITY; capacity],
            positions: vec![None; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.positions.get(index).copied().flatten().is_some()
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.keys[self.heap[a]].total_cmp(&self.keys[self.heap[b]]) == Ordering::Less
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.less(position, parent) {
                self.swap(position, parent);
                position = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut smallest = position;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap(position, smallest);
            position = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a]] = Some(a);
        self.positions[self.heap[b]] = Some(b);
    }
}

impl Frontier for IndexedMinHeap {
    fn insert(&mut self, index: usize, key: f64) {
        if self.contains(index) {
            self.decrease_key(index, key);
            return;
        }
        if index >= self.positions.len() {
            self.positions.resize(index + 1, None);
            self.keys.resize(index + 1, f64::INFINITY);
        }
        let position = self.heap.len();
        self.heap.push(index);
        self.keys[index] = key;
        self.positions[index] = Some(position);
        self.sift_up(position);
    }

    fn extract_min(&mut self) -> Option<usize> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let min = self.heap.pop()?;
        self.positions[min] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    fn decrease_key(&mut self, index: usize, key: f64) {
        if let Some(position) = self.positions.get(index).copied().flatten() {
            if key.total_cmp(&self.keys[index]) != Ordering::Less {
                return;
            }
            self.keys[index] = key;
            self.sift_up(position);
        }
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Frontier, IndexedMinHeap};
    use pretty_assertions::assert_eq;

    fn drain(heap: &mut IndexedMinHeap) -> Vec<usize> {
        std::iter::from_fn(|| heap.extract_min()).collect()
    }

    #[test]
    fn extracts_in_key_order() {
        let mut heap = IndexedMinHeap::with_capacity(5);
        for (index, key) in [(0, 10.), (1, 3.), (2, 7.), (3, 1.), (4, 12.)] {
            heap.insert(index, key);
        }
        assert_eq!(heap.len(), 5);
        assert_eq!(drain(&mut heap), vec![3, 1, 2, 0, 4]);
        assert!(heap.is_empty());
    }

    #[test]
    fn decrease_key_moves_index_forward() {
        let mut heap = IndexedMinHeap::with_capacity(3);
        heap.insert(0, 5.);
        heap.insert(1, 6.);
        heap.insert(2, 7.);
        heap.decrease_key(2, 1.);
        assert_eq!(heap.extract_min(), Some(2));
        assert_eq!(heap.extract_min(), Some(0));
        assert_eq!(heap.extract_min(), Some(1));
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn decrease_key_of_absent_index_is_ignored() {
        let mut heap = IndexedMinHeap::with_capacity(2);
        heap.insert(0, 5.);
        heap.decrease_key(1, 1.);
        heap.decrease_key(42, 1.);
        assert!(!heap.contains(1));
        assert_eq!(drain(&mut heap), vec![0]);
    }

    #[test]
    fn reinserting_lowers_the_key() {
        let mut heap = IndexedMinHeap::with_capacity(2);
        heap.insert(0, 5.);
        heap.insert(1, 4.);
        heap.insert(0, 2.);
        assert_eq!(heap.len(), 2);
        assert_eq!(drain(&mut heap), vec![0, 1]);
    }

    #[test]
    fn larger_key_is_ignored() {
        let mut heap = IndexedMinHeap::with_capacity(2);
        heap.insert(0, 1.);
        heap.insert(1, 2.);
        heap.decrease_key(0, 5.);
        heap.insert(0, 3.);
        assert_eq!(heap.len(), 2);
        assert_eq!(drain(&mut heap), vec![0, 1]);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut heap = IndexedMinHeap::default();
        heap.insert(9, 2.);
        heap.insert(4, 1.);
        assert!(heap.contains(9));
        assert_eq!(drain(&mut heap), vec![4, 9]);
    }

    #[test]
    fn infinite_keys_sort_last() {
        let mut heap = IndexedMinHeap::with_capacity(3);
        heap.insert(0, f64::INFINITY);
        heap.insert(1, 0.);
        heap.insert(2, 1e300);
        assert_eq!(drain(&mut heap), vec![1, 2, 0]);
    }
}
