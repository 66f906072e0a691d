//! Sliding-window median over a multiset.
//!
//! The lower half lives in a max-heap and the upper half in a min-heap. After
//! every mutation the larger heap hands its root to the other until their sizes
//! differ by at most one, so the median is always at one or both roots.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeapKind {
    Max,
    Min,
}

/// Array-backed binary heap that can delete an arbitrary element.
///
/// Locating the element is a linear scan, which is acceptable for window
/// sizes in the thousands; restoring the heap is O(log n).
#[derive(Debug, Clone)]
struct Heap<T> {
    items: Vec<T>,
    kind: HeapKind,
}

impl<T: Copy + PartialOrd> Heap<T> {
    fn new(kind: HeapKind) -> Self {
        Self {
            items: Vec::new(),
            kind,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn peek(&self) -> Option<T> {
        self.items.first().copied()
    }

    /// Should `a` sit above `b`.
    #[inline]
    fn above(&self, a: T, b: T) -> bool {
        match self.kind {
            HeapKind::Max => a > b,
            HeapKind::Min => a < b,
        }
    }

    fn push(&mut self, value: T) {
        self.items.push(value);
        self.sift_up(self.items.len() - 1);
    }

    fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let root = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(root)
    }

    fn remove(&mut self, value: T) -> bool {
        let Some(index) = self.items.iter().position(|v| *v == value) else {
            return false;
        };

        self.items.swap_remove(index);
        if index < self.items.len() {
            let index = self.sift_up(index);
            self.sift_down(index);
        }
        true
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.above(self.items[index], self.items[parent]) {
                self.items.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut best = index;

            if left < len && self.above(self.items[left], self.items[best]) {
                best = left;
            }
            if right < len && self.above(self.items[right], self.items[best]) {
                best = right;
            }
            if best == index {
                break;
            }

            self.items.swap(index, best);
            index = best;
        }
    }
}

///
/// Median of a multiset that supports insertion and removal of any value.
///
/// Values must be totally ordered in practice: NaN never belongs in the set.
///
#[derive(Debug, Clone)]
pub struct RollingMedian<T> {
    lower: Heap<T>,
    upper: Heap<T>,
}

impl<T: Copy + PartialOrd + Into<f64>> Default for RollingMedian<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + PartialOrd + Into<f64>> RollingMedian<T> {
    pub fn new() -> Self {
        Self {
            lower: Heap::new(HeapKind::Max),
            upper: Heap::new(HeapKind::Min),
        }
    }

    pub fn add(&mut self, value: T) {
        let into_lower = match (self.lower.peek(), self.upper.peek()) {
            (Some(lower_top), _) => value <= lower_top,
            (None, Some(upper_top)) => value < upper_top,
            (None, None) => true,
        };

        if into_lower {
            self.lower.push(value);
        } else {
            self.upper.push(value);
        }
        self.rebalance();
    }

    ///
    /// Remove one occurrence of `value`. Returns `false` if it was not present.
    ///
    pub fn remove(&mut self, value: T) -> bool {
        let in_lower = self.lower.peek().is_some_and(|top| value <= top);

        let removed = if in_lower {
            self.lower.remove(value) || self.upper.remove(value)
        } else {
            self.upper.remove(value) || self.lower.remove(value)
        };

        if removed {
            self.rebalance();
        }
        removed
    }

    ///
    /// Average of both roots when the halves are equal in size, otherwise the
    /// root of the larger half. An empty set has median 0.
    ///
    pub fn median(&self) -> f64 {
        match (self.lower.peek(), self.upper.peek()) {
            (None, None) => 0.0,
            (Some(l), Some(u)) if self.lower.len() == self.upper.len() => {
                (l.into() + u.into()) / 2.0
            }
            (Some(l), _) if self.lower.len() > self.upper.len() => l.into(),
            (_, Some(u)) => u.into(),
            (Some(l), None) => l.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rebalance(&mut self) {
        while self.lower.len() > self.upper.len() + 1 {
            if let Some(v) = self.lower.pop() {
                self.upper.push(v);
            }
        }
        while self.upper.len() > self.lower.len() + 1 {
            if let Some(v) = self.upper.pop() {
                self.lower.push(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;

    fn reference_median(values: &[i32]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();
        if n % 2 == 0 {
            (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
        } else {
            sorted[n / 2] as f64
        }
    }

    #[rstest]
    fn test_empty_median_is_zero() {
        let median: RollingMedian<f64> = RollingMedian::new();
        assert_eq!(median.median(), 0.0);
        assert!(median.is_empty());
    }

    #[rstest]
    fn test_small_sequence() {
        let mut median = RollingMedian::new();
        median.add(5.0);
        assert_eq!(median.median(), 5.0);
        median.add(1.0);
        assert_eq!(median.median(), 3.0);
        median.add(10.0);
        assert_eq!(median.median(), 5.0);
        median.add(7.0);
        assert_eq!(median.median(), 6.0);

        assert!(median.remove(5.0));
        assert_eq!(median.median(), 7.0);
        assert!(!median.remove(42.0));
        assert_eq!(median.len(), 3);
    }

    #[rstest]
    fn test_add_below_lone_upper_root() {
        let mut median = RollingMedian::new();
        median.add(2);
        median.add(8);
        assert!(median.remove(2));
        // only the upper half is populated now
        median.add(1);
        assert_eq!(median.median(), 4.5);
        median.add(9);
        assert_eq!(median.median(), 8.0);
    }

    #[rstest]
    fn test_duplicates() {
        let mut median = RollingMedian::new();
        for v in [3, 3, 3, 1, 3] {
            median.add(v);
        }
        assert_eq!(median.median(), 3.0);
        assert!(median.remove(3));
        assert!(median.remove(3));
        assert!(median.remove(3));
        assert_eq!(median.median(), 2.0);
    }

    #[rstest]
    fn test_add_only_matches_sorted_median() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut median = RollingMedian::new();
        let mut values = Vec::new();

        for _ in 0..2_000 {
            let v: i32 = rng.gen_range(-500..500);
            median.add(v);
            values.push(v);
            assert_eq!(median.median(), reference_median(&values));
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn test_interleaved_add_remove_matches_sorted_median(#[case] seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut median = RollingMedian::new();
        let mut values: Vec<i32> = Vec::new();

        for _ in 0..5_000 {
            if !values.is_empty() && rng.gen_bool(0.45) {
                let index = rng.gen_range(0..values.len());
                let v = values.swap_remove(index);
                assert!(median.remove(v));
            } else {
                // narrow range forces plenty of duplicates
                let v: i32 = rng.gen_range(0..50);
                median.add(v);
                values.push(v);
            }
            assert_eq!(median.len(), values.len());
            assert_eq!(median.median(), reference_median(&values));
        }
    }

    #[rstest]
    fn test_sliding_window_of_floats() {
        let data: Vec<f64> = (0..100).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
        let window = 11;
        let mut median = RollingMedian::new();

        for (i, v) in data.iter().enumerate() {
            median.add(*v);
            if i >= window {
                assert!(median.remove(data[i - window]));
            }

            let start = i.saturating_sub(window - 1);
            let mut current: Vec<f64> = data[start..=i].to_vec();
            current.sort_by(|a, b| a.total_cmp(b));
            let n = current.len();
            let expected = if n % 2 == 0 {
                (current[n / 2 - 1] + current[n / 2]) / 2.0
            } else {
                current[n / 2]
            };
            assert_eq!(median.median(), expected);
        }
    }
}
