//! A capacity-bounded neighbor collector (spec §4.2).
//!
//! Capacity is `neighbor_number * K` (`K` a configurable safety factor,
//! spec-mandated rather than a fixed constant so callers tune it against
//! their target neighbor count). When the capacity is exceeded the
//! collector keeps the `capacity` closest candidates seen so far and
//! raises its `truncated` flag, which the smoothing-length solver reports
//! as a non-fatal `NeighborTruncation` (spec §7).

/// Collects the closest `capacity` candidates by squared distance.
pub struct Collector<I> {
    capacity: usize,
    /// Kept sorted descending by distance so the current worst candidate
    /// (the one to evict) is always at the back.
    entries: Vec<(f64, I)>,
    truncated: bool,
}

impl<I: Copy> Collector<I> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::with_capacity(capacity),
            truncated: false,
        }
    }

    /// The squared distance beyond which a candidate cannot possibly be
    /// accepted; callers use this to prune tree branches early. `f64::INFINITY`
    /// until the collector is full.
    pub fn worst_distance_squared(&self) -> f64 {
        if self.entries.len() < self.capacity {
            f64::INFINITY
        } else {
            self.entries.last().map(|(d, _)| *d).unwrap_or(f64::INFINITY)
        }
    }

    pub fn push(&mut self, index: I, distance_squared: f64) {
        if self.entries.len() < self.capacity {
            let pos = self
                .entries
                .partition_point(|(d, _)| *d < distance_squared);
            self.entries.insert(pos, (distance_squared, index));
        } else if distance_squared < self.worst_distance_squared() {
            self.entries.pop();
            let pos = self
                .entries
                .partition_point(|(d, _)| *d < distance_squared);
            self.entries.insert(pos, (distance_squared, index));
            self.truncated = true;
        } else {
            self.truncated = true;
        }
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, f64)> + '_ {
        self.entries.iter().map(|(d, i)| (*i, *d))
    }

    pub fn into_sorted_by_distance(mut self) -> Vec<(I, f64)> {
        self.entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        self.entries.into_iter().map(|(d, i)| (i, d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_closest_within_capacity() {
        let mut collector = Collector::with_capacity(2);
        collector.push(0, 9.0);
        collector.push(1, 1.0);
        collector.push(2, 4.0);
        assert_eq!(collector.len(), 2);
        assert!(collector.truncated());
        let kept: Vec<_> = collector.into_sorted_by_distance().into_iter().map(|(i, _)| i).collect();
        assert_eq!(kept, vec![1, 2]);
    }

    #[test]
    fn not_truncated_when_under_capacity() {
        let mut collector = Collector::with_capacity(5);
        collector.push(0, 1.0);
        collector.push(1, 2.0);
        assert!(!collector.truncated());
        assert_eq!(collector.len(), 2);
    }
}
