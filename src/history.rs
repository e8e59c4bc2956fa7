//! Bounded History - fixed-capacity most-recent-N retention
//!
//! Backing store for prediction, outcome and state-transition histories.
//! Push evicts from the front once the capacity is reached, so iteration
//! order is always oldest -> newest.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an item, evicting the oldest when full. Returns the evicted
    /// item so callers can react to age-out.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest -> newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }

    /// The most recent `n` items, oldest -> newest.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip)
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn find<P>(&self, pred: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().find(|&x| pred(x))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            current_size: self.items.len(),
            capacity: self.capacity,
            fill_percent: (self.items.len() as f64 / self.capacity as f64 * 100.0).min(100.0),
        }
    }
}

/// History fill snapshot for status reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub fill_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut h = BoundedHistory::new(3);
        assert!(h.push(1).is_none());
        assert!(h.push(2).is_none());
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_eviction_order_is_oldest_first() {
        let mut h = BoundedHistory::new(3);
        h.push(1);
        h.push(2);
        h.push(3);
        assert_eq!(h.push(4), Some(1));
        assert_eq!(h.push(5), Some(2));
        let items: Vec<_> = h.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5]);
    }

    #[test]
    fn test_recent_window() {
        let mut h = BoundedHistory::new(10);
        for i in 0..6 {
            h.push(i);
        }
        let recent: Vec<_> = h.recent(3).copied().collect();
        assert_eq!(recent, vec![3, 4, 5]);
        // Window larger than contents returns everything
        assert_eq!(h.recent(100).count(), 6);
    }

    #[test]
    fn test_status() {
        let mut h = BoundedHistory::new(4);
        h.push(1);
        h.push(2);
        let status = h.status();
        assert_eq!(status.current_size, 2);
        assert_eq!(status.capacity, 4);
        assert!((status.fill_percent - 50.0).abs() < 1e-9);
    }
}
