//! Fixed-capacity sliding window of bars

use std::collections::VecDeque;

use crate::data::Bar;

/// Ordered, fixed-capacity FIFO sequence of bars.
///
/// During the initial fill the window grows; once at capacity, every
/// [`slide`](Window::slide) evicts exactly one oldest bar and appends exactly
/// one newest bar, so the length never changes again.
#[derive(Debug, Clone)]
pub struct Window {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl Window {
    /// Create an empty window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a window pre-filled from a slice, keeping the newest
    /// `capacity` bars when the slice is longer.
    pub fn from_bars(capacity: usize, bars: &[Bar]) -> Self {
        let mut window = Self::new(capacity);
        for bar in bars {
            window.slide(bar.clone());
        }
        window
    }

    /// Append a bar, evicting the oldest when the window is at capacity.
    pub fn slide(&mut self, bar: Bar) {
        if self.bars.len() == self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    /// Number of bars currently held
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if window holds no bars
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the initial fill is complete
    pub fn is_full(&self) -> bool {
        self.bars.len() == self.capacity
    }

    /// Newest bar
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    /// Close prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// High prices, oldest first
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Low prices, oldest first
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bar(close: f64) -> Bar {
        Bar::new(Utc::now(), close, close + 1.0, close - 1.0, close, 100.0, 1)
    }

    #[test]
    fn test_capacity_invariant() {
        let mut window = Window::new(5);
        for i in 0..5 {
            window.slide(bar(100.0 + i as f64));
        }
        assert!(window.is_full());

        // Every slide after the fill keeps the length constant
        for k in 0..20 {
            window.slide(bar(200.0 + k as f64));
            assert_eq!(window.len(), 5);
        }
        assert_eq!(window.last().unwrap().close, 219.0);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = Window::new(3);
        for close in [1.0, 2.0, 3.0, 4.0] {
            window.slide(bar(close));
        }
        let closes = window.closes();
        assert_eq!(closes, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_from_bars_keeps_newest() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i as f64)).collect();
        let window = Window::from_bars(4, &bars);
        assert_eq!(window.closes(), vec![6.0, 7.0, 8.0, 9.0]);
    }
}
