use std::collections::VecDeque;

use crate::models::TrendPoint;

/// Rolling window of the most recent trend points, oldest first.
pub const TREND_CAPACITY: usize = 60;

#[derive(Debug, Clone, Default)]
pub struct TrendBuffer {
    points: VecDeque<TrendPoint>,
}

impl TrendBuffer {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TREND_CAPACITY),
        }
    }

    /// Append a point, evicting the single oldest one if the buffer is full.
    pub fn append(&mut self, point: TrendPoint) {
        if self.points.len() == TREND_CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Current contents, oldest to newest.
    pub fn points(&self) -> Vec<TrendPoint> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(elapsed: i64) -> TrendPoint {
        TrendPoint {
            elapsed_seconds: elapsed,
            score: elapsed as f64,
        }
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut buffer = TrendBuffer::new();
        for i in 0..5 {
            buffer.append(point(i));
        }

        let elapsed: Vec<i64> = buffer.points().iter().map(|p| p.elapsed_seconds).collect();
        assert_eq!(elapsed, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut buffer = TrendBuffer::new();
        for i in 0..500 {
            buffer.append(point(i));
            assert!(buffer.len() <= TREND_CAPACITY);
        }
        assert_eq!(buffer.len(), TREND_CAPACITY);
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest() {
        let mut buffer = TrendBuffer::new();
        for i in 0..(TREND_CAPACITY as i64 + 3) {
            buffer.append(point(i));
        }

        let points = buffer.points();
        assert_eq!(points.len(), TREND_CAPACITY);
        assert_eq!(points[0].elapsed_seconds, 3);
        assert_eq!(
            points.last().map(|p| p.elapsed_seconds),
            Some(TREND_CAPACITY as i64 + 2)
        );
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut buffer = TrendBuffer::new();
        buffer.append(point(0));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.points().is_empty());
    }
}
