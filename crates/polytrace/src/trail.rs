//! Bounded trail of accepted intersection points.
//!
//! ## Rust Lesson #12: VecDeque
//!
//! A JS array's `shift()` is O(n). `VecDeque` is a ring buffer: pushing to
//! the back and popping from the front are both O(1), which is exactly what
//! a FIFO with a fixed capacity needs.

use std::collections::VecDeque;

use crate::geometry::Point;

/// A fixed-capacity FIFO of points, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

/// One drawable piece of a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub from: Point,
    pub to: Point,
    /// `i / len` where `i` is the index of `to` (in `(0, 1)`)
    pub progress: f64,
}

impl Trail {
    /// Create an empty trail. A capacity of 0 is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a point, evicting the oldest one once over capacity.
    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Drop all history at once.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Change the capacity, evicting the oldest points if the trail is now
    /// too long.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recently pushed point.
    #[inline]
    pub fn latest(&self) -> Option<Point> {
        self.points.back().copied()
    }

    #[inline]
    pub fn oldest(&self) -> Option<Point> {
        self.points.front().copied()
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Owned copy of the points, oldest first.
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }

    /// Consecutive point pairs with their fade progress.
    pub fn segments(&self) -> impl Iterator<Item = TrailSegment> + '_ {
        let len = self.points.len() as f64;
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .enumerate()
            .map(move |(i, (from, to))| TrailSegment {
                from: *from,
                to: *to,
                progress: (i + 1) as f64 / len,
            })
    }
}
