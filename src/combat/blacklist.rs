//! Coordinates excluded from target selection for the current search pass.

use crate::geometry::Point;

#[derive(Debug, Clone)]
pub struct Blacklist {
    entries: Vec<Point>,
    tolerance: i32,
}

impl Blacklist {
    pub fn new(tolerance: i32) -> Self {
        Self {
            entries: Vec::new(),
            tolerance,
        }
    }

    /// Returns false when an approximately equal entry already exists.
    pub fn add(&mut self, p: Point) -> bool {
        if self.contains(p) {
            return false;
        }
        log::debug!("Blacklisting ({}, {})", p.x, p.y);
        self.entries.push(p);
        true
    }

    pub fn contains(&self, p: Point) -> bool {
        self.entries.iter().any(|e| e.approx_eq(p, self.tolerance))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
