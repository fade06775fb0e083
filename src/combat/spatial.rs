//! Two-dimensional k-d tree for nearest-target queries.
//!
//! Built once per query over the candidate set; after camera pans the set
//! can hold dozens of points.

use crate::geometry::Point;

struct Node {
    point: Point,
    index: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

pub struct KdTree {
    root: Option<Box<Node>>,
}

impl KdTree {
    pub fn build(points: &[Point]) -> Self {
        let mut items: Vec<(usize, Point)> = points.iter().copied().enumerate().collect();
        Self {
            root: build(&mut items, 0),
        }
    }

    /// Index (into the build slice) and squared distance of the nearest point.
    /// Ties resolve to the lower index.
    pub fn nearest(&self, query: Point) -> Option<(usize, i64)> {
        let mut best: Option<(usize, i64)> = None;
        if let Some(root) = &self.root {
            search(root, query, 0, &mut best);
        }
        best
    }
}

fn build(items: &mut [(usize, Point)], depth: usize) -> Option<Box<Node>> {
    if items.is_empty() {
        return None;
    }
    let axis = depth % 2;
    items.sort_by_key(|(i, p)| (coord(*p, axis), *i));
    let mid = items.len() / 2;
    let (index, point) = items[mid];
    let (left, rest) = items.split_at_mut(mid);
    Some(Box::new(Node {
        point,
        index,
        left: build(left, depth + 1),
        right: build(&mut rest[1..], depth + 1),
    }))
}

fn coord(p: Point, axis: usize) -> i32 {
    if axis == 0 { p.x } else { p.y }
}

fn search(node: &Node, query: Point, depth: usize, best: &mut Option<(usize, i64)>) {
    let d = node.point.distance_sq(query);
    let better = match best {
        None => true,
        Some((bi, bd)) => d < *bd || (d == *bd && node.index < *bi),
    };
    if better {
        *best = Some((node.index, d));
    }

    let axis = depth % 2;
    let diff = (coord(query, axis) - coord(node.point, axis)) as i64;
    let (near, far) = if diff < 0 {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };
    if let Some(n) = near {
        search(n, query, depth + 1, best);
    }
    if let Some(f) = far {
        // Equal distance across the plane may still hold a lower index.
        if best.map_or(true, |(_, bd)| diff * diff <= bd) {
            search(f, query, depth + 1, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_nearest(points: &[Point], q: Point) -> (usize, i64) {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_sq(q)))
            .min_by_key(|(i, d)| (*d, *i))
            .unwrap()
    }

    #[test]
    fn empty_tree_has_no_answer() {
        assert!(KdTree::build(&[]).nearest(Point::new(1, 1)).is_none());
    }

    #[test]
    fn agrees_with_linear_scan() {
        let points: Vec<Point> = (0..57)
            .map(|i| Point::new((i * 131) % 1700 + 180, (i * 71) % 880 + 90))
            .collect();
        let tree = KdTree::build(&points);
        for q in 0..40 {
            let query = Point::new((q * 211) % 1920, (q * 97) % 1080);
            assert_eq!(tree.nearest(query), Some(linear_nearest(&points, query)));
        }
    }

    #[test]
    fn ties_prefer_first_candidate() {
        let points = [Point::new(10, 0), Point::new(-10, 0), Point::new(0, 10)];
        let tree = KdTree::build(&points);
        assert_eq!(tree.nearest(Point::new(0, 0)), Some((0, 100)));
    }
}
