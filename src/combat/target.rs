use crate::geometry::Point;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Enemy,
    MysteryNode,
    Boss,
}

/// A map tile the fleet may be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub x: i32,
    pub y: i32,
    pub kind: TargetKind,
}

impl Target {
    pub fn new(at: Point, kind: TargetKind) -> Self {
        Self {
            x: at.x,
            y: at.y,
            kind,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TargetKind::Enemy => "enemy",
            TargetKind::MysteryNode => "mystery node",
            TargetKind::Boss => "boss",
        };
        write!(f, "{} at ({}, {})", kind, self.x, self.y)
    }
}
