use crate::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in canvas units, `min` top-left and `max` bottom-right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box for a node stored as top-left plus size.
    pub fn from_pos_size(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive of the border.
    pub fn contains(&self, p: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// Grow every side by `margin`; negative values shrink.
    pub fn expand(&self, margin: f32) -> Rect {
        let m = Vec2::new(margin, margin);
        Rect {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Same size, shifted by `delta`.
    pub fn translate(&self, delta: Vec2) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Bounding box of all rectangles, `None` for an empty iterator.
    pub fn bounding<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }
}
