//! Border geometry shared by edge trimming, label placement and attachment
//! spreading.
//!
//! Every border query funnels through one ray/box exit routine so that two
//! edges meeting at the same corner always agree on where that corner is.

use argmap_core::{Node, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Upper bound for the gap left between an edge end and a node border.
pub const MAX_BORDER_PADDING: f32 = 8.0;
/// Smallest envelope used for edge anchors, which are rendered as points.
pub const DEFAULT_ANCHOR_RADIUS: f32 = 6.0;
pub const DEFAULT_ATTACHMENT_SPACING: f32 = 12.0;
pub const DEFAULT_PARALLEL_EDGE_SPACING: f32 = 16.0;

const DIRECTION_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    pub border_padding: f32,
    pub anchor_radius: f32,
    pub attachment_spacing: f32,
    pub parallel_edge_spacing: f32,
    /// Group `(a, b)` and `(b, a)` together when offsetting parallel edges.
    pub treat_reverse_as_parallel: bool,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            border_padding: MAX_BORDER_PADDING,
            anchor_radius: DEFAULT_ANCHOR_RADIUS,
            attachment_spacing: DEFAULT_ATTACHMENT_SPACING,
            parallel_edge_spacing: DEFAULT_PARALLEL_EDGE_SPACING,
            treat_reverse_as_parallel: true,
        }
    }
}

/// Endpoints of a drawn edge segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCoords {
    pub source: Vec2,
    pub target: Vec2,
}

/// Measurable outline of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Rect { center: Vec2, half: Vec2 },
    /// Edge anchors get a circular envelope so they never degenerate to a point.
    Circle { center: Vec2, radius: f32 },
}

impl NodeShape {
    pub fn center(&self) -> Vec2 {
        match *self {
            NodeShape::Rect { center, .. } | NodeShape::Circle { center, .. } => center,
        }
    }

    /// Half of the smallest extent; the radius for circles.
    pub fn min_half_extent(&self) -> f32 {
        match *self {
            NodeShape::Rect { half, .. } => half.x.min(half.y),
            NodeShape::Circle { radius, .. } => radius,
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            NodeShape::Rect { center, half } => Rect::from_min_max(center - half, center + half),
            NodeShape::Circle { center, radius } => {
                let half = Vec2::new(radius, radius);
                Rect::from_min_max(center - half, center + half)
            }
        }
    }

    /// Where a ray from the center along `dir` leaves the outline.
    pub fn exit(&self, dir: Vec2) -> Vec2 {
        self.exit_from(self.center(), dir)
    }

    /// Where a ray starting at `origin` (inside the outline) along `dir`
    /// leaves it. A zero direction returns `origin`.
    pub fn exit_from(&self, origin: Vec2, dir: Vec2) -> Vec2 {
        match *self {
            NodeShape::Rect { center, half } => {
                ray_box_exit(origin, center - half, center + half, dir)
            }
            NodeShape::Circle { center, radius } => ray_circle_exit(origin, center, radius, dir),
        }
    }

    /// Distance from the center to the outline along `dir`.
    pub fn reach(&self, dir: Vec2) -> f32 {
        (self.exit(dir) - self.center()).length()
    }
}

/// Outline of `node`, or `None` while it has no usable geometry.
///
/// Anchors always produce a circle of at least `anchor_radius`.
pub fn node_shape(node: &Node, anchor_radius: f32) -> Option<NodeShape> {
    if !node.position.is_finite() {
        return None;
    }
    if node.is_anchor() {
        let half_size = node.size.x.max(node.size.y).max(0.0) * 0.5;
        return Some(NodeShape::Circle {
            center: node.center(),
            radius: half_size.max(anchor_radius),
        });
    }
    if !node.is_measured() {
        return None;
    }
    Some(NodeShape::Rect {
        center: node.center(),
        half: node.size * 0.5,
    })
}

/// Point where a ray from `center` along `dir` exits the box with the given
/// half extents. A degenerate `(0, 0)` direction returns `center`.
pub fn ray_rect_exit(center: Vec2, half_width: f32, half_height: f32, dir: Vec2) -> Vec2 {
    let half = Vec2::new(half_width.abs(), half_height.abs());
    ray_box_exit(center, center - half, center + half, dir)
}

fn ray_box_exit(origin: Vec2, min: Vec2, max: Vec2, dir: Vec2) -> Vec2 {
    if dir.x.abs() < DIRECTION_EPSILON && dir.y.abs() < DIRECTION_EPSILON {
        return origin;
    }

    let axis_t = |o: f32, d: f32, lo: f32, hi: f32| -> f32 {
        if d > DIRECTION_EPSILON {
            (hi - o) / d
        } else if d < -DIRECTION_EPSILON {
            (lo - o) / d
        } else {
            f32::INFINITY
        }
    };

    let t = axis_t(origin.x, dir.x, min.x, max.x).min(axis_t(origin.y, dir.y, min.y, max.y));
    if !t.is_finite() {
        return origin;
    }
    origin + dir * t.max(0.0)
}

fn ray_circle_exit(origin: Vec2, center: Vec2, radius: f32, dir: Vec2) -> Vec2 {
    let Some(d) = dir.normalized() else {
        return origin;
    };
    // |origin + t*d - center| = radius, take the positive root
    let oc = origin - center;
    let b = oc.dot(d);
    let c = oc.length_sq() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return origin;
    }
    let t = -b + disc.sqrt();
    origin + d * t.max(0.0)
}

fn padding_for(shape: &NodeShape, padding: f32) -> f32 {
    // small nodes get a proportionally smaller gap
    padding
        .clamp(0.0, MAX_BORDER_PADDING)
        .min(shape.min_half_extent() * 0.5)
}

/// Segment between two nodes, shortened to stop just outside both borders.
///
/// Falls back to the raw center-to-center segment when either node has no
/// measured size, when the centers coincide, or when the nodes overlap so much
/// that the trimmed ends would cross.
pub fn trimmed_line(source: &Node, target: &Node, settings: &GeometrySettings) -> LineCoords {
    let raw = LineCoords {
        source: source.center(),
        target: target.center(),
    };

    let (Some(s), Some(t)) = (
        node_shape(source, settings.anchor_radius),
        node_shape(target, settings.anchor_radius),
    ) else {
        return raw;
    };
    let Some(dir) = (t.center() - s.center()).normalized() else {
        return raw;
    };

    let start = s.exit(dir) + dir * padding_for(&s, settings.border_padding);
    let end = t.exit(-dir) - dir * padding_for(&t, settings.border_padding);

    if (end - start).dot(dir) <= 0.0 {
        return raw;
    }
    LineCoords {
        source: start,
        target: end,
    }
}

/// Midpoint between the facing borders of two nodes, used for labels.
pub fn border_midpoint(
    source: &Node,
    target: &Node,
    fallback: Vec2,
    settings: &GeometrySettings,
) -> Vec2 {
    let (Some(s), Some(t)) = (
        node_shape(source, settings.anchor_radius),
        node_shape(target, settings.anchor_radius),
    ) else {
        return fallback;
    };
    let Some(dir) = (t.center() - s.center()).normalized() else {
        return fallback;
    };

    let a = s.exit(dir);
    let b = t.exit(-dir);
    let mid = (a + b) * 0.5;
    if mid.is_finite() { mid } else { fallback }
}
