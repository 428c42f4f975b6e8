use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use thiserror::Error;

pub mod rect;

pub use rect::Rect;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identity of a collaborator as reported by the graph store's presence data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(pub String);

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EditorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Editor {
    pub id: EditorId,
    pub name: String,
}

impl Editor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EditorId(id.into()),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return None;
        }
        Some(Vec2::new(self.x / len, self.y / len))
    }

    /// Counter-clockwise perpendicular in screen space (y grows downward).
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(non_camel_case_types)]
#[repr(i32)]
pub enum NodeKind {
    /// Ordinary statement/argument card.
    #[default]
    CONTENT,
    /// Container that visually groups other nodes.
    GROUP,
    /// Synthetic routing point sitting on another edge.
    EDGE_ANCHOR,
    /// Objection annotation, usually attached to an edge anchor.
    OBJECTION,
}

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone)]
pub enum EnumConversionError {
    #[error("Invalid NodeKind value: {0}")]
    InvalidNodeKind(i32),
    #[error("Invalid EdgeKind value: {0}")]
    InvalidEdgeKind(i32),
}

impl TryFrom<i32> for NodeKind {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NodeKind::CONTENT),
            1 => Ok(NodeKind::GROUP),
            2 => Ok(NodeKind::EDGE_ANCHOR),
            3 => Ok(NodeKind::OBJECTION),
            _ => Err(EnumConversionError::InvalidNodeKind(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(non_camel_case_types)]
#[repr(i32)]
pub enum EdgeKind {
    #[default]
    PLAIN,
    OBJECTION_LINK,
    STATEMENT_LINK,
}

impl TryFrom<i32> for EdgeKind {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EdgeKind::PLAIN),
            1 => Ok(EdgeKind::OBJECTION_LINK),
            2 => Ok(EdgeKind::STATEMENT_LINK),
            _ => Err(EnumConversionError::InvalidEdgeKind(value)),
        }
    }
}

/// A node as seen by the interaction engine.
///
/// `position` is the top-left corner in diagram coordinates. A zero `size`
/// means the renderer has not measured the node yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub kind: NodeKind,
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
    #[serde(default)]
    pub selected: bool,
    /// Back-reference from an edge anchor to the edge it sits on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_edge_id: Option<EdgeId>,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            id: NodeId(id.into()),
            kind: NodeKind::CONTENT,
            position,
            size,
            selected: false,
            parent_edge_id: None,
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn anchor(id: impl Into<String>, position: Vec2, parent_edge_id: EdgeId) -> Self {
        Self {
            id: NodeId(id.into()),
            kind: NodeKind::EDGE_ANCHOR,
            position,
            size: Vec2::ZERO,
            selected: false,
            parent_edge_id: Some(parent_edge_id),
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.kind == NodeKind::EDGE_ANCHOR
    }

    /// Whether both dimensions are known and positive.
    pub fn is_measured(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0 && self.size.is_finite()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.size.x.max(0.0) * 0.5,
            self.position.y + self.size.y.max(0.0) * 0.5,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: EdgeId(id.into()),
            source: NodeId(source.into()),
            target: NodeId(target.into()),
            kind: EdgeKind::PLAIN,
        }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// The endpoint opposite `node`, if `node` is one of the endpoints.
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}
