//! Simulation bodies and object tags

use std::fmt;
use std::ops::{Index, IndexMut};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Category of falling object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Good,
    Bad,
}

impl ObjectKind {
    /// All kinds, in spawn order
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Good, ObjectKind::Bad];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Good => "good",
            ObjectKind::Bad => "bad",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per object kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub good: T,
    pub bad: T,
}

impl<T> PerKind<T> {
    pub const fn new(good: T, bad: T) -> Self {
        Self { good, bad }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectKind, &T)> {
        [(ObjectKind::Good, &self.good), (ObjectKind::Bad, &self.bad)].into_iter()
    }
}

impl<T> Index<ObjectKind> for PerKind<T> {
    type Output = T;

    fn index(&self, kind: ObjectKind) -> &T {
        match kind {
            ObjectKind::Good => &self.good,
            ObjectKind::Bad => &self.bad,
        }
    }
}

impl<T> IndexMut<ObjectKind> for PerKind<T> {
    fn index_mut(&mut self, kind: ObjectKind) -> &mut T {
        match kind {
            ObjectKind::Good => &mut self.good,
            ObjectKind::Bad => &mut self.bad,
        }
    }
}

/// Kind and display slot of a falling object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectTag {
    pub kind: ObjectKind,
    pub index: usize,
}

impl ObjectTag {
    pub const fn new(kind: ObjectKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)
    }
}

/// Stable body identifier (never reused within a world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// What a body is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Falling object bound to a display slot
    Object(ObjectTag),
    /// Catcher sensing zone
    Catcher,
    /// Floor
    Boundary,
}

impl BodyKind {
    /// Static bodies are never moved by the integrator
    pub fn is_static(&self) -> bool {
        !matches!(self, BodyKind::Object(_))
    }

    pub fn tag(&self) -> Option<ObjectTag> {
        match self {
            BodyKind::Object(tag) => Some(*tag),
            _ => None,
        }
    }
}

/// Collision shape, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// A body in simulation space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn tag(&self) -> Option<ObjectTag> {
        self.kind.tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(ObjectTag::new(ObjectKind::Good, 7).to_string(), "good:7");
        assert_eq!(ObjectTag::new(ObjectKind::Bad, 3).to_string(), "bad:3");
    }

    #[test]
    fn test_per_kind_index() {
        let mut table = PerKind::new(1, 2);
        table[ObjectKind::Bad] += 5;
        assert_eq!(table[ObjectKind::Good], 1);
        assert_eq!(table.bad, 7);
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn test_static_kinds() {
        let tag = ObjectTag::new(ObjectKind::Good, 0);
        assert!(!BodyKind::Object(tag).is_static());
        assert!(BodyKind::Catcher.is_static());
        assert!(BodyKind::Boundary.is_static());
        assert_eq!(BodyKind::Boundary.tag(), None);
    }
}
