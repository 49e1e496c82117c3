#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// World extent in pixels. The collision mask and all positions share this
/// coordinate space, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

/// Square axis-aligned footprint of an entity, `position` is the top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityBox {
    pub position: Vec2,
    pub size: f32,
}

impl EntityBox {
    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.position.x + self.size / 2.0,
            y: self.position.y + self.size / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpriteVariant {
    #[default]
    Base,
    Active,
}
