use super::types::{SpriteVariant, Vec2};

/// Changes produced by one simulation frame. NPCs are addressed by their
/// index in descriptor order; the presentation layer maps indices to its own
/// handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    PlayerMoved { position: Vec2 },
    PlayerRelocated { position: Vec2 },
    SpriteChanged { npc: usize, variant: SpriteVariant },
    BubbleShown { npc: usize },
    BubbleHidden { npc: usize },
    PlaySound { npc: usize },
    NpcMet { npc: usize, remaining: usize },
}
