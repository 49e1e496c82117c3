use super::events::SceneEvent;
use super::types::SpriteVariant;

pub const DEFAULT_ACTIVE_SPRITE_DELAY_SECONDS: f32 = 5.0;

/// What the dialogue machine needs to know about one NPC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogueNpc {
    pub has_active_sprite: bool,
    pub reveal_delay_seconds: f32,
    pub has_sound: bool,
}

impl DialogueNpc {
    fn reveal_target(&self) -> f32 {
        if self.reveal_delay_seconds.is_finite() {
            self.reveal_delay_seconds.max(0.0)
        } else {
            0.0
        }
    }
}

/// Timers and flags for whichever NPC is currently active.
///
/// Only one NPC can be active, so a single set of timers covers all of them.
/// Every change of the active NPC (including to none) zeroes both timers.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueFsm {
    active_sprite_delay_seconds: f32,
    active: Option<usize>,
    still_seconds: f32,
    sprite_active_applied: bool,
    bubble_delay_seconds: f32,
    bubble_target_seconds: f32,
    bubble_shown: bool,
    met: Vec<bool>,
    met_count: usize,
}

impl DialogueFsm {
    pub fn new(npc_count: usize, active_sprite_delay_seconds: f32) -> Self {
        Self {
            active_sprite_delay_seconds,
            active: None,
            still_seconds: 0.0,
            sprite_active_applied: false,
            bubble_delay_seconds: 0.0,
            bubble_target_seconds: 0.0,
            bubble_shown: false,
            met: vec![false; npc_count],
            met_count: 0,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn still_seconds(&self) -> f32 {
        self.still_seconds
    }

    pub fn bubble_delay_seconds(&self) -> f32 {
        self.bubble_delay_seconds
    }

    pub fn bubble_shown(&self) -> bool {
        self.bubble_shown
    }

    pub fn sprite_active_applied(&self) -> bool {
        self.sprite_active_applied
    }

    pub fn total(&self) -> usize {
        self.met.len()
    }

    pub fn remaining(&self) -> usize {
        self.met.len().saturating_sub(self.met_count)
    }

    pub fn has_met(&self, npc: usize) -> bool {
        self.met.get(npc).copied().unwrap_or(false)
    }

    pub fn set_active(
        &mut self,
        next: Option<usize>,
        npcs: &[DialogueNpc],
        events: &mut Vec<SceneEvent>,
    ) {
        if self.active == next {
            return;
        }
        self.deactivate(events);

        let Some((index, npc)) = next.and_then(|index| npcs.get(index).map(|npc| (index, npc)))
        else {
            return;
        };

        self.active = Some(index);
        self.bubble_target_seconds = npc.reveal_target();
        if self.bubble_target_seconds <= 0.0 {
            self.reveal(index, events);
        }
        if npc.has_sound {
            events.push(SceneEvent::PlaySound { npc: index });
        }
    }

    /// Swaps to the active sprite after the player has stood still next to
    /// the NPC for the configured delay. Movement snaps back to base.
    pub fn update_sprite(
        &mut self,
        dt_seconds: f32,
        player_moving: bool,
        npcs: &[DialogueNpc],
        events: &mut Vec<SceneEvent>,
    ) {
        let Some(index) = self.active else {
            self.reset_still();
            return;
        };
        if !npcs.get(index).is_some_and(|npc| npc.has_active_sprite) {
            self.reset_still();
            return;
        }

        if player_moving {
            if self.sprite_active_applied {
                events.push(SceneEvent::SpriteChanged {
                    npc: index,
                    variant: SpriteVariant::Base,
                });
            }
            self.reset_still();
            return;
        }

        self.still_seconds += dt_seconds;
        if !self.sprite_active_applied && self.still_seconds >= self.active_sprite_delay_seconds {
            self.sprite_active_applied = true;
            events.push(SceneEvent::SpriteChanged {
                npc: index,
                variant: SpriteVariant::Active,
            });
        }
    }

    pub fn update_bubble(&mut self, dt_seconds: f32, events: &mut Vec<SceneEvent>) {
        let Some(index) = self.active else {
            return;
        };
        if self.bubble_shown {
            return;
        }
        self.bubble_delay_seconds += dt_seconds;
        if self.bubble_delay_seconds >= self.bubble_target_seconds {
            self.reveal(index, events);
        }
    }

    /// Drops the active NPC without touching the met set.
    pub fn reset(&mut self, events: &mut Vec<SceneEvent>) {
        self.deactivate(events);
    }

    fn deactivate(&mut self, events: &mut Vec<SceneEvent>) {
        if let Some(previous) = self.active.take() {
            if self.sprite_active_applied {
                events.push(SceneEvent::SpriteChanged {
                    npc: previous,
                    variant: SpriteVariant::Base,
                });
            }
            if self.bubble_shown {
                events.push(SceneEvent::BubbleHidden { npc: previous });
            }
        }
        self.reset_still();
        self.bubble_delay_seconds = 0.0;
        self.bubble_target_seconds = 0.0;
        self.bubble_shown = false;
    }

    fn reset_still(&mut self) {
        self.still_seconds = 0.0;
        self.sprite_active_applied = false;
    }

    fn reveal(&mut self, index: usize, events: &mut Vec<SceneEvent>) {
        self.bubble_shown = true;
        events.push(SceneEvent::BubbleShown { npc: index });
        if let Some(met) = self.met.get_mut(index) {
            if !*met {
                *met = true;
                self.met_count += 1;
                events.push(SceneEvent::NpcMet {
                    npc: index,
                    remaining: self.remaining(),
                });
            }
        }
    }
}
