//! One frame of the walkabout: input, motion, proximity, then dialogue.

use super::collision::CollisionMask;
use super::dialogue::{DialogueFsm, DialogueNpc};
use super::events::SceneEvent;
use super::intent::{DirectionKeys, JoystickState, MoveIntent};
use super::motion::{self, MotionParams};
use super::proximity;
use super::types::{EntityBox, Vec2};

pub const DEFAULT_MAX_FRAME_DT_SECONDS: f32 = 0.05;

/// Thresholds that decide whether the player counts as moving this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementEpsilons {
    pub displacement_px: f32,
    pub input_mag: f32,
    pub intent_mag: f32,
}

impl Default for MovementEpsilons {
    fn default() -> Self {
        Self {
            displacement_px: 0.25,
            input_mag: 0.04,
            intent_mag: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub motion: MotionParams,
    pub proximity_px: f32,
    pub max_frame_dt_seconds: f32,
    pub epsilons: MovementEpsilons,
}

/// Immutable scene layout the simulation runs against.
#[derive(Debug, Clone, PartialEq)]
pub struct SimScene {
    pub params: SimParams,
    pub npc_boxes: Vec<EntityBox>,
    pub npc_dialogue: Vec<DialogueNpc>,
}

impl SimScene {
    pub fn npc_count(&self) -> usize {
        self.npc_boxes.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub dt_seconds: f32,
    pub keys: DirectionKeys,
    pub joystick: JoystickState,
}

/// Everything that changes frame to frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub player: Vec2,
    pub collision_enabled: bool,
    pub running: bool,
    pub dialogue: DialogueFsm,
}

impl SceneState {
    pub fn new(player: Vec2, npc_count: usize, active_sprite_delay_seconds: f32) -> Self {
        Self {
            player,
            collision_enabled: true,
            running: false,
            dialogue: DialogueFsm::new(npc_count, active_sprite_delay_seconds),
        }
    }

    pub fn player_box(&self, scene: &SimScene) -> EntityBox {
        motion::entity_box(self.player, &scene.params.motion)
    }
}

/// Clamps a measured frame delta into `[0, max]`. Non-finite deltas count as
/// an empty frame.
pub fn clamp_frame_dt(dt_seconds: f32, max_seconds: f32) -> f32 {
    if !dt_seconds.is_finite() {
        return 0.0;
    }
    dt_seconds.max(0.0).min(max_seconds.max(0.0))
}

pub fn advance(
    mut state: SceneState,
    input: &FrameInput,
    scene: &SimScene,
    mask: &CollisionMask,
) -> (SceneState, Vec<SceneEvent>) {
    let mut events = Vec::new();
    let params = &scene.params;
    let dt = clamp_frame_dt(input.dt_seconds, params.max_frame_dt_seconds);

    let (keys, joystick) = if state.running {
        (input.keys, input.joystick)
    } else {
        (DirectionKeys::default(), JoystickState::released())
    };
    let intent = MoveIntent::aggregate(keys, &joystick);

    let before = state.player;
    let after = motion::step(
        before,
        intent,
        dt,
        &params.motion,
        mask,
        state.collision_enabled,
    );
    if after != before {
        state.player = after;
        events.push(SceneEvent::PlayerMoved { position: after });
    }

    let moved_by_position = motion::displacement(before, after) > params.epsilons.displacement_px;
    let moved_by_input = intent.mag > params.epsilons.input_mag;
    let moved_by_intent =
        keys.any() || (joystick.engaged && joystick.intent_mag > params.epsilons.intent_mag);
    let player_moving = moved_by_intent || moved_by_input || moved_by_position;

    let player_center = state.player_box(scene).center();
    let nearest = proximity::nearest(player_center, &scene.npc_boxes);
    let active = proximity::select_active(nearest, params.proximity_px);
    state
        .dialogue
        .set_active(active, &scene.npc_dialogue, &mut events);

    state
        .dialogue
        .update_sprite(dt, player_moving, &scene.npc_dialogue, &mut events);
    state.dialogue.update_bubble(dt, &mut events);

    (state, events)
}

/// Moves the player out of a wall when the mask is ready and collision is
/// on. Called when the mask arrives and when collision is re-enabled.
pub fn relocate_player(
    state: &mut SceneState,
    scene: &SimScene,
    mask: &CollisionMask,
) -> Option<SceneEvent> {
    if !state.collision_enabled {
        return None;
    }
    let position = motion::relocate_if_stuck(state.player, &scene.params.motion, mask)?;
    state.player = position;
    Some(SceneEvent::PlayerRelocated { position })
}

/// Starts the game: clears any active NPC and lets input through.
pub fn start_running(state: &mut SceneState) -> Vec<SceneEvent> {
    let mut events = Vec::new();
    if state.running {
        return events;
    }
    state.running = true;
    state.dialogue.reset(&mut events);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::DEFAULT_BLACK_THRESHOLD;
    use crate::sim::types::WorldSize;

    fn scene(npcs: &[(f32, f32, f32, f32)]) -> SimScene {
        SimScene {
            params: SimParams {
                motion: MotionParams {
                    speed_px_per_second: 100.0,
                    entity_size: 10.0,
                    foot_inset_px: 2.0,
                    world: WorldSize {
                        width: 200.0,
                        height: 200.0,
                    },
                },
                proximity_px: 20.0,
                max_frame_dt_seconds: 1.0,
                epsilons: MovementEpsilons::default(),
            },
            npc_boxes: npcs
                .iter()
                .map(|&(x, y, size, _)| EntityBox {
                    position: Vec2::new(x, y),
                    size,
                })
                .collect(),
            npc_dialogue: npcs
                .iter()
                .map(|&(_, _, _, delay)| DialogueNpc {
                    has_active_sprite: true,
                    reveal_delay_seconds: delay,
                    has_sound: false,
                })
                .collect(),
        }
    }

    fn running_state(player: Vec2, scene: &SimScene) -> SceneState {
        let mut state = SceneState::new(player, scene.npc_count(), 5.0);
        state.running = true;
        state
    }

    fn input(dt: f32, keys: DirectionKeys) -> FrameInput {
        FrameInput {
            dt_seconds: dt,
            keys,
            joystick: JoystickState::released(),
        }
    }

    fn right() -> DirectionKeys {
        DirectionKeys {
            right: true,
            ..DirectionKeys::default()
        }
    }

    #[test]
    fn frame_delta_is_clamped() {
        assert_eq!(clamp_frame_dt(0.2, 0.05), 0.05);
        assert_eq!(clamp_frame_dt(-1.0, 0.05), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN, 0.05), 0.0);
        assert_eq!(clamp_frame_dt(0.016, 0.05), 0.016);
    }

    #[test]
    fn large_delta_moves_at_most_max_dt_worth() {
        let mut scene = scene(&[]);
        scene.params.max_frame_dt_seconds = 0.05;
        let state = running_state(Vec2::new(10.0, 10.0), &scene);
        let (state, _) = advance(state, &input(3.0, right()), &scene, &CollisionMask::disabled());
        assert!((state.player.x - 15.0).abs() < 1e-4);
    }

    #[test]
    fn input_is_ignored_until_running() {
        let scene = scene(&[]);
        let state = SceneState::new(Vec2::new(10.0, 10.0), 0, 5.0);
        let (state, events) =
            advance(state, &input(0.1, right()), &scene, &CollisionMask::disabled());
        assert_eq!(state.player, Vec2::new(10.0, 10.0));
        assert!(events.is_empty());
    }

    #[test]
    fn walking_into_range_activates_nearest_npc() {
        // NPC center (55, 5); player center starts at (15, 5) and walks right.
        let scene = scene(&[(50.0, 0.0, 10.0, 0.0)]);
        let mut state = running_state(Vec2::new(10.0, 0.0), &scene);
        let mut shown_at = None;
        for frame in 0..10 {
            let (next, events) =
                advance(state, &input(0.05, right()), &scene, &CollisionMask::disabled());
            state = next;
            if events.contains(&SceneEvent::BubbleShown { npc: 0 }) {
                shown_at = Some(frame);
                break;
            }
        }
        // 5 px per frame; distance 40 -> 20 after four frames.
        assert_eq!(shown_at, Some(3));
        assert_eq!(state.dialogue.active(), Some(0));
        assert_eq!(state.dialogue.remaining(), 0);
    }

    #[test]
    fn delayed_reveal_counts_the_activation_frame() {
        let scene = scene(&[(0.0, 0.0, 10.0, 1.7)]);
        let mut state = running_state(Vec2::new(0.0, 0.0), &scene);
        let idle = input(0.5, DirectionKeys::default());
        let mut revealed_on = None;
        for frame in 1..=5 {
            let (next, events) = advance(state, &idle, &scene, &CollisionMask::disabled());
            state = next;
            if events.contains(&SceneEvent::BubbleShown { npc: 0 }) {
                revealed_on.get_or_insert(frame);
            }
        }
        assert_eq!(revealed_on, Some(4));
    }

    #[test]
    fn held_keys_count_as_moving_even_when_blocked() {
        let mask_rgba: Vec<u8> = std::iter::repeat([0u8, 0, 0, 255])
            .take(200 * 200)
            .flatten()
            .collect();
        let mask =
            CollisionMask::from_rgba(200, 200, &mask_rgba, DEFAULT_BLACK_THRESHOLD).expect("mask");
        let scene = scene(&[(0.0, 0.0, 10.0, 0.0)]);
        let mut state = running_state(Vec2::new(0.0, 0.0), &scene);
        let mut events = Vec::new();
        for _ in 0..10 {
            let (next, frame_events) = advance(state, &input(1.0, right()), &scene, &mask);
            state = next;
            events.extend(frame_events);
        }
        assert_eq!(state.player, Vec2::new(0.0, 0.0));
        assert!(!events
            .iter()
            .any(|event| matches!(event, SceneEvent::SpriteChanged { .. })));
    }

    #[test]
    fn standing_still_swaps_sprite_after_delay() {
        let scene = scene(&[(0.0, 0.0, 10.0, 0.0)]);
        let mut state = running_state(Vec2::new(0.0, 0.0), &scene);
        let idle = input(1.0, DirectionKeys::default());
        let mut swapped_on = None;
        for frame in 1..=6 {
            let (next, events) = advance(state, &idle, &scene, &CollisionMask::disabled());
            state = next;
            if events.iter().any(|event| {
                matches!(
                    event,
                    SceneEvent::SpriteChanged {
                        variant: crate::sim::types::SpriteVariant::Active,
                        ..
                    }
                )
            }) {
                swapped_on.get_or_insert(frame);
            }
        }
        assert_eq!(swapped_on, Some(5));
    }

    #[test]
    fn relocation_respects_collision_toggle() {
        let rgba: Vec<u8> = (0..200 * 200)
            .flat_map(|i| {
                if i % 200 < 50 {
                    [0u8, 0, 0, 255]
                } else {
                    [255, 255, 255, 255]
                }
            })
            .collect();
        let mask =
            CollisionMask::from_rgba(200, 200, &rgba, DEFAULT_BLACK_THRESHOLD).expect("mask");
        let scene = scene(&[]);
        let mut state = running_state(Vec2::new(10.0, 10.0), &scene);

        state.collision_enabled = false;
        assert!(relocate_player(&mut state, &scene, &mask).is_none());

        state.collision_enabled = true;
        let event = relocate_player(&mut state, &scene, &mask).expect("relocated");
        assert_eq!(
            event,
            SceneEvent::PlayerRelocated {
                position: state.player
            }
        );
        assert!(state.player.x + 5.0 >= 50.0);
    }

    #[test]
    fn starting_clears_active_npc_once() {
        let scene = scene(&[(0.0, 0.0, 10.0, 0.0)]);
        let mut state = SceneState::new(Vec2::new(0.0, 0.0), 1, 5.0);
        let (next, events) = advance(
            state,
            &input(0.016, DirectionKeys::default()),
            &scene,
            &CollisionMask::disabled(),
        );
        state = next;
        assert!(events.contains(&SceneEvent::BubbleShown { npc: 0 }));

        let events = start_running(&mut state);
        assert_eq!(events, vec![SceneEvent::BubbleHidden { npc: 0 }]);
        assert!(state.running);
        assert_eq!(state.dialogue.active(), None);
        assert!(start_running(&mut state).is_empty());
    }
}
