pub mod collision;
pub mod dialogue;
pub mod events;
pub mod intent;
pub mod motion;
pub mod proximity;
pub mod step;
pub mod types;

pub use collision::{CollisionMask, MaskError, MaskLoader, DEFAULT_BLACK_THRESHOLD};
pub use dialogue::{DialogueFsm, DialogueNpc, DEFAULT_ACTIVE_SPRITE_DELAY_SECONDS};
pub use events::SceneEvent;
pub use intent::{
    DirectionKeys, JoystickShape, JoystickState, MoveIntent, DEFAULT_DRAG_DEAD_ZONE_PX,
};
pub use motion::MotionParams;
pub use step::{
    advance, clamp_frame_dt, relocate_player, start_running, FrameInput, MovementEpsilons,
    SceneState, SimParams, SimScene, DEFAULT_MAX_FRAME_DT_SECONDS,
};
pub use types::{EntityBox, SpriteVariant, Vec2, WorldSize};
