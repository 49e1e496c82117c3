mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use input::{InputAction, JoystickWidget, PointerGesture};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{
    follow_camera, screen_to_world, world_to_screen, world_to_screen_px, Renderer, Viewport,
};
pub use scene::{
    Banner, Camera2D, Entity, EntityDesc, EntityId, EntityIdAllocator, EntityLayer, HudState,
    InputSnapshot, Scene, SceneCommand, SceneWorld,
};
