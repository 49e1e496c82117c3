use crate::app::Camera2D;
use crate::sim::{Vec2, WorldSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

pub fn world_to_screen(world: Vec2, camera: &Camera2D) -> (f32, f32) {
    let zoom = camera.effective_zoom();
    (
        world.x * zoom + camera.translation.x,
        world.y * zoom + camera.translation.y,
    )
}

pub fn world_to_screen_px(world: Vec2, camera: &Camera2D) -> (i32, i32) {
    let (x, y) = world_to_screen(world, camera);
    (x.round() as i32, y.round() as i32)
}

pub fn screen_to_world(screen_x: f32, screen_y: f32, camera: &Camera2D) -> Vec2 {
    let zoom = camera.effective_zoom();
    Vec2::new(
        (screen_x - camera.translation.x) / zoom,
        (screen_y - camera.translation.y) / zoom,
    )
}

/// Centers `focus` (a world point) in the viewport, then clamps so the view
/// never leaves the world. When the scaled world is smaller than the
/// viewport on an axis, the world pins to the top/left edge.
pub fn follow_camera(focus: Vec2, world: WorldSize, viewport: Viewport, zoom: f32) -> Camera2D {
    let mut camera = Camera2D {
        translation: Vec2::ZERO,
        zoom,
    };
    let zoom = camera.effective_zoom();
    camera.translation = Vec2::new(
        clamp_axis(
            viewport.width as f32 / 2.0 - focus.x * zoom,
            viewport.width as f32 - world.width * zoom,
            0.0,
        ),
        clamp_axis(
            viewport.height as f32 / 2.0 - focus.y * zoom,
            viewport.height as f32 - world.height * zoom,
            0.0,
        ),
    );
    camera
}

/// `min` wins over `max` when the range is inverted.
fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
