use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::input::JoystickWidget;
use crate::app::tools::{draw_overlay, OverlayData};
use crate::app::{Banner, Camera2D, Entity, EntityLayer, SceneWorld};
use crate::content::{asset_path, SpanStyle};
use crate::sim::Vec2;

use super::raster::{
    blend_pixel_rgba_clipped, fill_circle, fill_rect, rect_outline, write_pixel_rgba_clipped,
};
use super::text::{
    draw_char_clipped, draw_text_clipped, glyph_advance, line_advance, text_width_px, wrap_spans,
};
use super::transform::world_to_screen;
use super::Viewport;

const CLEAR_COLOR: [u8; 4] = [12, 14, 20, 255];
const PLACEHOLDER_COLOR: [u8; 4] = [220, 220, 240, 255];
pub(crate) const MASK_OVERLAY_OPACITY: f32 = 0.35;

const BUBBLE_TEXT_SCALE: i32 = 2;
const BUBBLE_MAX_CELLS: usize = 26;
const BUBBLE_PADDING_PX: i32 = 8;
const BUBBLE_TAIL_PX: i32 = 6;
const BUBBLE_GAP_PX: i32 = 4;
const BUBBLE_BG_COLOR: [u8; 4] = [252, 250, 244, 240];
const BUBBLE_BORDER_COLOR: [u8; 4] = [40, 36, 48, 255];
const BUBBLE_TEXT_COLOR: [u8; 4] = [30, 28, 36, 255];
const BUBBLE_CODE_TEXT_COLOR: [u8; 4] = [176, 38, 92, 255];
const BUBBLE_CODE_BG_COLOR: [u8; 4] = [236, 228, 240, 255];

const COUNTER_TEXT_SCALE: i32 = 3;
const COUNTER_MARGIN_PX: i32 = 16;
const COUNTER_PADDING_PX: i32 = 8;
const HUD_PANEL_COLOR: [u8; 4] = [10, 12, 16, 190];
const HUD_TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];

const BANNER_DIM_COLOR: [u8; 4] = [6, 6, 10, 200];
const BANNER_TITLE_SCALE: i32 = 5;
const BANNER_HINT_SCALE: i32 = 2;

const JOYSTICK_BASE_COLOR: [u8; 4] = [255, 255, 255, 60];
const JOYSTICK_KNOB_COLOR: [u8; 4] = [255, 255, 255, 150];
const JOYSTICK_KNOB_FRACTION: f32 = 0.22;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Destination rectangle in screen pixels, before clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenRect {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels =
            Self::build_pixels(Arc::clone(&window), size.width.max(1), size.height.max(1))?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width.max(1),
                height: size.height.max(1),
            },
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        for key in referenced_sprite_keys(world) {
            ensure_sprite_cached(
                &mut self.sprite_cache,
                &mut self.warned_missing_sprite_keys,
                &self.asset_root,
                key,
            );
        }

        let width = self.viewport.width;
        let height = self.viewport.height;
        let cache = &self.sprite_cache;
        let frame = self.pixels.frame_mut();
        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&CLEAR_COLOR);
        }

        let camera = *world.camera();
        let world_rect = world_screen_rect(world, &camera);
        let cached =
            |key: Option<&str>| key.and_then(|key| cache.get(key)).and_then(Option::as_ref);

        if let Some(sprite) = cached(world.background_key()) {
            draw_sprite_stretched(frame, width, height, sprite, world_rect, 1.0);
        }
        for entity in world.entities_in_layer(EntityLayer::Ground) {
            let sprite = cached(Some(entity.sprite_key.as_str()));
            draw_entity(frame, width, height, entity, &camera, sprite);
        }
        if let Some(sprite) = cached(world.foreground_key()) {
            draw_sprite_stretched(frame, width, height, sprite, world_rect, 1.0);
        }
        if let Some(sprite) = cached(world.mask_overlay_key()) {
            draw_sprite_stretched(frame, width, height, sprite, world_rect, MASK_OVERLAY_OPACITY);
        }
        for entity in world.entities_in_layer(EntityLayer::Raised) {
            let sprite = cached(Some(entity.sprite_key.as_str()));
            draw_entity(frame, width, height, entity, &camera, sprite);
        }
        for entity in world.entities() {
            draw_bubble(frame, width, height, entity, &camera);
        }

        let hud = world.hud();
        if let Some(knob) = hud.joystick_knob {
            draw_joystick(frame, width, height, knob);
        }
        if let Some(counter) = hud.counter.as_deref() {
            draw_counter(frame, width, height, counter);
        }
        if let Some(banner) = hud.banner.as_ref() {
            draw_banner(frame, width, height, banner);
        }
        if let Some(overlay) = overlay {
            draw_overlay(frame, width, height, overlay);
        }

        self.pixels.render().map_err(|error| {
            warn!(error = %error, "renderer_present_failed");
            error
        })
    }
}

fn referenced_sprite_keys(world: &SceneWorld) -> Vec<&str> {
    let mut keys: Vec<&str> = [
        world.background_key(),
        world.foreground_key(),
        world.mask_overlay_key(),
    ]
    .into_iter()
    .flatten()
    .collect();
    keys.extend(world.entities().iter().map(|entity| entity.sprite_key.as_str()));
    keys
}

fn world_screen_rect(world: &SceneWorld, camera: &Camera2D) -> ScreenRect {
    let zoom = camera.effective_zoom();
    let size = world.world_size();
    ScreenRect {
        left: camera.translation.x,
        top: camera.translation.y,
        width: size.width * zoom,
        height: size.height * zoom,
    }
}

/// Screen rectangle of an entity's square footprint.
fn entity_screen_rect(entity: &Entity, camera: &Camera2D) -> ScreenRect {
    let (left, top) = world_to_screen(entity.position, camera);
    let side = entity.size * camera.effective_zoom();
    ScreenRect {
        left,
        top,
        width: side,
        height: side,
    }
}

/// Largest rect with the sprite's aspect ratio that fits `bounds`, centered.
fn contain_rect(bounds: ScreenRect, sprite_width: u32, sprite_height: u32) -> ScreenRect {
    if sprite_width == 0 || sprite_height == 0 {
        return bounds;
    }
    let scale = (bounds.width / sprite_width as f32).min(bounds.height / sprite_height as f32);
    let width = sprite_width as f32 * scale;
    let height = sprite_height as f32 * scale;
    ScreenRect {
        left: bounds.left + (bounds.width - width) / 2.0,
        top: bounds.top + (bounds.height - height) / 2.0,
        width,
        height,
    }
}

fn draw_entity(
    frame: &mut [u8],
    width: u32,
    height: u32,
    entity: &Entity,
    camera: &Camera2D,
    sprite: Option<&LoadedSprite>,
) {
    let bounds = entity_screen_rect(entity, camera);
    match sprite {
        Some(sprite) => {
            let rect = contain_rect(bounds, sprite.width, sprite.height);
            draw_sprite_stretched(frame, width, height, sprite, rect, 1.0);
        }
        None => fill_rect(
            frame,
            width,
            height,
            bounds.left.round() as i32,
            bounds.top.round() as i32,
            bounds.width.round() as i32,
            bounds.height.round() as i32,
            PLACEHOLDER_COLOR,
        ),
    }
}

fn ensure_sprite_cached(
    cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) {
    if cache.contains_key(key) {
        return;
    }
    let sprite = match asset_path(asset_root, key) {
        Ok(path) => match load_sprite_rgba(&path) {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                warn_sprite_load_once(
                    warned_missing_sprite_keys,
                    key,
                    Some(path.as_path()),
                    reason.as_str(),
                );
                None
            }
        },
        Err(error) => {
            let reason = format!("invalid_key:{error}");
            warn_sprite_load_once(warned_missing_sprite_keys, key, None, reason.as_str());
            None
        }
    };
    cache.insert(key.to_string(), sprite);
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<String>,
    key: &str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        sprite_key = key,
        path = %path_display,
        reason = reason,
        "renderer_sprite_load_failed_using_placeholder"
    );
}

/// Nearest-neighbour blit of `sprite` stretched over `rect`. Only the part
/// of `rect` inside the frame is visited.
fn draw_sprite_stretched(
    frame: &mut [u8],
    width: u32,
    height: u32,
    sprite: &LoadedSprite,
    rect: ScreenRect,
    opacity: f32,
) {
    if sprite.width == 0 || sprite.height == 0 || width == 0 || height == 0 {
        return;
    }
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let left = rect.left.round() as i32;
    let top = rect.top.round() as i32;
    let right = (rect.left + rect.width).round() as i32;
    let bottom = (rect.top + rect.height).round() as i32;
    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = right.min(width as i32);
    let draw_bottom = bottom.min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let x_ratio = sprite.width as f32 / (right - left).max(1) as f32;
    let y_ratio = sprite.height as f32 / (bottom - top).max(1) as f32;
    let sprite_width = sprite.width as usize;
    let frame_width = width as usize;
    let opaque_blit = opacity >= 1.0;

    for out_y in draw_top..draw_bottom {
        let src_y = (((out_y - top) as f32) * y_ratio).floor() as u32;
        let src_y = src_y.min(sprite.height - 1) as usize;
        let src_row_offset = src_y * sprite_width * 4;

        for out_x in draw_left..draw_right {
            let src_x = (((out_x - left) as f32) * x_ratio).floor() as u32;
            let src_x = src_x.min(sprite.width - 1) as usize;
            let src_offset = src_row_offset + src_x * 4;
            let color = [
                sprite.rgba[src_offset],
                sprite.rgba[src_offset + 1],
                sprite.rgba[src_offset + 2],
                sprite.rgba[src_offset + 3],
            ];
            if color[3] == 0 {
                continue;
            }
            if opaque_blit && color[3] == 255 {
                write_pixel_rgba_clipped(frame, frame_width, out_x, out_y, color);
            } else {
                blend_pixel_rgba_clipped(frame, frame_width, out_x, out_y, color, opacity);
            }
        }
    }
}

fn draw_bubble(frame: &mut [u8], width: u32, height: u32, entity: &Entity, camera: &Camera2D) {
    let Some(spans) = entity.bubble.as_ref() else {
        return;
    };
    let lines = wrap_spans(spans, BUBBLE_MAX_CELLS);
    if lines.is_empty() {
        return;
    }

    let anchor = entity_screen_rect(entity, camera);
    let longest = lines.iter().map(Vec::len).max().unwrap_or(0) as i32;
    let box_width = longest * glyph_advance(BUBBLE_TEXT_SCALE) + BUBBLE_PADDING_PX * 2;
    let box_height = lines.len() as i32 * line_advance(BUBBLE_TEXT_SCALE) + BUBBLE_PADDING_PX * 2;
    let tail_x = (anchor.left + anchor.width / 2.0).round() as i32;
    let box_bottom = anchor.top.round() as i32 - BUBBLE_GAP_PX - BUBBLE_TAIL_PX;
    let (box_left, box_top) = place_bubble(
        tail_x - box_width / 2,
        box_bottom - box_height,
        box_width,
        box_height,
        width,
        height,
    );

    fill_rect(frame, width, height, box_left, box_top, box_width, box_height, BUBBLE_BG_COLOR);
    rect_outline(
        frame,
        width,
        height,
        box_left,
        box_top,
        box_width,
        box_height,
        BUBBLE_BORDER_COLOR,
    );
    let tail_top = box_top + box_height;
    let frame_width = width as usize;
    for row in 0..BUBBLE_TAIL_PX {
        let half = BUBBLE_TAIL_PX - row;
        let y = tail_top + row;
        fill_rect(frame, width, height, tail_x - half, y, half * 2, 1, BUBBLE_BG_COLOR);
        write_pixel_rgba_clipped(frame, frame_width, tail_x - half, y, BUBBLE_BORDER_COLOR);
        write_pixel_rgba_clipped(frame, frame_width, tail_x + half - 1, y, BUBBLE_BORDER_COLOR);
    }

    let advance = glyph_advance(BUBBLE_TEXT_SCALE);
    let mut y = box_top + BUBBLE_PADDING_PX;
    for line in &lines {
        let mut x = box_left + BUBBLE_PADDING_PX;
        for &(ch, style) in line {
            let color = match style {
                SpanStyle::Plain => BUBBLE_TEXT_COLOR,
                SpanStyle::Code => {
                    fill_rect(
                        frame,
                        width,
                        height,
                        x - BUBBLE_TEXT_SCALE / 2,
                        y - BUBBLE_TEXT_SCALE,
                        advance,
                        line_advance(BUBBLE_TEXT_SCALE),
                        BUBBLE_CODE_BG_COLOR,
                    );
                    BUBBLE_CODE_TEXT_COLOR
                }
            };
            draw_char_clipped(frame, width, height, x, y, ch, BUBBLE_TEXT_SCALE, color);
            x += advance;
        }
        y += line_advance(BUBBLE_TEXT_SCALE);
    }
}

/// Keeps a bubble inside the viewport when it fits; otherwise pins it to
/// the top-left.
fn place_bubble(
    left: i32,
    top: i32,
    box_width: i32,
    box_height: i32,
    width: u32,
    height: u32,
) -> (i32, i32) {
    let max_left = (width as i32 - box_width).max(0);
    let max_top = (height as i32 - box_height).max(0);
    (left.clamp(0, max_left), top.clamp(0, max_top))
}

fn draw_counter(frame: &mut [u8], width: u32, height: u32, text: &str) {
    let text_width = text_width_px(text, COUNTER_TEXT_SCALE);
    let panel_width = text_width + COUNTER_PADDING_PX * 2;
    let panel_height = line_advance(COUNTER_TEXT_SCALE) + COUNTER_PADDING_PX;
    let left = width as i32 - COUNTER_MARGIN_PX - panel_width;
    let top = COUNTER_MARGIN_PX;
    fill_rect(frame, width, height, left, top, panel_width, panel_height, HUD_PANEL_COLOR);
    draw_text_clipped(
        frame,
        width,
        height,
        left + COUNTER_PADDING_PX,
        top + COUNTER_PADDING_PX,
        text,
        COUNTER_TEXT_SCALE,
        HUD_TEXT_COLOR,
    );
}

fn draw_banner(frame: &mut [u8], width: u32, height: u32, banner: &Banner) {
    fill_rect(frame, width, height, 0, 0, width as i32, height as i32, BANNER_DIM_COLOR);
    let center_x = width as i32 / 2;
    let center_y = height as i32 / 2;

    let title_y = center_y - line_advance(BANNER_TITLE_SCALE);
    let title_x = center_x - text_width_px(&banner.title, BANNER_TITLE_SCALE) / 2;
    draw_text_clipped(
        frame,
        width,
        height,
        title_x,
        title_y,
        &banner.title,
        BANNER_TITLE_SCALE,
        HUD_TEXT_COLOR,
    );

    let hint_y = center_y + line_advance(BANNER_HINT_SCALE);
    let hint_x = center_x - text_width_px(&banner.hint, BANNER_HINT_SCALE) / 2;
    draw_text_clipped(
        frame,
        width,
        height,
        hint_x,
        hint_y,
        &banner.hint,
        BANNER_HINT_SCALE,
        HUD_TEXT_COLOR,
    );
}

fn draw_joystick(frame: &mut [u8], width: u32, height: u32, knob_offset: (f32, f32)) {
    let widget = JoystickWidget::for_window(width, height);
    let cx = widget.center_x.round() as i32;
    let cy = widget.center_y.round() as i32;
    let base_radius = (widget.size / 2.0).round() as i32;
    fill_circle(frame, width, height, cx, cy, base_radius, JOYSTICK_BASE_COLOR);
    let knob = Vec2::new(knob_offset.0, knob_offset.1);
    fill_circle(
        frame,
        width,
        height,
        cx + knob.x.round() as i32,
        cy + knob.y.round() as i32,
        (widget.size * JOYSTICK_KNOB_FRACTION).round() as i32,
        JOYSTICK_KNOB_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EntityDesc;
    use crate::content::parse_rich_text;

    fn sprite(width: u32, height: u32, color: [u8; 4]) -> LoadedSprite {
        LoadedSprite {
            width,
            height,
            rgba: color
                .iter()
                .copied()
                .cycle()
                .take(width as usize * height as usize * 4)
                .collect(),
        }
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn renderer_type_is_non_generic() {
        let _ = std::mem::size_of::<Renderer>();
    }

    #[test]
    fn stretched_blit_covers_destination_and_clips() {
        let mut frame = vec![0u8; 10 * 10 * 4];
        let red = sprite(2, 2, [255, 0, 0, 255]);
        let rect = ScreenRect {
            left: -5.0,
            top: 5.0,
            width: 20.0,
            height: 20.0,
        };
        draw_sprite_stretched(&mut frame, 10, 10, &red, rect, 1.0);
        assert_eq!(pixel(&frame, 10, 0, 5), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 10, 9, 9), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 10, 0, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_blit_blends_with_background() {
        let mut frame: Vec<u8> = [0u8, 0, 0, 255].repeat(4);
        let white = sprite(1, 1, [255, 255, 255, 255]);
        let rect = ScreenRect {
            left: 0.0,
            top: 0.0,
            width: 2.0,
            height: 2.0,
        };
        draw_sprite_stretched(&mut frame, 2, 2, &white, rect, MASK_OVERLAY_OPACITY);
        let value = pixel(&frame, 2, 1, 1)[0];
        assert_eq!(value, (255.0f32 * MASK_OVERLAY_OPACITY).round() as u8);
    }

    #[test]
    fn transparent_sprite_pixels_are_skipped() {
        let mut frame = vec![7u8; 2 * 2 * 4];
        let clear = sprite(1, 1, [255, 255, 255, 0]);
        let rect = ScreenRect {
            left: 0.0,
            top: 0.0,
            width: 2.0,
            height: 2.0,
        };
        draw_sprite_stretched(&mut frame, 2, 2, &clear, rect, 1.0);
        assert!(frame.iter().all(|byte| *byte == 7));
    }

    #[test]
    fn contain_rect_preserves_aspect_and_centers() {
        let bounds = ScreenRect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let rect = contain_rect(bounds, 50, 100);
        assert_eq!(rect.width, 50.0);
        assert_eq!(rect.height, 100.0);
        assert_eq!(rect.left, 25.0);
        assert_eq!(rect.top, 0.0);
    }

    #[test]
    fn entity_rect_follows_camera_zoom() {
        let mut world = SceneWorld::default();
        let id = world.spawn(EntityDesc {
            position: Vec2::new(100.0, 50.0),
            size: 70.0,
            sprite_key: "a.png".to_string(),
        });
        world.apply_pending();
        let camera = Camera2D {
            translation: Vec2::new(-10.0, 5.0),
            zoom: 2.0,
        };
        let entity = world.find_entity(id).expect("entity");
        let rect = entity_screen_rect(entity, &camera);
        assert_eq!(rect.left, 190.0);
        assert_eq!(rect.top, 105.0);
        assert_eq!(rect.width, 140.0);
    }

    #[test]
    fn bubble_placement_stays_on_screen() {
        assert_eq!(place_bubble(-20, -30, 100, 40, 800, 600), (0, 0));
        assert_eq!(place_bubble(750, 590, 100, 40, 800, 600), (700, 560));
        assert_eq!(place_bubble(10, 10, 1000, 40, 800, 600), (0, 10));
    }

    #[test]
    fn bubble_draws_above_entity() {
        let mut world = SceneWorld::default();
        let id = world.spawn(EntityDesc {
            position: Vec2::new(40.0, 120.0),
            size: 40.0,
            sprite_key: "a.png".to_string(),
        });
        world.apply_pending();
        world.find_entity_mut(id).expect("entity").bubble = Some(parse_rich_text("hi `there`"));

        let (width, height) = (200u32, 200u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        let entity = world.find_entity(id).expect("entity");
        draw_bubble(&mut frame, width, height, entity, &Camera2D::default());

        let touched_rows: Vec<u32> = (0..height)
            .filter(|y| (0..width).any(|x| pixel(&frame, width, x, *y) != [0, 0, 0, 0]))
            .collect();
        assert!(!touched_rows.is_empty());
        assert!(touched_rows.iter().all(|y| *y < 120));
    }

    #[test]
    fn referenced_keys_skip_hidden_mask_overlay() {
        let mut world = SceneWorld::default();
        world.set_background_key(Some("bg.png".to_string()));
        world.set_mask_overlay_key(Some("collision.png".to_string()));
        world.spawn(EntityDesc {
            position: Vec2::ZERO,
            size: 10.0,
            sprite_key: "p.png".to_string(),
        });
        world.apply_pending();
        assert_eq!(referenced_sprite_keys(&world), vec!["bg.png", "p.png"]);
        world.set_mask_overlay_visible(true);
        assert_eq!(
            referenced_sprite_keys(&world),
            vec!["bg.png", "collision.png", "p.png"]
        );
    }

    #[test]
    fn missing_sprite_is_cached_as_none_and_warned_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cache = HashMap::new();
        let mut warned = HashSet::new();
        ensure_sprite_cached(&mut cache, &mut warned, dir.path(), "missing.png");
        ensure_sprite_cached(&mut cache, &mut warned, dir.path(), "missing.png");
        assert!(matches!(cache.get("missing.png"), Some(None)));
        assert_eq!(warned.len(), 1);
    }

    #[test]
    fn sprite_loads_from_asset_key_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("chars")).expect("mkdir");
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        image.save(dir.path().join("chars").join("a.png")).expect("save png");

        let mut cache = HashMap::new();
        let mut warned = HashSet::new();
        ensure_sprite_cached(&mut cache, &mut warned, dir.path(), "chars/a.png");
        let loaded = cache
            .get("chars/a.png")
            .and_then(Option::as_ref)
            .expect("sprite loaded");
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert!(warned.is_empty());
    }
}
