mod raster;
mod renderer;
mod text;
mod transform;

pub(crate) use raster::{fill_rect, rect_outline};
pub use renderer::Renderer;
pub(crate) use text::{draw_text_clipped, glyph_advance, line_advance, text_cells};
pub use transform::{follow_camera, screen_to_world, world_to_screen, world_to_screen_px, Viewport};
