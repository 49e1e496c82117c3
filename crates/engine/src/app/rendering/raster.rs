//! Pixel-level drawing into an RGBA8 frame. Every helper clips against the
//! frame, so callers may pass shapes that lie partly or fully off screen.

pub(crate) fn write_pixel_rgba_clipped(
    frame: &mut [u8],
    width: usize,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    let Some(range) = pixel_range(frame.len(), width, x, y) else {
        return;
    };
    frame[range].copy_from_slice(&color);
}

/// Source-over blend of `color` scaled by `opacity` (0..=1).
pub(crate) fn blend_pixel_rgba_clipped(
    frame: &mut [u8],
    width: usize,
    x: i32,
    y: i32,
    color: [u8; 4],
    opacity: f32,
) {
    let Some(range) = pixel_range(frame.len(), width, x, y) else {
        return;
    };
    let alpha = (color[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst = &mut frame[range];
    for channel in 0..3 {
        let blended = color[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
        dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = 255;
}

fn pixel_range(frame_len: usize, width: usize, x: i32, y: i32) -> Option<std::ops::Range<usize>> {
    if x < 0 || y < 0 || x as usize >= width {
        return None;
    }
    let pixel_offset = (y as usize).checked_mul(width)?.checked_add(x as usize)?;
    let byte_offset = pixel_offset.checked_mul(4)?;
    let end = byte_offset.checked_add(4)?;
    if end > frame_len {
        return None;
    }
    Some(byte_offset..end)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }
    let opaque = color[3] == 255;
    for py in start_y..end_y {
        for px in start_x..end_x {
            if opaque {
                write_pixel_rgba_clipped(frame, width as usize, px, py, color);
            } else {
                blend_pixel_rgba_clipped(frame, width as usize, px, py, color, 1.0);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    fill_rect(frame, width, height, x, y, rect_width, 1, color);
    fill_rect(frame, width, height, x, y + rect_height - 1, rect_width, 1, color);
    fill_rect(frame, width, height, x, y, 1, rect_height, color);
    fill_rect(frame, width, height, x + rect_width - 1, y, 1, rect_height, color);
}

/// Filled disc, blended so translucent colors work.
pub(crate) fn fill_circle(
    frame: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    radius: i32,
    color: [u8; 4],
) {
    if radius <= 0 || width == 0 || height == 0 {
        return;
    }
    let r2 = radius * radius;
    for dy in -radius..=radius {
        let py = cy + dy;
        if py < 0 || py >= height as i32 {
            continue;
        }
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            blend_pixel_rgba_clipped(frame, width as usize, cx + dx, py, color, 1.0);
        }
    }
}
