use crate::app::rendering::{
    draw_text_clipped, fill_rect, glyph_advance, line_advance, rect_outline, text_cells,
};
use crate::app::LoopMetricsSnapshot;

const TEXT_SCALE: i32 = 2;
const OVERLAY_PADDING: i32 = 6 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];
const LOOP_SECTION_LABEL: &str = "Loop";
const CARD_SECTION_LABEL: &str = "Card";

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub entity_count: usize,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_cells = lines
        .iter()
        .map(|line| text_cells(line) as i32)
        .max()
        .unwrap_or(0);
    let panel_width = longest_line_cells * glyph_advance(TEXT_SCALE) + OVERLAY_PANEL_INSET_X * 2;
    let panel_height = lines.len() as i32 * line_advance(TEXT_SCALE) + OVERLAY_PANEL_INSET_Y * 2;
    let panel_left = OVERLAY_PADDING - OVERLAY_PANEL_INSET_X;
    let panel_top = OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y;
    fill_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    rect_outline(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let mut y = OVERLAY_PADDING;
    for line in lines {
        let color = overlay_line_color(&line);
        draw_text_clipped(frame, width, height, OVERLAY_PADDING, y, &line, TEXT_SCALE, color);
        y += line_advance(TEXT_SCALE);
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let metrics = &data.metrics;
    let mut lines = vec![
        LOOP_SECTION_LABEL.to_string(),
        format_pacing_line(metrics.fps, data.render_fps_cap, data.slow_frame_delay_ms),
        format!(
            "Frame: {:.1} ms (worst {:.1})",
            metrics.frame_time_ms, metrics.worst_frame_ms
        ),
    ];
    if metrics.clamped_frames > 0 {
        lines.push(format!("Clamped: {}", metrics.clamped_frames));
    }
    lines.push(String::new());
    lines.push(CARD_SECTION_LABEL.to_string());
    lines.push(format!("Entities: {}", data.entity_count));
    lines.extend(data.scene_lines.iter().cloned());
    lines
}

fn overlay_line_color(line: &str) -> [u8; 4] {
    match line {
        LOOP_SECTION_LABEL | CARD_SECTION_LABEL => OVERLAY_TEXT_DIM_COLOR,
        _ => OVERLAY_TEXT_PRIMARY_COLOR,
    }
}

/// `60 fps / cap 60`, with ` +Nms` appended while a slow frame is injected.
fn format_pacing_line(fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap = cap.map_or_else(|| "off".to_string(), |cap| cap.to_string());
    let mut line = format!("{fps:.0} fps / cap {cap}");
    if slow_frame_delay_ms > 0 {
        line.push_str(&format!(" +{slow_frame_delay_ms}ms"));
    }
    line
}
