use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::{ActionStates, JoystickWidget, PointerGesture};
use super::metrics::MetricsAccumulator;
use super::scene::SceneRuntime;
use super::tools::OverlayData;
use super::{InputAction, InputSnapshot, MetricsHandle, Renderer, Scene, SceneCommand};

pub const SLOW_FRAME_ENV_VAR: &str = "CARDWALK_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "cardwalk".to_string(),
            window_width: 1280,
            window_height: 720,
            max_frame_delta: Duration::from_millis(50),
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(
    config: LoopConfig,
    asset_root: PathBuf,
    scene: Box<dyn Scene>,
) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(config, asset_root, scene, metrics_handle)
}

pub fn run_app_with_metrics(
    config: LoopConfig,
    asset_root: PathBuf,
    scene: Box<dyn Scene>,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let mut runtime = SceneRuntime::new(scene);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer =
        Renderer::new(Arc::clone(&window), asset_root).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(50));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let viewport = renderer.viewport();
    let mut input_collector = InputCollector::new(viewport.width, viewport.height);

    runtime.load();
    info!(
        entity_count = runtime.world().entity_count(),
        "scene_loaded"
    );
    info!(
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, max_frame_delta);
    let mut last_applied_title: Option<String> = None;
    let mut overlay_visible = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    input_collector.set_window_size(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    input_collector.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(false) => {
                    input_collector.release_held_input();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.pointer_moved(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.pointer_cancelled();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::Touch(touch) => {
                    input_collector.handle_touch(touch);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_physical_key(event.physical_key, event.state);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if input_collector.take_overlay_toggle_pressed() {
                        overlay_visible = !overlay_visible;
                        info!(overlay_visible, "overlay_toggled");
                    }

                    if slow_frame_delay > Duration::ZERO {
                        // Debug perturbation only; not the FPS cap.
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    let frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);

                    let input_snapshot = input_collector.snapshot_for_frame();
                    if runtime.update(frame_dt.as_secs_f32(), &input_snapshot) == SceneCommand::Quit
                    {
                        info!(reason = "scene_quit", "shutdown_requested");
                        window_target.exit();
                        return;
                    }

                    // Single FPS cap sleep point for render pacing.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    runtime.render();
                    let overlay = overlay_visible.then(|| OverlayData {
                        metrics: metrics_handle.snapshot(),
                        render_fps_cap: effective_render_cap,
                        slow_frame_delay_ms: slow_frame_delay.as_millis() as u64,
                        entity_count: runtime.world().entity_count(),
                        scene_lines: runtime.debug_lines(),
                    });
                    if let Err(error) = renderer.render_world(runtime.world(), overlay.as_ref()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = runtime.debug_title();
                    if next_title != last_applied_title {
                        window.set_title(next_title.as_deref().unwrap_or(&config.window_title));
                        last_applied_title = next_title;
                    }

                    metrics_accumulator.record_frame(raw_frame_dt);
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        metrics_handle.publish(snapshot);
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            worst_frame_ms = snapshot.worst_frame_ms,
                            clamped_frames = snapshot.clamped_frames,
                            entity_count = runtime.world().entity_count(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                runtime.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Press-edge tracking for one key: held repeats never re-trigger.
#[derive(Debug, Default, Clone, Copy)]
struct EdgeTrigger {
    is_down: bool,
    pressed_edge: bool,
}

impl EdgeTrigger {
    fn update(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.is_down {
                    self.pressed_edge = true;
                }
                self.is_down = true;
            }
            ElementState::Released => self.is_down = false,
        }
    }

    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pressed_edge)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PointerCapture {
    #[default]
    None,
    Drag,
    Joystick,
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    start: EdgeTrigger,
    collision_toggle: EdgeTrigger,
    mask_overlay_toggle: EdgeTrigger,
    overlay_toggle: EdgeTrigger,
    pointer_position_px: Option<(f32, f32)>,
    pointer_capture: PointerCapture,
    pointer_pressed_edge: bool,
    active_touch_id: Option<u64>,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, state: ElementState) {
        let is_pressed = state == ElementState::Pressed;
        match key {
            PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::MoveUp, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(InputAction::MoveDown, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::MoveLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::MoveRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space) => {
                self.action_states.set(InputAction::Start, is_pressed);
                self.start.update(state);
            }
            PhysicalKey::Code(KeyCode::KeyC) => {
                self.action_states.set(InputAction::ToggleCollision, is_pressed);
                self.collision_toggle.update(state);
            }
            PhysicalKey::Code(KeyCode::KeyD) => {
                self.action_states.set(InputAction::ToggleMaskOverlay, is_pressed);
                self.mask_overlay_toggle.update(state);
            }
            PhysicalKey::Code(KeyCode::F3) => {
                self.action_states.set(InputAction::ToggleOverlay, is_pressed);
                self.overlay_toggle.update(state);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.mark_quit_requested();
                }
            }
            _ => {}
        }
    }

    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        InputSnapshot::new(
            self.quit_requested,
            self.action_states,
            self.start.take(),
            self.collision_toggle.take(),
            self.mask_overlay_toggle.take(),
            std::mem::take(&mut self.pointer_pressed_edge),
            self.pointer_gesture(),
            self.window_width,
            self.window_height,
        )
    }

    fn take_overlay_toggle_pressed(&mut self) -> bool {
        self.overlay_toggle.take()
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left || self.active_touch_id.is_some() {
            return;
        }
        match state {
            ElementState::Pressed => {
                if self.pointer_capture == PointerCapture::None {
                    if let Some((x, y)) = self.pointer_position_px {
                        self.pointer_pressed(x, y);
                    } else {
                        self.pointer_pressed_edge = true;
                    }
                }
            }
            ElementState::Released => self.pointer_released(),
        }
    }

    fn handle_touch(&mut self, touch: Touch) {
        let (x, y) = (touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => {
                if self.active_touch_id.is_none() {
                    self.active_touch_id = Some(touch.id);
                    self.pointer_pressed(x, y);
                }
            }
            TouchPhase::Moved => {
                if self.active_touch_id == Some(touch.id) {
                    self.pointer_moved(x, y);
                }
            }
            TouchPhase::Ended => {
                if self.active_touch_id == Some(touch.id) {
                    self.active_touch_id = None;
                    self.pointer_released();
                }
            }
            TouchPhase::Cancelled => {
                if self.active_touch_id == Some(touch.id) {
                    self.active_touch_id = None;
                    self.pointer_cancelled();
                }
            }
        }
    }

    /// A press on the joystick widget steers the joystick; anywhere else
    /// starts a hold-to-move drag.
    fn pointer_pressed(&mut self, x: f32, y: f32) {
        self.pointer_position_px = Some((x, y));
        self.pointer_pressed_edge = true;
        let widget = JoystickWidget::for_window(self.window_width, self.window_height);
        self.pointer_capture = if widget.contains(x, y) {
            PointerCapture::Joystick
        } else {
            PointerCapture::Drag
        };
    }

    fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer_position_px = Some((x, y));
    }

    fn pointer_released(&mut self) {
        self.pointer_capture = PointerCapture::None;
    }

    fn pointer_cancelled(&mut self) {
        self.pointer_capture = PointerCapture::None;
        self.pointer_position_px = None;
    }

    /// Drops every held direction, e.g. when the window loses focus.
    fn release_held_input(&mut self) {
        self.action_states.clear_movement();
        self.active_touch_id = None;
        self.pointer_cancelled();
    }

    fn pointer_gesture(&self) -> PointerGesture {
        let Some((x, y)) = self.pointer_position_px else {
            return PointerGesture::None;
        };
        match self.pointer_capture {
            PointerCapture::None => PointerGesture::None,
            PointerCapture::Drag => PointerGesture::Drag {
                dx: x - self.window_width as f32 / 2.0,
                dy: y - self.window_height as f32 / 2.0,
            },
            PointerCapture::Joystick => {
                let widget = JoystickWidget::for_window(self.window_width, self.window_height);
                let (dx, dy) = widget.offset_of(x, y);
                PointerGesture::Joystick {
                    dx,
                    dy,
                    widget_size: widget.size,
                }
            }
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

/// `CARDWALK_SLOW_FRAME_MS` wins over the config; an unreadable or
/// non-numeric value is logged and ignored.
fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    let fallback = Duration::from_millis(config_slow_frame_ms);
    let raw = match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return fallback,
        Err(error) => {
            warn!(var = SLOW_FRAME_ENV_VAR, error = %error, "slow_frame_env_unreadable");
            return fallback;
        }
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            warn!(var = SLOW_FRAME_ENV_VAR, value = raw.as_str(), "slow_frame_env_invalid");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(50);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(16), max_frame_delta),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn start_press_is_edge_triggered_for_single_frame() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_physical_key(key(KeyCode::Enter), ElementState::Pressed);

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert!(first.start_pressed());
        assert!(!second.start_pressed());
        assert!(second.is_down(InputAction::Start));
    }

    #[test]
    fn held_key_does_not_spam_press_edges() {
        let mut input = InputCollector::new(1280, 720);

        input.handle_physical_key(key(KeyCode::KeyC), ElementState::Pressed);
        let first = input.snapshot_for_frame();
        input.handle_physical_key(key(KeyCode::KeyC), ElementState::Pressed);
        let second = input.snapshot_for_frame();
        input.handle_physical_key(key(KeyCode::KeyC), ElementState::Released);
        input.handle_physical_key(key(KeyCode::KeyC), ElementState::Pressed);
        let third = input.snapshot_for_frame();

        assert!(first.collision_toggle_pressed());
        assert!(!second.collision_toggle_pressed());
        assert!(third.collision_toggle_pressed());
    }

    #[test]
    fn space_also_starts() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_physical_key(key(KeyCode::Space), ElementState::Pressed);
        assert!(input.snapshot_for_frame().start_pressed());
    }

    #[test]
    fn arrow_keys_map_to_move_actions() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_physical_key(key(KeyCode::ArrowUp), ElementState::Pressed);
        input.handle_physical_key(key(KeyCode::ArrowLeft), ElementState::Pressed);

        let keys = input.snapshot_for_frame().keyboard_directions();
        assert!(keys.up && keys.left);
        assert!(!keys.down && !keys.right);
    }

    #[test]
    fn key_release_clears_action_state() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_physical_key(key(KeyCode::ArrowRight), ElementState::Pressed);
        input.handle_physical_key(key(KeyCode::ArrowRight), ElementState::Released);
        assert!(!input.snapshot_for_frame().is_down(InputAction::MoveRight));
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_physical_key(key(KeyCode::Escape), ElementState::Pressed);
        assert!(input.quit_requested);
        assert!(input.snapshot_for_frame().quit_requested());
    }

    #[test]
    fn f3_toggle_is_edge_triggered() {
        let mut input = InputCollector::new(1280, 720);

        input.handle_physical_key(key(KeyCode::F3), ElementState::Pressed);
        assert!(input.take_overlay_toggle_pressed());
        input.handle_physical_key(key(KeyCode::F3), ElementState::Pressed);
        assert!(!input.take_overlay_toggle_pressed());
        input.handle_physical_key(key(KeyCode::F3), ElementState::Released);
        input.handle_physical_key(key(KeyCode::F3), ElementState::Pressed);
        assert!(input.take_overlay_toggle_pressed());
    }

    #[test]
    fn mouse_press_outside_joystick_starts_drag_from_center() {
        let mut input = InputCollector::new(1280, 720);
        input.pointer_moved(700.0, 300.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);

        let first = input.snapshot_for_frame();
        assert!(first.pointer_pressed());
        assert_eq!(first.pointer(), PointerGesture::Drag { dx: 60.0, dy: -60.0 });

        input.pointer_moved(600.0, 400.0);
        let second = input.snapshot_for_frame();
        assert!(!second.pointer_pressed());
        assert_eq!(second.pointer(), PointerGesture::Drag { dx: -40.0, dy: 40.0 });

        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        assert_eq!(input.snapshot_for_frame().pointer(), PointerGesture::None);
    }

    #[test]
    fn press_on_joystick_widget_steers_joystick() {
        let mut input = InputCollector::new(1280, 720);
        let widget = JoystickWidget::for_window(1280, 720);
        input.pointer_moved(widget.center_x + 10.0, widget.center_y);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);

        match input.snapshot_for_frame().pointer() {
            PointerGesture::Joystick {
                dx,
                dy,
                widget_size,
            } => {
                assert!((dx - 10.0).abs() < 0.001);
                assert!(dy.abs() < 0.001);
                assert_eq!(widget_size, widget.size);
            }
            other => panic!("expected joystick gesture, got {other:?}"),
        }
    }

    #[test]
    fn cursor_leaving_cancels_gesture() {
        let mut input = InputCollector::new(1280, 720);
        input.pointer_moved(10.0, 10.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.pointer_cancelled();
        assert_eq!(input.snapshot_for_frame().pointer(), PointerGesture::None);
    }

    #[test]
    fn focus_loss_releases_held_directions() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_physical_key(key(KeyCode::ArrowDown), ElementState::Pressed);
        input.pointer_moved(10.0, 10.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.release_held_input();

        let snapshot = input.snapshot_for_frame();
        assert!(!snapshot.keyboard_directions().any());
        assert_eq!(snapshot.pointer(), PointerGesture::None);
    }

    #[test]
    fn snapshot_carries_window_size() {
        let mut input = InputCollector::new(1280, 720);
        input.set_window_size(800, 600);
        assert_eq!(input.snapshot_for_frame().window_size(), (800, 600));
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn target_frame_duration_for_60hz_is_expected() {
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_positive_when_under_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(5), target_frame_duration(Some(60)));
        assert!(sleep > Duration::ZERO);
    }

    #[test]
    fn normalize_render_fps_cap_disables_zero() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(60)), Some(60));
    }

    #[test]
    fn zero_durations_fall_back() {
        let fallback = Duration::from_millis(50);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(7), fallback),
            Duration::from_millis(7)
        );
    }
}
