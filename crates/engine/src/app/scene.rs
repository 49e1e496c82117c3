use super::input::{ActionStates, InputAction, PointerGesture};
use crate::content::TextSpan;
use crate::sim::{DirectionKeys, Vec2, WorldSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    start_pressed: bool,
    collision_toggle_pressed: bool,
    mask_overlay_toggle_pressed: bool,
    pointer_pressed: bool,
    pointer: PointerGesture,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        start_pressed: bool,
        collision_toggle_pressed: bool,
        mask_overlay_toggle_pressed: bool,
        pointer_pressed: bool,
        pointer: PointerGesture,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            start_pressed,
            collision_toggle_pressed,
            mask_overlay_toggle_pressed,
            pointer_pressed,
            pointer,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// Held arrow keys as digital directions.
    pub fn keyboard_directions(&self) -> DirectionKeys {
        DirectionKeys {
            up: self.is_down(InputAction::MoveUp),
            down: self.is_down(InputAction::MoveDown),
            left: self.is_down(InputAction::MoveLeft),
            right: self.is_down(InputAction::MoveRight),
        }
    }

    pub fn start_pressed(&self) -> bool {
        self.start_pressed
    }

    pub fn collision_toggle_pressed(&self) -> bool {
        self.collision_toggle_pressed
    }

    pub fn mask_overlay_toggle_pressed(&self) -> bool {
        self.mask_overlay_toggle_pressed
    }

    /// A pointer went down this frame, anywhere in the window.
    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    pub fn pointer(&self) -> PointerGesture {
        self.pointer
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_start_pressed(mut self, start_pressed: bool) -> Self {
        self.start_pressed = start_pressed;
        self
    }

    pub fn with_collision_toggle_pressed(mut self, pressed: bool) -> Self {
        self.collision_toggle_pressed = pressed;
        self
    }

    pub fn with_mask_overlay_toggle_pressed(mut self, pressed: bool) -> Self {
        self.mask_overlay_toggle_pressed = pressed;
        self
    }

    pub fn with_pointer_pressed(mut self, pointer_pressed: bool) -> Self {
        self.pointer_pressed = pointer_pressed;
        self
    }

    pub fn with_pointer(mut self, pointer: PointerGesture) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Screen-space view of the world: `screen = world * zoom + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub translation: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }
}

/// Draw pass an entity belongs to. `Raised` entities draw above the
/// foreground layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityLayer {
    #[default]
    Ground,
    Raised,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Top-left corner in world pixels.
    pub position: Vec2,
    pub size: f32,
    pub sprite_key: String,
    pub layer: EntityLayer,
    pub bubble: Option<Vec<TextSpan>>,
}

#[derive(Debug, Clone)]
pub struct EntityDesc {
    pub position: Vec2,
    pub size: f32,
    pub sprite_key: String,
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub hint: String,
}

/// Screen-space elements drawn over the world.
#[derive(Debug, Clone, Default)]
pub struct HudState {
    pub counter: Option<String>,
    pub banner: Option<Banner>,
    /// Knob offset from the widget center; `None` hides the joystick.
    pub joystick_knob: Option<(f32, f32)>,
}

/// Everything the renderer needs to draw a frame. Scenes write it during
/// `update`; the loop hands it to the renderer read-only.
#[derive(Debug)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    world_size: WorldSize,
    background_key: Option<String>,
    foreground_key: Option<String>,
    mask_overlay_key: Option<String>,
    mask_overlay_visible: bool,
    camera: Camera2D,
    hud: HudState,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self {
            allocator: EntityIdAllocator::default(),
            entities: Vec::new(),
            pending_spawns: Vec::new(),
            world_size: WorldSize {
                width: 0.0,
                height: 0.0,
            },
            background_key: None,
            foreground_key: None,
            mask_overlay_key: None,
            mask_overlay_visible: false,
            camera: Camera2D::default(),
            hud: HudState::default(),
        }
    }
}

impl SceneWorld {
    pub fn spawn(&mut self, desc: EntityDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            position: desc.position,
            size: desc.size,
            sprite_key: desc.sprite_key,
            layer: EntityLayer::Ground,
            bubble: None,
        });
        id
    }

    /// Moves spawns queued during `load`/`update` into the draw list, in
    /// spawn order.
    pub fn apply_pending(&mut self) {
        self.entities.append(&mut self.pending_spawns);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Entities of one layer, in spawn order.
    pub fn entities_in_layer(&self, layer: EntityLayer) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.layer == layer)
    }

    pub fn world_size(&self) -> WorldSize {
        self.world_size
    }

    pub fn set_world_size(&mut self, world_size: WorldSize) {
        self.world_size = world_size;
    }

    pub fn background_key(&self) -> Option<&str> {
        self.background_key.as_deref()
    }

    pub fn set_background_key(&mut self, key: Option<String>) {
        self.background_key = key;
    }

    pub fn foreground_key(&self) -> Option<&str> {
        self.foreground_key.as_deref()
    }

    pub fn set_foreground_key(&mut self, key: Option<String>) {
        self.foreground_key = key;
    }

    /// The collision image, drawn translucent over the world when visible.
    pub fn mask_overlay_key(&self) -> Option<&str> {
        if self.mask_overlay_visible {
            self.mask_overlay_key.as_deref()
        } else {
            None
        }
    }

    pub fn set_mask_overlay_key(&mut self, key: Option<String>) {
        self.mask_overlay_key = key;
    }

    pub fn mask_overlay_visible(&self) -> bool {
        self.mask_overlay_visible
    }

    pub fn set_mask_overlay_visible(&mut self, visible: bool) {
        self.mask_overlay_visible = visible;
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut HudState {
        &mut self.hud
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot, world: &mut SceneWorld)
        -> SceneCommand;
    fn render(&mut self, _world: &SceneWorld) {}
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
    /// Extra lines for the F3 overlay.
    fn debug_lines(&self, _world: &SceneWorld) -> Vec<String> {
        Vec::new()
    }
}

/// Owns the running scene and its world, tracking whether `load` ran.
pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.world.apply_pending();
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        let command = self.scene.update(dt_seconds, input, &mut self.world);
        self.world.apply_pending();
        command
    }

    pub(crate) fn render(&mut self) {
        self.scene.render(&self.world);
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }

    pub(crate) fn debug_lines(&self) -> Vec<String> {
        self.scene.debug_lines(&self.world)
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.world);
        self.world.clear();
        self.is_loaded = false;
    }
}
