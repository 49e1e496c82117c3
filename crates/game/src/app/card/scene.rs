use std::path::PathBuf;

use cardwalk_engine::content::{asset_path, parse_rich_text, LoadedScene, TextSpan};
use cardwalk_engine::sim::{
    advance, relocate_player, start_running, CollisionMask, DirectionKeys, FrameInput,
    JoystickShape, JoystickState, MaskLoader, SceneEvent, SceneState, SimScene, SpriteVariant,
    Vec2,
};
use cardwalk_engine::{
    follow_camera, AudioSink, Banner, Entity, EntityDesc, EntityId, EntityLayer, InputSnapshot,
    PointerGesture, Scene, SceneCommand, SceneWorld, Viewport,
};
use tracing::{debug, info, warn};

use super::phase::{Phase, PhaseTransition};

pub(crate) struct CardScene<A: AudioSink> {
    scene: LoadedScene,
    sim: SimScene,
    joystick_shape: JoystickShape,
    drag_dead_zone_px: f32,
    asset_root: PathBuf,
    bubbles: Vec<Vec<TextSpan>>,
    audio: A,
    phase: Phase,
    state: SceneState,
    mask: CollisionMask,
    mask_loader: Option<MaskLoader>,
    player_id: Option<EntityId>,
    npc_ids: Vec<EntityId>,
    raised_npc: Option<usize>,
}

impl<A: AudioSink> CardScene<A> {
    pub(crate) fn new(scene: LoadedScene, asset_root: PathBuf, audio: A) -> Self {
        let sim = scene.sim_scene();
        let state = initial_state(&scene, &sim);
        Self {
            joystick_shape: scene.joystick_shape(),
            drag_dead_zone_px: scene.def.tuning.drag_dead_zone_px,
            bubbles: scene
                .def
                .npcs
                .iter()
                .map(|npc| parse_rich_text(&npc.line))
                .collect(),
            scene,
            sim,
            asset_root,
            audio,
            phase: Phase::Gate,
            state,
            mask: CollisionMask::disabled(),
            mask_loader: None,
            player_id: None,
            npc_ids: Vec::new(),
            raised_npc: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn audio(&self) -> &A {
        &self.audio
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &SceneState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    #[cfg(test)]
    pub(crate) fn npc_id(&self, index: usize) -> Option<EntityId> {
        self.npc_ids.get(index).copied()
    }

    fn spawn_mask_loader(&mut self) {
        self.mask = CollisionMask::disabled();
        self.mask_loader = None;
        let Some(key) = self.scene.assets.collision.as_deref() else {
            return;
        };
        match asset_path(&self.asset_root, key) {
            Ok(path) => {
                self.mask_loader = Some(MaskLoader::spawn(
                    path,
                    self.scene.world_size(),
                    self.scene.def.tuning.black_threshold,
                ));
            }
            Err(error) => warn!(key, error = %error, "collision_mask_path_invalid"),
        }
    }

    fn poll_mask(&mut self, world: &mut SceneWorld) {
        let Some(loader) = self.mask_loader.as_mut() else {
            return;
        };
        let Some(mask) = loader.poll() else {
            return;
        };
        self.mask_loader = None;
        self.mask = mask;
        info!(
            ready = self.mask.is_ready(),
            width = self.mask.width(),
            height = self.mask.height(),
            "collision_mask_ready"
        );
        if let Some(event) = relocate_player(&mut self.state, &self.sim, &self.mask) {
            self.apply_event(event, world);
        }
    }

    fn apply_phase_input(&mut self, input: &InputSnapshot, world: &mut SceneWorld) {
        let (next, transition) = self
            .phase
            .advance(input.start_pressed(), input.pointer_pressed());
        self.phase = next;
        match transition {
            PhaseTransition::Stay => {}
            PhaseTransition::ShowSplash => {
                self.audio.start_music(&self.scene.assets.music);
                info!(scene = %self.scene.name, "splash_shown");
            }
            PhaseTransition::StartGame => {
                let sounds: Vec<String> = self
                    .scene
                    .assets
                    .npcs
                    .iter()
                    .filter_map(|npc| npc.sound.clone())
                    .collect();
                self.audio.preload(&sounds);
                self.audio.start_music(&self.scene.assets.music);
                for event in start_running(&mut self.state) {
                    self.apply_event(event, world);
                }
                info!(
                    scene = %self.scene.name,
                    remaining = self.state.dialogue.remaining(),
                    "game_started"
                );
            }
        }
    }

    fn apply_debug_toggles(&mut self, input: &InputSnapshot, world: &mut SceneWorld) {
        if !self.scene.def.debug_enabled {
            return;
        }
        if input.collision_toggle_pressed() {
            self.state.collision_enabled = !self.state.collision_enabled;
            info!(enabled = self.state.collision_enabled, "collision_toggled");
            if let Some(event) = relocate_player(&mut self.state, &self.sim, &self.mask) {
                self.apply_event(event, world);
            }
        }
        if input.mask_overlay_toggle_pressed() {
            let visible = !world.mask_overlay_visible();
            world.set_mask_overlay_visible(visible);
            info!(visible, "collision_overlay_toggled");
        }
    }

    fn frame_input(&self, dt_seconds: f32, input: &InputSnapshot) -> FrameInput {
        let mut keys = input.keyboard_directions();
        let mut joystick = JoystickState::released();
        match input.pointer() {
            PointerGesture::None => {}
            PointerGesture::Drag { dx, dy } => {
                keys = keys.union(DirectionKeys::from_drag_offset(
                    dx,
                    dy,
                    self.drag_dead_zone_px,
                ));
            }
            PointerGesture::Joystick {
                dx,
                dy,
                widget_size,
            } => {
                joystick = JoystickState::from_pointer_offset(
                    dx,
                    dy,
                    (widget_size, widget_size),
                    &self.joystick_shape,
                );
            }
        }
        FrameInput {
            dt_seconds,
            keys,
            joystick,
        }
    }

    fn apply_event(&mut self, event: SceneEvent, world: &mut SceneWorld) {
        match event {
            SceneEvent::PlayerMoved { position } => self.set_player_position(position, world),
            SceneEvent::PlayerRelocated { position } => {
                info!(x = position.x, y = position.y, "player_relocated");
                self.set_player_position(position, world);
            }
            SceneEvent::SpriteChanged { npc, variant } => {
                let Some(assets) = self.scene.assets.npcs.get(npc) else {
                    return;
                };
                let key = match variant {
                    SpriteVariant::Base => &assets.base_sprite,
                    SpriteVariant::Active => {
                        assets.active_sprite.as_ref().unwrap_or(&assets.base_sprite)
                    }
                };
                if let Some(entity) = self.npc_entity_mut(npc, world) {
                    entity.sprite_key = key.clone();
                }
                debug!(npc, ?variant, "npc_sprite_changed");
            }
            SceneEvent::BubbleShown { npc } => {
                let spans = self.bubbles.get(npc).cloned();
                if let Some(entity) = self.npc_entity_mut(npc, world) {
                    entity.bubble = spans;
                }
            }
            SceneEvent::BubbleHidden { npc } => {
                if let Some(entity) = self.npc_entity_mut(npc, world) {
                    entity.bubble = None;
                }
            }
            SceneEvent::PlaySound { npc } => {
                if self.phase != Phase::Playing {
                    return;
                }
                if let Some(key) = self
                    .scene
                    .assets
                    .npcs
                    .get(npc)
                    .and_then(|assets| assets.sound.as_deref())
                {
                    self.audio.play_sound(key);
                }
            }
            SceneEvent::NpcMet { npc, remaining } => {
                let id = self
                    .scene
                    .def
                    .npcs
                    .get(npc)
                    .map(|def| def.id.as_str())
                    .unwrap_or("?");
                info!(npc = id, remaining, "npc_met");
            }
        }
    }

    fn set_player_position(&self, position: Vec2, world: &mut SceneWorld) {
        if let Some(entity) = self.player_id.and_then(|id| world.find_entity_mut(id)) {
            entity.position = position;
        }
    }

    fn npc_entity_mut<'w>(
        &self,
        npc: usize,
        world: &'w mut SceneWorld,
    ) -> Option<&'w mut Entity> {
        let id = *self.npc_ids.get(npc)?;
        world.find_entity_mut(id)
    }

    /// Lifts the active NPC above the foreground and lowers the previous one.
    fn sync_raised_npc(&mut self, world: &mut SceneWorld) {
        let active = self.state.dialogue.active();
        if active == self.raised_npc {
            return;
        }
        if let Some(previous) = self.raised_npc {
            if let Some(entity) = self.npc_entity_mut(previous, world) {
                entity.layer = EntityLayer::Ground;
            }
        }
        if let Some(current) = active {
            if let Some(entity) = self.npc_entity_mut(current, world) {
                entity.layer = EntityLayer::Raised;
            }
        }
        self.raised_npc = active;
    }

    fn sync_hud(&self, joystick: &JoystickState, world: &mut SceneWorld) {
        let text = &self.scene.def.text;
        let hud = world.hud_mut();
        match self.phase {
            Phase::Gate => {
                hud.banner = Some(Banner {
                    title: text.gate.clone(),
                    hint: String::new(),
                });
                hud.counter = None;
                hud.joystick_knob = None;
            }
            Phase::Splash => {
                hud.banner = Some(Banner {
                    title: text.splash_title.clone(),
                    hint: text.splash_hint.clone(),
                });
                hud.counter = None;
                hud.joystick_knob = None;
            }
            Phase::Playing => {
                hud.banner = None;
                hud.counter = Some(format!("x {}", self.state.dialogue.remaining()));
                hud.joystick_knob = Some(joystick.knob_offset);
            }
        }
    }

    fn sync_camera(&self, window_size: (u32, u32), world: &mut SceneWorld) {
        let focus = self.state.player_box(&self.sim).center();
        let viewport = Viewport {
            width: window_size.0,
            height: window_size.1,
        };
        *world.camera_mut() = follow_camera(
            focus,
            self.scene.world_size(),
            viewport,
            self.scene.def.tuning.camera_zoom,
        );
    }
}

fn initial_state(scene: &LoadedScene, sim: &SimScene) -> SceneState {
    SceneState::new(
        scene.player_start(),
        sim.npc_count(),
        scene.def.tuning.active_sprite_delay_seconds,
    )
}

impl<A: AudioSink> Scene for CardScene<A> {
    fn load(&mut self, world: &mut SceneWorld) {
        let assets = &self.scene.assets;
        world.set_world_size(self.scene.world_size());
        world.set_background_key(Some(assets.background.clone()));
        world.set_foreground_key(assets.foreground.clone());
        world.set_mask_overlay_key(assets.collision.clone());
        world.set_mask_overlay_visible(false);

        self.npc_ids = self
            .scene
            .def
            .npcs
            .iter()
            .zip(&assets.npcs)
            .map(|(npc, npc_assets)| {
                world.spawn(EntityDesc {
                    position: Vec2::new(npc.x, npc.y),
                    size: self.scene.npc_size(npc),
                    sprite_key: npc_assets.base_sprite.clone(),
                })
            })
            .collect();

        self.phase = Phase::Gate;
        self.state = initial_state(&self.scene, &self.sim);
        self.raised_npc = None;
        self.player_id = Some(world.spawn(EntityDesc {
            position: self.state.player,
            size: self.scene.def.player.size,
            sprite_key: assets.player_sprite.clone(),
        }));
        self.spawn_mask_loader();

        self.sync_hud(&JoystickState::released(), world);
        info!(
            scene = %self.scene.name,
            npc_count = self.npc_ids.len(),
            audio = self.audio.describe(),
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        self.poll_mask(world);
        self.apply_phase_input(input, world);
        self.apply_debug_toggles(input, world);

        let frame = self.frame_input(dt_seconds, input);
        let (state, events) = advance(self.state.clone(), &frame, &self.sim, &self.mask);
        self.state = state;
        for event in events {
            self.apply_event(event, world);
        }

        self.sync_raised_npc(world);
        self.sync_hud(&frame.joystick, world);
        self.sync_camera(input.window_size(), world);
        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        self.mask_loader = None;
        self.player_id = None;
        self.npc_ids.clear();
        self.raised_npc = None;
        world.clear();
        info!(scene = %self.scene.name, "scene_unloaded");
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        if !self.scene.def.debug_enabled {
            return None;
        }
        Some(format!(
            "{} | {} | x {}",
            self.scene.def.title,
            self.phase.label(),
            self.state.dialogue.remaining()
        ))
    }

    fn debug_lines(&self, world: &SceneWorld) -> Vec<String> {
        let active = self
            .state
            .dialogue
            .active()
            .and_then(|npc| self.scene.def.npcs.get(npc))
            .map(|npc| npc.id.as_str())
            .unwrap_or("-");
        let mask = if self.mask_loader.is_some() {
            "loading"
        } else if self.mask.is_ready() {
            "ready"
        } else {
            "none"
        };
        vec![
            format!("Phase: {}", self.phase.label()),
            format!(
                "Player: {:.0}, {:.0}",
                self.state.player.x, self.state.player.y
            ),
            format!("Active: {active}"),
            format!(
                "Met: {}/{}",
                self.state.dialogue.total() - self.state.dialogue.remaining(),
                self.state.dialogue.total()
            ),
            format!(
                "Collision: {} ({mask})",
                if self.state.collision_enabled { "on" } else { "off" }
            ),
            format!(
                "Mask overlay: {}",
                if world.mask_overlay_visible() { "on" } else { "off" }
            ),
            format!("Audio: {}", self.audio.describe()),
        ]
    }
}
