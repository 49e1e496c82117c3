//! Scene descriptor: `assets/scenes/<name>/scene.json`.
//!
//! Every tunable has a serde default, so a descriptor only needs its NPC
//! list. Asset references are relative to the scene directory and resolve
//! to asset keys (see [`super::asset_keys`]).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::asset_keys::{join_key, validate_asset_key, AssetKeyError};
use crate::sim::{
    DialogueNpc, EntityBox, JoystickShape, MotionParams, MovementEpsilons, SimParams, SimScene,
    Vec2, WorldSize, DEFAULT_MAX_FRAME_DT_SECONDS,
};

pub const SCENE_FILE_NAME: &str = "scene.json";
pub const SCENES_DIR: &str = "scenes";
pub const DEFAULT_FOOT_INSET_PX: f32 = 30.0;

#[derive(Debug, Error)]
pub enum SceneDefError {
    #[error("scene name '{name}' must be a single lowercase path segment")]
    InvalidSceneName { name: String },
    #[error("failed to read scene descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path} at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {field}: {message}")]
    Invalid { field: String, message: String },
    #[error("invalid asset reference at {field} ('{key}'): {source}")]
    AssetKey {
        field: String,
        key: String,
        #[source]
        source: AssetKeyError,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDef {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub world: WorldDef,
    #[serde(default)]
    pub images: ImagesDef,
    #[serde(default)]
    pub player: PlayerDef,
    #[serde(default)]
    pub tuning: TuningDef,
    #[serde(default)]
    pub joystick: JoystickDef,
    #[serde(default)]
    pub audio: AudioDef,
    #[serde(default)]
    pub text: BannerTextDef,
    #[serde(default)]
    pub debug_enabled: bool,
    pub npcs: Vec<NpcDef>,
}

fn default_title() -> String {
    "cardwalk".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldDef {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            width: 2048.0,
            height: 2048.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesDef {
    pub background: String,
    pub foreground: Option<String>,
    pub collision: Option<String>,
    pub character_dir: String,
}

impl Default for ImagesDef {
    fn default() -> Self {
        Self {
            background: "bg.png".to_string(),
            foreground: Some("fg.png".to_string()),
            collision: Some("collision.png".to_string()),
            character_dir: "characters".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerDef {
    /// File name inside the character directory.
    pub sprite: String,
    pub size: f32,
    pub speed: f32,
    /// Top-left start position; defaults to the world center point.
    pub start: Option<[f32; 2]>,
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            sprite: "player.png".to_string(),
            size: 95.0,
            speed: 320.0,
            start: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningDef {
    pub proximity_px: f32,
    pub camera_zoom: f32,
    pub default_npc_size: f32,
    pub active_sprite_delay_seconds: f32,
    pub black_threshold: u8,
    /// Distance from the sprite's bottom edge to the collision probe.
    /// Unset means [`DEFAULT_FOOT_INSET_PX`], capped at half the player size.
    pub foot_inset_px: Option<f32>,
    pub move_epsilon_px: f32,
    pub input_epsilon: f32,
    pub intent_epsilon: f32,
    pub drag_dead_zone_px: f32,
    pub max_frame_dt_seconds: f32,
}

impl Default for TuningDef {
    fn default() -> Self {
        let epsilons = MovementEpsilons::default();
        Self {
            proximity_px: 70.0,
            camera_zoom: 1.1,
            default_npc_size: 70.0,
            active_sprite_delay_seconds: crate::sim::DEFAULT_ACTIVE_SPRITE_DELAY_SECONDS,
            black_threshold: crate::sim::DEFAULT_BLACK_THRESHOLD,
            foot_inset_px: None,
            move_epsilon_px: epsilons.displacement_px,
            input_epsilon: epsilons.input_mag,
            intent_epsilon: epsilons.intent_mag,
            drag_dead_zone_px: crate::sim::DEFAULT_DRAG_DEAD_ZONE_PX,
            max_frame_dt_seconds: DEFAULT_MAX_FRAME_DT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JoystickDef {
    pub knob_radius_scale: f32,
    pub input_radius_mult: f32,
    pub dead_zone: f32,
    pub expo: f32,
}

impl Default for JoystickDef {
    fn default() -> Self {
        let shape = JoystickShape::default();
        Self {
            knob_radius_scale: shape.knob_radius_scale,
            input_radius_mult: shape.input_radius_mult,
            dead_zone: shape.dead_zone,
            expo: shape.expo,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioDef {
    /// Candidate music files, tried in order until one decodes.
    pub music: Vec<String>,
    pub music_volume: f32,
    pub sfx_volume: f32,
}

impl Default for AudioDef {
    fn default() -> Self {
        Self {
            music: vec!["music.m4a".to_string(), "music.mp3".to_string()],
            music_volume: 0.7,
            sfx_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerTextDef {
    pub gate: String,
    pub splash_title: String,
    pub splash_hint: String,
}

impl Default for BannerTextDef {
    fn default() -> Self {
        Self {
            gate: "Press Enter or click to start".to_string(),
            splash_title: "Happy birthday!".to_string(),
            splash_hint: "Press Enter or click to play".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NpcDef {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub size: Option<f32>,
    pub line: String,
    #[serde(default)]
    pub active_image: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub delay: Option<f32>,
}

/// Asset keys for one NPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcAssets {
    pub base_sprite: String,
    pub active_sprite: Option<String>,
    pub sound: Option<String>,
}

/// Every asset a scene references, as keys under the assets root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneAssets {
    pub background: String,
    pub foreground: Option<String>,
    pub collision: Option<String>,
    pub player_sprite: String,
    pub npcs: Vec<NpcAssets>,
    pub music: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub name: String,
    pub def: SceneDef,
    pub assets: SceneAssets,
}

impl LoadedScene {
    pub fn world_size(&self) -> WorldSize {
        WorldSize {
            width: self.def.world.width,
            height: self.def.world.height,
        }
    }

    pub fn npc_size(&self, npc: &NpcDef) -> f32 {
        npc.size.unwrap_or(self.def.tuning.default_npc_size)
    }

    /// Explicit starts are validated against the world; the default start
    /// centers the player and is clamped the same way motion clamps.
    pub fn player_start(&self) -> Vec2 {
        let (x, y) = match self.def.player.start {
            Some([x, y]) => (x, y),
            None => (self.def.world.width / 2.0, self.def.world.height / 2.0),
        };
        let size = self.def.player.size;
        Vec2::new(
            x.clamp(0.0, (self.def.world.width - size).max(0.0)),
            y.clamp(0.0, (self.def.world.height - size).max(0.0)),
        )
    }

    pub fn foot_inset_px(&self) -> f32 {
        self.def
            .tuning
            .foot_inset_px
            .unwrap_or_else(|| DEFAULT_FOOT_INSET_PX.min(self.def.player.size / 2.0))
    }

    pub fn joystick_shape(&self) -> JoystickShape {
        let joystick = &self.def.joystick;
        JoystickShape {
            knob_radius_scale: joystick.knob_radius_scale,
            input_radius_mult: joystick.input_radius_mult,
            dead_zone: joystick.dead_zone,
            expo: joystick.expo,
        }
    }

    pub fn sim_scene(&self) -> SimScene {
        let tuning = &self.def.tuning;
        SimScene {
            params: SimParams {
                motion: MotionParams {
                    speed_px_per_second: self.def.player.speed,
                    entity_size: self.def.player.size,
                    foot_inset_px: self.foot_inset_px(),
                    world: self.world_size(),
                },
                proximity_px: tuning.proximity_px,
                max_frame_dt_seconds: tuning.max_frame_dt_seconds,
                epsilons: MovementEpsilons {
                    displacement_px: tuning.move_epsilon_px,
                    input_mag: tuning.input_epsilon,
                    intent_mag: tuning.intent_epsilon,
                },
            },
            npc_boxes: self
                .def
                .npcs
                .iter()
                .map(|npc| EntityBox {
                    position: Vec2::new(npc.x, npc.y),
                    size: self.npc_size(npc),
                })
                .collect(),
            npc_dialogue: self
                .def
                .npcs
                .iter()
                .zip(&self.assets.npcs)
                .map(|(npc, assets)| DialogueNpc {
                    has_active_sprite: assets.active_sprite.is_some(),
                    reveal_delay_seconds: npc.delay.unwrap_or(0.0),
                    has_sound: assets.sound.is_some(),
                })
                .collect(),
        }
    }
}

pub fn scene_dir(asset_root: &Path, name: &str) -> PathBuf {
    asset_root.join(SCENES_DIR).join(name)
}

pub fn load_scene(asset_root: &Path, name: &str) -> Result<LoadedScene, SceneDefError> {
    if name.is_empty()
        || name.contains('/')
        || validate_asset_key(name).is_err()
        || name.chars().any(|ch| ch.is_ascii_uppercase())
    {
        return Err(SceneDefError::InvalidSceneName {
            name: name.to_string(),
        });
    }
    let path = scene_dir(asset_root, name).join(SCENE_FILE_NAME);
    let raw = fs::read_to_string(&path).map_err(|source| SceneDefError::Read {
        path: path.clone(),
        source,
    })?;
    let def = parse_scene_def(&raw, &path)?;
    let loaded = resolve_scene(name, def)?;
    info!(
        scene = %loaded.name,
        npc_count = loaded.def.npcs.len(),
        debug_enabled = loaded.def.debug_enabled,
        "scene_descriptor_loaded"
    );
    Ok(loaded)
}

pub fn parse_scene_def(raw: &str, path: &Path) -> Result<SceneDef, SceneDefError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, SceneDef>(&mut deserializer).map_err(|error| {
        let location = error.path().to_string();
        let location = if location.is_empty() {
            ".".to_string()
        } else {
            location
        };
        SceneDefError::Parse {
            path: path.to_path_buf(),
            location,
            source: error.into_inner(),
        }
    })
}

/// Validates `def` and resolves its asset references under
/// `scenes/<name>/`.
pub fn resolve_scene(name: &str, def: SceneDef) -> Result<LoadedScene, SceneDefError> {
    validate_scene_def(&def)?;

    let prefix = join_key(SCENES_DIR, name);
    let character_prefix = join_key(&prefix, &def.images.character_dir);
    let scene_key = |field: &str, relative: &str| checked_key(field, join_key(&prefix, relative));
    let character_key =
        |field: &str, file: &str| checked_key(field, join_key(&character_prefix, file));

    let background = scene_key("images.background", &def.images.background)?;
    let foreground = def
        .images
        .foreground
        .as_deref()
        .map(|file| scene_key("images.foreground", file))
        .transpose()?;
    let collision = def
        .images
        .collision
        .as_deref()
        .map(|file| scene_key("images.collision", file))
        .transpose()?;
    let player_sprite = character_key("player.sprite", &def.player.sprite)?;

    let mut npcs = Vec::with_capacity(def.npcs.len());
    for (index, npc) in def.npcs.iter().enumerate() {
        let base_sprite = character_key(&format!("npcs[{index}].id"), &format!("{}.png", npc.id))?;
        let active_sprite = npc
            .active_image
            .as_deref()
            .map(|file| character_key(&format!("npcs[{index}].active_image"), file))
            .transpose()?;
        let sound = match npc.sound.as_deref().map(normalize_separators) {
            Some(sound) if !sound.is_empty() => {
                let field = format!("npcs[{index}].sound");
                Some(if sound.contains('/') {
                    scene_key(&field, &sound)?
                } else {
                    character_key(&field, &sound)?
                })
            }
            _ => None,
        };
        npcs.push(NpcAssets {
            base_sprite,
            active_sprite,
            sound,
        });
    }

    let music = def
        .audio
        .music
        .iter()
        .enumerate()
        .map(|(index, file)| scene_key(&format!("audio.music[{index}]"), file))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LoadedScene {
        name: name.to_string(),
        assets: SceneAssets {
            background,
            foreground,
            collision,
            player_sprite,
            npcs,
            music,
        },
        def,
    })
}

fn normalize_separators(path: &str) -> String {
    path.trim().replace('\\', "/")
}

fn checked_key(field: &str, key: String) -> Result<String, SceneDefError> {
    match validate_asset_key(&key) {
        Ok(()) => Ok(key),
        Err(source) => Err(SceneDefError::AssetKey {
            field: field.to_string(),
            key,
            source,
        }),
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> SceneDefError {
    SceneDefError::Invalid {
        field: field.into(),
        message: message.into(),
    }
}

fn require_positive(field: &str, value: f32) -> Result<(), SceneDefError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected finite number > 0, got {value}")))
    }
}

fn require_non_negative(field: &str, value: f32) -> Result<(), SceneDefError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected finite number >= 0, got {value}")))
    }
}

fn validate_scene_def(def: &SceneDef) -> Result<(), SceneDefError> {
    require_positive("world.width", def.world.width)?;
    require_positive("world.height", def.world.height)?;

    require_positive("player.size", def.player.size)?;
    require_non_negative("player.speed", def.player.speed)?;
    if def.player.size > def.world.width || def.player.size > def.world.height {
        return Err(invalid(
            "player.size",
            format!(
                "player size {} does not fit world {}x{}",
                def.player.size, def.world.width, def.world.height
            ),
        ));
    }
    if let Some([x, y]) = def.player.start {
        require_non_negative("player.start[0]", x)?;
        require_non_negative("player.start[1]", y)?;
        let (max_x, max_y) = (
            def.world.width - def.player.size,
            def.world.height - def.player.size,
        );
        if x > max_x || y > max_y {
            return Err(invalid(
                "player.start",
                format!("start ({x}, {y}) must lie within (0, 0)..=({max_x}, {max_y})"),
            ));
        }
    }

    let tuning = &def.tuning;
    require_non_negative("tuning.proximity_px", tuning.proximity_px)?;
    require_positive("tuning.camera_zoom", tuning.camera_zoom)?;
    require_positive("tuning.default_npc_size", tuning.default_npc_size)?;
    require_non_negative(
        "tuning.active_sprite_delay_seconds",
        tuning.active_sprite_delay_seconds,
    )?;
    if let Some(inset) = tuning.foot_inset_px {
        require_non_negative("tuning.foot_inset_px", inset)?;
        if inset > def.player.size {
            return Err(invalid(
                "tuning.foot_inset_px",
                format!(
                    "foot inset {inset} exceeds player size {}",
                    def.player.size
                ),
            ));
        }
    }
    require_non_negative("tuning.move_epsilon_px", tuning.move_epsilon_px)?;
    require_non_negative("tuning.input_epsilon", tuning.input_epsilon)?;
    require_non_negative("tuning.intent_epsilon", tuning.intent_epsilon)?;
    require_non_negative("tuning.drag_dead_zone_px", tuning.drag_dead_zone_px)?;
    require_positive("tuning.max_frame_dt_seconds", tuning.max_frame_dt_seconds)?;

    let joystick = &def.joystick;
    require_positive("joystick.knob_radius_scale", joystick.knob_radius_scale)?;
    require_positive("joystick.input_radius_mult", joystick.input_radius_mult)?;
    require_positive("joystick.expo", joystick.expo)?;
    if !(joystick.dead_zone.is_finite() && (0.0..1.0).contains(&joystick.dead_zone)) {
        return Err(invalid(
            "joystick.dead_zone",
            format!("expected value in [0, 1), got {}", joystick.dead_zone),
        ));
    }

    require_non_negative("audio.music_volume", def.audio.music_volume)?;
    require_non_negative("audio.sfx_volume", def.audio.sfx_volume)?;

    let mut seen_ids = HashSet::new();
    for (index, npc) in def.npcs.iter().enumerate() {
        let field = |name: &str| format!("npcs[{index}].{name}");
        if npc.id.trim().is_empty() {
            return Err(invalid(field("id"), "id must not be empty"));
        }
        if !seen_ids.insert(npc.id.as_str()) {
            return Err(invalid(field("id"), format!("duplicate id '{}'", npc.id)));
        }
        require_non_negative(&field("x"), npc.x)?;
        require_non_negative(&field("y"), npc.y)?;
        if let Some(size) = npc.size {
            require_positive(&field("size"), size)?;
        }
        if let Some(delay) = npc.delay {
            require_non_negative(&field("delay"), delay)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "npcs": [
            { "id": "character_1", "x": 10, "y": 20, "line": "ciao" },
            {
                "id": "character_x",
                "x": 250,
                "y": 850,
                "size": 60,
                "line": "`hi`",
                "active_image": "character_x_b.png",
                "sound": "character_x_sfx.mp3",
                "delay": 1.7
            }
        ]
    }"#;

    fn parse(raw: &str) -> Result<SceneDef, SceneDefError> {
        parse_scene_def(raw, Path::new("scene.json"))
    }

    #[test]
    fn defaults_match_reference_scene_constants() {
        let def = parse(MINIMAL).expect("parse");
        assert_eq!((def.world.width, def.world.height), (2048.0, 2048.0));
        assert_eq!(def.player.size, 95.0);
        assert_eq!(def.player.speed, 320.0);
        assert_eq!(def.tuning.proximity_px, 70.0);
        assert_eq!(def.tuning.camera_zoom, 1.1);
        assert_eq!(def.tuning.default_npc_size, 70.0);
        assert_eq!(def.tuning.active_sprite_delay_seconds, 5.0);
        assert_eq!(def.tuning.black_threshold, 12);
        assert_eq!(def.tuning.foot_inset_px, None);
        assert_eq!(def.tuning.drag_dead_zone_px, 18.0);
        assert_eq!(def.joystick.expo, 1.15);
        assert_eq!(def.audio.music_volume, 0.7);
        assert!(!def.debug_enabled);
    }

    #[test]
    fn resolves_asset_keys_under_scene_directory() {
        let loaded = resolve_scene("birthday", parse(MINIMAL).expect("parse")).expect("resolve");
        let assets = &loaded.assets;
        assert_eq!(assets.background, "scenes/birthday/bg.png");
        assert_eq!(
            assets.collision.as_deref(),
            Some("scenes/birthday/collision.png")
        );
        assert_eq!(
            assets.player_sprite,
            "scenes/birthday/characters/player.png"
        );
        assert_eq!(
            assets.npcs[0].base_sprite,
            "scenes/birthday/characters/character_1.png"
        );
        assert_eq!(assets.npcs[0].active_sprite, None);
        assert_eq!(
            assets.npcs[1].active_sprite.as_deref(),
            Some("scenes/birthday/characters/character_x_b.png")
        );
        assert_eq!(
            assets.music,
            vec!["scenes/birthday/music.m4a", "scenes/birthday/music.mp3"]
        );
    }

    #[test]
    fn bare_sound_names_resolve_under_character_dir() {
        let loaded = resolve_scene("birthday", parse(MINIMAL).expect("parse")).expect("resolve");
        assert_eq!(
            loaded.assets.npcs[1].sound.as_deref(),
            Some("scenes/birthday/characters/character_x_sfx.mp3")
        );
        assert_eq!(loaded.assets.npcs[0].sound, None);
    }

    #[test]
    fn sound_paths_with_separators_resolve_from_scene_dir() {
        let raw = r#"{ "npcs": [
            { "id": "a", "x": 0, "y": 0, "line": "x", "sound": "sfx\\pop.mp3" }
        ] }"#;
        let loaded = resolve_scene("demo", parse(raw).expect("parse")).expect("resolve");
        assert_eq!(
            loaded.assets.npcs[0].sound.as_deref(),
            Some("scenes/demo/sfx/pop.mp3")
        );
    }

    #[test]
    fn sim_scene_uses_default_npc_size_and_delays() {
        let loaded = resolve_scene("birthday", parse(MINIMAL).expect("parse")).expect("resolve");
        let sim = loaded.sim_scene();
        assert_eq!(sim.npc_boxes[0].size, 70.0);
        assert_eq!(sim.npc_boxes[1].size, 60.0);
        assert_eq!(sim.npc_dialogue[0].reveal_delay_seconds, 0.0);
        assert_eq!(sim.npc_dialogue[1].reveal_delay_seconds, 1.7);
        assert!(sim.npc_dialogue[1].has_active_sprite);
        assert!(sim.npc_dialogue[1].has_sound);
        assert_eq!(loaded.player_start(), Vec2::new(1024.0, 1024.0));
    }

    #[test]
    fn foot_inset_defaults_to_thirty_and_shrinks_with_small_players() {
        let loaded = resolve_scene("birthday", parse(MINIMAL).expect("parse")).expect("resolve");
        assert_eq!(loaded.foot_inset_px(), 30.0);
        assert_eq!(loaded.sim_scene().params.motion.foot_inset_px, 30.0);

        let raw = r#"{ "player": { "size": 20 }, "npcs": [] }"#;
        let small = resolve_scene("demo", parse(raw).expect("parse")).expect("small player");
        assert_eq!(small.foot_inset_px(), 10.0);

        let raw = r#"{ "player": { "size": 20 }, "tuning": { "foot_inset_px": 2 }, "npcs": [] }"#;
        let explicit = resolve_scene("demo", parse(raw).expect("parse")).expect("explicit");
        assert_eq!(explicit.foot_inset_px(), 2.0);
    }

    #[test]
    fn explicit_foot_inset_larger_than_player_fails_validation() {
        let raw = r#"{ "player": { "size": 20 }, "tuning": { "foot_inset_px": 30 }, "npcs": [] }"#;
        let error = resolve_scene("demo", parse(raw).expect("parse")).expect_err("inset");
        assert_eq!(
            error.to_string(),
            "validation failed at tuning.foot_inset_px: foot inset 30 exceeds player size 20"
        );
    }

    #[test]
    fn start_outside_walkable_area_fails_validation() {
        let raw = r#"{
            "world": { "width": 500, "height": 500 },
            "player": { "size": 50, "start": [460, 10] },
            "npcs": []
        }"#;
        let error = resolve_scene("demo", parse(raw).expect("parse")).expect_err("start");
        match error {
            SceneDefError::Invalid { field, .. } => assert_eq!(field, "player.start"),
            other => panic!("unexpected error: {other}"),
        }

        let raw = r#"{
            "world": { "width": 500, "height": 500 },
            "player": { "size": 50, "start": [450, 450] },
            "npcs": []
        }"#;
        let edge = resolve_scene("demo", parse(raw).expect("parse")).expect("edge start");
        assert_eq!(edge.player_start(), Vec2::new(450.0, 450.0));
    }

    #[test]
    fn default_start_is_clamped_into_the_world() {
        let raw = r#"{
            "world": { "width": 100, "height": 100 },
            "player": { "size": 80 },
            "npcs": []
        }"#;
        let loaded = resolve_scene("demo", parse(raw).expect("parse")).expect("resolve");
        assert_eq!(loaded.player_start(), Vec2::new(20.0, 20.0));
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = r#"{ "npcs": [ { "id": "a", "x": "left", "y": 0, "line": "x" } ] }"#;
        let error = parse(raw).expect_err("should fail");
        match error {
            SceneDefError::Parse { location, .. } => assert_eq!(location, "npcs[0].x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{ "npcs": [], "speed": 3 }"#;
        assert!(matches!(parse(raw), Err(SceneDefError::Parse { .. })));
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let raw = r#"{ "npcs": [
            { "id": "a", "x": 0, "y": 0, "line": "x" },
            { "id": "a", "x": 5, "y": 5, "line": "y" }
        ] }"#;
        let error = resolve_scene("demo", parse(raw).expect("parse")).expect_err("dup");
        assert_eq!(
            error.to_string(),
            "validation failed at npcs[1].id: duplicate id 'a'"
        );
    }

    #[test]
    fn negative_delay_and_oversized_player_fail_validation() {
        let raw = r#"{ "npcs": [ { "id": "a", "x": 0, "y": 0, "line": "x", "delay": -1 } ] }"#;
        assert!(matches!(
            resolve_scene("demo", parse(raw).expect("parse")),
            Err(SceneDefError::Invalid { .. })
        ));

        let raw = r#"{ "world": { "width": 50, "height": 50 }, "npcs": [] }"#;
        assert!(matches!(
            resolve_scene("demo", parse(raw).expect("parse")),
            Err(SceneDefError::Invalid { .. })
        ));
    }

    #[test]
    fn traversal_in_asset_reference_is_rejected() {
        let raw = r#"{ "images": { "background": "../../secret.png" }, "npcs": [] }"#;
        assert!(matches!(
            resolve_scene("demo", parse(raw).expect("parse")),
            Err(SceneDefError::AssetKey { .. })
        ));
    }

    #[test]
    fn load_scene_reads_descriptor_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scene_path = scene_dir(dir.path(), "demo");
        fs::create_dir_all(&scene_path).expect("mkdir");
        fs::write(scene_path.join(SCENE_FILE_NAME), MINIMAL).expect("write");

        let loaded = load_scene(dir.path(), "demo").expect("load");
        assert_eq!(loaded.name, "demo");
        assert_eq!(loaded.def.npcs.len(), 2);

        assert!(matches!(
            load_scene(dir.path(), "missing"),
            Err(SceneDefError::Read { .. })
        ));
        assert!(matches!(
            load_scene(dir.path(), "../demo"),
            Err(SceneDefError::InvalidSceneName { .. })
        ));
    }

    #[test]
    fn bundled_birthday_scene_loads() {
        let asset_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let loaded = load_scene(&asset_root, "birthday").expect("birthday scene");
        assert_eq!(loaded.def.npcs.len(), 16);
        assert_eq!(
            loaded.assets.npcs[2].active_sprite.as_deref(),
            Some("scenes/birthday/characters/character_3_b.png")
        );
        assert_eq!(
            loaded.assets.npcs[15].sound.as_deref(),
            Some("scenes/birthday/characters/character_x_sfx.mp3")
        );
    }
}
