mod asset_keys;
mod rich_text;
mod scene_def;

pub use asset_keys::{asset_path, join_key, validate_asset_key, AssetKeyError};
pub use rich_text::{parse_rich_text, plain_text, SpanStyle, TextSpan};
pub use scene_def::{
    load_scene, parse_scene_def, resolve_scene, scene_dir, AudioDef, BannerTextDef, ImagesDef,
    JoystickDef, LoadedScene, NpcAssets, NpcDef, PlayerDef, SceneAssets, SceneDef, SceneDefError,
    TuningDef, WorldDef, DEFAULT_FOOT_INSET_PX, SCENES_DIR, SCENE_FILE_NAME,
};
