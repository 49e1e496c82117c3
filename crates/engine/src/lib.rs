use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod audio;
pub mod content;
pub mod sim;

pub use app::{
    follow_camera, run_app, run_app_with_metrics, screen_to_world, world_to_screen,
    world_to_screen_px, AppError, Banner, Camera2D, Entity, EntityDesc, EntityId,
    EntityIdAllocator, EntityLayer, HudState, InputAction, InputSnapshot, JoystickWidget,
    LoopConfig, LoopMetricsSnapshot, MetricsHandle, PointerGesture, Renderer, Scene,
    SceneCommand, SceneWorld, Viewport, SLOW_FRAME_ENV_VAR,
};
pub use audio::{AudioSink, NullAudio};
pub use content::{load_scene, LoadedScene, SceneDefError, TextSpan, SCENES_DIR};

pub const ROOT_ENV_VAR: &str = "CARDWALK_ROOT";
pub const SCENE_ENV_VAR: &str = "CARDWALK_SCENE";
pub const DEFAULT_SCENE_NAME: &str = "birthday";
const ASSETS_DIR_NAME: &str = "assets";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("{var} points to {path}, which has no assets/scenes directory")]
    InvalidEnvRoot { var: &'static str, path: PathBuf },
    #[error(
        "no directory with assets/scenes found above {start_dir}; \
         set {var} to the cardwalk checkout"
    )]
    RootNotFound {
        start_dir: PathBuf,
        var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let assets_dir = root.join(ASSETS_DIR_NAME);
    Ok(AppPaths { root, assets_dir })
}

/// Scene name from `CARDWALK_SCENE`, or the default scene when unset.
pub fn resolve_scene_name() -> Result<String, StartupError> {
    match env::var(SCENE_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Ok(_) | Err(env::VarError::NotPresent) => Ok(DEFAULT_SCENE_NAME.to_string()),
        Err(source) => Err(StartupError::EnvVar {
            var: SCENE_ENV_VAR,
            source,
        }),
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let path = normalize_path(Path::new(&value));
            if is_card_root(&path) {
                Ok(path)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    var: ROOT_ENV_VAR,
                    path,
                })
            }
        }
        Err(env::VarError::NotPresent) => root_above_executable(),
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

/// Walks up from the executable so `target/debug/cardwalk` finds the
/// checkout and a shipped build finds the `assets/` next to it.
fn root_above_executable() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let exe_dir = exe
        .parent()
        .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

    exe_dir
        .ancestors()
        .find(|candidate| is_card_root(candidate))
        .map(normalize_path)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: normalize_path(exe_dir),
            var: ROOT_ENV_VAR,
        })
}

fn is_card_root(path: &Path) -> bool {
    path.join(ASSETS_DIR_NAME).join(SCENES_DIR).is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
