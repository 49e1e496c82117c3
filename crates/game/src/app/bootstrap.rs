use std::path::PathBuf;

use cardwalk_engine::{
    load_scene, resolve_app_paths, resolve_scene_name, LoopConfig, Scene, SceneDefError,
    StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::audio::build_audio;
use super::card::CardScene;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) asset_root: PathBuf,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load scene '{name}': {source}")]
    Scene {
        name: String,
        #[source]
        source: SceneDefError,
    },
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== cardwalk Startup ===");

    let paths = resolve_app_paths()?;
    let scene_name = resolve_scene_name()?;
    info!(
        root = %paths.root.display(),
        scene = %scene_name,
        "paths_resolved"
    );

    let loaded = load_scene(&paths.assets_dir, &scene_name).map_err(|source| {
        BootstrapError::Scene {
            name: scene_name.clone(),
            source,
        }
    })?;
    let audio = build_audio(&paths.assets_dir, &loaded.def.audio);
    let config = LoopConfig {
        window_title: loaded.def.title.clone(),
        ..LoopConfig::default()
    };
    let scene = CardScene::new(loaded, paths.assets_dir.clone(), audio);

    Ok(AppWiring {
        config,
        asset_root: paths.assets_dir,
        scene: Box::new(scene),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
