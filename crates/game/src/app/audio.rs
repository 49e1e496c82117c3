//! Audio backend: rodio playback behind the `sound` feature.
//!
//! Build with `--no-default-features` to drop rodio entirely; the scene then
//! runs against the engine's silent sink.

use std::path::Path;

use cardwalk_engine::content::AudioDef;
use cardwalk_engine::{AudioSink, NullAudio};

pub(crate) fn build_audio(asset_root: &Path, def: &AudioDef) -> Box<dyn AudioSink> {
    #[cfg(feature = "sound")]
    {
        if let Some(audio) =
            inner::RodioAudio::try_new(asset_root.to_path_buf(), def.music_volume, def.sfx_volume)
        {
            return Box::new(audio);
        }
    }
    #[cfg(not(feature = "sound"))]
    {
        let _ = (asset_root, def);
    }
    tracing::info!("audio_disabled");
    Box::new(NullAudio)
}

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use cardwalk_engine::content::asset_path;
    use cardwalk_engine::AudioSink;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::{info, warn};

    pub(crate) struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        asset_root: PathBuf,
        music_volume: f32,
        sfx_volume: f32,
        music: Option<Sink>,
        /// Encoded bytes per key. `None` remembers a file that failed to read.
        sfx_cache: HashMap<String, Option<Arc<Vec<u8>>>>,
    }

    impl RodioAudio {
        pub(crate) fn try_new(
            asset_root: PathBuf,
            music_volume: f32,
            sfx_volume: f32,
        ) -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                    asset_root,
                    music_volume,
                    sfx_volume,
                    music: None,
                    sfx_cache: HashMap::new(),
                }),
                Err(error) => {
                    warn!(error = %error, "audio_output_unavailable");
                    None
                }
            }
        }

        fn cached_bytes(&mut self, key: &str) -> Option<Arc<Vec<u8>>> {
            if let Some(cached) = self.sfx_cache.get(key) {
                return cached.clone();
            }
            let loaded = read_asset(&self.asset_root, key).map(Arc::new);
            self.sfx_cache.insert(key.to_string(), loaded.clone());
            loaded
        }
    }

    impl AudioSink for RodioAudio {
        fn start_music(&mut self, candidates: &[String]) {
            if self.music.is_some() {
                return;
            }
            for key in candidates {
                let Some(bytes) = read_asset(&self.asset_root, key) else {
                    continue;
                };
                let source = match Decoder::new(Cursor::new(bytes)) {
                    Ok(source) => source,
                    Err(error) => {
                        warn!(key = key.as_str(), error = %error, "music_decode_failed");
                        continue;
                    }
                };
                let sink = match Sink::try_new(&self.handle) {
                    Ok(sink) => sink,
                    Err(error) => {
                        warn!(error = %error, "music_sink_unavailable");
                        return;
                    }
                };
                sink.set_volume(self.music_volume);
                sink.append(source.repeat_infinite());
                self.music = Some(sink);
                info!(key = key.as_str(), volume = self.music_volume, "music_started");
                return;
            }
            warn!(candidates = candidates.len(), "music_unavailable");
        }

        fn preload(&mut self, keys: &[String]) {
            let loaded = keys
                .iter()
                .filter(|key| self.cached_bytes(key).is_some())
                .count();
            info!(requested = keys.len(), loaded, "sfx_preloaded");
        }

        fn play_sound(&mut self, key: &str) {
            let Some(bytes) = self.cached_bytes(key) else {
                return;
            };
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(error) => {
                    warn!(error = %error, "sfx_sink_unavailable");
                    return;
                }
            };
            match Decoder::new(Cursor::new(bytes.as_ref().clone())) {
                Ok(source) => {
                    sink.set_volume(self.sfx_volume);
                    sink.append(source);
                    // Each effect gets its own voice so overlaps mix.
                    sink.detach();
                }
                Err(error) => warn!(key, error = %error, "sfx_decode_failed"),
            }
        }

        fn describe(&self) -> &'static str {
            "rodio"
        }
    }

    pub(super) fn read_asset(asset_root: &Path, key: &str) -> Option<Vec<u8>> {
        let path = match asset_path(asset_root, key) {
            Ok(path) => path,
            Err(error) => {
                warn!(key, error = %error, "audio_key_invalid");
                return None;
            }
        };
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "audio_read_failed");
                None
            }
        }
    }
}
