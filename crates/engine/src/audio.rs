//! Audio seam between the scene and a playback backend.
//!
//! Sounds and music are addressed by asset key (relative to the asset root),
//! the same keys the renderer uses for sprites. Backends must never fail the
//! caller: a missing device or an undecodable file is logged and skipped.

/// Playback backend driven by the scene.
pub trait AudioSink {
    /// Starts looping background music from the first candidate that
    /// decodes. Calls after the first successful start are ignored.
    fn start_music(&mut self, candidates: &[String]);

    /// Decodes and caches sound effects ahead of their first use.
    fn preload(&mut self, keys: &[String]);

    /// Plays one sound effect on its own voice.
    fn play_sound(&mut self, key: &str);

    /// Short label for the debug overlay.
    fn describe(&self) -> &'static str {
        "audio"
    }
}

/// Silent backend used when no output device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn start_music(&mut self, _candidates: &[String]) {}

    fn preload(&mut self, _keys: &[String]) {}

    fn play_sound(&mut self, _key: &str) {}

    fn describe(&self) -> &'static str {
        "silent"
    }
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn start_music(&mut self, candidates: &[String]) {
        (**self).start_music(candidates);
    }

    fn preload(&mut self, keys: &[String]) {
        (**self).preload(keys);
    }

    fn play_sound(&mut self, key: &str) {
        (**self).play_sound(key);
    }

    fn describe(&self) -> &'static str {
        (**self).describe()
    }
}
