//! Frame pacing statistics for the walkabout loop.
//!
//! The loop feeds every raw frame delta into a [`MetricsAccumulator`]; once per
//! interval it folds them into a [`LoopMetricsSnapshot`] that the F3 overlay
//! and the `loop_metrics` log line read back through a [`MetricsHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::warn;

static POISON_WARNED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    /// Longest raw frame seen in the interval.
    pub worst_frame_ms: f32,
    /// Frames whose delta hit the simulation clamp, so the player walked
    /// less than wall-clock time suggests.
    pub clamped_frames: u32,
}

/// Shared, cloneable view of the latest published snapshot.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<Mutex<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *self.lock()
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        *self.lock() = snapshot;
    }

    // The snapshot is plain `Copy` data, so a poisoned lock still holds a
    // whole value.
    fn lock(&self) -> MutexGuard<'_, LoopMetricsSnapshot> {
        self.latest.lock().unwrap_or_else(|poisoned| {
            if !POISON_WARNED.swap(true, Ordering::Relaxed) {
                warn!("metrics_lock_poisoned");
            }
            PoisonError::into_inner(poisoned)
        })
    }
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window_start: Instant,
    window: Duration,
    clamp: Duration,
    frames: u32,
    clamped_frames: u32,
    total: Duration,
    worst: Duration,
}

impl MetricsAccumulator {
    /// `clamp` is the loop's max frame delta; frames at or above it are
    /// counted as clamped.
    pub(crate) fn new(window: Duration, clamp: Duration) -> Self {
        Self {
            window_start: Instant::now(),
            window,
            clamp,
            frames: 0,
            clamped_frames: 0,
            total: Duration::ZERO,
            worst: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, raw_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.total = self.total.saturating_add(raw_dt);
        self.worst = self.worst.max(raw_dt);
        if raw_dt >= self.clamp {
            self.clamped_frames = self.clamped_frames.saturating_add(1);
        }
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed.as_secs_f32().max(f32::EPSILON),
            frame_time_ms: match self.frames {
                0 => 0.0,
                frames => self.total.as_secs_f32() * 1000.0 / frames as f32,
            },
            worst_frame_ms: self.worst.as_secs_f32() * 1000.0,
            clamped_frames: self.clamped_frames,
        };

        *self = Self {
            window_start: now,
            ..Self::new(self.window, self.clamp)
        };
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const WINDOW: Duration = Duration::from_secs(1);
    const CLAMP: Duration = Duration::from_millis(50);

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn snapshot_averages_frames_and_tracks_worst() {
        let mut accumulator = MetricsAccumulator::new(WINDOW, CLAMP);
        let base = Instant::now();
        for dt in [16, 20, 24] {
            accumulator.record_frame(ms(dt));
        }

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("snapshot");

        assert!((snapshot.fps - 1.5).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 20.0).abs() < 0.001);
        assert!((snapshot.worst_frame_ms - 24.0).abs() < 0.001);
        assert_eq!(snapshot.clamped_frames, 0);
    }

    #[test]
    fn frames_at_the_clamp_are_counted() {
        let mut accumulator = MetricsAccumulator::new(WINDOW, CLAMP);
        let base = Instant::now();
        accumulator.record_frame(ms(16));
        accumulator.record_frame(ms(50));
        accumulator.record_frame(ms(250));

        let snapshot = accumulator
            .maybe_snapshot(base + WINDOW)
            .expect("snapshot");
        assert_eq!(snapshot.clamped_frames, 2);
        assert!((snapshot.worst_frame_ms - 250.0).abs() < 0.001);
    }

    #[test]
    fn each_window_starts_empty() {
        let mut accumulator = MetricsAccumulator::new(WINDOW, CLAMP);
        let base = Instant::now();
        accumulator.record_frame(ms(80));
        assert!(accumulator.maybe_snapshot(base + WINDOW).is_some());

        let idle = accumulator
            .maybe_snapshot(base + Duration::from_secs(3))
            .expect("idle snapshot");
        assert_eq!(idle, LoopMetricsSnapshot::default());
    }

    #[test]
    fn no_snapshot_inside_the_window() {
        let mut accumulator = MetricsAccumulator::new(WINDOW, CLAMP);
        let base = Instant::now();
        accumulator.record_frame(ms(16));
        assert!(accumulator.maybe_snapshot(base + ms(500)).is_none());
    }

    #[test]
    fn handle_survives_a_poisoned_lock() {
        let handle = MetricsHandle::default();
        let shared = handle.clone();
        let _ = thread::spawn(move || {
            let _guard = shared.latest.lock().expect("lock");
            panic!("poison the metrics lock");
        })
        .join();

        assert_eq!(handle.snapshot(), LoopMetricsSnapshot::default());
        let published = LoopMetricsSnapshot {
            fps: 30.0,
            frame_time_ms: 33.0,
            worst_frame_ms: 40.0,
            clamped_frames: 1,
        };
        handle.publish(published);
        assert_eq!(handle.snapshot(), published);
    }
}
