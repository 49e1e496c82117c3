use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};
use thiserror::Error;
use tracing::{info, warn};

use super::types::WorldSize;

pub const DEFAULT_BLACK_THRESHOLD: u8 = 12;

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("failed to open collision image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode collision image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("collision world size must be positive, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
    #[error("collision pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Binary wall/free grid sampled at the feet of moving entities.
///
/// A mask that never finished loading answers `false` everywhere, so a
/// broken collision image disables collision instead of trapping the player.
#[derive(Debug, Clone, Default)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    walls: Option<Vec<bool>>,
}

impl CollisionMask {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Classifies an RGBA buffer that already has world dimensions.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
        black_threshold: u8,
    ) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || width == 0 || height == 0 {
            return Err(MaskError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let walls = rgba
            .chunks_exact(4)
            .map(|px| is_wall_pixel(px, black_threshold))
            .collect();
        Ok(Self {
            width,
            height,
            walls: Some(walls),
        })
    }

    pub fn from_image(
        image: &RgbaImage,
        world: WorldSize,
        black_threshold: u8,
    ) -> Result<Self, MaskError> {
        let (width, height) = world_pixel_dims(world)?;
        if image.width() == width && image.height() == height {
            return Self::from_rgba(width, height, image.as_raw(), black_threshold);
        }
        let stretched = imageops::resize(image, width, height, FilterType::Nearest);
        Self::from_rgba(width, height, stretched.as_raw(), black_threshold)
    }

    pub fn try_load(
        path: &Path,
        world: WorldSize,
        black_threshold: u8,
    ) -> Result<Self, MaskError> {
        let reader = ImageReader::open(path).map_err(|source| MaskError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| MaskError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image(&decoded.to_rgba8(), world, black_threshold)
    }

    pub fn load(path: &Path, world: WorldSize, black_threshold: u8) -> Self {
        match Self::try_load(path, world, black_threshold) {
            Ok(mask) => {
                info!(
                    path = %path.display(),
                    width = mask.width,
                    height = mask.height,
                    "collision_mask_ready"
                );
                mask
            }
            Err(error) => {
                warn!(error = %error, "collision_mask_unavailable_collision_disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.walls.is_some()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-range coordinates saturate to the nearest edge pixel.
    pub fn is_wall(&self, x: f32, y: f32) -> bool {
        let Some(walls) = self.walls.as_ref() else {
            return false;
        };
        let px = saturate_coord(x, self.width);
        let py = saturate_coord(y, self.height);
        walls[py as usize * self.width as usize + px as usize]
    }
}

fn is_wall_pixel(px: &[u8], black_threshold: u8) -> bool {
    let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
    a > 0 && r <= black_threshold && g <= black_threshold && b <= black_threshold
}

fn saturate_coord(value: f32, extent: u32) -> u32 {
    let max = extent.saturating_sub(1) as f32;
    if !value.is_finite() {
        return if value == f32::INFINITY { max as u32 } else { 0 };
    }
    value.round().clamp(0.0, max) as u32
}

fn world_pixel_dims(world: WorldSize) -> Result<(u32, u32), MaskError> {
    let width = world.width.round();
    let height = world.height.round();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(MaskError::InvalidWorldSize {
            width: world.width,
            height: world.height,
        });
    }
    Ok((width as u32, height as u32))
}

/// Decodes a mask on a worker thread. The frame loop polls for the result
/// and never waits on it.
#[derive(Debug)]
pub struct MaskLoader {
    receiver: Option<Receiver<CollisionMask>>,
}

impl MaskLoader {
    pub fn spawn(path: PathBuf, world: WorldSize, black_threshold: u8) -> Self {
        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("mask-loader".to_string())
            .spawn(move || {
                let mask = CollisionMask::load(&path, world, black_threshold);
                // Receiver gone means the scene was torn down first.
                let _ = sender.send(mask);
            });
        match spawned {
            Ok(_) => Self {
                receiver: Some(receiver),
            },
            Err(error) => {
                warn!(error = %error, "collision_mask_loader_spawn_failed");
                Self { receiver: None }
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns the finished mask once. A loader whose worker died yields a
    /// disabled mask so the caller stops polling.
    pub fn poll(&mut self) -> Option<CollisionMask> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(mask) => {
                self.receiver = None;
                Some(mask)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                warn!("collision_mask_loader_disconnected");
                Some(CollisionMask::disabled())
            }
        }
    }
}
