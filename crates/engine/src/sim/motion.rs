use super::collision::CollisionMask;
use super::intent::MoveIntent;
use super::types::{EntityBox, Vec2, WorldSize};

pub const RELOCATE_MAX_RADIUS_PX: i32 = 220;
pub const RELOCATE_STEP_PX: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub speed_px_per_second: f32,
    pub entity_size: f32,
    /// Distance from the sprite's bottom edge up to the sampled foot pixel.
    pub foot_inset_px: f32,
    pub world: WorldSize,
}

impl MotionParams {
    fn max_x(&self) -> f32 {
        (self.world.width - self.entity_size).max(0.0)
    }

    fn max_y(&self) -> f32 {
        (self.world.height - self.entity_size).max(0.0)
    }

    pub fn clamp_to_world(&self, position: Vec2) -> Vec2 {
        Vec2 {
            x: position.x.clamp(0.0, self.max_x()),
            y: position.y.clamp(0.0, self.max_y()),
        }
    }
}

pub fn foot_point(position: Vec2, size: f32, foot_inset_px: f32) -> Vec2 {
    Vec2 {
        x: position.x + size / 2.0,
        y: position.y + size - foot_inset_px,
    }
}

pub fn collides_at_foot(mask: &CollisionMask, position: Vec2, params: &MotionParams) -> bool {
    let foot = foot_point(position, params.entity_size, params.foot_inset_px);
    mask.is_wall(foot.x, foot.y)
}

/// Advances `current` by one frame of `intent`.
///
/// X is resolved against the old Y first, then Y against the resolved X, so
/// an entity blocked on one axis keeps sliding along the other.
pub fn step(
    current: Vec2,
    intent: MoveIntent,
    dt_seconds: f32,
    params: &MotionParams,
    mask: &CollisionMask,
    collision_enabled: bool,
) -> Vec2 {
    let distance = params.speed_px_per_second * intent.mag * dt_seconds;
    let naive = params.clamp_to_world(Vec2 {
        x: current.x + intent.x * distance,
        y: current.y + intent.y * distance,
    });

    if !collision_enabled || !mask.is_ready() {
        return naive;
    }

    let mut resolved = current;
    if !collides_at_foot(mask, Vec2::new(naive.x, resolved.y), params) {
        resolved.x = naive.x;
    }
    if !collides_at_foot(mask, Vec2::new(resolved.x, naive.y), params) {
        resolved.y = naive.y;
    }
    resolved
}

/// Searches square rings around `start` for the first position whose foot
/// point is walkable. Returns `None` when already free or nothing free lies
/// within the search radius.
pub fn relocate_if_stuck(start: Vec2, params: &MotionParams, mask: &CollisionMask) -> Option<Vec2> {
    if !mask.is_ready() || !collides_at_foot(mask, start, params) {
        return None;
    }

    let start_x = start.x.round() as i32;
    let start_y = start.y.round() as i32;
    let mut radius = 0;
    while radius <= RELOCATE_MAX_RADIUS_PX {
        let mut dy = -radius;
        while dy <= radius {
            let mut dx = -radius;
            while dx <= radius {
                let candidate = params.clamp_to_world(Vec2 {
                    x: (start_x + dx) as f32,
                    y: (start_y + dy) as f32,
                });
                if !collides_at_foot(mask, candidate, params) {
                    return Some(candidate);
                }
                dx += RELOCATE_STEP_PX;
            }
            dy += RELOCATE_STEP_PX;
        }
        radius += RELOCATE_STEP_PX;
    }
    None
}

/// Euclidean displacement between two frames, used for movement detection.
pub fn displacement(before: Vec2, after: Vec2) -> f32 {
    before.distance(after)
}

pub fn entity_box(position: Vec2, params: &MotionParams) -> EntityBox {
    EntityBox {
        position,
        size: params.entity_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::DEFAULT_BLACK_THRESHOLD;

    const WORLD: WorldSize = WorldSize {
        width: 100.0,
        height: 100.0,
    };

    fn params() -> MotionParams {
        MotionParams {
            speed_px_per_second: 100.0,
            entity_size: 10.0,
            foot_inset_px: 2.0,
            world: WORLD,
        }
    }

    fn mask_with_walls(is_wall: impl Fn(u32, u32) -> bool) -> CollisionMask {
        let mut rgba = Vec::with_capacity(100 * 100 * 4);
        for y in 0..100 {
            for x in 0..100 {
                if is_wall(x, y) {
                    rgba.extend_from_slice(&[0, 0, 0, 255]);
                } else {
                    rgba.extend_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        CollisionMask::from_rgba(100, 100, &rgba, DEFAULT_BLACK_THRESHOLD).expect("mask")
    }

    fn intent(x: f32, y: f32) -> MoveIntent {
        let len = x.hypot(y);
        MoveIntent {
            x: x / len,
            y: y / len,
            mag: 1.0,
        }
    }

    #[test]
    fn foot_point_sits_at_bottom_center_minus_inset() {
        let foot = foot_point(Vec2::new(10.0, 20.0), 95.0, 30.0);
        assert_eq!(foot, Vec2::new(57.5, 85.0));
    }

    #[test]
    fn free_movement_scales_with_speed_magnitude_and_dt() {
        let mask = CollisionMask::disabled();
        let half = MoveIntent {
            x: 1.0,
            y: 0.0,
            mag: 0.5,
        };
        let next = step(Vec2::new(20.0, 20.0), half, 0.1, &params(), &mask, true);
        assert_eq!(next, Vec2::new(25.0, 20.0));
    }

    #[test]
    fn position_is_clamped_to_world_bounds_for_any_displacement() {
        let mask = CollisionMask::disabled();
        let p = params();
        let cases = [
            (Vec2::new(0.0, 0.0), intent(-1.0, -1.0), 1_000.0),
            (Vec2::new(89.0, 89.0), intent(1.0, 1.0), 1_000.0),
            (Vec2::new(50.0, 50.0), intent(1.0, -1.0), 3.0),
            (Vec2::new(90.0, 0.0), intent(1.0, 0.0), 0.05),
        ];
        for (start, dir, dt) in cases {
            let next = step(start, dir, dt, &p, &mask, true);
            assert!((0.0..=90.0).contains(&next.x), "x={}", next.x);
            assert!((0.0..=90.0).contains(&next.y), "y={}", next.y);
        }
    }

    #[test]
    fn blocked_x_still_slides_along_y() {
        // Wall column at x >= 30; foot x = pos.x + 5.
        let mask = mask_with_walls(|x, _| x >= 30);
        let next = step(
            Vec2::new(20.0, 20.0),
            intent(1.0, 1.0),
            0.1,
            &params(),
            &mask,
            true,
        );
        assert_eq!(next.x, 20.0);
        assert!(next.y > 20.0);
    }

    #[test]
    fn blocked_y_still_slides_along_x() {
        // Wall row at y >= 40; foot y = pos.y + 8.
        let mask = mask_with_walls(|_, y| y >= 40);
        let next = step(
            Vec2::new(20.0, 30.0),
            intent(1.0, 1.0),
            0.1,
            &params(),
            &mask,
            true,
        );
        assert!(next.x > 20.0);
        assert_eq!(next.y, 30.0);
    }

    #[test]
    fn both_axes_blocked_leaves_position_unchanged() {
        let mask = mask_with_walls(|x, y| x >= 30 || y >= 40);
        let start = Vec2::new(20.0, 30.0);
        let next = step(start, intent(1.0, 1.0), 0.1, &params(), &mask, true);
        assert_eq!(next, start);
    }

    #[test]
    fn disabled_collision_commits_both_axes() {
        let mask = mask_with_walls(|_, _| true);
        let next = step(
            Vec2::new(20.0, 20.0),
            intent(1.0, 0.0),
            0.1,
            &params(),
            &mask,
            false,
        );
        assert_eq!(next, Vec2::new(30.0, 20.0));
    }

    #[test]
    fn unready_mask_commits_both_axes() {
        let next = step(
            Vec2::new(20.0, 20.0),
            intent(0.0, 1.0),
            0.1,
            &params(),
            &CollisionMask::disabled(),
            true,
        );
        assert_eq!(next, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn relocation_finds_nearest_free_ring() {
        // Everything left of x=40 is wall; feet sit at pos.x + 5.
        let mask = mask_with_walls(|x, _| x < 40);
        let start = Vec2::new(20.0, 20.0);
        let moved = relocate_if_stuck(start, &params(), &mask).expect("relocated");
        assert!(!collides_at_foot(&mask, moved, &params()));
        assert!(moved.x >= 35.0);
        assert!(moved.x <= 20.0 + RELOCATE_MAX_RADIUS_PX as f32);
    }

    #[test]
    fn relocation_is_noop_when_free_or_mask_unready() {
        let mask = mask_with_walls(|x, _| x < 10);
        assert!(relocate_if_stuck(Vec2::new(50.0, 50.0), &params(), &mask).is_none());
        assert!(
            relocate_if_stuck(Vec2::new(0.0, 0.0), &params(), &CollisionMask::disabled())
                .is_none()
        );
    }

    #[test]
    fn relocation_gives_up_when_everything_is_wall() {
        let mask = mask_with_walls(|_, _| true);
        assert!(relocate_if_stuck(Vec2::new(50.0, 50.0), &params(), &mask).is_none());
    }
}
