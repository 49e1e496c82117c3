use super::types::{EntityBox, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub distance: f32,
}

/// Center-to-center nearest entity. Ties keep the earliest index.
pub fn nearest(player_center: Vec2, npcs: &[EntityBox]) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    for (index, npc) in npcs.iter().enumerate() {
        let distance = npc.center().distance(player_center);
        match best {
            Some(current) if distance >= current.distance => {}
            _ if distance.is_nan() => {}
            _ => best = Some(Nearest { index, distance }),
        }
    }
    best
}

pub fn select_active(nearest: Option<Nearest>, threshold_px: f32) -> Option<usize> {
    nearest
        .filter(|hit| hit.distance <= threshold_px)
        .map(|hit| hit.index)
}
