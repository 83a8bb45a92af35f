use glam::Vec2;

use crate::constants::COLLISION_MARGIN;
use crate::map::grid::Grid;

/// Whether an entity of `size` can stand with its top-left corner at `position`.
///
/// The center must be on a walkable tile. The bounding-box corners, inset by a small
/// margin, only have to be on the grid: a corner overlapping a wall is tolerated so
/// that wall-adjacent moves are not rejected.
pub fn is_valid_position(grid: &Grid, position: Vec2, size: f32) -> bool {
    let center = position + Vec2::splat(size / 2.0);
    if !grid.is_walkable(Grid::tile_at(center)) {
        return false;
    }

    let near = COLLISION_MARGIN;
    let far = size - COLLISION_MARGIN;
    [
        Vec2::new(near, near),
        Vec2::new(far, near),
        Vec2::new(near, far),
        Vec2::new(far, far),
    ]
    .into_iter()
    .all(|corner| grid.in_bounds(Grid::tile_at(position + corner)))
}

/// Tunnel wrap: an entity fully past one horizontal edge reappears at the other.
pub fn wrap_horizontal(position: Vec2, size: f32, width: f32) -> Vec2 {
    if position.x + size < 0.0 {
        Vec2::new(width, position.y)
    } else if position.x > width {
        Vec2::new(-size, position.y)
    } else {
        position
    }
}
